//! Report-text area
//!
//! Everything that recovers structure from classic (free-form text)
//! reports: the immutable line buffer, the column-layout heuristic, the
//! fixed-width table extractor, and the model-sequence parser.

pub mod layout;
pub mod sequence;
pub mod source;
pub mod table;

pub use layout::{infer_columns, ColumnSpan};
pub use sequence::{Sample, SequenceReport, StatSeries};
pub use source::Report;
pub use table::{extract, Table, TableOptions};
