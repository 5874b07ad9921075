//! # spm-report
//!
//! Extraction engine for the output of the SPM statistical-modeling tool.
//!
//! SPM produces two families of output this crate turns into typed data:
//!
//! - classic reports: column-aligned human-readable text with no declared
//!   schema, parsed by whitespace and punctuation heuristics into tables
//!   and performance-sequence series ([`report`]);
//! - model documents: permissively-typed XML (PMML and SPMPlots dialects)
//!   navigated into variable-importance maps and partial-dependence plot
//!   descriptors ([`doc`]).
//!
//! Each parser is a pure function of complete, already-materialized input.
//! "Not present" is an ordinary `None`/typed result, never a panic; shape
//! violations recover per row. Subprocess control, display transport, and
//! plotting mechanics belong to the callers.

pub mod doc;
pub mod render;
pub mod report;
pub mod snippet;

pub use doc::{importances, partial_dependence_plots, DocError, ModelDoc, PlotDescriptor};
pub use render::{importance_chart, table_to_html, ImportanceChart};
pub use report::{
    extract, infer_columns, ColumnSpan, Report, Sample, SequenceReport, StatSeries, Table,
    TableOptions,
};
pub use snippet::{between, SnippetError};
