//! Model-document area
//!
//! Navigation over the two XML dialects SPM's TRANSLATE command emits: a
//! PMML model-description dialect (variable importances) and the SPMPlots
//! dialect (partial-dependence plots). All access goes through the
//! normalizing boundary in [`xml`].

pub mod importance;
pub mod plots;
pub mod xml;

pub use importance::{importances, ranked};
pub use plots::{
    data_dictionary, partial_dependence_plots, Coordinate, DataDictionary, DataField, DataType,
    OpType, PlotDescriptor, PlotValue, MISSING_SENTINEL,
};
pub use xml::{DocError, ModelDoc};
