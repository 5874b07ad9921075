//! Partial-dependence plot extraction from SPMPlots documents
//!
//! A plots document carries a data dictionary (type and category
//! information per field) followed by plot descriptors whose `Data`
//! element holds newline/comma-delimited rows. A cell parses as a float
//! when its coordinate is a partial-dependence axis or its field is
//! numeric; the tool's missing-value sentinel normalizes to
//! [`PlotValue::Missing`] at parse time and never leaks further.

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::doc::xml::{elements, ModelDoc};

/// The numeric code SPM writes for a missing value.
pub const MISSING_SENTINEL: f64 = -1e36;

/// The only plot type extracted today. Two-way plots are ignored.
const SINGLE_PLOT: &str = "TreeNet Single Plot";

/// Operational type of a data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpType {
    Continuous,
    Categorical,
    Other(String),
}

impl OpType {
    fn from_attr(raw: &str) -> OpType {
        match raw {
            "continuous" => OpType::Continuous,
            "categorical" => OpType::Categorical,
            other => OpType::Other(other.to_string()),
        }
    }
}

/// Storage type of a data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Float,
    Character,
    Other(String),
}

impl DataType {
    fn from_attr(raw: &str) -> DataType {
        match raw {
            "float" => DataType::Float,
            "character" => DataType::Character,
            other => DataType::Other(other.to_string()),
        }
    }
}

/// One entry of the data dictionary. Built once per document, read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataField {
    pub name: String,
    pub data_type: DataType,
    pub op_type: OpType,
    /// Category levels, populated only for categorical fields.
    pub categories: Vec<String>,
}

/// Field lookup by name, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataDictionary {
    fields: IndexMap<String, DataField>,
}

impl DataDictionary {
    fn from_node(dictionary: roxmltree::Node<'_, '_>) -> DataDictionary {
        let mut fields = IndexMap::new();
        for node in elements(dictionary, "DataField") {
            let Some(name) = node.attribute("name") else {
                warn!("DataField without a name attribute; skipped");
                continue;
            };
            let op_type = OpType::from_attr(node.attribute("optype").unwrap_or(""));
            let categories = if op_type == OpType::Categorical {
                elements(node, "Value")
                    .filter_map(|v| v.attribute("value"))
                    .map(str::to_string)
                    .collect()
            } else {
                Vec::new()
            };
            fields.insert(
                name.to_string(),
                DataField {
                    name: name.to_string(),
                    data_type: DataType::from_attr(node.attribute("dataType").unwrap_or("")),
                    op_type,
                    categories,
                },
            );
        }
        DataDictionary { fields }
    }

    pub fn field(&self, name: &str) -> Option<&DataField> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One plot axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub name: String,
    pub interpretation: String,
    /// Target class level, present on the target coordinate of
    /// classification plots.
    pub level: Option<String>,
}

/// One parsed cell of a plot's data block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlotValue {
    Number(f64),
    /// The sentinel, or an empty cell.
    Missing,
    /// A categorical level kept as text.
    Label(String),
}

impl PlotValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PlotValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, PlotValue::Missing)
    }
}

/// One extracted partial-dependence plot, chart-ready.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotDescriptor {
    pub plot_type: String,
    pub model: String,
    pub coordinates: Vec<Coordinate>,
    /// Predictor variable (coordinate 0).
    pub predictor: String,
    /// Target variable (coordinate 1).
    pub target: String,
    /// Target class level, for titling classification plots.
    pub level: Option<String>,
    /// Full cell grid, one row per record, one value per coordinate.
    pub rows: Vec<Vec<PlotValue>>,
    /// Predictor-value series (column 0 of `rows`).
    pub x: Vec<PlotValue>,
    /// Partial-dependence series (column 1 of `rows`).
    pub y: Vec<Option<f64>>,
    /// Category tick labels when the predictor is categorical.
    pub tick_labels: Option<Vec<String>>,
    /// Line chart when true, bar chart otherwise.
    pub predictor_continuous: bool,
}

impl PlotDescriptor {
    /// Chart title, carrying the target class level when present.
    pub fn title(&self) -> String {
        match &self.level {
            Some(level) => format!(
                "TreeNet Partial Dependency Plot ({} = {})",
                self.target, level
            ),
            None => "TreeNet Partial Dependency Plot".to_string(),
        }
    }

    pub const Y_LABEL: &'static str = "Partial Dependency";
}

/// Parse the data dictionary of a plots document.
pub fn data_dictionary(doc: &ModelDoc) -> DataDictionary {
    let Ok(root) = doc.root_named("SPMPlots") else {
        return DataDictionary::default();
    };
    elements(root, "DataDictionary")
        .next()
        .map(DataDictionary::from_node)
        .unwrap_or_default()
}

/// Extract every single-variable partial-dependence plot in the
/// document. A garbled plot is skipped without aborting its siblings.
pub fn partial_dependence_plots(doc: &ModelDoc) -> Vec<PlotDescriptor> {
    let Ok(root) = doc.root_named("SPMPlots") else {
        return Vec::new();
    };
    let dictionary = data_dictionary(doc);

    let mut plots = Vec::new();
    for node in elements(root, "Plot") {
        if node.attribute("Type") != Some(SINGLE_PLOT) {
            continue;
        }
        match extract_plot(node, &dictionary) {
            Some(plot) => plots.push(plot),
            None => warn!("skipping malformed plot node"),
        }
    }
    plots
}

fn extract_plot(
    node: roxmltree::Node<'_, '_>,
    dictionary: &DataDictionary,
) -> Option<PlotDescriptor> {
    let coordinates: Vec<Coordinate> = elements(node, "Coordinate")
        .map(|c| Coordinate {
            name: c.attribute("Name").unwrap_or("").to_string(),
            interpretation: c.attribute("Interpretation").unwrap_or("").to_string(),
            level: c.attribute("Level").map(str::to_string),
        })
        .collect();
    if coordinates.len() < 2 {
        return None;
    }
    let data = elements(node, "Data").next()?.text()?;

    let mut rows: Vec<Vec<PlotValue>> = Vec::new();
    for line in data.lines().filter(|l| !l.trim().is_empty()) {
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() < coordinates.len() {
            warn!("plot row with {} cells, expected {}", cells.len(), coordinates.len());
            continue;
        }
        rows.push(
            coordinates
                .iter()
                .zip(cells)
                .map(|(coord, cell)| parse_cell(cell, coord, dictionary))
                .collect(),
        );
    }

    let predictor = coordinates[0].name.clone();
    let target = coordinates[1].name.clone();
    let target_categorical = dictionary
        .field(&target)
        .map(|f| f.op_type == OpType::Categorical)
        .unwrap_or(false);
    let level = if target_categorical {
        coordinates[1].level.clone()
    } else {
        None
    };
    let predictor_field = dictionary.field(&predictor);
    let predictor_continuous = predictor_field
        .map(|f| f.op_type == OpType::Continuous)
        .unwrap_or(true);
    let tick_labels = predictor_field
        .filter(|f| f.op_type == OpType::Categorical)
        .map(|f| f.categories.clone());

    let x: Vec<PlotValue> = rows.iter().map(|row| row[0].clone()).collect();
    let y: Vec<Option<f64>> = rows.iter().map(|row| row[1].as_number()).collect();

    Some(PlotDescriptor {
        plot_type: node.attribute("Type").unwrap_or("").to_string(),
        model: node.attribute("Model").unwrap_or("").to_string(),
        coordinates,
        predictor,
        target,
        level,
        rows,
        x,
        y,
        tick_labels,
        predictor_continuous,
    })
}

/// Parse one cell. Floats are expected when the coordinate is a
/// partial-dependence axis or the field's storage type is numeric; the
/// missing-value sentinel and empty cells normalize to `Missing`.
fn parse_cell(raw: &str, coord: &Coordinate, dictionary: &DataDictionary) -> PlotValue {
    let cell = raw.trim();
    if cell.is_empty() {
        return PlotValue::Missing;
    }
    let numeric = coord.interpretation == "PartialDependence"
        || dictionary
            .field(&coord.name)
            .map(|f| f.data_type == DataType::Float)
            .unwrap_or(false);
    if !numeric {
        return PlotValue::Label(cell.to_string());
    }
    match cell.parse::<f64>() {
        Ok(value) if value == MISSING_SENTINEL => PlotValue::Missing,
        Ok(value) => PlotValue::Number(value),
        Err(_) => {
            warn!("non-numeric cell {:?} in numeric plot column", cell);
            PlotValue::Missing
        }
    }
}
