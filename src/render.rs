//! Output shapes for the display collaborator
//!
//! The engine hands two things to the front-end: an HTML rendition of an
//! extracted table, and chart-ready arrays. Both are plain values; no
//! transport or plotting mechanics live here.

use serde::{Deserialize, Serialize};

use crate::doc::importance;
use crate::report::table::Table;
use indexmap::IndexMap;

/// Render an extracted table as an HTML `<table>`: caption from the
/// title, bolded column headers, optional footer with the first cell of
/// each row bolded. Cell text is escaped.
pub fn table_to_html(table: &Table) -> String {
    let mut html = String::from("<table>");
    if let Some(title) = &table.title {
        html.push_str("<caption>");
        html.push_str(&escape(title));
        html.push_str("</caption>");
    }
    html.push_str("<thead><tr>");
    for header in &table.headers {
        html.push_str("<th>");
        html.push_str(&escape(header));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.body {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&escape(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody>");
    if !table.footer.is_empty() {
        html.push_str("<tfoot>");
        for row in &table.footer {
            html.push_str("<tr>");
            for (i, cell) in row.iter().enumerate() {
                let tag = if i == 0 { "th" } else { "td" };
                html.push('<');
                html.push_str(tag);
                html.push('>');
                html.push_str(&escape(cell));
                html.push_str("</");
                html.push_str(tag);
                html.push('>');
            }
            html.push_str("</tr>");
        }
        html.push_str("</tfoot>");
    }
    html.push_str("</table>");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Chart-ready variable-importance data: a horizontal bar chart stacked
/// in ascending order of importance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceChart {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ImportanceChart {
    pub const TITLE: &'static str = "Variable Importances";
    pub const X_LABEL: &'static str = "Importance";
    pub const Y_LABEL: &'static str = "Predictor Name";
}

/// Build the importance chart shape from an averaged importance map.
pub fn importance_chart(importances: &IndexMap<String, f64>) -> ImportanceChart {
    let ranked = importance::ranked(importances);
    let (labels, scores) = ranked.into_iter().unzip();
    ImportanceChart { labels, scores }
}
