//! Fixed-Width Table Extractor
//!
//! Locates a titled table inside a classic report, recovers its column
//! layout through the [`layout`](crate::report::layout) inferencer, and
//! materializes header/body/footer cell grids.
//!
//! A title is only accepted when the matching line is bracketed by
//! `=`-only lines, which disambiguates a stray occurrence of the title
//! text from an actual section title. "Table not present" is an ordinary
//! outcome and comes back as `None`, never as an error.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::report::layout::{infer_columns, ColumnSpan};
use crate::report::source::{is_blank, is_dash_line, is_equals_line, Report};

/// Title patterns the SPM front-end asks for. Published here so callers
/// do not re-invent them.
pub static AUTOMATE_SUMMARY: Lazy<Regex> =
    Lazy::new(|| Regex::new("Automate Summary$").unwrap());
pub static LEARN_TEST_PERFORMANCE: Lazy<Regex> =
    Lazy::new(|| Regex::new("Learn and Test Performance$").unwrap());
pub static LEARN_CV_PERFORMANCE: Lazy<Regex> =
    Lazy::new(|| Regex::new("Learn and Cross Validation Performance$").unwrap());
pub static MODEL_PERFORMANCE: Lazy<Regex> =
    Lazy::new(|| Regex::new("Model Performance$").unwrap());

/// Runs of blanks after a comma collapse to a single blank when
/// continuation lines are joined.
static INTER_COMMA_BLANKS: Lazy<Regex> = Lazy::new(|| Regex::new(", +").unwrap());

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Maximum number of names a comma-separated list cell may hold before
    /// it collapses to a "N variables" summary.
    pub max_list_display: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions { max_list_display: 5 }
    }
}

/// One extracted table: trimmed raw-text cells, not yet type-converted.
///
/// Every body and footer row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub body: Vec<Vec<String>>,
    pub footer: Vec<Vec<String>>,
}

/// Extract the table titled by `title_pattern` from `report`.
///
/// Returns `None` when no bracketed title matches, no header separator
/// follows it, or the header line is empty.
pub fn extract(report: &Report, title_pattern: &Regex, options: &TableOptions) -> Option<Table> {
    let lines = report.lines();

    let title_idx = locate_title(lines, title_pattern)?;
    let title = lines[title_idx].trim().to_string();
    debug!("table '{}' found at line {}", title, title_idx);

    // The line before the first dash separator is the header line; the
    // body starts right after the separator.
    let separator_idx = (title_idx..lines.len()).find(|&i| is_dash_line(&lines[i]))?;
    if separator_idx == 0 {
        return None;
    }
    let header_line = &lines[separator_idx - 1];
    if header_line.is_empty() {
        return None;
    }

    let (rows, max_len) = accumulate_rows(&lines[separator_idx + 1..], header_line.len());

    let spans = infer_columns(header_line, &rows, max_len);
    let headers: Vec<String> = spans
        .iter()
        .map(|span| span.slice(header_line).to_string())
        .collect();

    // A dash-only line inside the block marks the footer boundary.
    let footer_at = rows
        .iter()
        .position(|row| is_dash_line(row))
        .unwrap_or(rows.len());

    let body = rows[..footer_at]
        .iter()
        .map(|row| slice_body_row(row, &spans, options))
        .collect();
    let footer = rows
        .iter()
        .skip(footer_at + 1)
        .map(|row| spans.iter().map(|s| s.slice(row).to_string()).collect())
        .collect();

    Some(Table {
        title: Some(title),
        headers,
        body,
        footer,
    })
}

/// Find a line matching `pattern` that is bracketed above and below by
/// `=`-only lines.
fn locate_title(lines: &[String], pattern: &Regex) -> Option<usize> {
    lines.iter().enumerate().position(|(i, line)| {
        pattern.is_match(line)
            && i > 0
            && i + 1 < lines.len()
            && is_equals_line(&lines[i - 1])
            && is_equals_line(&lines[i + 1])
    })
}

/// Accumulate body lines up to the first blank line, joining trailing-comma
/// continuation lines and collapsing the blanks that follow each comma.
/// Returns the rows plus the maximum observed line length.
fn accumulate_rows(lines: &[String], header_len: usize) -> (Vec<String>, usize) {
    let mut rows = Vec::new();
    let mut max_len = header_len;
    let mut pending = String::new();

    let mut push = |row: &str, max_len: &mut usize| {
        let joined = INTER_COMMA_BLANKS.replace_all(row, ", ").into_owned();
        if joined.len() > *max_len {
            *max_len = joined.len();
        }
        rows.push(joined);
    };

    for line in lines {
        if is_blank(line) {
            break;
        }
        if pending.is_empty() || pending.ends_with(',') {
            // A trailing comma wraps a list cell onto the next line.
            pending.push_str(line);
        } else {
            push(&pending, &mut max_len);
            pending = line.clone();
        }
    }
    if !pending.is_empty() {
        push(&pending, &mut max_len);
    }

    (rows, max_len)
}

/// Slice one body row into cells, collapsing over-long variable lists.
fn slice_body_row(row: &str, spans: &[ColumnSpan], options: &TableOptions) -> Vec<String> {
    spans
        .iter()
        .map(|span| {
            let cell = span.slice(row);
            if cell.contains(", ") {
                let names = cell.split(", ").count();
                if names > options.max_list_display {
                    return format!("{} variables", names);
                }
            }
            cell.to_string()
        })
        .collect()
}

impl Table {
    /// Number of columns; every body and footer row has this many cells.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Guard used by tests and debug assertions.
    pub fn is_rectangular(&self) -> bool {
        let w = self.width();
        self.body.iter().all(|r| r.len() == w) && self.footer.iter().all(|r| r.len() == w)
    }
}
