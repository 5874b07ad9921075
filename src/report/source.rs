//! Report line buffer and line-shape classifiers
//!
//! A `Report` is one complete captured output of a single SPM command,
//! split into lines at construction and immutable afterwards. The
//! classifiers recognize the two separator conventions of SPM classic
//! output: `=`-only lines bracketing section titles and `-`-only lines
//! separating a table header from its body (or its body from a footer).
//!
//! Every classic-output line starts with a single blank, so both patterns
//! are anchored on a leading space.

use once_cell::sync::Lazy;
use regex::Regex;

static EQUALS_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ =+$").unwrap());
static DASH_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ -+$").unwrap());

/// One complete captured output of a single external-tool command.
///
/// Immutable once captured; every parser in this crate is a pure function
/// of a `Report` (or of a parsed XML document), so parsing the same report
/// twice yields structurally equal results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    /// Capture report text, splitting it into lines.
    pub fn new(text: &str) -> Self {
        Report {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line at `index`, if the report is that long.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether any line contains `needle`. Used for cheap report-level
    /// variant probes (e.g. the presence of a timing column).
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

/// A section-title bracket line: one leading space, then only `=`.
pub fn is_equals_line(line: &str) -> bool {
    EQUALS_LINE.is_match(line)
}

/// A header/footer separator line: one leading space, then only `-`.
pub fn is_dash_line(line: &str) -> bool {
    DASH_LINE.is_match(line)
}

/// A table-terminating blank line.
pub fn is_blank(line: &str) -> bool {
    line.is_empty()
}
