//! Column Layout Inferencer
//!
//! SPM classic tables carry no declared schema: column boundaries have to
//! be recovered from whitespace alone. The heuristic scans every body line
//! position by position and closes a column on each text-to-space
//! transition, unless the character before the space is a comma (a
//! comma-separated list continues through its separating blanks).
//!
//! Closing a column for the first time also decides where the next column
//! starts: if the header line has a space at the closing offset the next
//! column starts one position later (content aligns under the header),
//! otherwise it starts flush at the closing offset. Re-closing an already
//! established column can only widen its recorded end, never narrow it;
//! later lines may run longer than earlier ones.
//!
//! The scan is a plain fold over the body lines producing an immutable
//! span list, so it can be tested in isolation from table extraction.

use serde::{Deserialize, Serialize};

use crate::report::source::is_dash_line;

/// Half-open character range of one column within a table line.
///
/// Spans come out in left-to-right order with strictly increasing starts;
/// on a consistently aligned table they do not overlap, and the final
/// span's end is the table's maximum observed line length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpan {
    pub start: usize,
    pub end: usize,
}

impl ColumnSpan {
    pub fn new(start: usize, end: usize) -> Self {
        ColumnSpan { start, end }
    }

    /// Slice `line` to this span, clamped to the line length, trimmed.
    /// Short lines yield an empty cell rather than an error.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        let end = self.end.min(line.len());
        if self.start >= end {
            return "";
        }
        line.get(self.start..end).unwrap_or("").trim()
    }
}

/// Infer the column layout of a fixed-width table.
///
/// `header_line` is consulted only when a newly closed column decides its
/// successor's start; `body_lines` drive the scan. A dash-only line inside
/// the body marks the footer boundary and stops the scan early (footer
/// rows never reshape the layout). `max_len` is the maximum observed line
/// length of the table and becomes the final span's end.
pub fn infer_columns(header_line: &str, body_lines: &[String], max_len: usize) -> Vec<ColumnSpan> {
    // Position 0 is the reserved leading blank of classic output.
    let mut starts: Vec<usize> = vec![1];
    let mut ends: Vec<usize> = Vec::new();
    let header = header_line.as_bytes();

    for line in body_lines {
        if is_dash_line(line) {
            break;
        }
        scan_line(line, header, &mut starts, &mut ends);
    }

    // The last column runs to the widest observed line.
    ends.push(max_len);

    starts
        .into_iter()
        .zip(ends)
        .map(|(start, end)| ColumnSpan::new(start, end))
        .collect()
}

/// Fold one body line into the boundary accumulators.
fn scan_line(line: &str, header: &[u8], starts: &mut Vec<usize>, ends: &mut Vec<usize>) {
    let bytes = line.as_bytes();
    if bytes.len() < 2 {
        return;
    }
    let mut column = 0usize;
    let mut in_text = false;
    // The last character of every classic-output line is a trailing blank
    // and takes no part in the scan.
    for offset in 1..bytes.len() - 1 {
        if bytes[offset] == b' ' {
            // A space after a comma separates names in a list, not columns.
            if in_text && bytes[offset - 1] != b',' {
                in_text = false;
                if column >= starts.len() - 1 {
                    // First close of this column: record its end and decide
                    // where the next column starts.
                    ends.push(offset);
                    if offset < header.len() && header[offset] == b' ' {
                        starts.push(offset + 1);
                    } else {
                        starts.push(offset);
                    }
                } else if offset > ends[column] {
                    // A later line ran past the recorded end: widen.
                    ends[column] = offset;
                }
                column += 1;
            }
        } else {
            in_text = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_column_starts_at_offset_one() {
        let header = " Model     N       MSE";
        let body = lines(&["     1   200     1.234"]);
        let spans = infer_columns(header, &body, 22);
        assert_eq!(spans[0].start, 1);
    }

    #[test]
    fn test_right_aligned_columns() {
        let header = " Model     N       MSE";
        let body = lines(&[
            "     1   200     1.234",
            "     2   150     0.987",
        ]);
        let spans = infer_columns(header, &body, 22);
        assert_eq!(
            spans,
            vec![
                ColumnSpan::new(1, 6),
                ColumnSpan::new(7, 12),
                ColumnSpan::new(13, 22),
            ]
        );
        assert_eq!(spans[0].slice(header), "Model");
        assert_eq!(spans[1].slice(header), "N");
        assert_eq!(spans[2].slice(&body[0]), "1.234");
    }

    #[test]
    fn test_spans_do_not_overlap_on_aligned_table() {
        let header = " Model     N       MSE";
        let body = lines(&["     1   200     1.234"]);
        let spans = infer_columns(header, &body, 22);
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
            assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn test_header_space_shifts_next_start() {
        // Header has a space at the closing offset, so the next column
        // starts one position later.
        let header = " aa   bb";
        let body = lines(&[" aa   bb "]);
        let spans = infer_columns(header, &body, 9);
        assert_eq!(spans[0], ColumnSpan::new(1, 3));
        assert_eq!(spans[1].start, 4);
    }

    #[test]
    fn test_later_line_widens_column_end() {
        let header = " aa   bb";
        let body = lines(&[
            " aa   bb",
            " aa   bbbb  x",
            " aa   bbbbbb  ",
        ]);
        let spans = infer_columns(header, &body, 14);
        // Second line closed column 1 at offset 10; third line ran to 12.
        assert_eq!(spans[1].end, 12);
        // Widen, never narrow.
        assert_eq!(spans[0], ColumnSpan::new(1, 3));
    }

    #[test]
    fn test_comma_space_does_not_close_column() {
        let header = " Step   Variables";
        let body = lines(&["    1   AGE, INCOME, SCORE "]);
        let spans = infer_columns(header, &body, 27);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].slice(&body[0]), "AGE, INCOME, SCORE");
    }

    #[test]
    fn test_dash_line_stops_scan() {
        let header = " Model     N       MSE";
        let body = lines(&[
            "     1   200     1.234",
            " ---------------------",
            " Total        349.999  ",
        ]);
        let spans = infer_columns(header, &body, 23);
        // The footer row after the dashes must not reshape the layout.
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1], ColumnSpan::new(7, 12));
    }

    #[test]
    fn test_slice_clamps_short_lines() {
        let span = ColumnSpan::new(7, 12);
        assert_eq!(span.slice(" abc"), "");
        assert_eq!(span.slice(""), "");
    }
}
