//! Property tests for the column layout heuristic
//!
//! Generates well-formed fixed-width tables (right-aligned cells in
//! eight-character columns, the classic-output shape) and checks the span
//! invariants hold for every one of them.

use proptest::prelude::*;
use spm_report::infer_columns;

const CELL_WIDTH: usize = 8;

fn render_line(cells: &[String]) -> String {
    let mut line = String::from(" ");
    for cell in cells {
        line.push_str(&format!("{:>width$}", cell, width = CELL_WIDTH));
    }
    line.push(' ');
    line
}

fn column_name() -> impl Strategy<Value = String> {
    "[A-Z]{1,6}"
}

fn table_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Vec<u32>>)> {
    (2usize..=4).prop_flat_map(|ncol| {
        (
            prop::collection::vec(column_name(), ncol),
            prop::collection::vec(prop::collection::vec(0u32..100_000, ncol), 1..=6),
        )
    })
}

proptest! {
    #[test]
    fn spans_are_ordered_and_cover_the_table((names, rows) in table_strategy()) {
        let header = render_line(&names);
        let body: Vec<String> = rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(u32::to_string).collect();
                render_line(&cells)
            })
            .collect();
        let max_len = body
            .iter()
            .map(String::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap();

        let spans = infer_columns(&header, &body, max_len);

        // One span per column.
        prop_assert_eq!(spans.len(), names.len());
        // Left-to-right, non-overlapping, strictly increasing starts.
        for pair in spans.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert!(pair[0].end <= pair[1].start);
        }
        prop_assert_eq!(spans[0].start, 1);
        prop_assert_eq!(spans.last().unwrap().end, max_len);
    }

    #[test]
    fn slicing_recovers_every_cell((names, rows) in table_strategy()) {
        let header = render_line(&names);
        let body: Vec<String> = rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(u32::to_string).collect();
                render_line(&cells)
            })
            .collect();
        let max_len = body
            .iter()
            .map(String::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap();

        let spans = infer_columns(&header, &body, max_len);

        for (i, span) in spans.iter().enumerate() {
            prop_assert_eq!(span.slice(&header), names[i].as_str());
            for (row, line) in rows.iter().zip(&body) {
                let expected = row[i].to_string();
                prop_assert_eq!(span.slice(line), expected.as_str());
            }
        }
    }
}
