//! Sequence Report Parser
//!
//! Recovers a sparse (tree count, statistic, sample) -> value table from
//! the performance-over-iterations sections of a classic report. Two
//! section layouts exist:
//!
//! - "TreeNet Results": the stat set is either read from the column
//!   header (held-out sample present) or inferred positionally from the
//!   header tokens of an exploratory run, and each row carries one value
//!   per statistic for Learn, then for Test when a held-out sample exists.
//! - "Learn and Test Performance" / "Model Performance": two dashed
//!   separators locate a stat-name line and a sample-label line; each row
//!   carries one value per (statistic, sample) pair in header order.
//!
//! One report may contain sections of both kinds; the second pass adds
//! statistics onto the same tree-count axis. All scan flags live in a
//! single state value threaded through the scan, so Test entries cannot
//! be recorded while no held-out sample has been detected.

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::report::source::{is_blank, is_dash_line, Report};

const TREENET_HEADER: &str = " TreeNet Results";
const LEARN_TEST_HEADER: &str = " Learn and Test Performance";
const MODEL_PERF_HEADER: &str = " Model Performance";
const LOSS_FUNCTION_PREFIX: &str = " Loss Function:";
const TIMING_TOKEN: &str = "Time/Tree";

/// Columns at the right edge of an exploratory TreeNet header that hold
/// other metrics, not tracked statistics. One more is reserved when the
/// run reports per-tree timing.
const EXPLORATORY_TRAILING: usize = 2;

/// Which sample a statistic value was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sample {
    Learn,
    Test,
}

impl Sample {
    fn from_label(label: &str) -> Option<Sample> {
        match label {
            "Learn" => Some(Sample::Learn),
            // "Test/CV" is normalized before this point.
            "Test" => Some(Sample::Test),
            _ => None,
        }
    }
}

type StatKey = (u32, String, Sample);

/// The parsed sequence report: a sparse value table over an ordered
/// tree-count axis and an insertion-ordered statistic set.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceReport {
    values: IndexMap<StatKey, f64>,
    statistics: IndexSet<String>,
    tree_counts: Vec<u32>,
    has_test_sample: bool,
}

/// Chart-ready series for one statistic: Learn values and, when a
/// held-out sample exists, Test values, both indexed by the tree counts
/// where the Learn value is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSeries {
    pub statistic: String,
    pub tree_counts: Vec<u32>,
    pub learn: Vec<f64>,
    /// `None` when the report has no held-out sample; individual entries
    /// are `None` where the Test value was absent for that tree count.
    pub test: Option<Vec<Option<f64>>>,
}

impl StatSeries {
    pub const TITLE: &'static str = "Model Performance";
    pub const X_LABEL: &'static str = "# trees";
    pub const LEARN_LABEL: &'static str = "Learn";
    pub const TEST_LABEL: &'static str = "Test";
}

/// Mutable scan state threaded through both section passes.
struct ScanState {
    values: IndexMap<StatKey, f64>,
    statistics: IndexSet<String>,
    tree_counts: Vec<u32>,
    use_test_sample: bool,
    timing_enabled: bool,
}

impl ScanState {
    fn new(timing_enabled: bool) -> Self {
        ScanState {
            values: IndexMap::new(),
            statistics: IndexSet::new(),
            tree_counts: Vec::new(),
            use_test_sample: false,
            timing_enabled,
        }
    }

    fn record_tree_count(&mut self, trees: u32) {
        if !self.tree_counts.contains(&trees) {
            self.tree_counts.push(trees);
        }
    }
}

/// Parse the sequence sections of `report`.
///
/// Returns `None` when no recognized section header is present, an
/// ordinary outcome for reports that hold no model sequence.
pub fn parse(report: &Report) -> Option<SequenceReport> {
    let lines = report.lines();
    let mut state = ScanState::new(report.contains(TIMING_TOKEN));
    let mut any_section = false;

    for i in 0..lines.len() {
        if lines[i] == TREENET_HEADER {
            debug!("TreeNet Results section at line {}", i);
            any_section = true;
            parse_treenet_section(lines, i, &mut state);
        } else if lines[i] == LEARN_TEST_HEADER || lines[i] == MODEL_PERF_HEADER {
            debug!("performance summary section at line {}", i);
            any_section = true;
            parse_performance_section(lines, i, &mut state);
        }
    }

    if !any_section {
        return None;
    }

    let has_test_sample = state.use_test_sample
        || state.values.keys().any(|(_, _, sample)| *sample == Sample::Test);
    Some(SequenceReport {
        values: state.values,
        statistics: state.statistics,
        tree_counts: state.tree_counts,
        has_test_sample,
    })
}

/// Parse a "TreeNet Results" section starting at `start`.
fn parse_treenet_section(lines: &[String], start: usize, state: &mut ScanState) {
    let n = lines.len();
    let mut j = start;

    // Skip ahead to the loss-function line; the stat headers follow it.
    let mut found = false;
    while j < n && !found {
        found = lines[j].starts_with(LOSS_FUNCTION_PREFIX);
        j += 1;
    }
    if !found {
        return;
    }
    while j < n && is_blank(&lines[j]) {
        j += 1;
    }
    if j >= n {
        return;
    }

    // A "Train" column group marks an exploratory run with no held-out
    // sample; otherwise the line itself names the tracked statistics.
    // Row keying uses this section's own header: a battery report may
    // hold several TreeNet sections with differing stat sets.
    let mut names: Vec<String> = Vec::new();
    let use_test = !lines[j].contains("Train");
    state.use_test_sample = use_test;
    if use_test {
        for token in lines[j].split_whitespace() {
            // Stat names carry a trailing hyphen marker in this layout.
            let name = token.replace('-', "");
            if !names.contains(&name) {
                names.push(name.clone());
            }
            state.statistics.insert(name);
        }
        j += 3;
    } else {
        j += 1;
        if j >= n {
            return;
        }
        let tokens: Vec<&str> = lines[j].split_whitespace().collect();
        let mut trailing = EXPLORATORY_TRAILING;
        if state.timing_enabled {
            trailing += 1;
        }
        for token in tokens
            .iter()
            .take(tokens.len().saturating_sub(trailing))
            .skip(2)
        {
            if *token != "Fract" {
                let name = token.to_string();
                if !names.contains(&name) {
                    names.push(name.clone());
                }
                state.statistics.insert(name);
            }
        }
        j += 2;
    }

    // The sequence table: one row per tree count, one value per statistic
    // for Learn, then for Test when a held-out sample exists.
    while j < n && !is_blank(&lines[j]) {
        if let Some((trees, entries)) = parse_treenet_row(&lines[j], &names, use_test) {
            state.record_tree_count(trees);
            for (name, sample, value) in entries {
                state.values.insert((trees, name, sample), value);
            }
        } else {
            warn!("skipping malformed sequence row: {:?}", lines[j]);
        }
        j += 1;
    }
}

/// Parse one TreeNet sequence row. Returns `None` on any malformed cell
/// so the caller can skip the row whole; no partial commit.
fn parse_treenet_row(
    line: &str,
    names: &[String],
    use_test: bool,
) -> Option<(u32, Vec<(String, Sample, f64)>)> {
    let mut tokens = line.split_whitespace();
    let trees: u32 = tokens.next()?.parse().ok()?;
    let mut entries = Vec::new();
    for name in names {
        let learn: f64 = tokens.next()?.parse().ok()?;
        entries.push((name.clone(), Sample::Learn, learn));
        if use_test {
            let test: f64 = tokens.next()?.parse().ok()?;
            entries.push((name.clone(), Sample::Test, test));
        }
    }
    Some((trees, entries))
}

/// Parse a "Learn and Test Performance" / "Model Performance" section.
fn parse_performance_section(lines: &[String], start: usize, state: &mut ScanState) {
    let n = lines.len();
    let mut j = start;

    // Two successive dashed separators; the stat names sit two lines
    // above the second, the sample labels one line above.
    for _ in 0..2 {
        j += 1;
        while j < n && !is_dash_line(&lines[j]) {
            j += 1;
        }
    }
    if j >= n || j < 2 {
        return;
    }

    let stat_tokens: Vec<&str> = lines[j - 2].split_whitespace().collect();
    let mut sample_tokens: Vec<&str> = lines[j - 1].split_whitespace().collect();
    if sample_tokens.is_empty() {
        return;
    }
    // The first token heads the tree-count column.
    sample_tokens.remove(0);

    // Each column keeps its position so a skipped label cannot shift the
    // value alignment of the columns after it.
    let pairs = stat_tokens.len().min(sample_tokens.len());
    let mut columns: Vec<(usize, String, Sample)> = Vec::with_capacity(pairs);
    for k in 0..pairs {
        let sample_label = if sample_tokens[k] == "Test/CV" {
            "Test"
        } else {
            sample_tokens[k]
        };
        let Some(sample) = Sample::from_label(sample_label) else {
            warn!("unrecognized sample label {:?}", sample_tokens[k]);
            continue;
        };
        // "Class.Error" collides with an already-tracked "Class" metric;
        // the upper-case form keeps the two apart when it does not.
        let name = if stat_tokens[k] == "Class.Error" {
            if state.statistics.contains("Class") {
                "Class".to_string()
            } else {
                "CLASS".to_string()
            }
        } else {
            stat_tokens[k].to_string()
        };
        columns.push((k, name, sample));
    }
    for (_, name, _) in &columns {
        state.statistics.insert(name.clone());
    }

    j += 1;
    while j < n && !is_blank(&lines[j]) {
        if let Some((trees, entries)) = parse_performance_row(&lines[j], &columns) {
            state.record_tree_count(trees);
            for (name, sample, value) in entries {
                state.values.insert((trees, name, sample), value);
            }
        } else {
            warn!("skipping malformed performance row: {:?}", lines[j]);
        }
        j += 1;
    }
}

fn parse_performance_row(
    line: &str,
    columns: &[(usize, String, Sample)],
) -> Option<(u32, Vec<(String, Sample, f64)>)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let trees: u32 = tokens.first()?.parse().ok()?;
    let mut entries = Vec::new();
    for (k, name, sample) in columns {
        let value: f64 = tokens.get(1 + *k)?.parse().ok()?;
        entries.push((name.clone(), *sample, value));
    }
    Some((trees, entries))
}

impl SequenceReport {
    /// Tracked statistic names in first-seen order.
    pub fn statistics(&self) -> impl Iterator<Item = &str> {
        self.statistics.iter().map(String::as_str)
    }

    /// Tree-count axis in first-seen order.
    pub fn tree_counts(&self) -> &[u32] {
        &self.tree_counts
    }

    /// Whether the report variant carries a held-out sample.
    pub fn has_test_sample(&self) -> bool {
        self.has_test_sample
    }

    /// Look up one value.
    pub fn value(&self, trees: u32, statistic: &str, sample: Sample) -> Option<f64> {
        self.values
            .get(&(trees, statistic.to_string(), sample))
            .copied()
    }

    /// Series for one statistic, restricted to the tree counts where its
    /// Learn value is defined. `None` for untracked statistics.
    pub fn series(&self, statistic: &str) -> Option<StatSeries> {
        if !self.statistics.contains(statistic) {
            return None;
        }
        let mut tree_counts = Vec::new();
        let mut learn = Vec::new();
        let mut test = Vec::new();
        for &trees in &self.tree_counts {
            let Some(value) = self.value(trees, statistic, Sample::Learn) else {
                continue;
            };
            tree_counts.push(trees);
            learn.push(value);
            test.push(self.value(trees, statistic, Sample::Test));
        }
        Some(StatSeries {
            statistic: statistic.to_string(),
            tree_counts,
            learn,
            test: if self.has_test_sample { Some(test) } else { None },
        })
    }

    /// One series per tracked statistic, in first-seen order.
    pub fn all_series(&self) -> Vec<StatSeries> {
        self.statistics
            .iter()
            .filter_map(|name| self.series(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPLORATORY: &str = "
 TreeNet Results
 ===============

 Loss Function: LEAST SQUARES

            Train    Train
  Trees     Nodes      MSE      MAD    Fract     Best
 ----------------------------------------------------
      1    10.500    2.300    1.000        1
      5     8.200    1.900    1.000        5
     10     7.100    1.700    1.000       10
";

    #[test]
    fn test_exploratory_has_no_test_entries() {
        let report = Report::new(EXPLORATORY);
        let parsed = parse(&report).unwrap();
        assert!(!parsed.has_test_sample());
        let stats: Vec<&str> = parsed.statistics().collect();
        assert_eq!(stats, vec!["MSE", "MAD"]);
        assert_eq!(parsed.tree_counts(), &[1, 5, 10]);
        assert_eq!(parsed.value(5, "MSE", Sample::Learn), Some(8.2));
        assert_eq!(parsed.value(5, "MSE", Sample::Test), None);
    }

    #[test]
    fn test_fract_is_never_tracked() {
        let report = Report::new(EXPLORATORY);
        let parsed = parse(&report).unwrap();
        assert!(parsed.statistics().all(|s| s != "Fract"));
    }

    #[test]
    fn test_exploratory_series_has_no_test_vector() {
        let report = Report::new(EXPLORATORY);
        let parsed = parse(&report).unwrap();
        let series = parsed.series("MAD").unwrap();
        assert_eq!(series.tree_counts, vec![1, 5, 10]);
        assert_eq!(series.learn, vec![2.3, 1.9, 1.7]);
        assert!(series.test.is_none());
    }

    #[test]
    fn test_timing_column_reserves_extra_trailing_slot() {
        let text = "
 TreeNet Results
 ===============

 Loss Function: LEAST SQUARES

            Train    Train
  Trees     Nodes      MSE      MAD    Fract     Best  Time/Tree
 ----------------------------------------------------------------
      1    10.500    2.300    1.000        1      0.020
      5     8.200    1.900    1.000        5      0.019
";
        let report = Report::new(text);
        let parsed = parse(&report).unwrap();
        let stats: Vec<&str> = parsed.statistics().collect();
        assert_eq!(stats, vec!["MSE", "MAD"]);
        assert!(parsed.statistics().all(|s| s != "Best" && s != "Time/Tree"));
        assert_eq!(parsed.value(5, "MSE", Sample::Learn), Some(8.2));
        assert_eq!(parsed.value(5, "MAD", Sample::Learn), Some(1.9));
    }

    const HELD_OUT: &str = "
 TreeNet Results
 ===============

 Loss Function: LEAST SQUARES

               MSE-              MAD-
    Trees     Learn     Test    Learn     Test
 ---------------------------------------------
        1    10.500   12.100    2.300    2.600
        5     8.200    9.400    1.900    2.100
";

    #[test]
    fn test_held_out_sample_reads_stats_from_header() {
        let report = Report::new(HELD_OUT);
        let parsed = parse(&report).unwrap();
        assert!(parsed.has_test_sample());
        let stats: Vec<&str> = parsed.statistics().collect();
        assert_eq!(stats, vec!["MSE", "MAD"]);
        assert_eq!(parsed.value(1, "MSE", Sample::Learn), Some(10.5));
        assert_eq!(parsed.value(1, "MSE", Sample::Test), Some(12.1));
        assert_eq!(parsed.value(5, "MAD", Sample::Test), Some(2.1));
    }

    #[test]
    fn test_no_recognized_section_is_none() {
        let report = Report::new(" Nothing to see here.\n");
        assert!(parse(&report).is_none());
    }

    #[test]
    fn test_malformed_row_is_skipped_whole() {
        let text = "
 TreeNet Results
 ===============

 Loss Function: LEAST SQUARES

            Train    Train
  Trees     Nodes      MSE      MAD    Fract     Best
 ----------------------------------------------------
      1    10.500    2.300    1.000        1
      2    oops      9.999    1.000        2
      3     6.000    1.500    1.000        3
";
        let report = Report::new(text);
        let parsed = parse(&report).unwrap();
        assert_eq!(parsed.tree_counts(), &[1, 3]);
        assert_eq!(parsed.value(2, "MSE", Sample::Learn), None);
        assert_eq!(parsed.value(2, "MAD", Sample::Learn), None);
    }

    #[test]
    fn test_idempotent_parse() {
        let report = Report::new(HELD_OUT);
        assert_eq!(parse(&report), parse(&report));
    }

    const PERFORMANCE: &str = "
 Model Performance
 -----------------

              MSE       MSE       MAD       MAD
   Trees    Learn   Test/CV     Learn   Test/CV
 ----------------------------------------------
     100    1.200     1.400     0.800     0.950
     200    1.100     1.350     0.750     0.930
";

    #[test]
    fn test_performance_section_pairs_stat_and_sample() {
        let report = Report::new(PERFORMANCE);
        let parsed = parse(&report).unwrap();
        assert_eq!(parsed.tree_counts(), &[100, 200]);
        assert_eq!(parsed.value(100, "MSE", Sample::Learn), Some(1.2));
        assert_eq!(parsed.value(100, "MSE", Sample::Test), Some(1.4));
        assert_eq!(parsed.value(200, "MAD", Sample::Test), Some(0.93));
        assert!(parsed.has_test_sample());
    }

    #[test]
    fn test_class_error_renames_to_upper_when_class_untracked() {
        let text = "
 Model Performance
 -----------------

            Class.Error   Class.Error
   Trees          Learn       Test/CV
 ------------------------------------
     100          0.210         0.260
";
        let report = Report::new(text);
        let parsed = parse(&report).unwrap();
        let stats: Vec<&str> = parsed.statistics().collect();
        assert_eq!(stats, vec!["CLASS"]);
        assert_eq!(parsed.value(100, "CLASS", Sample::Test), Some(0.26));
    }

    #[test]
    fn test_class_error_merges_onto_tracked_class() {
        let text = "
 TreeNet Results
 ===============

 Loss Function: CLASSIFICATION

             Class-
    Trees     Learn     Test
 ---------------------------
        1     0.300     0.340
      100     0.210     0.250

 Model Performance
 -----------------

            Class.Error   Class.Error
   Trees          Learn       Test/CV
 ------------------------------------
     100          0.210         0.260
";
        let report = Report::new(text);
        let parsed = parse(&report).unwrap();
        let stats: Vec<&str> = parsed.statistics().collect();
        assert_eq!(stats, vec!["Class"]);
        assert_eq!(parsed.value(1, "Class", Sample::Learn), Some(0.3));
        // The performance section lands on the already-tracked name.
        assert_eq!(parsed.value(100, "Class", Sample::Test), Some(0.26));
    }

    #[test]
    fn test_second_treenet_section_keys_by_its_own_header() {
        // Battery output: two TreeNet sections with differing stat sets.
        let text = "
 TreeNet Results
 ===============

 Loss Function: LEAST SQUARES

               MSE-
    Trees     Learn     Test
 ---------------------------
        1    10.500   12.100

 TreeNet Results
 ===============

 Loss Function: LEAST ABSOLUTE DEVIATION

               MAD-
    Trees     Learn     Test
 ---------------------------
        1     2.300    2.600
";
        let report = Report::new(text);
        let parsed = parse(&report).unwrap();
        let stats: Vec<&str> = parsed.statistics().collect();
        assert_eq!(stats, vec!["MSE", "MAD"]);
        // The second section's rows carry MAD values only.
        assert_eq!(parsed.value(1, "MAD", Sample::Learn), Some(2.3));
        assert_eq!(parsed.value(1, "MAD", Sample::Test), Some(2.6));
        assert_eq!(parsed.value(1, "MSE", Sample::Learn), Some(10.5));
    }
}
