//! Pure aggregation of the examples a run wrote.

use crate::core::RunSummary;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Running per-subject tally over the written stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectTally {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl SubjectTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, subject: &str) {
        *self.counts.entry(subject.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Package the tally into a summary (pure).
    ///
    /// # Arguments
    ///
    /// * `output_path` - Absolute path of the written file
    ///
    /// # Returns
    ///
    /// Summary whose subjects are the observed ones, sorted
    pub fn into_summary(self, output_path: PathBuf) -> RunSummary {
        RunSummary {
            total_examples: self.total,
            subjects: self.counts.keys().cloned().collect(),
            subject_counts: self.counts,
            output_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_total() {
        let mut tally = SubjectTally::new();
        for subject in ["Math", "Bio", "Math", "Law"] {
            tally.record(subject);
        }

        let summary = tally.into_summary(PathBuf::from("/out/all-subjects.jsonl"));
        assert_eq!(summary.total_examples, 4);
        assert_eq!(summary.subject_counts.values().sum::<usize>(), 4);
        assert_eq!(summary.subjects, vec!["Bio", "Law", "Math"]);
        assert_eq!(summary.subject_counts["Math"], 2);
    }

    #[test]
    fn test_empty_tally() {
        let summary = SubjectTally::new().into_summary(PathBuf::from("/out/x.jsonl"));
        assert_eq!(summary.total_examples, 0);
        assert!(summary.subjects.is_empty());
        assert!(summary.subject_counts.is_empty());
    }

    #[test]
    fn test_subjects_differing_in_case_are_distinct() {
        let mut tally = SubjectTally::new();
        tally.record("math");
        tally.record("Math");
        let summary = tally.into_summary(PathBuf::from("/out/math.jsonl"));
        assert_eq!(summary.subjects, vec!["Math", "math"]);
    }
}
