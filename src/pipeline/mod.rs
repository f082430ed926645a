//! Experiment preparation: scan, filter, write, run, summarize.
//!
//! Everything happens on the calling thread, one example at a time. For each
//! selected example the record is written first and the runner, if any, is
//! called right after. The output replaces its target only once the whole
//! stream has been processed.
//!
//! # Example
//!
//! ```rust,no_run
//! use kable::core::SubjectSelection;
//! use kable::pipeline::{run_experiments, RunOptions};
//!
//! let options = RunOptions::new("kable-dataset")
//!     .with_subjects(SubjectSelection::All)
//!     .with_max_examples(Some(5));
//! let summary = run_experiments(&options, None)?;
//! println!("{}", summary);
//! # Ok::<(), kable::errors::KableError>(())
//! ```

pub mod stages;

pub use stages::DEFAULT_OUTPUT_DIR;

use crate::core::{RunSummary, SubjectSelection};
use crate::errors::Result;
use crate::io::walker::{DatasetWalker, DEFAULT_DATASET_PATTERN};
use crate::io::writers::JsonlFile;
use crate::runner::Runner;
use stages::{filter_by_subject, resolve_output_path, SubjectFilter, SubjectTally};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Inputs of one preparation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub dataset_dir: PathBuf,
    pub dataset_pattern: String,
    pub subjects: SubjectSelection,
    pub output_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub max_examples: Option<usize>,
}

impl RunOptions {
    /// Options for the default subject with a derived output path.
    pub fn new(dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
            dataset_pattern: DEFAULT_DATASET_PATTERN.to_string(),
            subjects: SubjectSelection::default(),
            output_path: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_examples: None,
        }
    }

    pub fn with_subjects(mut self, subjects: SubjectSelection) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn with_output_path(mut self, path: Option<PathBuf>) -> Self {
        self.output_path = path;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_max_examples(mut self, max: Option<usize>) -> Self {
        self.max_examples = max;
        self
    }

    pub fn with_dataset_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.dataset_pattern = pattern.into();
        self
    }

    fn walker(&self) -> DatasetWalker {
        DatasetWalker::new(&self.dataset_dir).with_pattern(&self.dataset_pattern)
    }
}

/// Prepare the selected examples and hand each one to `runner`.
///
/// Stops at the first scan, write, or runner error; the output file at the
/// resolved path is left as it was before the run in that case.
pub fn run_experiments(
    options: &RunOptions,
    mut runner: Option<&mut dyn Runner>,
) -> Result<RunSummary> {
    let output_path = resolve_output_path(
        options.output_path.as_deref(),
        &options.subjects,
        &options.output_dir,
    )?;
    log::info!(
        "Preparing examples from {} into {}",
        options.dataset_dir.display(),
        output_path.display()
    );

    let filter = SubjectFilter::new(&options.subjects);
    let selected = filter_by_subject(options.walker().examples()?, filter);
    let limit = options.max_examples.unwrap_or(usize::MAX);

    let mut output = JsonlFile::create(&output_path)?;
    let mut tally = SubjectTally::new();

    for example in selected.take(limit) {
        let example = example?;
        output.write_record(&example.to_record())?;
        tally.record(example.subject());

        if let Some(runner) = runner.as_deref_mut() {
            runner.run(&example)?;
        }
    }

    let output_path = output.commit()?;
    log::info!(
        "Wrote {} example(s) to {}",
        tally.total(),
        output_path.display()
    );
    Ok(tally.into_summary(output_path))
}

/// Every distinct subject in the dataset, sorted.
pub fn discover_subjects(dataset_dir: &Path) -> Result<Vec<String>> {
    discover_subjects_in(&DatasetWalker::new(dataset_dir))
}

pub fn discover_subjects_in(walker: &DatasetWalker) -> Result<Vec<String>> {
    let mut subjects = BTreeSet::new();
    for example in walker.examples()? {
        subjects.insert(example?.subject().to_string());
    }
    log::debug!(
        "Discovered {} subject(s) in {}",
        subjects.len(),
        walker.root().display()
    );
    Ok(subjects.into_iter().collect())
}
