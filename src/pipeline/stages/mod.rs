//! Stages of the preparation pipeline.
//!
//! `filtering` and `aggregation` are pure; `output_path` creates the
//! destination directory and nothing else.

pub mod aggregation;
pub mod filtering;
pub mod output_path;

pub use aggregation::SubjectTally;
pub use filtering::{filter_by_subject, SubjectFilter};
pub use output_path::{output_stem, resolve_output_path, DEFAULT_OUTPUT_DIR};
