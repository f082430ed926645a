//! CLI command implementations.
//!
//! Available commands:
//! - **run**: Filter the dataset, write the examples, and run the runner
//! - **subjects**: List the subjects present in the dataset
//! - **preview**: Show the first records of a JSONL file
//! - **init**: Write a default `.kable.toml`

pub mod init;
pub mod preview;
pub mod run;
pub mod subjects;

pub use init::init_config;
pub use preview::preview_file;
pub use run::{handle_run, RunConfig};
pub use subjects::list_subjects;
