// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod pipeline;
pub mod runner;

// Re-export commonly used types
pub use crate::core::{Example, RunSummary, SubjectSelection, DEFAULT_SUBJECT};

pub use crate::errors::{ErrorCode, KableError};

pub use crate::io::walker::{DatasetWalker, ExampleStream};

pub use crate::pipeline::{discover_subjects, run_experiments, RunOptions};

pub use crate::runner::{
    extract_prompt, ChatRunner, ChatRunnerConfig, LoggingRunner, Runner, PROMPT_FIELDS,
};
