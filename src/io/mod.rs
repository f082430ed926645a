pub mod preview;
pub mod walker;
pub mod writers;

pub use preview::{preview_records, DEFAULT_PREVIEW_LIMIT};
pub use walker::{DatasetWalker, ExampleStream, DEFAULT_DATASET_PATTERN};
pub use writers::{JsonlFile, JsonlWriter};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}
