// Test utility module for kable integration tests
#![allow(dead_code)]

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The two-record corpus used throughout the pipeline tests.
pub const SAMPLE_CORPUS: &str = concat!(
    "{\"subject\":\"Math\",\"prompt\":\"2+2?\"}\n",
    "{\"subject\":\"BioMedicine\",\"prompt\":\"What is DNA?\"}\n",
);

/// Helper to create a dataset directory with the given files.
pub fn create_dataset(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    for (name, content) in files {
        let file_path = temp_dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write dataset file");
    }
    temp_dir
}

/// Parse every non-blank line of a JSONL file.
pub fn read_jsonl(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("Failed to read output file")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("Output line is not JSON"))
        .collect()
}

/// Output directory inside a temp dir, kept apart from the dataset files.
pub fn output_dir(root: &TempDir) -> PathBuf {
    root.path().join("outputs")
}
