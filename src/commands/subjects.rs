use crate::config::KableConfig;
use crate::io::DatasetWalker;
use crate::pipeline::discover_subjects_in;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn list_subjects(dataset_dir: Option<PathBuf>, config: &KableConfig) -> Result<()> {
    let dataset_dir = dataset_dir.unwrap_or_else(|| config.dataset_dir());
    let walker = DatasetWalker::new(&dataset_dir).with_pattern(config.dataset_pattern());

    let subjects = discover_subjects_in(&walker)
        .with_context(|| format!("Failed to scan {}", dataset_dir.display()))?;

    if subjects.is_empty() {
        log::warn!("No subjects found in {}", dataset_dir.display());
    }
    for subject in subjects {
        println!("{}", subject);
    }
    Ok(())
}
