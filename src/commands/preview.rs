use crate::io::preview_records;
use anyhow::{Context, Result};
use std::path::Path;

pub fn preview_file(path: &Path, limit: usize) -> Result<()> {
    let records = preview_records(path, limit)
        .with_context(|| format!("Failed to preview {}", path.display()))?;

    for record in &records {
        println!("{}", serde_json::to_string_pretty(record)?);
    }
    log::info!("Showed {} record(s) from {}", records.len(), path.display());
    Ok(())
}
