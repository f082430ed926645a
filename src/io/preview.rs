use crate::errors::{KableError, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Number of records shown by default when previewing a JSONL file.
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;

/// Read the records on the first `limit` lines of a JSONL file.
///
/// Blank lines are skipped but still count toward the limit.
pub fn preview_records(path: &Path, limit: usize) -> Result<Vec<Value>> {
    let file = File::open(path).map_err(|e| KableError::io(path, e))?;
    let mut records = Vec::new();

    for (index, line) in BufReader::new(file).lines().take(limit).enumerate() {
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => KableError::malformed(path, index + 1, e),
            _ => KableError::io(path, e),
        })?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let value = serde_json::from_str(text)
            .map_err(|e| KableError::malformed(path, index + 1, e))?;
        records.push(value);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_preview_respects_limit_and_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.jsonl");
        fs::write(&path, "{\"n\":1}\n\n{\"n\":2}\n{\"n\":3}\n").unwrap();

        let records = preview_records(&path, 3).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["n"], 2);
    }

    #[test]
    fn test_preview_invalid_utf8_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.jsonl");
        fs::write(&path, b"{\"n\":1}\n\xff\n").unwrap();

        let result = preview_records(&path, 5);
        assert!(matches!(result, Err(KableError::MalformedRecord { line: 2, .. })));
    }

    #[test]
    fn test_preview_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = preview_records(&temp_dir.path().join("nope.jsonl"), 5);
        assert!(matches!(result, Err(KableError::Io { .. })));
    }
}
