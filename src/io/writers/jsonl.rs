use crate::errors::{KableError, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes one JSON value per line. Non-ASCII text is written as-is.
pub struct JsonlWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_record<T: Serialize + ?Sized>(&mut self, record: &T) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// A JSONL destination that replaces its target only on [`JsonlFile::commit`].
///
/// Records go to a temporary file in the target's directory; committing
/// renames it over the target. Dropping without committing leaves the target
/// untouched. The committed file gets the target's current mode, or the
/// umask default when the target does not exist yet.
pub struct JsonlFile {
    path: PathBuf,
    writer: JsonlWriter<BufWriter<NamedTempFile>>,
}

impl JsonlFile {
    pub fn create(path: &Path) -> Result<Self> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut builder = tempfile::Builder::new();
        builder.prefix(".kable-").suffix(".tmp");
        #[cfg(unix)]
        builder.permissions(target_permissions(path));

        let temp = builder
            .tempfile_in(dir)
            .map_err(|e| KableError::io(dir, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: JsonlWriter::new(BufWriter::new(temp)),
        })
    }

    pub fn write_record<T: Serialize + ?Sized>(&mut self, record: &T) -> Result<()> {
        self.writer
            .write_record(record)
            .map_err(|e| KableError::io(&self.path, e))
    }

    /// Flush and move the records into place, replacing any previous file.
    pub fn commit(self) -> Result<PathBuf> {
        let Self { path, writer } = self;
        let temp = writer
            .into_inner()
            .into_inner()
            .map_err(|e| KableError::io(&path, e.into_error()))?;
        temp.persist(&path)
            .map_err(|e| KableError::io(&path, e.error))?;
        Ok(path)
    }
}

// Mode for a freshly created output; the kernel still applies the umask.
#[cfg(unix)]
fn target_permissions(path: &Path) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o7777)
        .unwrap_or(0o666);
    std::fs::Permissions::from_mode(mode)
}

/// Append one JSON line to `path`, creating the file if needed.
pub fn append_record<T: Serialize + ?Sized>(path: &Path, record: &T) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| KableError::io(path, e))?;
    let mut writer = JsonlWriter::new(BufWriter::new(file));
    writer
        .write_record(record)
        .and_then(|_| writer.flush())
        .map_err(|e| KableError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writes_one_record_per_line_unescaped() {
        let mut writer = JsonlWriter::new(Vec::new());
        writer.write_record(&json!({"subject": "Biología", "n": 1})).unwrap();
        writer.write_record(&json!({"subject": "数学"})).unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Biología"));
        assert!(lines[1].contains("数学"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_commit_replaces_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.jsonl");
        fs::write(&path, "old\nold\nold\n").unwrap();

        let mut file = JsonlFile::create(&path).unwrap();
        file.write_record(&json!({"a": 1})).unwrap();
        file.commit().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":1}\n");
    }

    #[test]
    fn test_uncommitted_file_leaves_target_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.jsonl");
        fs::write(&path, "previous run\n").unwrap();

        {
            let mut file = JsonlFile::create(&path).unwrap();
            file.write_record(&json!({"a": 1})).unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "previous run\n");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_append_record_keeps_existing_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("responses.jsonl");

        append_record(&path, &json!({"n": 1})).unwrap();
        append_record(&path, &json!({"n": 2})).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\"n\":1}\n{\"n\":2}\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_output_gets_ordinary_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("plain.txt");
        fs::write(&plain, "x").unwrap();
        let path = temp_dir.path().join("out.jsonl");

        let mut file = JsonlFile::create(&path).unwrap();
        file.write_record(&json!({"a": 1})).unwrap();
        file.commit().unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.jsonl");
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        let mut file = JsonlFile::create(&path).unwrap();
        file.write_record(&json!({"a": 1})).unwrap();
        file.commit().unwrap();

        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o600);
    }
}
