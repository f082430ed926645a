use crate::core::Example;
use crate::errors::{KableError, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name pattern for dataset files.
pub const DEFAULT_DATASET_PATTERN: &str = "*.jsonl";

/// Lists the dataset files in a directory and streams their records.
pub struct DatasetWalker {
    root: PathBuf,
    pattern: String,
}

impl DatasetWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pattern: DEFAULT_DATASET_PATTERN.to_string(),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Dataset files directly under the root, sorted by path.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let pattern = glob::Pattern::new(&self.pattern).map_err(|e| {
            KableError::config(format!("invalid dataset pattern '{}': {}", self.pattern, e))
        })?;

        let matches = |path: &Path| {
            path.file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
        };

        // Symlinked dataset files count; a dangling link only fails the scan
        // when its name matches the pattern.
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1);

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(&self.root).to_path_buf();
                    if path != self.root && !matches(&path) {
                        log::debug!("Skipping unreadable entry {}", path.display());
                        continue;
                    }
                    return Err(KableError::io(path, e.into()));
                }
            };

            if entry.file_type().is_file() && matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Lazily read every record of every dataset file.
    ///
    /// The file list is taken up front; file contents are read on demand.
    pub fn examples(&self) -> Result<ExampleStream> {
        let files = self.files()?;
        log::debug!(
            "Found {} dataset file(s) in {}",
            files.len(),
            self.root.display()
        );
        Ok(ExampleStream::new(files))
    }
}

/// Iterator over the records of a list of JSONL files.
///
/// Yields at most one error; the stream ends right after it.
pub struct ExampleStream {
    pending: std::vec::IntoIter<PathBuf>,
    current: Option<OpenFile>,
    failed: bool,
}

struct OpenFile {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

impl ExampleStream {
    fn new(files: Vec<PathBuf>) -> Self {
        Self {
            pending: files.into_iter(),
            current: None,
            failed: false,
        }
    }

    fn open_next(&mut self) -> Option<Result<()>> {
        let path = self.pending.next()?;
        log::debug!("Reading {}", path.display());
        Some(match File::open(&path) {
            Ok(file) => {
                self.current = Some(OpenFile {
                    lines: BufReader::new(file).lines(),
                    path,
                    line_number: 0,
                });
                Ok(())
            }
            Err(e) => Err(KableError::io(path, e)),
        })
    }

    fn next_record(&mut self) -> Option<Result<Example>> {
        loop {
            if self.current.is_none() {
                if let Err(e) = self.open_next()? {
                    return Some(Err(e));
                }
            }

            let file = self.current.as_mut()?;
            match file.lines.next() {
                None => self.current = None,
                Some(Err(e)) if e.kind() == ErrorKind::InvalidData => {
                    file.line_number += 1;
                    return Some(Err(KableError::malformed(&file.path, file.line_number, e)));
                }
                Some(Err(e)) => return Some(Err(KableError::io(&file.path, e))),
                Some(Ok(line)) => {
                    file.line_number += 1;
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    return Some(parse_record(text, &file.path, file.line_number));
                }
            }
        }
    }
}

impl Iterator for ExampleStream {
    type Item = Result<Example>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_record();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

fn parse_record(text: &str, path: &Path, line: usize) -> Result<Example> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| KableError::malformed(path, line, e))?;

    let Value::Object(payload) = value else {
        return Err(KableError::malformed(path, line, "expected a JSON object"));
    };

    Example::new(payload, path).ok_or_else(|| KableError::MissingSubjectField {
        path: path.to_path_buf(),
        line,
    })
}
