use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Subject used when the caller does not choose one.
pub const DEFAULT_SUBJECT: &str = "BioMedicine";

/// One dataset record together with the file it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Example {
    payload: Map<String, Value>,
    source_file: PathBuf,
    subject: String,
}

impl Example {
    /// Wrap a parsed record. Returns `None` when the record has no `subject`.
    pub fn new(payload: Map<String, Value>, source_file: impl Into<PathBuf>) -> Option<Self> {
        let subject = match payload.get("subject")? {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Some(Self {
            payload,
            source_file: source_file.into(),
            subject,
        })
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The serialized form: the payload plus a `source_file` field.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = self.payload.clone();
        record.insert(
            "source_file".to_string(),
            Value::String(self.source_file.display().to_string()),
        );
        record
    }
}

/// Which subjects a run should keep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubjectSelection {
    /// Every record passes.
    All,
    /// Only records whose subject matches one of these names, ignoring case.
    Only(Vec<String>),
}

impl SubjectSelection {
    /// Build a selection from a list of names. An empty list selects all.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            Self::All
        } else {
            Self::Only(names)
        }
    }

    pub fn names(&self) -> Option<&[String]> {
        match self {
            Self::All => None,
            Self::Only(names) => Some(names),
        }
    }
}

impl Default for SubjectSelection {
    fn default() -> Self {
        Self::Only(vec![DEFAULT_SUBJECT.to_string()])
    }
}

/// What a run actually wrote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_examples: usize,
    pub subjects: Vec<String>,
    pub subject_counts: BTreeMap<String, usize>,
    pub output_path: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let breakdown = self
            .subject_counts
            .iter()
            .map(|(subject, count)| format!("{}: {}", subject, count))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "Prepared {} examples across {} subject(s) [{}] -> {}",
            self.total_examples,
            self.subjects.len(),
            breakdown,
            self.output_path.display()
        )
    }
}
