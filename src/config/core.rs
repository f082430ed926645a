use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::DEFAULT_SUBJECT;
use crate::io::walker::DEFAULT_DATASET_PATTERN;
use crate::pipeline::DEFAULT_OUTPUT_DIR;
use crate::runner::chat::{DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

/// Directory searched for dataset files when nothing else is configured.
pub const DEFAULT_DATASET_DIR: &str = "kable-dataset";

/// Root configuration structure, read from `.kable.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KableConfig {
    #[serde(default)]
    pub dataset: Option<DatasetConfig>,

    #[serde(default)]
    pub output: Option<OutputConfig>,

    #[serde(default)]
    pub subjects: Option<SubjectsConfig>,

    /// Remote model runner settings
    #[serde(default)]
    pub runner: Option<RunnerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DatasetConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Glob matched against dataset file names
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SubjectsConfig {
    /// Subjects selected when a run names none
    #[serde(default)]
    pub default: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunnerConfig {
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub responses_path: Option<PathBuf>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl KableConfig {
    pub fn dataset_dir(&self) -> PathBuf {
        self.dataset
            .as_ref()
            .and_then(|d| d.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_DIR))
    }

    pub fn dataset_pattern(&self) -> String {
        self.dataset
            .as_ref()
            .and_then(|d| d.pattern.clone())
            .unwrap_or_else(|| DEFAULT_DATASET_PATTERN.to_string())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output
            .as_ref()
            .and_then(|o| o.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn default_subjects(&self) -> Vec<String> {
        self.subjects
            .as_ref()
            .and_then(|s| s.default.clone())
            .filter(|subjects| !subjects.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_SUBJECT.to_string()])
    }

    pub fn model(&self) -> String {
        self.runner
            .as_ref()
            .and_then(|r| r.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn base_url(&self) -> Option<String> {
        self.runner.as_ref().and_then(|r| r.base_url.clone())
    }

    pub fn responses_path(&self) -> Option<PathBuf> {
        self.runner.as_ref().and_then(|r| r.responses_path.clone())
    }

    pub fn timeout_secs(&self) -> u64 {
        self.runner
            .as_ref()
            .and_then(|r| r.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}
