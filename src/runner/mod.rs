//! Per-example side effects.
//!
//! A [`Runner`] is handed every example the pipeline writes, right after the
//! record reaches the output file. The pipeline ignores what a runner does
//! and stops at the first error it returns.
//!
//! ```rust
//! use kable::core::Example;
//! use kable::runner::Runner;
//!
//! let mut seen = Vec::new();
//! let mut collect = |example: &Example| -> kable::errors::Result<()> {
//!     seen.push(example.subject().to_string());
//!     Ok(())
//! };
//! # let _: &mut dyn Runner = &mut collect;
//! ```

pub mod chat;
pub mod logging;

pub use chat::{ChatRunner, ChatRunnerConfig, ChatTransport, HttpTransport};
pub use logging::LoggingRunner;

use crate::core::Example;
use crate::errors::{KableError, Result};
use serde_json::{Map, Value};

/// Payload fields that may hold the prompt text, in lookup order.
pub const PROMPT_FIELDS: [&str; 4] = ["prompt", "query", "question", "input"];

/// A unit of work run once for each written example.
pub trait Runner {
    fn run(&mut self, example: &Example) -> Result<()>;
}

impl<F> Runner for F
where
    F: FnMut(&Example) -> Result<()>,
{
    fn run(&mut self, example: &Example) -> Result<()> {
        self(example)
    }
}

/// First prompt field holding a non-blank string, following [`PROMPT_FIELDS`].
pub fn find_prompt(payload: &Map<String, Value>) -> Option<&str> {
    PROMPT_FIELDS.iter().find_map(|field| match payload.get(*field) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.as_str()),
        _ => None,
    })
}

/// Prompt text of an example, or [`KableError::MissingPromptField`].
pub fn extract_prompt(example: &Example) -> Result<&str> {
    find_prompt(example.payload()).ok_or_else(|| KableError::MissingPromptField {
        source_file: example.source_file().to_path_buf(),
        fields: PROMPT_FIELDS.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example(value: Value) -> Example {
        Example::new(value.as_object().cloned().unwrap(), "a.jsonl").unwrap()
    }

    #[test]
    fn test_prompt_field_priority() {
        let ex = example(json!({
            "subject": "Math",
            "input": "from input",
            "question": "from question",
            "query": "from query",
        }));
        assert_eq!(extract_prompt(&ex).unwrap(), "from query");
    }

    #[test]
    fn test_blank_and_non_string_fields_are_skipped() {
        let ex = example(json!({
            "subject": "Math",
            "prompt": "   ",
            "query": 7,
            "question": null,
            "input": "fallback",
        }));
        assert_eq!(extract_prompt(&ex).unwrap(), "fallback");
    }

    #[test]
    fn test_missing_prompt_is_error() {
        let ex = example(json!({"subject": "Math", "text": "nope"}));
        let err = extract_prompt(&ex).unwrap_err();
        assert!(matches!(err, KableError::MissingPromptField { ref fields, .. } if fields.len() == 4));
    }

    #[test]
    fn test_closures_are_runners() {
        let mut calls = 0;
        {
            let mut runner = |_: &Example| -> Result<()> {
                calls += 1;
                Ok(())
            };
            let ex = example(json!({"subject": "Math"}));
            runner.run(&ex).unwrap();
            runner.run(&ex).unwrap();
        }
        assert_eq!(calls, 2);
    }
}
