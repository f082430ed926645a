use super::{extract_prompt, Runner};
use crate::core::Example;
use crate::errors::Result;

/// Logs each example's prompt instead of sending it anywhere.
#[derive(Debug, Default)]
pub struct LoggingRunner {
    invocations: usize,
}

impl LoggingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> usize {
        self.invocations
    }
}

impl Runner for LoggingRunner {
    fn run(&mut self, example: &Example) -> Result<()> {
        let prompt = extract_prompt(example)?;
        self.invocations += 1;
        log::info!(
            "[{}] {} ({}): {}",
            self.invocations,
            example.subject(),
            example.source_file().display(),
            prompt
        );
        Ok(())
    }
}
