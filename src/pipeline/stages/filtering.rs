//! Pure subject filtering for the preparation pipeline.
//!
//! Only the comparison ignores case; payloads pass through untouched.

use crate::core::{Example, SubjectSelection};
use crate::errors::Result;
use std::collections::HashSet;

/// Lowercased subject names a run keeps, or `None` for every subject.
#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    allowed: Option<HashSet<String>>,
}

impl SubjectFilter {
    pub fn new(selection: &SubjectSelection) -> Self {
        let allowed = selection
            .names()
            .map(|names| names.iter().map(|name| name.to_lowercase()).collect());
        Self { allowed }
    }

    /// Check whether an example's subject is selected (pure).
    pub fn matches(&self, example: &Example) -> bool {
        match &self.allowed {
            None => true,
            Some(allowed) => allowed.contains(&example.subject().to_lowercase()),
        }
    }
}

/// Keep only the selected examples of a scan (pure).
///
/// Scan errors are passed through so the caller sees them in stream order.
///
/// # Arguments
///
/// * `examples` - Stream produced by the dataset walker
/// * `filter` - Subjects to keep
///
/// # Returns
///
/// Iterator over the selected examples and any scan error
pub fn filter_by_subject<I>(examples: I, filter: SubjectFilter) -> impl Iterator<Item = Result<Example>>
where
    I: Iterator<Item = Result<Example>>,
{
    examples.filter(move |item| match item {
        Ok(example) => filter.matches(example),
        Err(_) => true,
    })
}
