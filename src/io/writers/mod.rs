pub mod jsonl;

pub use jsonl::{JsonlFile, JsonlWriter};
