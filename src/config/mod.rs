//! Configuration for the `kable` command line.
//!
//! Settings come from the nearest `.kable.toml`; anything missing falls back
//! to the built-in defaults exposed by the accessors on [`KableConfig`].
//! Command-line flags override both.

mod core;
mod loader;

pub use self::core::{
    DatasetConfig, KableConfig, OutputConfig, RunnerConfig, SubjectsConfig, DEFAULT_DATASET_DIR,
};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_config, CONFIG_FILE_NAME,
};
