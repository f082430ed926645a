use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::core::KableConfig;

/// Name of the configuration file searched for in the working directory and
/// its ancestors.
pub const CONFIG_FILE_NAME: &str = ".kable.toml";

const MAX_SEARCH_DEPTH: usize = 10;

/// Parse the contents of a `.kable.toml`.
pub fn parse_config(contents: &str) -> Result<KableConfig, String> {
    toml::from_str::<KableConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// `start` followed by its ancestors, nearest first, at most `max_depth` of them.
pub fn directory_ancestors(start: &Path, max_depth: usize) -> impl Iterator<Item = &Path> {
    start.ancestors().take(max_depth)
}

// A missing file is the common case and stays quiet; anything else is
// reported and skipped.
fn config_in(dir: &Path) -> Option<KableConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("Ignoring {}: {}", path.display(), e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Using settings from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} ({}); using defaults", e, path.display());
            None
        }
    }
}

/// The nearest `.kable.toml` at or above `start`, or the defaults.
pub fn load_config_from(start: &Path) -> KableConfig {
    directory_ancestors(start, MAX_SEARCH_DEPTH)
        .find_map(config_in)
        .unwrap_or_default()
}

/// [`load_config_from`] the working directory.
pub fn load_config() -> KableConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!("Cannot read the working directory ({}); using defaults", e);
            KableConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(indoc! {r#"
            [dataset]
            dir = "data/kable"
            pattern = "*.ndjson"

            [output]
            dir = "runs"

            [subjects]
            default = ["Math", "History"]

            [runner]
            model = "gpt-4o"
            timeout_secs = 30
        "#})
        .unwrap();

        assert_eq!(config.dataset_dir(), PathBuf::from("data/kable"));
        assert_eq!(config.dataset_pattern(), "*.ndjson");
        assert_eq!(config.output_dir(), PathBuf::from("runs"));
        assert_eq!(config.default_subjects(), vec!["Math", "History"]);
        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.timeout_secs(), 30);
        assert_eq!(config.base_url(), None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, KableConfig::default());
        assert_eq!(config.dataset_dir(), PathBuf::from("kable-dataset"));
        assert_eq!(config.default_subjects(), vec!["BioMedicine"]);
        assert_eq!(config.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(parse_config("[dataset]\ndir = 3").is_err());
    }

    #[test]
    fn test_directory_ancestors_stops_at_depth() {
        let dirs: Vec<_> = directory_ancestors(Path::new("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![Path::new("/a/b/c/d"), Path::new("/a/b/c")]);
    }

    #[test]
    fn test_load_config_from_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[output]\ndir = \"elsewhere\"\n",
        )
        .unwrap();
        let nested = temp_dir.path().join("x/y");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config_from(&nested);
        assert_eq!(config.output_dir(), PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_unreadable_config_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(CONFIG_FILE_NAME)).unwrap();

        assert_eq!(load_config_from(temp_dir.path()), KableConfig::default());
    }

    #[test]
    fn test_broken_config_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();

        let config = load_config_from(temp_dir.path());
        assert_eq!(config, KableConfig::default());
    }
}
