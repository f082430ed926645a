use crate::cli::RunnerKind;
use crate::config::KableConfig;
use crate::core::SubjectSelection;
use crate::formatting::{render_summary, Formatter};
use crate::pipeline::{run_experiments, RunOptions};
use crate::runner::chat::{non_blank, BASE_URL_ENV};
use crate::runner::{ChatRunner, ChatRunnerConfig, LoggingRunner, Runner};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Example limit applied by `--test-mode`.
pub const TEST_MODE_LIMIT: usize = 5;

pub struct RunConfig {
    pub dataset_dir: Option<PathBuf>,
    pub subjects: Option<Vec<String>>,
    pub all_subjects: bool,
    pub output: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub max_examples: Option<usize>,
    pub test_mode: bool,
    pub runner: RunnerKind,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub responses_output: Option<PathBuf>,
}

/// A runner plus the side-channel file it writes, if any.
pub struct PreparedRunner {
    pub runner: Box<dyn Runner>,
    pub responses_path: Option<PathBuf>,
}

pub fn handle_run(config: RunConfig, kable_config: &KableConfig, formatter: &Formatter) -> Result<()> {
    let options = build_run_options(&config, kable_config);
    let mut prepared = build_runner(&config, kable_config)?;

    let runner: Option<&mut dyn Runner> = match prepared.as_mut() {
        Some(p) => Some(p.runner.as_mut()),
        None => None,
    };

    let summary = run_experiments(&options, runner)
        .with_context(|| format!("Run over {} failed", options.dataset_dir.display()))?;

    println!("{}", render_summary(&summary, formatter));

    if let Some(path) = prepared.and_then(|p| p.responses_path) {
        if path.exists() {
            println!("{} {}", formatter.dim("Responses:"), path.display());
        } else {
            log::warn!("No responses were recorded for this run.");
        }
    }
    Ok(())
}

/// Merge flags over the config file (pure).
pub fn build_run_options(config: &RunConfig, kable_config: &KableConfig) -> RunOptions {
    let subjects = if config.all_subjects {
        SubjectSelection::All
    } else if let Some(subjects) = &config.subjects {
        SubjectSelection::from_names(subjects.iter().cloned())
    } else {
        SubjectSelection::Only(kable_config.default_subjects())
    };

    let max_examples = if config.test_mode {
        Some(TEST_MODE_LIMIT)
    } else {
        config.max_examples
    };

    RunOptions::new(
        config
            .dataset_dir
            .clone()
            .unwrap_or_else(|| kable_config.dataset_dir()),
    )
    .with_dataset_pattern(kable_config.dataset_pattern())
    .with_subjects(subjects)
    .with_output_path(config.output.clone())
    .with_output_dir(
        config
            .output_dir
            .clone()
            .unwrap_or_else(|| kable_config.output_dir()),
    )
    .with_max_examples(max_examples)
}

/// Construct the requested runner before any example is processed.
pub fn build_runner(config: &RunConfig, kable_config: &KableConfig) -> Result<Option<PreparedRunner>> {
    match config.runner {
        RunnerKind::None => Ok(None),
        RunnerKind::Log => Ok(Some(PreparedRunner {
            runner: Box::new(LoggingRunner::new()),
            responses_path: None,
        })),
        RunnerKind::Chat => {
            let chat_config = ChatRunnerConfig {
                model: config.model.clone().unwrap_or_else(|| kable_config.model()),
                api_key: config.api_key.clone(),
                base_url: chat_base_url(
                    config,
                    kable_config,
                    std::env::var(BASE_URL_ENV).ok(),
                ),
                responses_path: config
                    .responses_output
                    .clone()
                    .or_else(|| kable_config.responses_path()),
                output_dir: config
                    .output_dir
                    .clone()
                    .unwrap_or_else(|| kable_config.output_dir()),
                timeout: Duration::from_secs(kable_config.timeout_secs()),
            };
            let runner = ChatRunner::new(chat_config).context("Cannot start the chat runner")?;
            log::info!(
                "Sending prompts to {}; responses go to {}",
                runner.model(),
                runner.responses_path().display()
            );
            Ok(Some(PreparedRunner {
                responses_path: Some(runner.responses_path().to_path_buf()),
                runner: Box::new(runner),
            }))
        }
    }
}

/// `--base-url`, then `OPENAI_BASE_URL`, then the config file. Blank values
/// count as unset.
fn chat_base_url(
    config: &RunConfig,
    kable_config: &KableConfig,
    from_env: Option<String>,
) -> Option<String> {
    non_blank(config.base_url.clone())
        .or_else(|| non_blank(from_env))
        .or_else(|| non_blank(kable_config.base_url()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn run_config() -> RunConfig {
        RunConfig {
            dataset_dir: None,
            subjects: None,
            all_subjects: false,
            output: None,
            output_dir: None,
            max_examples: None,
            test_mode: false,
            runner: RunnerKind::None,
            model: None,
            api_key: None,
            base_url: None,
            responses_output: None,
        }
    }

    #[test]
    fn test_defaults_come_from_config() {
        let kable_config = parse_config(
            "[dataset]\ndir = \"corpus\"\n[subjects]\ndefault = [\"Law\"]\n[output]\ndir = \"runs\"\n",
        )
        .unwrap();

        let options = build_run_options(&run_config(), &kable_config);

        assert_eq!(options.dataset_dir, PathBuf::from("corpus"));
        assert_eq!(options.output_dir, PathBuf::from("runs"));
        assert_eq!(options.subjects, SubjectSelection::Only(vec!["Law".into()]));
        assert_eq!(options.max_examples, None);
    }

    #[test]
    fn test_flags_override_config() {
        let config = RunConfig {
            dataset_dir: Some(PathBuf::from("other")),
            subjects: Some(vec!["Math".into()]),
            max_examples: Some(2),
            ..run_config()
        };

        let options = build_run_options(&config, &KableConfig::default());

        assert_eq!(options.dataset_dir, PathBuf::from("other"));
        assert_eq!(options.subjects, SubjectSelection::Only(vec!["Math".into()]));
        assert_eq!(options.max_examples, Some(2));
    }

    #[test]
    fn test_all_subjects_and_test_mode() {
        let config = RunConfig {
            all_subjects: true,
            test_mode: true,
            ..run_config()
        };

        let options = build_run_options(&config, &KableConfig::default());

        assert_eq!(options.subjects, SubjectSelection::All);
        assert_eq!(options.max_examples, Some(TEST_MODE_LIMIT));
    }

    #[test]
    fn test_blank_env_base_url_does_not_hide_config() {
        let kable_config =
            parse_config("[runner]\nbase_url = \"http://config/v1\"\n").unwrap();

        assert_eq!(
            chat_base_url(&run_config(), &kable_config, Some(String::new())),
            Some("http://config/v1".to_string())
        );
        assert_eq!(
            chat_base_url(&run_config(), &kable_config, Some("http://env/v1".into())),
            Some("http://env/v1".to_string())
        );
        let flagged = RunConfig {
            base_url: Some("http://flag/v1".into()),
            ..run_config()
        };
        assert_eq!(
            chat_base_url(&flagged, &kable_config, Some("http://env/v1".into())),
            Some("http://flag/v1".to_string())
        );
    }

    #[test]
    fn test_no_runner_by_default() {
        assert!(build_runner(&run_config(), &KableConfig::default())
            .unwrap()
            .is_none());
    }
}
