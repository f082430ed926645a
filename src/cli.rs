use crate::io::DEFAULT_PREVIEW_LIMIT;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunnerKind {
    /// Only prepare the examples
    None,
    /// Log every prompt
    Log,
    /// Send every prompt to an OpenAI-compatible chat model
    Chat,
}

#[derive(Parser, Debug)]
#[command(name = "kable")]
#[command(about = "Prepare KaBLE evaluation examples from a JSONL corpus", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter the dataset by subject and write the matching examples
    Run {
        /// Directory containing the JSONL files
        #[arg(long)]
        dataset_dir: Option<PathBuf>,

        /// Subjects to include (defaults to BioMedicine)
        #[arg(long, num_args = 1.., conflicts_with = "all_subjects")]
        subjects: Option<Vec<String>>,

        /// Include every subject
        #[arg(long)]
        all_subjects: bool,

        /// Output file (defaults to <output-dir>/<subjects>.jsonl)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for derived output paths
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Stop after this many examples
        #[arg(long, conflicts_with = "test_mode")]
        max_examples: Option<usize>,

        /// Process only the first five matching examples
        #[arg(long)]
        test_mode: bool,

        /// What to do with each prepared example
        #[arg(long, value_enum, default_value = "none")]
        runner: RunnerKind,

        /// Chat model identifier
        #[arg(long)]
        model: Option<String>,

        /// API key for the chat runner
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Base URL of the chat-completions API
        #[arg(long)]
        base_url: Option<String>,

        /// Where the chat runner appends its responses
        #[arg(long)]
        responses_output: Option<PathBuf>,
    },

    /// List every subject in the dataset
    Subjects {
        /// Directory containing the JSONL files
        #[arg(long)]
        dataset_dir: Option<PathBuf>,
    },

    /// Show the first records of a JSONL file
    Preview {
        /// File to preview
        path: PathBuf,

        /// Number of lines to read
        #[arg(short = 'n', long, default_value_t = DEFAULT_PREVIEW_LIMIT)]
        limit: usize,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
