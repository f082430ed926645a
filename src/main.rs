use anyhow::Result;
use clap::Parser;
use kable::cli::{Cli, Commands};
use kable::commands::{self, RunConfig};
use kable::formatting::{Formatter, FormattingConfig};
use kable::KableError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    let formatter = Formatter::new(create_formatting_config(cli.plain));
    if let Err(err) = dispatch(cli.command, &formatter) {
        eprintln!("{} {:#}", formatter.error("error:"), err);
        if let Some(kable_err) = err.downcast_ref::<KableError>() {
            if kable_err.is_user_fixable() {
                let hint = format!("[{}] check the input and try again", kable_err.code());
                eprintln!("{}", formatter.dim(&hint));
            }
        }
        std::process::exit(1);
    }
}

fn dispatch(command: Commands, formatter: &Formatter) -> Result<()> {
    match command {
        Commands::Run {
            dataset_dir,
            subjects,
            all_subjects,
            output,
            output_dir,
            max_examples,
            test_mode,
            runner,
            model,
            api_key,
            base_url,
            responses_output,
        } => {
            let config = kable::config::load_config();
            let run_config = RunConfig {
                dataset_dir,
                subjects,
                all_subjects,
                output,
                output_dir,
                max_examples,
                test_mode,
                runner,
                model,
                api_key,
                base_url,
                responses_output,
            };
            commands::handle_run(run_config, &config, formatter)
        }
        Commands::Subjects { dataset_dir } => {
            let config = kable::config::load_config();
            commands::list_subjects(dataset_dir, &config)
        }
        Commands::Preview { path, limit } => commands::preview_file(&path, limit),
        Commands::Init { force } => commands::init_config(force),
    }
}

// Pure function to map -v counts onto a log level
fn verbosity_filter(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

// RUST_LOG, when set, takes precedence over -v
fn init_logging(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(verbosity_filter(verbosity))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn create_formatting_config(plain: bool) -> FormattingConfig {
    if plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}
