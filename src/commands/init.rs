use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# kable configuration

[dataset]
dir = "kable-dataset"
pattern = "*.jsonl"

[output]
dir = "outputs"

[subjects]
# Used when `kable run` is given neither --subjects nor --all-subjects
default = ["BioMedicine"]

[runner]
model = "gpt-4o-mini"
# base_url = "https://api.openai.com/v1"
# responses_path = "outputs/gpt-4o-mini-responses.jsonl"
timeout_secs = 120
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)
}
