use crate::core::RunSummary;
use colored::*;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{CellAlignment, Table};
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Color only when stdout is a capable terminal
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    /// Honour `NO_COLOR`, `CLICOLOR=0` and `CLICOLOR_FORCE=1`, in that order
    /// of increasing priority.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let color = if lookup("CLICOLOR_FORCE").as_deref() == Some("1") {
            ColorMode::Always
        } else if lookup("NO_COLOR").is_some() || lookup("CLICOLOR").as_deref() == Some("0") {
            ColorMode::Never
        } else {
            ColorMode::Auto
        };
        Self { color }
    }

    /// ASCII-only, no colors
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }
}

/// Applies colors when the configuration allows them.
pub struct Formatter {
    use_color: bool,
}

impl Formatter {
    pub fn new(config: FormattingConfig) -> Self {
        let use_color = config.color.should_use_color();
        colored::control::set_override(use_color);
        Self { use_color }
    }

    pub fn uses_color(&self) -> bool {
        self.use_color
    }

    pub fn success(&self, text: &str) -> String {
        if self.use_color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.use_color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn header(&self, text: &str) -> String {
        if self.use_color {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.use_color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Headline, per-subject table, and output location of a run.
pub fn render_summary(summary: &RunSummary, formatter: &Formatter) -> String {
    let headline = format!(
        "Prepared {} example(s) across {} subject(s).",
        summary.total_examples,
        summary.subjects.len()
    );

    let mut table = Table::new();
    table.load_preset(if formatter.uses_color() {
        UTF8_FULL
    } else {
        ASCII_MARKDOWN
    });
    table.set_header(vec!["Subject", "Examples"]);
    for (subject, count) in &summary.subject_counts {
        table.add_row(vec![subject.clone(), count.to_string()]);
    }
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    format!(
        "{}\n\n{}\n{}\n\n{} {}",
        formatter.success(&headline),
        formatter.header("Subject breakdown"),
        table,
        formatter.dim("Output:"),
        summary.output_path.display()
    )
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[test]
    fn test_plain_formatter_adds_no_escapes() {
        let formatter = Formatter::new(FormattingConfig::plain());
        assert_eq!(formatter.success("ok"), "ok");
        assert_eq!(formatter.error("bad"), "bad");
    }

    #[test]
    fn test_color_mode_from_environment() {
        let mode = |vars: &[(&str, &str)]| {
            let vars: Vec<(String, String)> = vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            FormattingConfig::from_lookup(|name| {
                vars.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
            })
            .color
        };

        assert_eq!(mode(&[]), ColorMode::Auto);
        assert_eq!(mode(&[("NO_COLOR", "")]), ColorMode::Never);
        assert_eq!(mode(&[("CLICOLOR", "0")]), ColorMode::Never);
        assert_eq!(mode(&[("CLICOLOR", "1")]), ColorMode::Auto);
        assert_eq!(
            mode(&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")]),
            ColorMode::Always
        );
    }

    #[test]
    fn test_render_summary_lists_subjects() {
        let summary = RunSummary {
            total_examples: 3,
            subjects: vec!["BioMedicine".into(), "Math".into()],
            subject_counts: BTreeMap::from([("BioMedicine".into(), 1), ("Math".into(), 2)]),
            output_path: PathBuf::from("/tmp/out/all-subjects.jsonl"),
        };
        let formatter = Formatter::new(FormattingConfig::plain());

        let text = render_summary(&summary, &formatter);

        assert!(text.starts_with("Prepared 3 example(s) across 2 subject(s)."));
        assert!(text.contains("BioMedicine"));
        assert!(text.contains("Math"));
        assert!(text.ends_with("/tmp/out/all-subjects.jsonl"));
    }
}
