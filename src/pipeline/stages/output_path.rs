//! Output path resolution.
//!
//! The file stem is a pure function of the subject selection; turning it into
//! an absolute path creates the destination directory.

use crate::core::SubjectSelection;
use crate::errors::{KableError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory for derived output paths.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

const ALL_SUBJECTS_STEM: &str = "all-subjects";

/// File stem for a subject selection (pure).
///
/// # Returns
///
/// `all-subjects`, the lowercased single subject, or the lowercased subjects
/// sorted and joined with `-`
pub fn output_stem(selection: &SubjectSelection) -> String {
    match selection.names() {
        None | Some([]) => ALL_SUBJECTS_STEM.to_string(),
        Some([single]) => single.to_lowercase(),
        Some(names) => {
            let mut lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
            lowered.sort();
            lowered.join("-")
        }
    }
}

/// Resolve where a run writes its records.
///
/// An explicit path wins and is used as given, after `~` expansion and
/// absolutization. Otherwise the path is `<output_dir>/<stem>.jsonl`. The
/// parent directory is created either way.
pub fn resolve_output_path(
    explicit: Option<&Path>,
    selection: &SubjectSelection,
    output_dir: &Path,
) -> Result<PathBuf> {
    let target = match explicit {
        Some(path) => expand_home(path),
        None => expand_home(output_dir).join(format!("{}.jsonl", output_stem(selection))),
    };
    absolutize_creating_parent(&target)
}

/// Replace a leading `~` with the home directory, if there is one.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Create the parent of `path` and resolve it.
///
/// An existing path is canonicalized in full, so a symlinked target resolves
/// to the file it points at. A path that does not exist yet is anchored at the
/// canonical form of its parent.
pub fn absolutize_creating_parent(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| KableError::io(path, e))?;
    let file_name = absolute
        .file_name()
        .ok_or_else(|| KableError::config(format!("not a file path: {}", path.display())))?
        .to_owned();

    let parent = match absolute.parent() {
        Some(parent) => parent.to_path_buf(),
        None => return Ok(absolute),
    };
    fs::create_dir_all(&parent).map_err(|e| KableError::io(&parent, e))?;
    if let Ok(resolved) = absolute.canonicalize() {
        return Ok(resolved);
    }
    let parent = parent
        .canonicalize()
        .map_err(|e| KableError::io(&parent, e))?;

    Ok(parent.join(file_name))
}
