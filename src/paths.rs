use std::path::{Path, PathBuf};

use crate::error::{ComparatorError, Result};

const DATA_SUBDIR: &str = "data";
const LAMBDA_TASK_ROOT_ENV: &str = "LAMBDA_TASK_ROOT";

/// Ordered list of places the bundled data directory may have been packaged to.
pub fn data_dir_candidates(override_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = override_dir {
        candidates.push(dir.to_path_buf());
    }
    if let Ok(root) = std::env::var(LAMBDA_TASK_ROOT_ENV)
        && let Some(root) = normalize_dir(&root)
    {
        candidates.push(root.join(DATA_SUBDIR));
    }
    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        candidates.push(parent.join(DATA_SUBDIR));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(DATA_SUBDIR));
        candidates.push(cwd.join("public").join(DATA_SUBDIR));
    }
    candidates.push(PathBuf::from("/var/task").join(DATA_SUBDIR));

    let mut deduped: Vec<PathBuf> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !deduped.contains(&candidate) {
            deduped.push(candidate);
        }
    }
    deduped
}

/// Returns the first candidate that exists as a directory.
pub fn resolve_data_dir(candidates: &[PathBuf]) -> Result<PathBuf> {
    if let Some(found) = candidates.iter().find(|candidate| candidate.is_dir()) {
        return Ok(found.clone());
    }
    let attempted = candidates
        .iter()
        .map(|candidate| candidate.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ComparatorError::Config(format!(
        "data directory not found (attempted: {})",
        attempted
    )))
}

pub fn normalize_dir(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let expanded = expand_tilde(trimmed);
    Some(normalize_path(PathBuf::from(expanded)))
}

fn normalize_path(path: PathBuf) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        normalized.push(component.as_os_str());
    }
    normalized
}

fn expand_tilde(value: &str) -> String {
    if (value == "~" || value.starts_with("~/"))
        && let Ok(home) = std::env::var("HOME")
    {
        let home = home.trim();
        if !home.is_empty() {
            if value == "~" {
                return home.to_string();
            }
            return format!("{}{}", home, &value[1..]);
        }
    }
    value.to_string()
}
