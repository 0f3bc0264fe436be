use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;

use crate::error::{ComparatorError, Result};

pub fn blog_file_name(asin: &str, lang: &str) -> String {
    format!("{}_{}_blog.txt", asin.trim(), lang.trim().to_uppercase())
}

/// Upper-cases a language code after checking it cannot escape the data directory.
pub fn normalize_lang(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let valid = (2..=8).contains(&trimmed.len())
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if !valid {
        return Err(ComparatorError::Validation(format!(
            "invalid lang '{}': expected 2-8 letters, digits, '-' or '_'",
            raw
        )));
    }
    Ok(trimmed.to_uppercase())
}

/// Reads the long-form review text for one product. `Ok(None)` means the file is absent.
pub fn load_review_text(data_dir: &Path, asin: &str, lang: &str) -> anyhow::Result<Option<String>> {
    let path = data_dir.join(blog_file_name(asin, lang));
    match fs::read_to_string(&path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err)
            .with_context(|| format!("failed to read review text: {}", path.display())),
    }
}
