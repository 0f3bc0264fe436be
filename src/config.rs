use std::path::PathBuf;

use crate::paths;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CATALOG_FILE: &str = "products.json";
pub const DEFAULT_MODE: &str = "index";
pub const DEFAULT_LANG: &str = "FR";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub data_dir: Option<PathBuf>,
    pub catalog_file: String,
    pub default_mode: String,
    pub default_lang: String,
    pub degrade_metrics: bool,
    pub index_full: bool,
    pub cache_catalog: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            data_dir: None,
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
            default_mode: DEFAULT_MODE.to_string(),
            default_lang: DEFAULT_LANG.to_string(),
            degrade_metrics: true,
            index_full: false,
            cache_catalog: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Settings::default();
        Self {
            api_key: get_env("GEMINI_API_KEY").or_else(|| get_env("GOOGLE_API_KEY")),
            model: get_env("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: get_env("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            temperature: get_env("LAMA_TEMPERATURE")
                .and_then(|value| value.parse::<f32>().ok())
                .unwrap_or(defaults.temperature),
            data_dir: get_env("LAMA_DATA_DIR").and_then(|value| paths::normalize_dir(&value)),
            catalog_file: get_env("LAMA_CATALOG_FILE").unwrap_or(defaults.catalog_file),
            default_mode: get_env("LAMA_DEFAULT_MODE")
                .map(|value| value.to_lowercase())
                .unwrap_or(defaults.default_mode),
            default_lang: get_env("LAMA_DEFAULT_LANG")
                .map(|value| value.to_uppercase())
                .unwrap_or(defaults.default_lang),
            degrade_metrics: get_flag("LAMA_METRICS_DEGRADE").unwrap_or(defaults.degrade_metrics),
            index_full: get_flag("LAMA_INDEX_FULL").unwrap_or(defaults.index_full),
            cache_catalog: get_flag("LAMA_CACHE_CATALOG").unwrap_or(defaults.cache_catalog),
        }
    }
}

fn get_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn get_flag(key: &str) -> Option<bool> {
    get_env(key).and_then(|value| parse_flag(&value))
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flag_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn defaults_degrade_metrics_and_lite_index() {
        let settings = Settings::default();
        assert!(settings.degrade_metrics);
        assert!(!settings.index_full);
        assert_eq!(settings.default_mode, "index");
        assert_eq!(settings.default_lang, "FR");
    }
}
