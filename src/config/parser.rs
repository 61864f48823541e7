use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Used to detect configuration changes between invocations that would make
/// resuming a checkpointed job unsafe.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_CONFIG: &str = r#"
[site]
name = "vinted"
home-url = "https://www.vinted.cz/"
listing-url-template = "https://www.vinted.cz/catalog/{query}?page={page}"
categories = ["zeny", "muzi"]

[selectors]
item-container = "div.feed-grid__item"
item-link = "a[href]"
next-page = "a[class*='Pagination__next']"
ready-marker = "div.feed-grid__item"

[storage]
root = "./data"
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.name, "vinted");
        assert_eq!(config.site.categories.len(), 2);
        assert_eq!(config.limits.max_pages, 1000);
        assert_eq!(config.browser.startup_timeout_secs, 45);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = write_config("this is not [valid toml");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_hash_is_stable() {
        let file = write_config(VALID_CONFIG);
        let h1 = compute_config_hash(file.path()).unwrap();
        let h2 = compute_config_hash(file.path()).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_config_hash_changes_with_content() {
        let file1 = write_config(VALID_CONFIG);
        let file2 = write_config(&VALID_CONFIG.replace("zeny", "deti"));
        let h1 = compute_config_hash(file1.path()).unwrap();
        let h2 = compute_config_hash(file2.path()).unwrap();
        assert_ne!(h1, h2);
    }
}
