use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
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
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_walker::config::load_config;
///
/// let config = load_config(Path::new("walker.toml")).unwrap();
/// println!("Batch size: {}", config.crawler.batch_size);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration at `path`, or the built-in defaults when no path
/// is given
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
batch-size = 8
request-timeout-secs = 10
page-param = "p"

[site]
seed-url = "https://example.com/catalog/"
reserved-category = "Everything"
category-selector = "nav a"
item-selector = "li.series a"

[request]
user-agent = "TestCrawler/1.0"
accept = "text/html"
accept-language = "en"
referer = ""

[output]
cache-dir = "./test-cache"
report-path = "./report.md"
report-title = "Test Catalog"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.batch_size, 8);
        assert_eq!(config.crawler.request_timeout().as_secs(), 10);
        assert_eq!(config.crawler.page_param, "p");
        assert_eq!(config.site.seed_url, "https://example.com/catalog/");
        assert_eq!(config.site.reserved_category, "Everything");
        assert_eq!(config.request.user_agent, "TestCrawler/1.0");
        assert_eq!(config.output.report_title, "Test Catalog");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[crawler]\nbatch-size = 4\n").unwrap();

        assert_eq!(config.crawler.batch_size, 4);
        assert_eq!(config.crawler.request_timeout_secs, 5);
        assert_eq!(config.crawler.page_param, "page");
        assert_eq!(
            config.site.seed_url,
            "https://ithelp.ithome.com.tw/2024ironman/"
        );
        assert_eq!(config.output.cache_dir, "cache");
        assert_eq!(config.output.report_path, "topics.md");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.crawler.batch_size, 15);
        assert_eq!(config.site.reserved_category, "ALL");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/walker.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nbatch-size = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config.crawler.batch_size, 15);
    }
}
