//! Configuration module
//!
//! Environment-driven settings for the API and the extraction pipeline.
//! The configuration is constructed once at startup and passed explicitly
//! to collaborators; there is no global settings object.

use std::env;
use std::path::PathBuf;

const DEFAULT_API_PREFIX: &str = "/api/v1";
const DEFAULT_PROJECT_NAME: &str = "PDF Image Extractor";
const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TEMP_DIR: &str = "/tmp/pdf-extractor";
const MAX_UPLOAD_SIZE_MB: usize = 10;
const IMAGE_RETENTION_SECS: u64 = 86_400;
const CLEANUP_INTERVAL_SECS: u64 = 300;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_prefix: String,
    pub project_name: String,
    pub version: String,
    /// Public base URL used when building image links.
    pub server_url: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub temp_dir: PathBuf,
    pub environment: String,
    pub cleanup_enabled: bool,
    pub image_retention_secs: u64,
    pub cleanup_interval_secs: u64,
}

/// Parse a list-valued env var that may be either a JSON array
/// (`["a","b"]`) or a comma-separated string (`a,b`).
fn parse_string_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(values) = serde_json::from_str::<Vec<String>>(trimmed) {
            return values
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }
    trimmed
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| {
            "http://localhost:3000,http://localhost:5173,http://127.0.0.1:5173".to_string()
        });
        let cors_origins = parse_string_list(&cors_origins_str);

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "pdf".to_string())
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| "application/pdf".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| DEFAULT_API_PREFIX.to_string()),
            project_name: env::var("PROJECT_NAME")
                .unwrap_or_else(|_| DEFAULT_PROJECT_NAME.to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            server_url: env::var("SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            allowed_extensions,
            allowed_content_types,
            temp_dir: PathBuf::from(
                env::var("TEMP_DIR").unwrap_or_else(|_| DEFAULT_TEMP_DIR.to_string()),
            ),
            environment,
            cleanup_enabled: env::var("CLEANUP_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            image_retention_secs: env::var("IMAGE_RETENTION_SECS")
                .unwrap_or_else(|_| IMAGE_RETENTION_SECS.to_string())
                .parse()
                .unwrap_or(IMAGE_RETENTION_SECS),
            cleanup_interval_secs: env::var("CLEANUP_INTERVAL_SECS")
                .unwrap_or_else(|_| CLEANUP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(CLEANUP_INTERVAL_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.api_prefix.starts_with('/') {
            return Err(anyhow::anyhow!("API_PREFIX must start with '/'"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.allowed_extensions.is_empty() || self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS and ALLOWED_CONTENT_TYPES must not be empty"
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Root directory for extracted images; one subdirectory per upload.
    pub fn images_dir(&self) -> PathBuf {
        self.temp_dir.join("images")
    }

    /// Base for public image URLs: server URL plus API prefix.
    pub fn api_base(&self) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), self.api_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api_prefix: "/api/v1".to_string(),
            project_name: "PDF Image Extractor".to_string(),
            version: "0.1.0".to_string(),
            server_url: "http://localhost:8000/".to_string(),
            server_port: 8000,
            cors_origins: vec!["http://localhost:5173".to_string()],
            max_upload_size_bytes: 10 * 1024 * 1024,
            allowed_extensions: vec!["pdf".to_string()],
            allowed_content_types: vec!["application/pdf".to_string()],
            temp_dir: PathBuf::from("/tmp/pdf-extractor"),
            environment: "development".to_string(),
            cleanup_enabled: true,
            image_retention_secs: 86_400,
            cleanup_interval_secs: 300,
        }
    }

    #[test]
    fn test_parse_string_list_comma_separated() {
        assert_eq!(
            parse_string_list("http://a.test, http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_parse_string_list_json_array() {
        assert_eq!(
            parse_string_list(r#"["http://a.test", "http://b.test"]"#),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_parse_string_list_skips_empty_entries() {
        assert_eq!(parse_string_list("a,,b,"), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_api_base_trims_trailing_slash() {
        let config = test_config();
        assert_eq!(config.api_base(), "http://localhost:8000/api/v1");
    }

    #[test]
    fn test_images_dir() {
        let config = test_config();
        assert_eq!(config.images_dir(), PathBuf::from("/tmp/pdf-extractor/images"));
    }

    #[test]
    fn test_validate_rejects_wildcard_cors_in_production() {
        let mut config = test_config();
        config.environment = "production".to_string();
        config.cors_origins = vec!["*".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_wildcard_cors_in_development() {
        let mut config = test_config();
        config.cors_origins = vec!["*".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_prefix() {
        let mut config = test_config();
        config.api_prefix = "api/v1".to_string();
        assert!(config.validate().is_err());
    }
}
