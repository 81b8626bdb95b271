use std::{env, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
    #[error(transparent)]
    DotEnvError(#[from] dotenvy::Error),
}

#[derive(Clone, Debug)] // Clone needed if passed around, Debug for logging
pub struct Config {
    /// Base URL of the remote template API.
    pub api_base_url: String,
    /// Directory holding the local key-value store file.
    pub data_dir: PathBuf,
    /// Page size used by the explore view's in-memory pagination.
    pub page_size: usize,
}

pub const DEFAULT_API_BASE_URL: &str = "https://api.imgflip.com";
pub const DEFAULT_PAGE_SIZE: usize = 12;

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("MEMEVERSE_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let data_dir = env::var("MEMEVERSE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join("memeverse"));

        let page_size = match env::var("MEMEVERSE_PAGE_SIZE") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidVar("MEMEVERSE_PAGE_SIZE".into(), e.to_string()))?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        Ok(Config {
            api_base_url,
            data_dir,
            page_size,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: env::temp_dir().join("memeverse"),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_public_api() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.imgflip.com");
        assert_eq!(config.page_size, 12);
        assert!(config.data_dir.ends_with("memeverse"));
    }
}
