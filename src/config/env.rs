//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable holding the PageSpeed Insights API key
pub const API_KEY_VAR: &str = "PSI_API_KEY";

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                println!("Loaded configuration from .env file");
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// API key from the environment, if set
    pub fn api_key() -> Option<String> {
        std::env::var(API_KEY_VAR).ok().filter(|key| !key.is_empty())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Web Vitals Auditor Configuration
#
# Values specified here are used as defaults and can be overridden by
# command-line arguments.

# PageSpeed Insights API key. Unauthenticated requests share a very small
# quota; get a key at https://developers.google.com/speed/docs/insights/v5/get-started
# PSI_API_KEY=your-api-key

# Request timeout in seconds. Full audits routinely take 30-60 seconds.
# WVA_TIMEOUT_SECONDS=60
"#
        .to_string()
    }
}
