//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    models::Config,
    types::Strategy,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        // Load from environment file if it exists
        self.load_env_file()?;

        // Merge environment variables into config
        self.merge_from_env(&mut config);

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config)?;

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Load .env file if it exists
    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Merge environment variables into configuration
    fn merge_from_env(&self, config: &mut Config) {
        if let Some(key) = EnvManager::api_key() {
            config.api_key = Some(key);
        }

        if let Ok(timeout) = std::env::var("WVA_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.timeout_seconds = seconds;
            }
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        config.target_url = self.cli.url.clone();
        config.strategies = parse_strategies(&self.cli.strategy)?;

        // CLI key wins over the environment
        if let Some(ref key) = self.cli.api_key {
            config.api_key = Some(key.clone());
        }

        if self.cli.timeout != crate::defaults::DEFAULT_TIMEOUT.as_secs() {
            config.timeout_seconds = self.cli.timeout;
        }

        if let Some(ref path) = self.cli.project_context {
            config.project_context_path = Some(path.clone());
        }

        if self.cli.no_color {
            config.enable_color = false;
        }

        // JSON output is machine-facing; color would corrupt it
        if self.cli.json {
            config.json_output = true;
            config.enable_color = false;
        }

        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        Ok(())
    }
}

/// Expand a strategy argument into the strategies to run.
fn parse_strategies(raw: &str) -> Result<Vec<Strategy>> {
    match raw.to_lowercase().as_str() {
        "both" => Ok(vec![Strategy::Mobile, Strategy::Desktop]),
        other => other
            .parse::<Strategy>()
            .map(|s| vec![s])
            .map_err(AppError::config),
    }
}

/// Load configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display a configuration summary for debug output
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = String::new();
    summary.push_str(&format!("  Target URL: {}\n", config.target_url));
    summary.push_str(&format!(
        "  Strategies: {}\n",
        config
            .strategies
            .iter()
            .map(Strategy::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    summary.push_str(&format!(
        "  API key: {}\n",
        if config.api_key.is_some() { "configured" } else { "not set (shared quota)" }
    ));
    summary.push_str(&format!("  Timeout: {}s\n", config.timeout_seconds));
    summary.push_str(&format!(
        "  Project context: {}\n",
        config
            .project_context_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    ));
    summary.push_str(&format!("  Output: {}\n", if config.json_output { "json" } else { "text" }));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(url: &str) -> Cli {
        Cli {
            url: url.to_string(),
            strategy: "mobile".to_string(),
            api_key: None,
            timeout: crate::defaults::DEFAULT_TIMEOUT.as_secs(),
            project_context: None,
            json: false,
            no_color: false,
            verbose: false,
            debug: false,
        }
    }

    #[test]
    fn test_parse_strategies() {
        assert_eq!(parse_strategies("mobile").unwrap(), vec![Strategy::Mobile]);
        assert_eq!(parse_strategies("desktop").unwrap(), vec![Strategy::Desktop]);
        assert_eq!(parse_strategies("both").unwrap(), vec![Strategy::Mobile, Strategy::Desktop]);
        assert!(parse_strategies("tablet").is_err());
    }

    #[test]
    fn test_cli_overrides_applied() {
        let mut cli = cli_for("https://example.com");
        cli.strategy = "both".to_string();
        cli.timeout = 120;
        cli.json = true;

        let config = load_config(cli).unwrap();
        assert_eq!(config.target_url, "https://example.com");
        assert_eq!(config.strategies.len(), 2);
        assert_eq!(config.timeout_seconds, 120);
        assert!(config.json_output);
        assert!(!config.enable_color);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let cli = cli_for("not a url");
        assert!(load_config(cli).is_err());
    }

    #[test]
    fn test_summary_masks_api_key() {
        let config = Config {
            target_url: "https://example.com".to_string(),
            api_key: Some("secret-key".to_string()),
            ..Config::default()
        };
        let summary = display_config_summary(&config);
        assert!(summary.contains("configured"));
        assert!(!summary.contains("secret-key"));
    }
}
