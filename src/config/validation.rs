//! Configuration validation utilities and rules

use crate::{
    error::Result,
    models::Config,
};

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Info => "INFO",
            ValidationLevel::Warning => "WARN",
        }
    }
}

/// A non-fatal configuration finding
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            match self.level {
                ValidationLevel::Warning => {
                    format!("[{}] {}", self.level.as_str().yellow().bold(), self.message)
                }
                ValidationLevel::Info => {
                    format!("[{}] {}", self.level.as_str().cyan(), self.message)
                }
            }
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        // Basic validation (already done in Config::validate)
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_target_url(config));
        warnings.extend(Self::validate_api_settings(config));
        warnings.extend(Self::validate_timing(config));

        Ok(warnings)
    }

    /// Validate the target URL with detailed checks
    fn validate_target_url(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if let Ok(parsed) = url::Url::parse(&config.target_url) {
            if parsed.scheme() == "http" {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "URL '{}' uses HTTP; the API may follow a redirect to HTTPS and audit a different page",
                        config.target_url
                    ),
                ));
            }

            if let Some(url::Host::Ipv4(ip)) = parsed.host() {
                if ip.is_private() || ip.is_loopback() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!(
                            "URL '{}' targets a private/local address; the remote API cannot reach it",
                            config.target_url
                        ),
                    ));
                }
            }

            if parsed.host_str() == Some("localhost") {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    "localhost is not reachable by the remote measurement API".to_string(),
                ));
            }
        }

        warnings
    }

    /// Validate API key and quota implications
    fn validate_api_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.api_key.is_none() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "No API key configured; unauthenticated requests share a small quota and may be throttled"
                    .to_string(),
            ));
        }

        if config.strategies.len() > 1 && config.api_key.is_none() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Running both strategies doubles API usage against the shared quota".to_string(),
            ));
        }

        warnings
    }

    /// Validate timeout settings against realistic audit durations
    fn validate_timing(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.timeout_seconds < 30 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Timeout of {}s is tight; full page audits routinely take 30-60 seconds",
                    config.timeout_seconds
                ),
            ));
        }

        warnings
    }
}

/// Validate configuration and collect warnings
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(url: &str) -> Config {
        Config {
            target_url: url.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_https_url_without_key_gets_quota_info() {
        let warnings = validate_config(&config_for("https://example.com")).unwrap();
        assert!(warnings.iter().any(|w| w.message.contains("API key")));
    }

    #[test]
    fn test_http_url_warns() {
        let warnings = validate_config(&config_for("http://example.com")).unwrap();
        assert!(warnings
            .iter()
            .any(|w| w.level == ValidationLevel::Warning && w.message.contains("HTTP")));
    }

    #[test]
    fn test_localhost_warns() {
        let warnings = validate_config(&config_for("https://localhost:3000")).unwrap();
        assert!(warnings.iter().any(|w| w.message.contains("localhost")));
    }

    #[test]
    fn test_short_timeout_warns() {
        let mut config = config_for("https://example.com");
        config.timeout_seconds = 10;
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.message.contains("Timeout")));
    }

    #[test]
    fn test_invalid_config_still_errors() {
        let config = config_for("");
        assert!(validate_config(&config).is_err());
    }
}
