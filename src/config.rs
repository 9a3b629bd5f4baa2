//! Configuration management for albenv
//!
//! Settings are loaded from environment variables with sensible defaults, then
//! overridden by command-line flags.
//!
//! # Environment Variables
//!
//! - `ALBENV_REGION`: Region of the load balancer - default: `AWS_REGION`, then "eu-central-1"
//! - `ALBENV_ALB_ARN`: ARN of the load balancer to inspect - default: empty
//! - `ALBENV_ENDPOINT_URL`: Override the ELBv2 endpoint (e.g. a local emulator) - default: none
//! - `ALBENV_TIMEOUT`: Per-operation timeout in seconds - default: "30"
//! - `ALBENV_LOG_LEVEL`: Logging level - default: "info"
//!
//! Credentials are never configured here. They come from the standard AWS
//! credential chain (`AWS_PROFILE`, `AWS_ACCESS_KEY_ID`, instance roles, ...).
//!
//! # Example
//!
//! ```no_run
//! use albenv::ResolverConfig;
//!
//! let config = ResolverConfig {
//!     load_balancer_arn: "arn:aws:elasticloadbalancing:...".to_string(),
//!     ..ResolverConfig::default()
//! };
//! config.validate().expect("Invalid configuration");
//! ```

use std::collections::HashMap;
use std::env;
use thiserror::Error;

pub const DEFAULT_REGION: &str = "eu-central-1";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Everything the resolver needs to know about where to look
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Region the load balancer lives in
    pub region: String,

    /// ARN of the load balancer to inspect
    pub load_balancer_arn: String,

    /// Optional ELBv2 endpoint override
    pub endpoint_url: Option<String>,

    /// Per-operation timeout in seconds
    pub timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ResolverConfig {
    /// Loads configuration from ALBENV_* environment variables, falling back
    /// to defaults for anything unset or unparsable.
    fn default() -> Self {
        let region = env::var("ALBENV_REGION")
            .or_else(|_| env::var("AWS_REGION"))
            .ok()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let load_balancer_arn = env::var("ALBENV_ALB_ARN").unwrap_or_default();

        let endpoint_url = env::var("ALBENV_ENDPOINT_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        let timeout_secs = env::var("ALBENV_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let log_level = env::var("ALBENV_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            region,
            load_balancer_arn,
            endpoint_url,
            timeout_secs,
            log_level,
        }
    }
}

impl ResolverConfig {
    /// Validates the configuration
    ///
    /// An empty load balancer ARN is accepted here; the control plane rejects
    /// it on first use with its own error message.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_region_name(&self.region) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid region: '{}'. Expected a name like eu-central-1",
                self.region
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Timeout must be at least 1 second".to_string(),
            ));
        }
        if self.timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if let Some(url) = &self.endpoint_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ParseError {
                    field: "endpoint_url".to_string(),
                    error: format!("'{}' is not an http(s) URL", url),
                });
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("region".to_string(), self.region.clone());
        map.insert(
            "load_balancer_arn".to_string(),
            if self.load_balancer_arn.is_empty() {
                "<unset>".to_string()
            } else {
                self.load_balancer_arn.clone()
            },
        );
        map.insert(
            "endpoint_url".to_string(),
            self.endpoint_url
                .clone()
                .unwrap_or_else(|| "<default>".to_string()),
        );
        map.insert("timeout_secs".to_string(), self.timeout_secs.to_string());
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

/// Region names look like `eu-central-1`, `us-gov-west-1` or `cn-north-1`
fn is_region_name(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    if parts.len() < 3 {
        return false;
    }

    let (last, rest) = match parts.split_last() {
        Some(split) => split,
        None => return false,
    };

    !last.is_empty()
        && last.chars().all(|c| c.is_ascii_digit())
        && rest
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "ALBENV_REGION",
            "AWS_REGION",
            "ALBENV_ALB_ARN",
            "ALBENV_ENDPOINT_URL",
            "ALBENV_TIMEOUT",
            "ALBENV_LOG_LEVEL",
        ] {
            env::remove_var(var);
        }
    }

    fn valid() -> ResolverConfig {
        ResolverConfig {
            region: "eu-central-1".to_string(),
            load_balancer_arn: "arn:lb".to_string(),
            endpoint_url: None,
            timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_config() {
        clear_env();
        let config = ResolverConfig::default();
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.load_balancer_arn, "");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        clear_env();
        env::set_var("AWS_REGION", "us-east-1");
        env::set_var("ALBENV_ALB_ARN", "arn:from-env");
        env::set_var("ALBENV_TIMEOUT", "not-a-number");
        env::set_var("ALBENV_LOG_LEVEL", "DEBUG");

        let config = ResolverConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.load_balancer_arn, "arn:from-env");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.log_level, "debug");

        env::set_var("ALBENV_REGION", "eu-west-1");
        assert_eq!(ResolverConfig::default().region, "eu-west-1");

        clear_env();
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid().validate().is_ok());

        let empty_arn = ResolverConfig {
            load_balancer_arn: String::new(),
            ..valid()
        };
        assert!(empty_arn.validate().is_ok());
    }

    #[test]
    fn test_validate_region() {
        for region in ["", "eu", "eu-central", "EU-CENTRAL-1", "eu-central-x", "eu--1"] {
            let config = ResolverConfig {
                region: region.to_string(),
                ..valid()
            };
            assert!(config.validate().is_err(), "region {:?} should be rejected", region);
        }

        let gov = ResolverConfig {
            region: "us-gov-west-1".to_string(),
            ..valid()
        };
        assert!(gov.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout() {
        let zero = ResolverConfig {
            timeout_secs: 0,
            ..valid()
        };
        assert!(zero.validate().is_err());

        let huge = ResolverConfig {
            timeout_secs: 601,
            ..valid()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_validate_endpoint_and_log_level() {
        let bad_url = ResolverConfig {
            endpoint_url: Some("localhost:4566".to_string()),
            ..valid()
        };
        assert!(matches!(
            bad_url.validate(),
            Err(ConfigError::ParseError { .. })
        ));

        let bad_level = ResolverConfig {
            log_level: "verbose".to_string(),
            ..valid()
        };
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_display_map() {
        let map = ResolverConfig {
            load_balancer_arn: String::new(),
            ..valid()
        }
        .to_display_map();
        assert_eq!(map.get("region").map(String::as_str), Some("eu-central-1"));
        assert_eq!(
            map.get("load_balancer_arn").map(String::as_str),
            Some("<unset>")
        );
        assert_eq!(map.get("endpoint_url").map(String::as_str), Some("<default>"));
    }
}
