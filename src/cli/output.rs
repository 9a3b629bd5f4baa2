//! Output formatting
//!
//! Text output is the bare environment label, which is what deployment
//! scripts capture. JSON output carries the full resolution.

use anyhow::{Context, Result};
use std::collections::BTreeMap;

use crate::config::ResolverConfig;
use crate::resolver::Resolution;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The environment label alone
    Text,
    /// JSON format (machine-readable)
    Json,
}

/// Output formatter for resolution results
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, resolution: &Resolution) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(resolution.environment.to_string()),
            OutputFormat::Json => serde_json::to_string_pretty(resolution)
                .context("Failed to serialize resolution to JSON"),
        }
    }

    pub fn format_config(&self, config: &ResolverConfig) -> Result<String> {
        let map: BTreeMap<String, String> = config.to_display_map().into_iter().collect();

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&map).context("Failed to serialize config to JSON")
            }
            OutputFormat::Text => {
                let width = map.keys().map(String::len).max().unwrap_or(0);
                Ok(map
                    .iter()
                    .map(|(key, value)| format!("{:width$}  {}", key, value, width = width))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }
}
