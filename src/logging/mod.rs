//! Logging
//!
//! Installs the global `tracing` subscriber for a bot process that embeds
//! the poll engine. The engine itself only emits events.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Logging error types
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("Initialization error: {0}")]
    InitError(String),
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Service name
    pub service_name: String,
    /// Log filter directive, e.g. `info` or `interaction_polls=debug`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Output format
    #[serde(default)]
    pub export_format: ExportFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: "interaction-polls".to_string(),
            log_level: default_log_level(),
            export_format: ExportFormat::Text,
        }
    }
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// JSON format (structured logging)
    Json,
    /// Plain text format
    #[default]
    Text,
}

/// Initialize logging with the given configuration.
///
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    if !config.enabled {
        return Ok(());
    }

    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TracingError::InitError(e.to_string()))?;

    let result = match config.export_format {
        ExportFormat::Json => Registry::default()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        ExportFormat::Text => Registry::default()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };
    result.map_err(|e| TracingError::InitError(e.to_string()))?;

    info!("Tracing initialized for service: {}", config.service_name);
    Ok(())
}
