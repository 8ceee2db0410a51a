//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_CODE_LANGUAGE, DEFAULT_LINE_HEIGHT, DEFAULT_OVERSCAN_PX, DEFAULT_RESOLVE_TIMEOUT_MS,
};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Runtime configuration for the notebook view.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Line-height hint fed to the height heuristic and the headless measurer.
    pub line_height: f32,
    /// Code language used when a document does not declare one.
    pub default_language: String,
    /// Extra pixels rendered above and below the viewport.
    pub overscan_px: f32,
    /// Collapse repeated height reports for one cell into the latest value.
    pub coalesce_heights: bool,
    /// Upper bound for blocking waits on document resolution, in milliseconds.
    pub resolve_timeout_ms: u64,
    /// Emit per-frame layout feedback traces.
    pub layout_trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_height: DEFAULT_LINE_HEIGHT,
            default_language: DEFAULT_CODE_LANGUAGE.to_string(),
            overscan_px: DEFAULT_OVERSCAN_PX,
            coalesce_heights: true,
            resolve_timeout_ms: DEFAULT_RESOLVE_TIMEOUT_MS,
            layout_trace: false,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env_flag_or(name, false)
}

fn env_flag_or(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            line_height: env_parse::<f32>("NOTEBOOK_LINE_HEIGHT")
                .filter(|value| value.is_finite() && *value > 0.0)
                .unwrap_or(defaults.line_height),
            default_language: env::var("NOTEBOOK_DEFAULT_LANGUAGE")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.default_language),
            overscan_px: env_parse::<f32>("NOTEBOOK_OVERSCAN_PX")
                .filter(|value| value.is_finite() && *value >= 0.0)
                .unwrap_or(defaults.overscan_px),
            coalesce_heights: env_flag_or("NOTEBOOK_COALESCE_HEIGHTS", defaults.coalesce_heights),
            resolve_timeout_ms: env_parse("NOTEBOOK_RESOLVE_TIMEOUT_MS")
                .unwrap_or(defaults.resolve_timeout_ms),
            layout_trace: env_flag_enabled("NOTEBOOK_LAYOUT_TRACE"),
        }
    }

    /// Blocking-wait bound for document resolution.
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }
}
