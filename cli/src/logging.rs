//! Tracing subscriber setup for `mic`.
//!
//! Log events go to stderr so that stdout carries only query output.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding filter directives, e.g. `mic_calc=trace`.
pub const LOG_ENV: &str = "MIC_LOG";

/// How the tracing subscriber should behave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Filter directives. When absent, `RUST_LOG` and then
    /// [`default_directive`](Self::default_directive) apply.
    pub directives: Option<String>,
    /// Fallback directive.
    pub default_directive: String,
    /// Show event targets (module paths).
    pub include_targets: bool,
    /// ANSI colours.
    pub ansi: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            directives: None,
            default_directive: "warn".to_owned(),
            include_targets: false,
            ansi: true,
        }
    }
}

impl TracingConfig {
    /// Defaults, with directives taken from `MIC_LOG` when set.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(directives) = env::var(LOG_ENV) {
            if !directives.trim().is_empty() {
                config.directives = Some(directives);
            }
        }
        config
    }

    /// Reads a JSON configuration file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a valid configuration.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading log configuration {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing log configuration {}", path.display()))
    }

    /// Raises the fallback level to `debug` when `verbose` is set.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.default_directive = "debug".to_owned();
        }
        self
    }

    /// The filter: explicit directives, then `RUST_LOG`, then the default.
    ///
    /// # Errors
    ///
    /// Fails when the explicit directives do not parse.
    pub fn resolve_filter(&self) -> anyhow::Result<EnvFilter> {
        if let Some(directives) = &self.directives {
            EnvFilter::try_new(directives)
                .map_err(|err| anyhow!("invalid log directives '{directives}': {err}"))
        } else {
            Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&self.default_directive)))
        }
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// # Errors
///
/// Fails when the filter does not parse or a subscriber is already set.
pub fn init(config: &TracingConfig) -> anyhow::Result<()> {
    fmt()
        .with_env_filter(config.resolve_filter()?)
        .with_target(config.include_targets)
        .with_ansi(config.ansi)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
        .context("installing the tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_lowers_the_fallback() {
        let config = TracingConfig::default().verbose(true);
        assert_eq!(config.default_directive, "debug");
        assert_eq!(TracingConfig::default().verbose(false).default_directive, "warn");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: TracingConfig = serde_json::from_str(r#"{"directives":"mic_calc=trace"}"#).unwrap();
        assert_eq!(config.directives.as_deref(), Some("mic_calc=trace"));
        assert_eq!(config.default_directive, "warn");
        assert!(config.ansi);
    }

    #[test]
    fn explicit_directives_are_checked() {
        let config = TracingConfig {
            directives: Some("mic_calc=loud".to_owned()),
            ..TracingConfig::default()
        };
        assert!(config.resolve_filter().is_err());
        let config = TracingConfig {
            directives: Some("mic_calc=trace,warn".to_owned()),
            ..TracingConfig::default()
        };
        assert!(config.resolve_filter().is_ok());
    }
}
