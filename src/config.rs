use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::aggregate::DEFAULT_TOP_N;
use crate::view::{RenderSettings, View};

/// Top-level configuration for the dashboard pipeline.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Logging verbosity (trace, debug, info, warn, error). Default: "info".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Date window configuration.
    #[serde(default)]
    pub window: WindowConfig,

    /// Per-view rendering configuration.
    #[serde(default)]
    pub views: ViewsConfig,
}

/// Date window configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    /// Length of the default trailing window ending at startup. Default: 30d.
    #[serde(default = "default_lookback", with = "humantime_serde")]
    pub default_lookback: Duration,
}

/// Per-view rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    /// View shown at startup. Default: overview.
    #[serde(default)]
    pub initial: View,

    /// Length of the top content ranking. Default: 5.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Bin count of the engagement distribution. Default: 10.
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Length of each hashtag ranking. Default: 5.
    #[serde(default = "default_hashtag_limit")]
    pub hashtag_limit: usize,
}

// --- Default value functions ---

fn default_log_level() -> String {
    "info".to_string()
}

fn default_lookback() -> Duration {
    Duration::from_secs(30 * 24 * 60 * 60)
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_histogram_bins() -> usize {
    10
}

fn default_hashtag_limit() -> usize {
    5
}

// --- Default trait impls ---

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            window: WindowConfig::default(),
            views: ViewsConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            default_lookback: default_lookback(),
        }
    }
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            initial: View::default(),
            top_n: default_top_n(),
            histogram_bins: default_histogram_bins(),
            hashtag_limit: default_hashtag_limit(),
        }
    }
}

// --- Validation and loading ---

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;

        let cfg = Self::parse(&data)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        Ok(cfg)
    }

    /// Parse and validate configuration from YAML text.
    pub fn parse(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.window.default_lookback.is_zero() {
            bail!("window.default_lookback must be positive");
        }
        let lookback = self
            .window
            .lookback()
            .context("window.default_lookback is out of range")?;
        if chrono::Utc::now().checked_sub_signed(lookback).is_none() {
            bail!("window.default_lookback reaches before the earliest representable date");
        }

        if self.views.top_n == 0 {
            bail!("views.top_n must be positive");
        }

        if self.views.histogram_bins == 0 {
            bail!("views.histogram_bins must be positive");
        }

        if self.views.hashtag_limit == 0 {
            bail!("views.hashtag_limit must be positive");
        }

        Ok(())
    }
}

impl WindowConfig {
    /// Default lookback as a calendar duration.
    pub fn lookback(&self) -> Result<chrono::Duration> {
        chrono::Duration::from_std(self.default_lookback)
            .context("lookback does not fit a calendar duration")
    }
}

impl ViewsConfig {
    /// Aggregation tunables handed to the view router.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            top_n: self.top_n,
            histogram_bins: self.histogram_bins,
            hashtag_limit: self.hashtag_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.window.default_lookback, Duration::from_secs(2_592_000));
        assert_eq!(cfg.views.initial, View::Overview);
        assert_eq!(cfg.views.top_n, 5);
        assert_eq!(cfg.views.histogram_bins, 10);
        assert_eq!(cfg.views.hashtag_limit, 5);
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn test_parse_empty_document_uses_defaults() {
        let cfg = Config::parse("{}").expect("valid config");
        assert_eq!(cfg.views.render_settings(), RenderSettings::default());
        assert_eq!(
            cfg.window.lookback().expect("in range"),
            chrono::Duration::days(30)
        );
    }

    #[test]
    fn test_parse_overrides() {
        let cfg = Config::parse(
            r#"
log_level: debug
window:
  default_lookback: 7d
views:
  initial: audience
  top_n: 3
  histogram_bins: 20
  hashtag_limit: 8
"#,
        )
        .expect("valid config");

        assert_eq!(cfg.log_level, "debug");
        assert_eq!(
            cfg.window.lookback().expect("in range"),
            chrono::Duration::days(7)
        );
        assert_eq!(cfg.views.initial, View::Audience);
        assert_eq!(
            cfg.views.render_settings(),
            RenderSettings {
                top_n: 3,
                histogram_bins: 20,
                hashtag_limit: 8,
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_view() {
        assert!(Config::parse("views:\n  initial: settings\n").is_err());
    }

    #[test]
    fn test_validation_zero_top_n() {
        let mut cfg = Config::default();
        cfg.views.top_n = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn test_validation_zero_histogram_bins() {
        let mut cfg = Config::default();
        cfg.views.histogram_bins = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("histogram_bins"));
    }

    #[test]
    fn test_validation_zero_hashtag_limit() {
        let mut cfg = Config::default();
        cfg.views.hashtag_limit = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validation_zero_lookback() {
        let mut cfg = Config::default();
        cfg.window.default_lookback = Duration::ZERO;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("default_lookback"));
    }

    #[test]
    fn test_validation_lookback_beyond_calendar() {
        let err = Config::parse("window:\n  default_lookback: 1000000years\n").unwrap_err();
        assert!(err.to_string().contains("default_lookback"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("socialpulse.yaml");
        std::fs::write(&path, "views:\n  top_n: 9\n").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.views.top_n, 9);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/socialpulse.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/socialpulse.yaml"));
    }
}
