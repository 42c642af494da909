//! Glide configuration system
//!
//! This crate provides centralized configuration for the gesture and animation
//! pipeline, loading settings from `glide.toml` with `GLIDE_*` environment
//! variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default file name looked up by [`GlideConfig::load_or_default`].
pub const CONFIG_FILE: &str = "glide.toml";

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Config file is not valid TOML for [`GlideConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its allowed range.
    #[error("invalid configuration: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GlideConfig {
    /// Swipe and pan recognition settings
    pub gesture: GestureConfig,
    /// Timed animation defaults
    pub timeline: TimelineConfig,
    /// Flyout menu settings
    pub flyout: FlyoutConfig,
    /// Carousel settings
    pub carousel: CarouselConfig,
    /// Scroll-coupled header settings
    pub header: HeaderConfig,
    /// Demo binary settings
    pub demo: DemoConfig,
}

/// Swipe recognition thresholds.
///
/// The velocity values are tuned on touch hardware; they are product
/// decisions rather than derived constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum horizontal travel (density-independent units) for a swipe
    pub swipe_distance_threshold: f64,
    /// Minimum horizontal fling velocity (units per second) for a swipe
    pub swipe_velocity_threshold: f64,
    /// Divisor turning raw fling velocity into the reported swipe velocity
    pub swipe_velocity_normalization: f64,
    /// Trailing window used by the velocity tracker, in milliseconds
    pub velocity_window_ms: f64,
}

/// Defaults for timer-driven animation runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimelineConfig {
    /// Run duration in milliseconds
    pub duration_ms: f64,
    /// Tick interval in milliseconds
    pub tick_ms: f64,
    /// Easing name (e.g. "linear", "cubic_out", "sin_in_out")
    pub easing: String,
}

/// Flyout menu configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlyoutConfig {
    /// Width of the menu panel in density-independent units
    pub menu_width: f64,
    /// Fraction of the width that must be revealed for a released drag to open
    pub snap_ratio: f64,
    /// Duration of the snap animation in milliseconds
    pub snap_duration_ms: f64,
    /// Opacity of the dimming overlay when fully open
    pub overlay_opacity: f64,
}

/// Carousel configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CarouselConfig {
    /// Fraction of a page that a released drag must cover to change page
    pub snap_ratio: f64,
    /// Duration of the paging animation in milliseconds
    pub page_duration_ms: f64,
    /// Auto-advance interval in milliseconds, `None` disables auto-advance
    pub auto_advance_ms: Option<f64>,
    /// Wrap from the last item to the first (and back)
    pub wrap: bool,
}

/// Scroll-coupled header configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeaderConfig {
    /// Height with the content scrolled to the top
    pub expanded_height: f64,
    /// Height once the content has scrolled past the collapse distance
    pub collapsed_height: f64,
    /// Collapsed fraction at which a scroll that stops mid-way snaps collapsed
    pub snap_ratio: f64,
    /// Duration of the snap animation in milliseconds
    pub snap_duration_ms: f64,
}

/// Demo application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Scenario to replay (flyout, carousel, contention, tile, popup, header)
    pub scenario: Option<String>,
    /// Device pixel density used for the synthetic native events
    pub density: Option<f64>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_distance_threshold: 0.0,
            swipe_velocity_threshold: 1200.0,
            swipe_velocity_normalization: 1750.0,
            velocity_window_ms: 100.0,
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            duration_ms: 250.0,
            tick_ms: 16.0,
            easing: "cubic_out".to_string(),
        }
    }
}

impl Default for FlyoutConfig {
    fn default() -> Self {
        Self {
            menu_width: 280.0,
            snap_ratio: 0.5,
            snap_duration_ms: 200.0,
            overlay_opacity: 0.5,
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            snap_ratio: 0.5,
            page_duration_ms: 300.0,
            auto_advance_ms: None,
            wrap: false,
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            expanded_height: 200.0,
            collapsed_height: 56.0,
            snap_ratio: 0.5,
            snap_duration_ms: 200.0,
        }
    }
}

impl GlideConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `glide.toml` in the current directory, or
    /// return the defaults if it is missing or invalid.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read(_)) => Self::default(),
            Err(e) => {
                tracing::warn!("ignoring {}: {}", CONFIG_FILE, e);
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        if let Some(v) = env_f64("GLIDE_SWIPE_DISTANCE_THRESHOLD") {
            self.gesture.swipe_distance_threshold = v;
        }
        if let Some(v) = env_f64("GLIDE_SWIPE_VELOCITY_THRESHOLD") {
            self.gesture.swipe_velocity_threshold = v;
        }
        if let Some(v) = env_f64("GLIDE_SWIPE_NORMALIZATION") {
            self.gesture.swipe_velocity_normalization = v;
        }

        if let Some(v) = env_f64("GLIDE_TICK_MS") {
            self.timeline.tick_ms = v;
        }
        if let Some(v) = env_f64("GLIDE_DURATION_MS") {
            self.timeline.duration_ms = v;
        }
        if let Ok(easing) = std::env::var("GLIDE_EASING") {
            self.timeline.easing = easing;
        }

        if let Some(v) = env_f64("GLIDE_SNAP_RATIO") {
            self.flyout.snap_ratio = v;
            self.carousel.snap_ratio = v;
            self.header.snap_ratio = v;
        }

        if let Ok(scenario) = std::env::var("GLIDE_DEMO_SCENARIO") {
            self.demo.scenario = Some(scenario);
        }
        if let Some(v) = env_f64("GLIDE_DEMO_DENSITY") {
            self.demo.density = Some(v);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from glide.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        if let Err(e) = config.validate() {
            tracing::warn!("environment overrides rejected: {}", e);
            let mut fallback = Self::load_or_default();
            fallback.demo = config.demo;
            return fallback;
        }
        config
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        non_negative("gesture.swipe_distance_threshold", self.gesture.swipe_distance_threshold)?;
        non_negative("gesture.swipe_velocity_threshold", self.gesture.swipe_velocity_threshold)?;
        positive("gesture.swipe_velocity_normalization", self.gesture.swipe_velocity_normalization)?;
        positive("gesture.velocity_window_ms", self.gesture.velocity_window_ms)?;
        positive("timeline.tick_ms", self.timeline.tick_ms)?;
        non_negative("timeline.duration_ms", self.timeline.duration_ms)?;
        positive("flyout.menu_width", self.flyout.menu_width)?;
        ratio("flyout.snap_ratio", self.flyout.snap_ratio)?;
        non_negative("flyout.snap_duration_ms", self.flyout.snap_duration_ms)?;
        ratio("carousel.snap_ratio", self.carousel.snap_ratio)?;
        non_negative("carousel.page_duration_ms", self.carousel.page_duration_ms)?;
        non_negative("header.collapsed_height", self.header.collapsed_height)?;
        if !self.header.expanded_height.is_finite() || self.header.expanded_height <= self.header.collapsed_height {
            return Err(ConfigError::Invalid {
                field: "header.expanded_height",
                reason: format!(
                    "must exceed collapsed_height {}, got {}",
                    self.header.collapsed_height, self.header.expanded_height
                ),
            });
        }
        ratio("header.snap_ratio", self.header.snap_ratio)?;
        non_negative("header.snap_duration_ms", self.header.snap_duration_ms)?;
        if let Some(interval) = self.carousel.auto_advance_ms {
            positive("carousel.auto_advance_ms", interval)?;
        }
        if let Some(density) = self.demo.density {
            positive("demo.density", density)?;
        }
        Ok(())
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok()?.trim().parse::<f64>().ok()
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be > 0, got {}", value),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be >= 0, got {}", value),
        })
    }
}

fn ratio(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be in (0, 1], got {}", value),
        })
    }
}

static_assertions::assert_impl_all!(GlideConfig: Send, Sync);
