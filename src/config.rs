use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Configuration for the frame search page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search service and media endpoints
    pub backend: BackendConfig,

    /// Keyframe to playback time mapping
    pub playback: PlaybackConfig,

    /// Constraint widget bounds
    pub ui: UiConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL every resource path is resolved against
    pub base_url: String,

    /// Search endpoint (POST)
    pub search_path: String,

    /// Frame images, addressed as `<frames_path>/<video_id>/<keyframe_index>`
    pub frames_path: String,

    /// Video files, addressed as `<videos_path>/<video_id>`
    pub videos_path: String,

    /// Static image shown when a thumbnail fails to load
    pub placeholder_path: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seconds of source video between two keyframes
    pub frame_interval_seconds: f64,

    /// Context played before the matched frame
    pub lookback_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Labels offered by the object picker. Empty accepts any label.
    pub object_labels: Vec<String>,

    /// Upper bound of the count input
    pub max_object_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive
    pub level: String,
}

impl BackendConfig {
    pub fn base(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)
    }

    pub fn search_url(&self) -> Result<Url, url::ParseError> {
        self.base()?.join(&self.search_path)
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_paths = ["frame-search.toml", "config/frame-search.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                match Self::load_from(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to load config file {}: {:#}", path, e),
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("FRAME_SEARCH_BASE_URL") {
            config.backend.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("FRAME_SEARCH_TIMEOUT") {
            config.backend.timeout_seconds = timeout.parse().unwrap_or(30);
        }

        if let Ok(lookback) = std::env::var("FRAME_SEARCH_LOOKBACK") {
            config.playback.lookback_seconds = lookback.parse().unwrap_or(5.0);
        }

        if let Ok(log_level) = std::env::var("FRAME_SEARCH_LOG_LEVEL") {
            config.logging.level = log_level;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.as_ref().display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = self
            .backend
            .base()
            .map_err(|e| anyhow!("Invalid base_url {}: {}", self.backend.base_url, e))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("base_url must be an absolute http(s) URL"));
        }

        if self.backend.timeout_seconds == 0 {
            return Err(anyhow!("timeout_seconds must be greater than 0"));
        }

        let interval = self.playback.frame_interval_seconds;
        if interval.is_nan() || interval <= 0.0 {
            return Err(anyhow!("frame_interval_seconds must be greater than 0"));
        }

        if self.playback.lookback_seconds < 0.0 {
            return Err(anyhow!("lookback_seconds must not be negative"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Frame Search Configuration:\n\
            - Backend: {}\n\
            - Timeout: {}s\n\
            - Frame Interval: {}s\n\
            - Lookback: {}s\n\
            - Object Labels: {}\n\
            - Max Object Count: {}",
            self.backend.base_url,
            self.backend.timeout_seconds,
            self.playback.frame_interval_seconds,
            self.playback.lookback_seconds,
            if self.ui.object_labels.is_empty() {
                "any".to_string()
            } else {
                self.ui.object_labels.join(", ")
            },
            self.ui.max_object_count
        )
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            search_path: "/search".to_string(),
            frames_path: "/frames".to_string(),
            videos_path: "/videos".to_string(),
            placeholder_path: "/static/placeholder.png".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_interval_seconds: 1.0, // One keyframe per second
            lookback_seconds: 5.0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            object_labels: Vec::new(),
            max_object_count: 20,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.backend.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.backend.timeout_seconds = seconds;
        self
    }

    pub fn with_frame_interval(mut self, seconds: f64) -> Self {
        self.config.playback.frame_interval_seconds = seconds;
        self
    }

    pub fn with_lookback(mut self, seconds: f64) -> Self {
        self.config.playback.lookback_seconds = seconds;
        self
    }

    pub fn with_object_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.ui.object_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_object_count(mut self, max: u32) -> Self {
        self.config.ui.max_object_count = max;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
