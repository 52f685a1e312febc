use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Path to a Chrome/Chromium executable. When absent the CDP library
    /// auto-detects an installed browser.
    #[serde(default)]
    pub chrome_path: Option<String>,

    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Pause between scroll-to-bottom commands, giving lazy-loaded
    /// content time to render.
    #[serde(default = "default_scroll_pause")]
    pub scroll_pause_secs: u64,

    /// Upper bound on scroll attempts before giving up on a page whose
    /// height never stabilizes.
    #[serde(default = "default_max_scroll_attempts")]
    pub max_scroll_attempts: u32,

    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Filename prefix for saved images: `<prefix>_<N>.jpg`.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Substrings a candidate URL must contain to qualify. Matches the
    /// URL anywhere, not just the path suffix.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Board URL to scrape. When empty, the URL is read from stdin.
    #[serde(default)]
    pub board_url: String,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

// Default implementations
impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            scroll_pause_secs: default_scroll_pause(),
            max_scroll_attempts: default_max_scroll_attempts(),
            navigation_timeout_secs: default_navigation_timeout(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            file_prefix: default_file_prefix(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_url: String::new(),
            browser: BrowserConfig::default(),
            download: DownloadConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to the built-in
    /// defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;

        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        // Validate board_url when supplied; an empty value defers to the
        // interactive prompt.
        if !self.board_url.is_empty() {
            let url = Url::parse(&self.board_url).map_err(|e| {
                ConfigError::InvalidValue(format!("board_url is not a valid URL: {}", e))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::InvalidValue(format!(
                    "board_url must start with http(s): {}",
                    self.board_url
                ))
                .into());
            }
        }

        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::InvalidValue(
                "window dimensions must be greater than 0".to_string(),
            )
            .into());
        }

        if self.browser.max_scroll_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "max_scroll_attempts must be greater than 0".to_string(),
            )
            .into());
        }

        if self.browser.navigation_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "navigation_timeout_secs must be greater than 0".to_string(),
            )
            .into());
        }

        if self.download.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs must be greater than 0".to_string(),
            )
            .into());
        }

        if self.download.file_prefix.is_empty() {
            return Err(
                ConfigError::InvalidValue("file_prefix cannot be empty".to_string()).into(),
            );
        }

        if self.download.allowed_extensions.is_empty() {
            return Err(ConfigError::InvalidValue(
                "allowed_extensions cannot be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_scroll_pause() -> u64 {
    2
}

fn default_max_scroll_attempts() -> u32 {
    30
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    15
}

fn default_file_prefix() -> String {
    "pin".to_string()
}

fn default_allowed_extensions() -> Vec<String> {
    vec![".jpg".to_string(), ".png".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "scraper.log".to_string()
}
