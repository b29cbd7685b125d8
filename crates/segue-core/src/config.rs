use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::motion::easing::solve_overshoot_for_peak;
use crate::motion::{ArcConfig, Ease};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub preloader: PreloaderConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin that relative links and history entries resolve against
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Selector of the container whose markup is swapped on navigation
    #[serde(default = "default_content_selector")]
    pub content_selector: String,
    /// Attribute on the content container naming the page type
    #[serde(default = "default_template_attribute")]
    pub template_attribute: String,
    /// Selector for links that are candidates for interception
    #[serde(default = "default_link_selector")]
    pub link_selector: String,
    /// Page type used when a document names one that is not registered
    #[serde(default = "default_fallback_template")]
    pub fallback_template: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            content_selector: default_content_selector(),
            template_attribute: default_template_attribute(),
            link_selector: default_link_selector(),
            fallback_template: default_fallback_template(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Largest document body accepted, in bytes
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    /// HTTP proxy URL (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            max_document_bytes: default_max_document_bytes(),
            proxy_url: None,
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Frame rate of the per-frame driver
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Initial reduced-motion preference
    #[serde(default)]
    pub reduced_motion: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            animation_fps: default_animation_fps(),
            reduced_motion: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreloaderConfig {
    #[serde(default = "default_preloader_selector")]
    pub root_selector: String,
    #[serde(default = "default_progress_selector")]
    pub progress_selector: String,
    /// Sub-images cycled through during the reveal
    #[serde(default = "default_image_selector")]
    pub image_selector: String,
    /// Elements whose loading is tracked before the reveal starts
    #[serde(default = "default_asset_selector")]
    pub asset_selector: String,
    /// Attribute holding the deferred source of an asset
    #[serde(default = "default_deferred_attribute")]
    pub deferred_attribute: String,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub arc: ArcConfig,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            root_selector: default_preloader_selector(),
            progress_selector: default_progress_selector(),
            image_selector: default_image_selector(),
            asset_selector: default_asset_selector(),
            deferred_attribute: default_deferred_attribute(),
            progress: ProgressConfig::default(),
            arc: ArcConfig::default(),
        }
    }
}

/// Progress tween timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Shortest tween, in seconds
    #[serde(default = "default_progress_min_secs")]
    pub min_secs: f64,
    /// Longest tween (a full 0 to 1 sweep), in seconds
    #[serde(default = "default_progress_max_secs")]
    pub max_secs: f64,
    #[serde(default = "default_progress_easing")]
    pub easing: Ease,
    /// Overshoot peak within `[peak_min, peak_max]`; replaces `easing` with a
    /// back-out curve solved to reach it
    #[serde(default)]
    pub peak: Option<f64>,
    #[serde(default)]
    pub peak_min: f64,
    #[serde(default = "default_peak_max")]
    pub peak_max: f64,
}

impl ProgressConfig {
    /// Curve the tween runs on
    pub fn resolved_easing(&self) -> Ease {
        match self.peak {
            Some(peak) => solve_overshoot_for_peak(self.peak_min, self.peak_max, peak),
            None => self.easing,
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            min_secs: default_progress_min_secs(),
            max_secs: default_progress_max_secs(),
            easing: default_progress_easing(),
            peak: None,
            peak_min: 0.0,
            peak_max: default_peak_max(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Delay before the enter/exit animation starts
    #[serde(default = "default_show_delay")]
    pub show_delay_ms: u64,
    /// Fade duration of the enter/exit animation
    #[serde(default = "default_fade")]
    pub fade_ms: u64,
    /// Class toggled on a page root while it is visible
    #[serde(default = "default_visible_class")]
    pub visible_class: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: default_show_delay(),
            fade_ms: default_fade(),
            visible_class: default_visible_class(),
        }
    }
}

/// Smooth scrolling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable smooth scrolling animation
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Animation duration in milliseconds
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    /// Easing curve
    #[serde(default = "default_scroll_easing")]
    pub easing: Ease,
}

impl ScrollConfig {
    /// Whether scroll requests animate at all
    pub fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: default_scroll_easing(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_content_selector() -> String {
    ".content".to_string()
}

fn default_template_attribute() -> String {
    "data-template".to_string()
}

fn default_link_selector() -> String {
    "a[href]".to_string()
}

fn default_fallback_template() -> String {
    "home".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_document_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_user_agent() -> String {
    concat!("segue/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_animation_fps() -> u32 {
    60
}

fn default_preloader_selector() -> String {
    ".preloader".to_string()
}

fn default_progress_selector() -> String {
    ".preloader__progress".to_string()
}

fn default_image_selector() -> String {
    ".preloader__image".to_string()
}

fn default_asset_selector() -> String {
    "img".to_string()
}

fn default_deferred_attribute() -> String {
    "data-src".to_string()
}

fn default_progress_min_secs() -> f64 {
    0.3
}

fn default_progress_max_secs() -> f64 {
    1.25
}

fn default_progress_easing() -> Ease {
    Ease::CubicOut
}

fn default_peak_max() -> f64 {
    1.0
}

fn default_show_delay() -> u64 {
    500
}

fn default_fade() -> u64 {
    500
}

fn default_visible_class() -> String {
    "is-visible".to_string()
}

fn default_true() -> bool {
    true
}

fn default_scroll_duration() -> u64 {
    150
}

fn default_scroll_easing() -> Ease {
    Ease::CubicOut
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, falling back to defaults when absent
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/segue/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("segue")
            .join("config.toml")
    }

    /// Reject values the animation math cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        url::Url::parse(&self.site.base_url)?;

        let arc = &self.preloader.arc;
        if arc.start_angle_deg == arc.end_angle_deg {
            return Err(crate::Error::Config(
                "preloader.arc start_angle_deg and end_angle_deg must differ".to_string(),
            ));
        }

        let progress = &self.preloader.progress;
        if progress.min_secs < 0.0 || progress.max_secs < progress.min_secs {
            return Err(crate::Error::Config(format!(
                "preloader.progress requires 0 <= min_secs <= max_secs (got {} and {})",
                progress.min_secs, progress.max_secs
            )));
        }

        Ok(())
    }
}
