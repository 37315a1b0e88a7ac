use crate::audit::classify::FieldKind;
use crate::audit::locator::Strategy;
use crate::filter::ImageFilter;
use crate::report::ReportFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or compiling a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid price pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("no page URL configured")]
    MissingUrl,
}

/// Which audit to run, and so which report columns to emit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditMode {
    /// Structured name/price/image checks per product card
    #[default]
    Products,
    /// Whole-text currency check per card
    Listing,
    /// Count of visible vehicle images on the page
    Images,
}

impl AuditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditMode::Products => "products",
            AuditMode::Listing => "listing",
            AuditMode::Images => "images",
        }
    }
}

impl fmt::Display for AuditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How product cards are located
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateConfig {
    /// Tried first
    #[serde(default = "default_primary_strategy")]
    pub primary: Strategy,

    /// Tried only when the primary strategy finds nothing
    #[serde(default = "default_fallback_strategy")]
    pub fallback: Strategy,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_strategy(),
            fallback: default_fallback_strategy(),
        }
    }
}

/// Configuration for one audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Storefront page to audit
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub mode: AuditMode,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default)]
    pub candidates: CandidateConfig,

    /// Narrowed selectors for the product name inside a card
    #[serde(default = "default_name_selectors")]
    pub name_selectors: Vec<String>,

    /// Selector for the product image inside a card
    #[serde(default = "default_image_selector")]
    pub image_selector: String,

    /// Regex matching price text
    #[serde(default = "default_price_pattern")]
    pub price_pattern: String,

    /// Characters that make listing text count as priced
    #[serde(default = "default_currency_symbols")]
    pub currency_symbols: String,

    /// Fields whose absence fails a product card
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<FieldKind>,

    /// Maximum characters of product text in the report
    #[serde(default = "default_display_len")]
    pub display_len: usize,

    /// Maximum characters of image URL in the report
    #[serde(default = "default_image_prefix_len")]
    pub image_prefix_len: usize,

    #[serde(default)]
    pub image_filter: ImageFilter,

    /// Maximum sample image URLs in the image report
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,

    /// Navigation timeout
    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout_secs: u64,

    /// Wait after navigation before the page counts as settled
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Scrolls to the bottom of the page to trigger lazy loading
    #[serde(default)]
    pub scroll_passes: u32,

    /// Consent-banner buttons to click after navigation
    #[serde(default = "default_consent_selectors")]
    pub consent_selectors: Vec<String>,

    /// Browser window size as (width, height)
    #[serde(default = "default_window_size")]
    pub window_size: Option<(u32, u32)>,

    /// Directory for reports and screenshots
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub report_format: ReportFormat,

    /// Capture a screenshot; image audits always do
    #[serde(default)]
    pub screenshot: bool,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_primary_strategy() -> Strategy {
    Strategy::css(
        "product-containers",
        &[
            "div.item",
            "div.card",
            "div.product-item",
            "div[class*='product']",
        ],
    )
}

fn default_fallback_strategy() -> Strategy {
    Strategy::containing_any("currency-text", &["div"], &default_currency_symbols())
}

fn default_name_selectors() -> Vec<String> {
    ["h1", "h2", "h3", "h4", "[class*='name']", "[class*='title']"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_image_selector() -> String {
    "img".to_string()
}

fn default_price_pattern() -> String {
    r"[$€£]\s*\d[\d.,]*".to_string()
}

fn default_currency_symbols() -> String {
    "$€£".to_string()
}

fn default_required_fields() -> Vec<FieldKind> {
    vec![FieldKind::Name, FieldKind::Price, FieldKind::Image]
}

fn default_display_len() -> usize {
    50
}

fn default_image_prefix_len() -> usize {
    60
}

fn default_sample_limit() -> usize {
    5
}

fn default_page_load_timeout() -> u64 {
    60
}

fn default_settle_ms() -> u64 {
    5000
}

fn default_consent_selectors() -> Vec<String> {
    [
        "#onetrust-accept-btn-handler",
        "button[id*='accept']",
        "button[class*='accept']",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_window_size() -> Option<(u32, u32)> {
    Some((1920, 1080))
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl AuditConfig {
    /// Create a new configuration with default values
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            mode: AuditMode::default(),
            webdriver_url: default_webdriver_url(),
            candidates: CandidateConfig::default(),
            name_selectors: default_name_selectors(),
            image_selector: default_image_selector(),
            price_pattern: default_price_pattern(),
            currency_symbols: default_currency_symbols(),
            required_fields: default_required_fields(),
            display_len: default_display_len(),
            image_prefix_len: default_image_prefix_len(),
            image_filter: ImageFilter::default(),
            sample_limit: default_sample_limit(),
            page_load_timeout_secs: default_page_load_timeout(),
            settle_ms: default_settle_ms(),
            scroll_passes: 0,
            consent_selectors: default_consent_selectors(),
            window_size: default_window_size(),
            output_dir: default_output_dir(),
            report_format: ReportFormat::default(),
            screenshot: false,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether this run should capture a screenshot
    pub fn wants_screenshot(&self) -> bool {
        self.screenshot || self.mode == AuditMode::Images
    }
}
