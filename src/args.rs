use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use storefront_audit::AuditConfig;
use storefront_audit::AuditMode;
use storefront_audit::config::ConfigError;
use storefront_audit::report::ReportFormat;

#[derive(Parser, Debug)]
#[command(name = "storefront-audit")]
#[command(about = "Audits the product cards and images of one storefront page")]
#[command(version)]
pub struct Args {
    /// Page URL to audit (overrides the config file)
    pub url: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Audit mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Audit a saved HTML file instead of a live page (no WebDriver needed)
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Exact report path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for the report and screenshot
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Save a screenshot of the page
    #[arg(long)]
    pub screenshot: bool,

    /// Navigation timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Wait after navigation in milliseconds
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Scroll to the bottom this many times before auditing
    #[arg(long)]
    pub scroll_passes: Option<u32>,

    /// Exit with status 1 unless every row passed
    #[arg(long)]
    pub strict: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Products,
    Listing,
    Images,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
    Json,
}

/// Convert from CLI argument mode to internal mode
pub fn convert_mode(arg: ModeArg) -> AuditMode {
    match arg {
        ModeArg::Products => AuditMode::Products,
        ModeArg::Listing => AuditMode::Listing,
        ModeArg::Images => AuditMode::Images,
    }
}

/// Convert from CLI argument format to internal format
pub fn convert_format(arg: FormatArg) -> ReportFormat {
    match arg {
        FormatArg::Csv => ReportFormat::Csv,
        FormatArg::Tsv => ReportFormat::Tsv,
        FormatArg::Json => ReportFormat::Json,
    }
}

impl Args {
    /// Build the run configuration: config file first, then flags on top
    pub fn to_config(&self) -> Result<AuditConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AuditConfig::from_file(path)?,
            None => AuditConfig::new(""),
        };

        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if config.url.is_empty() && self.html.is_none() {
            return Err(ConfigError::MissingUrl);
        }
        if let Some(mode) = self.mode {
            config.mode = convert_mode(mode);
        }
        if let Some(format) = self.format {
            config.report_format = convert_format(format);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.page_load_timeout_secs = secs;
        }
        if let Some(ms) = self.settle_ms {
            config.settle_ms = ms;
        }
        if let Some(passes) = self.scroll_passes {
            config.scroll_passes = passes;
        }
        config.screenshot |= self.screenshot;

        Ok(config)
    }
}
