pub mod audit;
pub mod browser;
pub mod config;
pub mod dom;
pub mod filter;
pub mod report;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{AuditConfig, AuditMode};
pub use results::{Status, ValidationRecord};

use audit::AuditSettings;
use audit::aggregate::{PageLoadFault, finalize};
use chrono::Local;
use dom::{HtmlSnapshot, PageHandle};
use std::path::{Path, PathBuf};

/// What one run produced
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub mode: AuditMode,
    /// Report rows, in discovery order; never empty
    pub records: Vec<ValidationRecord>,
    pub report_path: PathBuf,
    pub screenshot: Option<PathBuf>,
}

impl AuditReport {
    /// Worst status across all rows
    pub fn overall_status(&self) -> Status {
        results::overall_status(&self.records).unwrap_or(Status::Error)
    }
}

/// Builder for one audit run.
///
/// The run always ends with a written report: load faults and empty pages
/// are turned into synthetic rows instead of errors. Only an invalid
/// configuration or an unwritable report make [`Audit::run`] fail.
pub struct Audit {
    config: AuditConfig,
    html: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl Audit {
    /// Create a new Audit builder with the given configuration
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            html: None,
            output: None,
        }
    }

    /// Audit a saved HTML document instead of a live page
    pub fn with_html_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.html = Some(path.into());
        self
    }

    /// Write the report to this exact path
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        mut self,
        path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        self.config = AuditConfig::from_file(path)?;
        Ok(self)
    }

    /// Run the audit and write its report
    pub async fn run(mut self) -> Result<AuditReport, Box<dyn std::error::Error>> {
        if self.config.url.is_empty() && self.html.is_none() {
            return Err(config::ConfigError::MissingUrl.into());
        }

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.config.webdriver_url = webdriver_url;
            }
        }

        let settings = AuditSettings::from_config(&self.config)?;
        let started = Local::now();
        let date = started.format(utils::DATE_FORMAT).to_string();
        let subject = utils::report_subject(&self.config.url, self.html.as_deref());
        let stem = utils::output_stem(self.config.mode.as_str(), &subject, &started);
        let screenshot_path = self
            .config
            .wants_screenshot()
            .then(|| self.config.output_dir.join(format!("{}.png", stem)));

        ::log::info!("Starting {} audit of {}", self.config.mode, self.config.url);

        let (outcome, screenshot) = match &self.html {
            Some(path) => {
                run_offline(&self.config, &settings, &date, path, screenshot_path.as_deref()).await
            }
            None => run_live(&self.config, &settings, &date, screenshot_path.as_deref()).await,
        };
        let records = finalize(outcome, &date, failure_subject(&self.config));

        let report_path = self.output.clone().unwrap_or_else(|| {
            self.config
                .output_dir
                .join(format!("{}.{}", stem, self.config.report_format.ext()))
        });
        let report_path = report::write_report(
            &report_path,
            self.config.mode,
            self.config.report_format,
            &records,
        )?;

        Ok(AuditReport {
            mode: self.config.mode,
            records,
            report_path,
            screenshot,
        })
    }
}

/// Product label of the ERROR row: the page URL for image audits
fn failure_subject(config: &AuditConfig) -> &str {
    match config.mode {
        AuditMode::Images => &config.url,
        _ => results::EXECUTION_ERROR,
    }
}

type RunOutcome = (Result<Vec<ValidationRecord>, PageLoadFault>, Option<PathBuf>);

async fn run_live(
    config: &AuditConfig,
    settings: &AuditSettings,
    date: &str,
    screenshot_path: Option<&Path>,
) -> RunOutcome {
    let client = match browser::session::connect(&config.webdriver_url).await {
        Ok(client) => client,
        Err(fault) => return (Err(fault), None),
    };

    let outcome = match browser::session::load(&client, config).await {
        Ok(()) => {
            let page = browser::WebDriverPage::new(&client);
            let (records, screenshot) =
                audit_page(&page, config, settings, date, screenshot_path).await;
            (Ok(records), screenshot)
        }
        Err(fault) => (Err(fault), None),
    };

    browser::session::close(client).await;
    outcome
}

async fn run_offline(
    config: &AuditConfig,
    settings: &AuditSettings,
    date: &str,
    path: &Path,
    screenshot_path: Option<&Path>,
) -> RunOutcome {
    let html = match std::fs::read_to_string(path) {
        Ok(html) => html,
        Err(e) => {
            let fault = PageLoadFault::Document {
                path: path.display().to_string(),
                message: e.to_string(),
            };
            return (Err(fault), None);
        }
    };

    ::log::info!("Auditing saved document {}", path.display());
    let doc = scraper::Html::parse_document(&html);
    let page_url = (!config.url.is_empty()).then_some(config.url.as_str());
    let page = HtmlSnapshot::new(&doc, page_url);

    let (records, screenshot) = audit_page(&page, config, settings, date, screenshot_path).await;
    (Ok(records), screenshot)
}

/// Run the configured pipeline against a settled page
pub async fn audit_page<P: PageHandle>(
    page: &P,
    config: &AuditConfig,
    settings: &AuditSettings,
    date: &str,
    screenshot_path: Option<&Path>,
) -> (Vec<ValidationRecord>, Option<PathBuf>) {
    match config.mode {
        AuditMode::Products => {
            let records = audit::products::audit(page, settings, date).await;
            let screenshot = capture(page, screenshot_path).await;
            (records, screenshot)
        }
        AuditMode::Listing => {
            let records = audit::listing::audit(page, settings, date).await;
            let screenshot = capture(page, screenshot_path).await;
            (records, screenshot)
        }
        AuditMode::Images => {
            let counted = audit::images::audit(page, settings, &config.url).await;
            let screenshot = capture(page, screenshot_path).await;
            let shown = screenshot.as_ref().map(|p| p.display().to_string());
            (vec![counted.into_record(date, shown)], screenshot)
        }
    }
}

/// Save a screenshot of the page; failures are logged and yield `None`
async fn capture<P: PageHandle>(page: &P, path: Option<&Path>) -> Option<PathBuf> {
    let path = path?;
    let png = match page.screenshot().await {
        Ok(png) => png,
        Err(e) => {
            ::log::warn!("Screenshot failed: {}", e);
            return None;
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                ::log::warn!("Cannot create {}: {}", parent.display(), e);
                return None;
            }
        }
    }

    match std::fs::write(path, png) {
        Ok(()) => {
            ::log::info!("Saved screenshot to {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            ::log::warn!("Cannot write screenshot {}: {}", path.display(), e);
            None
        }
    }
}
