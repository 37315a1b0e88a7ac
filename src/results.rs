use crate::config::AuditMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of validating one observation.
///
/// Ordered by severity, so the worst status of a run is its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Check,
    Fail,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Check => "CHECK",
            Status::Fail => "FAIL",
            Status::Error => "ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the audit report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRecord {
    /// When the record was taken
    pub date: String,

    /// Product name, card text or page URL, depending on the mode
    pub product: String,

    /// Extracted price text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Prefix of the product image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Number of vehicle images counted on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_images: Option<usize>,

    /// Where the page screenshot was saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,

    /// A few of the counted image URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_images: Vec<String>,

    pub status: Status,

    /// Failure reasons in extraction order
    #[serde(default)]
    pub reasons: Vec<String>,

    /// Informational details for records without failure reasons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Product label of the synthetic record for a run that never loaded
pub const EXECUTION_ERROR: &str = "EXECUTION ERROR";

/// Product label of the synthetic record for a run without candidates
pub const NO_PRODUCTS: &str = "ERROR";

/// Reason carried by the synthetic record for a run without candidates
pub const NO_ELEMENTS_FOUND: &str = "no elements found";

impl ValidationRecord {
    /// Create a record with no optional fields set
    pub fn new(date: &str, product: String, status: Status, reasons: Vec<String>) -> Self {
        Self {
            date: date.to_string(),
            product,
            price: None,
            image: None,
            vehicle_images: None,
            screenshot: None,
            sample_images: Vec::new(),
            status,
            reasons,
            note: None,
        }
    }

    /// Synthetic record standing in for a run that located nothing
    pub fn no_candidates(date: &str) -> Self {
        Self::new(
            date,
            NO_PRODUCTS.to_string(),
            Status::Fail,
            vec![NO_ELEMENTS_FOUND.to_string()],
        )
    }

    /// Synthetic record standing in for a run whose page never loaded
    pub fn load_failed(date: &str, subject: &str, fault: &str) -> Self {
        Self::new(
            date,
            subject.to_string(),
            Status::Error,
            vec![fault.to_string()],
        )
    }

    pub fn with_price(mut self, price: Option<String>) -> Self {
        self.price = price;
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The Details column: failure reasons, or the note when there are none
    pub fn details(&self) -> String {
        if self.reasons.is_empty() {
            self.note.clone().unwrap_or_default()
        } else {
            self.reasons.join("; ")
        }
    }

    /// Flat column → value mapping for the given mode, in column order
    pub fn to_row(&self, mode: AuditMode) -> Vec<(&'static str, String)> {
        let columns = columns(mode);
        match mode {
            AuditMode::Products | AuditMode::Listing => vec![
                (columns[0], self.date.clone()),
                (columns[1], self.product.clone()),
                (columns[2], self.price.clone().unwrap_or_default()),
                (columns[3], self.image.clone().unwrap_or_default()),
                (columns[4], self.status.to_string()),
                (columns[5], self.details()),
            ],
            AuditMode::Images => vec![
                (columns[0], self.date.clone()),
                (columns[1], self.product.clone()),
                (
                    columns[2],
                    self.vehicle_images.map(|n| n.to_string()).unwrap_or_default(),
                ),
                (columns[3], self.status.to_string()),
                (columns[4], self.details()),
                (columns[5], self.screenshot.clone().unwrap_or_default()),
                (columns[6], self.sample_images.join(";")),
            ],
        }
    }
}

/// Report header for the given mode
pub fn columns(mode: AuditMode) -> &'static [&'static str] {
    match mode {
        AuditMode::Products | AuditMode::Listing => {
            &["Date", "Product", "Price", "Image", "Status", "Details"]
        }
        AuditMode::Images => &[
            "Date",
            "URL",
            "VisibleVehicleImageCount",
            "Status",
            "Details",
            "ScreenshotPath",
            "SampleImageURLs",
        ],
    }
}

/// Worst status across all records; `None` for an empty slice
pub fn overall_status(records: &[ValidationRecord]) -> Option<Status> {
    records.iter().map(|r| r.status).max()
}
