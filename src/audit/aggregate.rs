use crate::results::ValidationRecord;
use std::future::Future;
use thiserror::Error;

/// A fault that kept the page from ever being audited
#[derive(Debug, Error)]
pub enum PageLoadFault {
    #[error("could not connect to WebDriver at {url}: {message}")]
    Driver { url: String, message: String },

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("timed out after {secs}s loading {url}")]
    Timeout { url: String, secs: u64 },

    #[error("could not read document {path}: {message}")]
    Document { path: String, message: String },
}

/// Classify every candidate in discovery order.
///
/// Never returns an empty sequence: without candidates the result is the
/// single synthetic "no elements found" record.
pub async fn aggregate<C, F, Fut>(
    candidates: Vec<C>,
    date: &str,
    mut classify: F,
) -> Vec<ValidationRecord>
where
    F: FnMut(C) -> Fut,
    Fut: Future<Output = ValidationRecord>,
{
    if candidates.is_empty() {
        ::log::warn!("No candidates located, emitting summary record");
        return vec![ValidationRecord::no_candidates(date)];
    }

    let mut records = Vec::with_capacity(candidates.len());
    for (index, candidate) in candidates.into_iter().enumerate() {
        let record = classify(candidate).await;
        ::log::debug!(
            "Candidate {}: {} {}",
            index + 1,
            record.status,
            record.details()
        );
        records.push(record);
    }
    records
}

/// Records for the whole run.
///
/// A load fault replaces every per-candidate record with one ERROR record
/// carrying the fault description.
pub fn finalize(
    outcome: Result<Vec<ValidationRecord>, PageLoadFault>,
    date: &str,
    subject: &str,
) -> Vec<ValidationRecord> {
    match outcome {
        Ok(records) if !records.is_empty() => records,
        Ok(_) => vec![ValidationRecord::no_candidates(date)],
        Err(fault) => {
            ::log::error!("Run failed before extraction: {}", fault);
            vec![ValidationRecord::load_failed(date, subject, &fault.to_string())]
        }
    }
}
