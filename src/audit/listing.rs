use crate::audit::AuditSettings;
use crate::audit::aggregate::aggregate;
use crate::audit::classify::classify_text;
use crate::audit::extract::AbsentReason;
use crate::audit::locator::locate;
use crate::dom::{PageHandle, text};
use crate::results::{Status, ValidationRecord};
use crate::utils::truncate_chars;

/// Note on listing cards that show a price
pub const ITEM_CAPTURED: &str = "item captured";

/// Whole-text audit: one record per card, judged on its flattened text
pub async fn audit<P: PageHandle>(
    page: &P,
    settings: &AuditSettings,
    date: &str,
) -> Vec<ValidationRecord> {
    let candidates = locate(page, &settings.primary, &settings.fallback).await;
    aggregate(candidates, date, move |candidate| async move {
        match page.text(&candidate).await {
            Ok(card) => {
                let flat = text::flatten_lines(&card);
                let (status, reasons) = classify_text(&flat, &settings.currency_symbols);
                let record = ValidationRecord::new(
                    date,
                    truncate_chars(&flat, settings.display_len),
                    status,
                    reasons,
                );
                if status == Status::Pass {
                    record.with_note(ITEM_CAPTURED)
                } else {
                    record
                }
            }
            Err(e) => ValidationRecord::new(
                date,
                String::new(),
                Status::Check,
                vec![AbsentReason::NameReadError(e.to_string()).to_string()],
            ),
        }
    })
    .await
}
