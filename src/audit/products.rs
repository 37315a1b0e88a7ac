use crate::audit::AuditSettings;
use crate::audit::aggregate::aggregate;
use crate::audit::classify::{ProductFields, classify};
use crate::audit::locator::locate;
use crate::dom::PageHandle;
use crate::results::ValidationRecord;
use crate::utils::truncate_chars;

/// Structured audit: one record per product card
pub async fn audit<P: PageHandle>(
    page: &P,
    settings: &AuditSettings,
    date: &str,
) -> Vec<ValidationRecord> {
    let candidates = locate(page, &settings.primary, &settings.fallback).await;
    aggregate(candidates, date, move |candidate| async move {
        inspect(page, settings, date, &candidate).await
    })
    .await
}

async fn inspect<P: PageHandle>(
    page: &P,
    settings: &AuditSettings,
    date: &str,
    candidate: &P::Element,
) -> ValidationRecord {
    let fields = ProductFields {
        name: settings.extractor.name(page, candidate).await,
        price: settings.extractor.price(page, candidate).await,
        image: settings.extractor.image(page, candidate).await,
    };
    let (status, reasons) = classify(&fields, &settings.required);

    let product = fields
        .name
        .as_deref()
        .map(|name| truncate_chars(name, settings.display_len))
        .unwrap_or_default();
    let image = fields
        .image
        .as_ref()
        .ok()
        .and_then(|image| image.src.as_deref())
        .map(|src| truncate_chars(src, settings.image_prefix_len));

    ValidationRecord::new(date, product, status, reasons)
        .with_price(fields.price.ok())
        .with_image(image)
}
