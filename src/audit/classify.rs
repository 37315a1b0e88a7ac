use crate::audit::extract::{Extracted, ProductImage};
use crate::dom::text;
use crate::results::Status;
use serde::{Deserialize, Serialize};

/// Structured fields of a product card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Name,
    Price,
    Image,
}

/// Everything extracted from one candidate
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: Extracted<String>,
    pub price: Extracted<String>,
    pub image: Extracted<ProductImage>,
}

/// Structured-field policy: FAIL when a required field is absent or
/// unusable, PASS otherwise
pub fn classify(fields: &ProductFields, required: &[FieldKind]) -> (Status, Vec<String>) {
    let mut reasons = Vec::new();

    if required.contains(&FieldKind::Name) {
        if let Err(reason) = &fields.name {
            reasons.push(reason.to_string());
        }
    }

    if required.contains(&FieldKind::Price) {
        if let Err(reason) = &fields.price {
            reasons.push(reason.to_string());
        }
    }

    if required.contains(&FieldKind::Image) {
        match &fields.image {
            Err(reason) => reasons.push(reason.to_string()),
            Ok(image) => reasons.extend(image.problems().iter().map(|p| p.to_string())),
        }
    }

    let status = if reasons.is_empty() {
        Status::Pass
    } else {
        Status::Fail
    };
    (status, reasons)
}

/// Reason attached to listing cards without any currency symbol
pub const NO_CURRENCY_SYMBOL: &str = "no currency symbol in text";

/// Whole-text policy: PASS when the card text shows a currency symbol,
/// CHECK otherwise
pub fn classify_text(card_text: &str, currency_symbols: &str) -> (Status, Vec<String>) {
    if text::contains_any(card_text, currency_symbols) {
        (Status::Pass, Vec::new())
    } else {
        (Status::Check, vec![NO_CURRENCY_SYMBOL.to_string()])
    }
}
