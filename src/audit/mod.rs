//! The extraction-and-validation pipeline.
//!
//! Every mode follows the same shape: locate candidates, extract fields
//! with fallbacks, classify, aggregate. Nothing in here talks to a browser
//! directly; it only sees a [`PageHandle`](crate::dom::PageHandle).

pub mod aggregate;
pub mod classify;
pub mod extract;
pub mod images;
pub mod listing;
pub mod locator;
pub mod products;

#[cfg(test)]
mod tests;

use crate::config::{AuditConfig, ConfigError};
use crate::filter::ImageFilter;
use classify::FieldKind;
use extract::FieldExtractor;
use locator::Strategy;

/// Everything the pipelines need, compiled from an [`AuditConfig`]
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub primary: Strategy,
    pub fallback: Strategy,
    pub extractor: FieldExtractor,
    pub required: Vec<FieldKind>,
    pub currency_symbols: String,
    pub display_len: usize,
    pub image_prefix_len: usize,
    pub image_filter: ImageFilter,
    pub sample_limit: usize,
}

impl AuditSettings {
    pub fn from_config(config: &AuditConfig) -> Result<Self, ConfigError> {
        let extractor = FieldExtractor::new(
            &config.name_selectors,
            &config.image_selector,
            &config.price_pattern,
            &config.currency_symbols,
        )?;

        Ok(Self {
            primary: config.candidates.primary.clone(),
            fallback: config.candidates.fallback.clone(),
            extractor,
            required: config.required_fields.clone(),
            currency_symbols: config.currency_symbols.clone(),
            display_len: config.display_len,
            image_prefix_len: config.image_prefix_len,
            image_filter: config.image_filter,
            sample_limit: config.sample_limit,
        })
    }
}
