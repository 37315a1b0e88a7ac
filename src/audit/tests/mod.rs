mod image_audit_tests;

use crate::audit::AuditSettings;
use crate::config::AuditConfig;
use crate::dom::{DomError, ElementProperty, HtmlSnapshot, PageHandle};
use scraper::ElementRef;
use serde_json::Value;

pub const DATE: &str = "2026-10-19 10:00:00";
pub const PAGE_URL: &str = "https://store.example.com/";

pub fn settings() -> AuditSettings {
    AuditSettings::from_config(&AuditConfig::new(PAGE_URL)).unwrap()
}

/// Wraps a snapshot and fails chosen reads, to exercise fault isolation
pub struct FlakyPage<'a> {
    pub inner: HtmlSnapshot<'a>,
    /// Text reads fail for elements carrying this class
    pub text_fails_for: Option<&'static str>,
    /// Queries with exactly this selector fail
    pub query_fails_for: Option<String>,
    /// Property reads fail for this property
    pub property_fails_for: Option<ElementProperty>,
}

impl<'a> FlakyPage<'a> {
    pub fn new(inner: HtmlSnapshot<'a>) -> Self {
        Self {
            inner,
            text_fails_for: None,
            query_fails_for: None,
            property_fails_for: None,
        }
    }

    fn has_class(element: &ElementRef, class: &str) -> bool {
        element.value().classes().any(|c| c == class)
    }
}

impl<'a> PageHandle for FlakyPage<'a> {
    type Element = ElementRef<'a>;

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef<'a>>, DomError> {
        if self.query_fails_for.as_deref() == Some(selector) {
            return Err(DomError::Driver("query blew up".to_string()));
        }
        self.inner.query_all(selector).await
    }

    async fn query_within(
        &self,
        element: &ElementRef<'a>,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, DomError> {
        if self.query_fails_for.as_deref() == Some(selector) {
            return Err(DomError::Driver("query blew up".to_string()));
        }
        self.inner.query_within(element, selector).await
    }

    async fn text(&self, element: &ElementRef<'a>) -> Result<String, DomError> {
        if let Some(class) = self.text_fails_for {
            if Self::has_class(element, class) {
                return Err(DomError::Driver("stale element reference".to_string()));
            }
        }
        self.inner.text(element).await
    }

    async fn attr(&self, element: &ElementRef<'a>, name: &str) -> Result<Option<String>, DomError> {
        self.inner.attr(element, name).await
    }

    async fn property(
        &self,
        element: &ElementRef<'a>,
        property: ElementProperty,
    ) -> Result<Value, DomError> {
        if self.property_fails_for == Some(property) {
            return Err(DomError::Driver("javascript error".to_string()));
        }
        self.inner.property(element, property).await
    }

    async fn resolve_url(&self, src: &str) -> Result<String, DomError> {
        self.inner.resolve_url(src).await
    }

    async fn page_url(&self) -> Result<String, DomError> {
        self.inner.page_url().await
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DomError> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}
