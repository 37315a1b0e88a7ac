pub mod html;
pub mod text;

pub use html::HtmlSnapshot;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading a rendered page
#[derive(Debug, Error)]
pub enum DomError {
    /// The selector could not be parsed
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    /// The page backend could not answer a query or a read
    #[error("{0}")]
    Driver(String),

    /// The property is not available for this element or backend
    #[error("{0} is not available")]
    Unavailable(&'static str),

    /// The property came back with a value of the wrong shape
    #[error("unexpected value for {property}: {value}")]
    Unexpected { property: &'static str, value: String },
}

/// Live element properties the auditors ask the page about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementProperty {
    NaturalWidth,
    NaturalHeight,
    Complete,
    CurrentSrc,
    Visible,
}

impl ElementProperty {
    /// DOM name of the property
    pub fn name(&self) -> &'static str {
        match self {
            ElementProperty::NaturalWidth => "naturalWidth",
            ElementProperty::NaturalHeight => "naturalHeight",
            ElementProperty::Complete => "complete",
            ElementProperty::CurrentSrc => "currentSrc",
            ElementProperty::Visible => "visible",
        }
    }
}

/// A loaded, settled page that can be queried.
///
/// Implemented by the WebDriver session for live audits and by
/// [`HtmlSnapshot`] for saved documents. The auditors never construct or
/// close a page themselves.
#[allow(async_fn_in_trait)]
pub trait PageHandle {
    /// Handle to one element of the page
    type Element;

    /// All elements matching a CSS selector, in document order
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, DomError>;

    /// All descendants of `element` matching a CSS selector
    async fn query_within(
        &self,
        element: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, DomError>;

    /// Rendered text of the element, one line per block of text
    async fn text(&self, element: &Self::Element) -> Result<String, DomError>;

    /// Attribute value, `None` when the attribute is not set
    async fn attr(&self, element: &Self::Element, name: &str) -> Result<Option<String>, DomError>;

    /// Evaluate a live property of the element
    async fn property(
        &self,
        element: &Self::Element,
        property: ElementProperty,
    ) -> Result<Value, DomError>;

    /// Resolve a (possibly relative) URL against the page's base URI
    async fn resolve_url(&self, src: &str) -> Result<String, DomError>;

    /// URL of the loaded page
    async fn page_url(&self) -> Result<String, DomError>;

    /// PNG capture of the whole page
    async fn screenshot(&self) -> Result<Vec<u8>, DomError>;

    /// Evaluate a numeric property
    async fn number_property(
        &self,
        element: &Self::Element,
        property: ElementProperty,
    ) -> Result<u64, DomError> {
        let value = self.property(element, property).await?;
        as_number(&value).ok_or_else(|| DomError::Unexpected {
            property: property.name(),
            value: value.to_string(),
        })
    }

    /// Evaluate a boolean property
    async fn bool_property(
        &self,
        element: &Self::Element,
        property: ElementProperty,
    ) -> Result<bool, DomError> {
        match self.property(element, property).await? {
            Value::Bool(flag) => Ok(flag),
            other => Err(DomError::Unexpected {
                property: property.name(),
                value: other.to_string(),
            }),
        }
    }

    /// Evaluate a string property; `null` reads as an empty string
    async fn string_property(
        &self,
        element: &Self::Element,
        property: ElementProperty,
    ) -> Result<String, DomError> {
        match self.property(element, property).await? {
            Value::String(s) => Ok(s),
            Value::Null => Ok(String::new()),
            other => Err(DomError::Unexpected {
                property: property.name(),
                value: other.to_string(),
            }),
        }
    }
}

/// Browsers report image dimensions as integers, but some drivers hand them
/// back as floats or strings.
fn as_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(150)), Some(150));
        assert_eq!(as_number(&json!(149.0)), Some(149));
        assert_eq!(as_number(&json!("300")), Some(300));
        assert_eq!(as_number(&json!(-1.0)), None);
        assert_eq!(as_number(&json!(null)), None);
        assert_eq!(as_number(&json!(true)), None);
    }
}
