use crate::dom::{DomError, ElementProperty, PageHandle};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use serde_json::Value;

impl From<CmdError> for DomError {
    fn from(error: CmdError) -> Self {
        DomError::Driver(error.to_string())
    }
}

/// A page loaded in a live WebDriver session
pub struct WebDriverPage<'c> {
    client: &'c Client,
}

impl<'c> WebDriverPage<'c> {
    pub fn new(client: &'c Client) -> Self {
        Self { client }
    }
}

impl PageHandle for WebDriverPage<'_> {
    type Element = Element;

    async fn query_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
        Ok(self.client.find_all(Locator::Css(selector)).await?)
    }

    async fn query_within(&self, element: &Element, selector: &str) -> Result<Vec<Element>, DomError> {
        Ok(element.find_all(Locator::Css(selector)).await?)
    }

    async fn text(&self, element: &Element) -> Result<String, DomError> {
        Ok(element.text().await?)
    }

    async fn attr(&self, element: &Element, name: &str) -> Result<Option<String>, DomError> {
        Ok(element.attr(name).await?)
    }

    async fn property(&self, element: &Element, property: ElementProperty) -> Result<Value, DomError> {
        if property == ElementProperty::Visible {
            return Ok(Value::Bool(element.is_displayed().await?));
        }

        let handle = serde_json::to_value(element)
            .map_err(|e| DomError::Driver(format!("cannot pass element to script: {}", e)))?;
        let script = format!("return arguments[0].{};", property.name());
        Ok(self.client.execute(&script, vec![handle]).await?)
    }

    async fn resolve_url(&self, src: &str) -> Result<String, DomError> {
        let resolved = self
            .client
            .execute(
                "return new URL(arguments[0], document.baseURI).href;",
                vec![Value::String(src.to_string())],
            )
            .await?;

        match resolved {
            Value::String(url) => Ok(url),
            other => Err(DomError::Unexpected {
                property: "href",
                value: other.to_string(),
            }),
        }
    }

    async fn page_url(&self) -> Result<String, DomError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DomError> {
        Ok(self.client.screenshot().await?)
    }
}
