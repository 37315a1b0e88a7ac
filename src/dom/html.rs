use crate::dom::{DomError, ElementProperty, PageHandle};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

/// A static HTML document queried as if it were a rendered page.
///
/// Live properties are approximated from markup:
/// - visible unless the element or an ancestor is `hidden`, `display:none`
///   or `visibility:hidden`
/// - natural dimensions come from `data-natural-width`/`width` (and height);
///   without either the property is unavailable
/// - `complete` whenever the element has a source
/// - element text is its text nodes, trimmed, one per line
pub struct HtmlSnapshot<'a> {
    doc: &'a Html,
    page_url: Option<Url>,
    base: Option<Url>,
}

impl<'a> HtmlSnapshot<'a> {
    /// Wrap a parsed document; `page_url` is where it was loaded from
    pub fn new(doc: &'a Html, page_url: Option<&str>) -> Self {
        let page_url = page_url.and_then(|u| Url::parse(u).ok());
        let base = base_href(doc)
            .and_then(|href| match &page_url {
                Some(page) => page.join(&href).ok(),
                None => Url::parse(&href).ok(),
            })
            .or_else(|| page_url.clone());

        Self {
            doc,
            page_url,
            base,
        }
    }
}

impl<'a> PageHandle for HtmlSnapshot<'a> {
    type Element = ElementRef<'a>;

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef<'a>>, DomError> {
        let selector = parse_selector(selector)?;
        Ok(self.doc.select(&selector).collect())
    }

    async fn query_within(
        &self,
        element: &ElementRef<'a>,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, DomError> {
        let selector = parse_selector(selector)?;
        Ok(element
            .select(&selector)
            .filter(|found| found.id() != element.id())
            .collect())
    }

    async fn text(&self, element: &ElementRef<'a>) -> Result<String, DomError> {
        Ok(element_text(*element))
    }

    async fn attr(&self, element: &ElementRef<'a>, name: &str) -> Result<Option<String>, DomError> {
        Ok(element.value().attr(name).map(str::to_string))
    }

    async fn property(
        &self,
        element: &ElementRef<'a>,
        property: ElementProperty,
    ) -> Result<Value, DomError> {
        match property {
            ElementProperty::Visible => Ok(Value::Bool(is_visible(*element))),
            ElementProperty::Complete => Ok(Value::Bool(!current_src(*element).is_empty())),
            ElementProperty::CurrentSrc => Ok(Value::String(current_src(*element))),
            ElementProperty::NaturalWidth => dimension(*element, "data-natural-width", "width")
                .map(Value::from)
                .ok_or(DomError::Unavailable("naturalWidth")),
            ElementProperty::NaturalHeight => dimension(*element, "data-natural-height", "height")
                .map(Value::from)
                .ok_or(DomError::Unavailable("naturalHeight")),
        }
    }

    async fn resolve_url(&self, src: &str) -> Result<String, DomError> {
        let resolved = match &self.base {
            Some(base) => base.join(src),
            None => Url::parse(src),
        };
        resolved
            .map(|u| u.to_string())
            .map_err(|e| DomError::Driver(format!("cannot resolve `{}`: {}", src, e)))
    }

    async fn page_url(&self) -> Result<String, DomError> {
        self.page_url
            .as_ref()
            .map(|u| u.to_string())
            .ok_or(DomError::Unavailable("page URL"))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DomError> {
        Err(DomError::Unavailable("screenshot of a static document"))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DomError> {
    Selector::parse(selector).map_err(|e| DomError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn base_href(doc: &Html) -> Option<String> {
    let selector = Selector::parse("base[href]").ok()?;
    doc.select(&selector)
        .next()
        .and_then(|base| base.value().attr("href"))
        .map(str::to_string)
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_hidden(element: ElementRef) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() {
        return true;
    }

    match value.attr("style") {
        Some(style) => {
            let style = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            style.contains("display:none") || style.contains("visibility:hidden")
        }
        None => false,
    }
}

fn is_visible(element: ElementRef) -> bool {
    !is_hidden(element) && !element.ancestors().filter_map(ElementRef::wrap).any(is_hidden)
}

fn dimension(element: ElementRef, data_attr: &str, attr: &str) -> Option<u64> {
    let value = element.value();
    value
        .attr(data_attr)
        .or_else(|| value.attr(attr))
        .and_then(|v| v.trim().trim_end_matches("px").trim().parse().ok())
}

/// `src`, or the first `srcset` candidate when `src` is empty
fn current_src(element: ElementRef) -> String {
    let value = element.value();
    if let Some(src) = value.attr("src").map(str::trim).filter(|s| !s.is_empty()) {
        return src.to_string();
    }

    value
        .attr("srcset")
        .and_then(|set| set.split(',').next())
        .and_then(|candidate| candidate.split_whitespace().next())
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><base href="/media/"></head><body>
          <div class="card">
            <h3>Clio</h3>
            <span class="price">$20.000</span>
            <img id="a" src="clio.jpg" width="300" height="200">
          </div>
          <div style="display: none"><img id="b" srcset="kwid.jpg 1x, kwid@2x.jpg 2x"></div>
          <img id="c" hidden src="">
        </body></html>
    "#;

    #[tokio::test]
    async fn test_text_one_line_per_node() {
        let doc = Html::parse_document(PAGE);
        let page = HtmlSnapshot::new(&doc, Some("https://store.example.com/cars/"));
        let cards = page.query_all("div.card").await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(page.text(&cards[0]).await.unwrap(), "Clio\n$20.000");
    }

    #[tokio::test]
    async fn test_image_properties() {
        let doc = Html::parse_document(PAGE);
        let page = HtmlSnapshot::new(&doc, Some("https://store.example.com/cars/"));

        let a = &page.query_all("#a").await.unwrap()[0];
        assert_eq!(page.number_property(a, ElementProperty::NaturalWidth).await.unwrap(), 300);
        assert_eq!(page.number_property(a, ElementProperty::NaturalHeight).await.unwrap(), 200);
        assert!(page.bool_property(a, ElementProperty::Visible).await.unwrap());
        assert!(page.bool_property(a, ElementProperty::Complete).await.unwrap());

        let b = &page.query_all("#b").await.unwrap()[0];
        assert!(!page.bool_property(b, ElementProperty::Visible).await.unwrap());
        assert_eq!(
            page.string_property(b, ElementProperty::CurrentSrc).await.unwrap(),
            "kwid.jpg"
        );
        assert!(page.number_property(b, ElementProperty::NaturalWidth).await.is_err());

        let c = &page.query_all("#c").await.unwrap()[0];
        assert!(!page.bool_property(c, ElementProperty::Visible).await.unwrap());
        assert!(!page.bool_property(c, ElementProperty::Complete).await.unwrap());
    }

    #[tokio::test]
    async fn test_resolve_against_base_href() {
        let doc = Html::parse_document(PAGE);
        let page = HtmlSnapshot::new(&doc, Some("https://store.example.com/cars/"));
        assert_eq!(
            page.resolve_url("clio.jpg").await.unwrap(),
            "https://store.example.com/media/clio.jpg"
        );
        assert_eq!(
            page.resolve_url("https://cdn.example.com/x.jpg").await.unwrap(),
            "https://cdn.example.com/x.jpg"
        );
    }

    #[tokio::test]
    async fn test_relative_without_base_is_a_fault() {
        let doc = Html::parse_document("<img src='x.jpg'>");
        let page = HtmlSnapshot::new(&doc, None);
        assert!(page.resolve_url("x.jpg").await.is_err());
        assert!(page.page_url().await.is_err());
        assert!(page.screenshot().await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_selector() {
        let doc = Html::parse_document(PAGE);
        let page = HtmlSnapshot::new(&doc, None);
        assert!(matches!(
            page.query_all("div[").await,
            Err(DomError::Selector { .. })
        ));
    }
}
