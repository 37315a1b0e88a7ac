use crate::dom::{ElementProperty, PageHandle, text};
use crate::filter::is_absolute_http_url;
use regex::Regex;
use thiserror::Error;

/// Why a field could not be extracted from a candidate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbsentReason {
    #[error("EMPTY_NAME")]
    EmptyName,

    #[error("NAME_READ_ERROR: {0}")]
    NameReadError(String),

    #[error("PRICE_NOT_FOUND")]
    PriceNotFound,

    #[error("IMAGE_TAG_MISSING")]
    ImageTagMissing,

    #[error("INVALID_IMAGE_URL")]
    InvalidImageUrl,

    #[error("BROKEN_IMAGE")]
    BrokenImage,

    #[error("IMAGE_EVAL_ERROR: {0}")]
    ImageEvalError(String),
}

impl AbsentReason {
    /// Stable code, without any fault detail
    pub fn code(&self) -> &'static str {
        match self {
            AbsentReason::EmptyName => "EMPTY_NAME",
            AbsentReason::NameReadError(_) => "NAME_READ_ERROR",
            AbsentReason::PriceNotFound => "PRICE_NOT_FOUND",
            AbsentReason::ImageTagMissing => "IMAGE_TAG_MISSING",
            AbsentReason::InvalidImageUrl => "INVALID_IMAGE_URL",
            AbsentReason::BrokenImage => "BROKEN_IMAGE",
            AbsentReason::ImageEvalError(_) => "IMAGE_EVAL_ERROR",
        }
    }
}

/// A field value, or the reason it is absent
pub type Extracted<T> = Result<T, AbsentReason>;

/// The first image found inside a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    /// The `src` attribute as written in the markup
    pub src: Option<String>,

    /// Rendered natural width, or the fault raised while evaluating it
    pub natural_width: Result<u64, String>,
}

impl ProductImage {
    /// Problems with this image, in report order
    pub fn problems(&self) -> Vec<AbsentReason> {
        let mut problems = Vec::new();

        if !self.src.as_deref().is_some_and(is_absolute_http_url) {
            problems.push(AbsentReason::InvalidImageUrl);
        }

        match &self.natural_width {
            Ok(0) => problems.push(AbsentReason::BrokenImage),
            Ok(_) => {}
            Err(e) => problems.push(AbsentReason::ImageEvalError(e.clone())),
        }

        problems
    }
}

/// Pulls individual fields out of a candidate element.
///
/// Every method catches its own faults and turns them into an
/// [`AbsentReason`]; a failing field never stops the others.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    name_selector: String,
    image_selector: String,
    price_pattern: Regex,
    currency_symbols: String,
}

impl FieldExtractor {
    /// `name_selectors` are unioned into one narrowed query
    pub fn new(
        name_selectors: &[String],
        image_selector: &str,
        price_pattern: &str,
        currency_symbols: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name_selector: name_selectors.join(", "),
            image_selector: image_selector.to_string(),
            price_pattern: Regex::new(price_pattern)?,
            currency_symbols: currency_symbols.to_string(),
        })
    }

    /// Heading or name-class text, falling back to the first line of the card
    pub async fn name<P: PageHandle>(&self, page: &P, candidate: &P::Element) -> Extracted<String> {
        if !self.name_selector.is_empty() {
            match page.query_within(candidate, &self.name_selector).await {
                Ok(found) => {
                    if let Some(heading) = found.first() {
                        match page.text(heading).await {
                            Ok(t) => {
                                let t = text::normalize_whitespace(&t);
                                if !t.is_empty() {
                                    return Ok(t);
                                }
                            }
                            Err(e) => ::log::debug!("Name element unreadable: {}", e),
                        }
                    }
                }
                Err(e) => ::log::debug!("Name query failed: {}", e),
            }
        }

        let full = page
            .text(candidate)
            .await
            .map_err(|e| AbsentReason::NameReadError(e.to_string()))?;

        text::first_non_empty_line(&full)
            .map(str::to_string)
            .ok_or(AbsentReason::EmptyName)
    }

    /// First price-looking text inside the card
    pub async fn price<P: PageHandle>(&self, page: &P, candidate: &P::Element) -> Extracted<String> {
        let full = match page.text(candidate).await {
            Ok(full) => full,
            Err(e) => {
                // Usually the price widget has not rendered yet
                ::log::debug!("Price text unreadable: {}", e);
                return Err(AbsentReason::PriceNotFound);
            }
        };

        self.find_price(&full).ok_or(AbsentReason::PriceNotFound)
    }

    /// First line carrying a currency symbol, narrowed by the price pattern.
    ///
    /// A line holding only the symbol is joined with the line after it, so
    /// `<span>$</span><span>20.000</span>` reads as `$20.000`. A priced line
    /// the pattern does not match (`$ consultar`) is returned whole.
    pub fn find_price(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text::lines(text).collect();

        for (i, line) in lines.iter().enumerate() {
            if let Some(m) = self.price_pattern.find(line) {
                return Some(m.as_str().trim().to_string());
            }
            if !text::contains_any(line, &self.currency_symbols) {
                continue;
            }

            let bare = line.chars().all(|c| self.currency_symbols.contains(c));
            let joined = match lines.get(i + 1) {
                Some(next) if bare && next.starts_with(|c: char| c.is_ascii_digit()) => {
                    format!("{}{}", line, next)
                }
                Some(next) if bare => format!("{} {}", line, next),
                _ => line.to_string(),
            };
            return Some(
                self.price_pattern
                    .find(&joined)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or(joined),
            );
        }

        None
    }

    /// The first image inside the card, with its source and natural width
    pub async fn image<P: PageHandle>(
        &self,
        page: &P,
        candidate: &P::Element,
    ) -> Extracted<ProductImage> {
        let found = page
            .query_within(candidate, &self.image_selector)
            .await
            .map_err(|e| AbsentReason::ImageEvalError(e.to_string()))?;
        let image = found.first().ok_or(AbsentReason::ImageTagMissing)?;

        let src = match page.attr(image, "src").await {
            Ok(src) => src.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            Err(e) => {
                ::log::debug!("Image src unreadable: {}", e);
                None
            }
        };

        let natural_width = page
            .number_property(image, ElementProperty::NaturalWidth)
            .await
            .map_err(|e| e.to_string());

        Ok(ProductImage { src, natural_width })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_problems_co_occur() {
        let image = ProductImage {
            src: Some("/img/clio.jpg".to_string()),
            natural_width: Ok(0),
        };
        assert_eq!(
            image.problems(),
            vec![AbsentReason::InvalidImageUrl, AbsentReason::BrokenImage]
        );
    }

    #[test]
    fn test_image_problems() {
        let ok = ProductImage {
            src: Some("https://cdn.example.com/clio.jpg".to_string()),
            natural_width: Ok(640),
        };
        assert!(ok.problems().is_empty());

        let missing_src = ProductImage {
            src: None,
            natural_width: Ok(640),
        };
        assert_eq!(missing_src.problems(), vec![AbsentReason::InvalidImageUrl]);

        let unevaluated = ProductImage {
            src: Some("https://cdn.example.com/clio.jpg".to_string()),
            natural_width: Err("stale element".to_string()),
        };
        assert_eq!(
            unevaluated.problems(),
            vec![AbsentReason::ImageEvalError("stale element".to_string())]
        );
    }

    #[test]
    fn test_reason_display_and_code() {
        assert_eq!(AbsentReason::PriceNotFound.to_string(), "PRICE_NOT_FOUND");
        let read = AbsentReason::NameReadError("detached".to_string());
        assert_eq!(read.to_string(), "NAME_READ_ERROR: detached");
        assert_eq!(read.code(), "NAME_READ_ERROR");
    }

    #[test]
    fn test_invalid_price_pattern() {
        assert!(FieldExtractor::new(&[], "img", "[$", "$").is_err());
    }

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(&[], "img", r"[$€£]\s*\d[\d.,]*", "$€£").unwrap()
    }

    #[test]
    fn test_find_price() {
        let e = extractor();
        assert_eq!(e.find_price("Clio\n$ 20.000 final").as_deref(), Some("$ 20.000"));
        assert_eq!(e.find_price("Clio\n$\n20.000").as_deref(), Some("$20.000"));
        assert_eq!(e.find_price("Clio\n€\n").as_deref(), Some("€"));
        assert_eq!(e.find_price("Precio: $ consultar").as_deref(), Some("Precio: $ consultar"));
        assert_eq!(e.find_price("$\nconsultar").as_deref(), Some("$ consultar"));
        assert_eq!(e.find_price("Clio\nSin precio"), None);
    }
}
