use crate::dom::{DomError, PageHandle, text};
use serde::{Deserialize, Serialize};

/// A named way of finding product cards on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    /// Name used in logs
    pub name: String,

    /// CSS selectors, queried as one union
    pub selectors: Vec<String>,

    /// Keep only matches whose text contains this string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,

    /// Keep only matches whose text contains any of these characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_any: Option<String>,
}

impl Strategy {
    pub fn css(name: &str, selectors: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            contains: None,
            contains_any: None,
        }
    }

    pub fn containing(name: &str, selectors: &[&str], needle: &str) -> Self {
        Self {
            contains: Some(needle.to_string()),
            ..Self::css(name, selectors)
        }
    }

    /// Matches whose text carries at least one of `symbols`
    pub fn containing_any(name: &str, selectors: &[&str], symbols: &str) -> Self {
        Self {
            contains_any: Some(symbols.to_string()),
            ..Self::css(name, selectors)
        }
    }

    fn keeps(&self, t: &str) -> bool {
        self.contains.as_deref().is_none_or(|needle| t.contains(needle))
            && self
                .contains_any
                .as_deref()
                .is_none_or(|symbols| text::contains_any(t, symbols))
    }

    /// Matches for this strategy, in document order
    pub async fn apply<P: PageHandle>(&self, page: &P) -> Result<Vec<P::Element>, DomError> {
        if self.selectors.is_empty() {
            return Ok(Vec::new());
        }

        let matches = page.query_all(&self.selectors.join(", ")).await?;
        if self.contains.is_none() && self.contains_any.is_none() {
            return Ok(matches);
        }

        let mut kept = Vec::with_capacity(matches.len());
        for element in matches {
            match page.text(&element).await {
                Ok(t) if self.keeps(&t) => kept.push(element),
                Ok(_) => {}
                Err(e) => ::log::debug!("Strategy '{}' skipped an unreadable match: {}", self.name, e),
            }
        }
        Ok(kept)
    }
}

/// Candidate cards: the primary strategy, or the fallback when it finds nothing.
///
/// A strategy that faults counts as finding nothing. There is no tier
/// after the fallback, and an empty result is a valid outcome.
pub async fn locate<P: PageHandle>(
    page: &P,
    primary: &Strategy,
    fallback: &Strategy,
) -> Vec<P::Element> {
    for (tier, strategy) in [("primary", primary), ("fallback", fallback)] {
        match strategy.apply(page).await {
            Ok(found) if !found.is_empty() => {
                ::log::info!(
                    "Located {} candidates with {} strategy '{}'",
                    found.len(),
                    tier,
                    strategy.name
                );
                return found;
            }
            Ok(_) => ::log::info!("{} strategy '{}' matched nothing", tier, strategy.name),
            Err(e) => ::log::warn!("{} strategy '{}' failed: {}", tier, strategy.name, e),
        }
    }

    Vec::new()
}
