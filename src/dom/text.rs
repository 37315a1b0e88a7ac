//! Helpers for the loosely structured text that product cards render.

/// Iterates over the trimmed, non-empty lines of `text`
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// First non-empty line of `text`, trimmed
pub fn first_non_empty_line(text: &str) -> Option<&str> {
    lines(text).next()
}

/// Collapses every run of whitespace into a single space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Joins the lines of a card's text into one display line
///
/// Line breaks become single spaces and blank lines are dropped.
pub fn flatten_lines(text: &str) -> String {
    lines(text).collect::<Vec<_>>().join(" ")
}

/// Whether `text` contains any of the characters in `symbols`
pub fn contains_any(text: &str, symbols: &str) -> bool {
    text.chars().any(|c| symbols.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_empty_line() {
        assert_eq!(first_non_empty_line("Clio\n$20.000"), Some("Clio"));
        assert_eq!(first_non_empty_line("\n   \n  Kwid Zen  \nmore"), Some("Kwid Zen"));
        assert_eq!(first_non_empty_line(""), None);
        assert_eq!(first_non_empty_line(" \n\t\n"), None);
    }

    #[test]
    fn test_flatten_lines() {
        assert_eq!(flatten_lines("Clio\n\n  $20.000 \nVer"), "Clio $20.000 Ver");
        assert_eq!(flatten_lines(""), "");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Renault \n  Clio\t5p "), "Renault Clio 5p");
    }

    #[test]
    fn test_contains_any() {
        assert!(contains_any("Desde $ 20.000", "$€£"));
        assert!(contains_any("£9", "$€£"));
        assert!(!contains_any("Consultar precio", "$€£"));
        assert!(!contains_any("$1", ""));
    }
}
