use serde::{Deserialize, Serialize};
use url::Url;

/// What the page reported for one `<img>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageObservation {
    pub visible: bool,
    pub complete: bool,
    pub natural_width: u64,
    pub natural_height: u64,
    /// Resolved absolute source, empty when the image has none
    pub src: String,
}

/// Size thresholds separating content images from icons and sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFilter {
    /// Minimum natural width in pixels
    #[serde(default = "default_min_width")]
    pub min_width: u64,

    /// Minimum natural height in pixels
    #[serde(default = "default_min_height")]
    pub min_height: u64,
}

fn default_min_width() -> u64 {
    150
}

fn default_min_height() -> u64 {
    100
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            min_height: default_min_height(),
        }
    }
}

impl ImageFilter {
    /// A vehicle image is visible, fully loaded, large enough and has a source
    pub fn is_vehicle_image(&self, image: &ImageObservation) -> bool {
        image.visible
            && image.complete
            && image.natural_width >= self.min_width
            && image.natural_height >= self.min_height
            && !image.src.is_empty()
    }
}

/// Whether `src` is an absolute http(s) URL
pub fn is_absolute_http_url(src: &str) -> bool {
    match Url::parse(src.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u64, height: u64, visible: bool) -> ImageObservation {
        ImageObservation {
            visible,
            complete: true,
            natural_width: width,
            natural_height: height,
            src: "https://x/y.jpg".to_string(),
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let filter = ImageFilter::default();
        assert!(filter.is_vehicle_image(&image(150, 100, true)));
        assert!(!filter.is_vehicle_image(&image(149, 100, true)));
        assert!(!filter.is_vehicle_image(&image(150, 99, true)));
    }

    #[test]
    fn test_hidden_incomplete_or_sourceless_excluded() {
        let filter = ImageFilter::default();
        assert!(!filter.is_vehicle_image(&image(300, 150, false)));

        let loading = ImageObservation {
            complete: false,
            ..image(300, 150, true)
        };
        assert!(!filter.is_vehicle_image(&loading));

        let sourceless = ImageObservation {
            src: String::new(),
            ..image(300, 150, true)
        };
        assert!(!filter.is_vehicle_image(&sourceless));
    }

    #[test]
    fn test_custom_thresholds_from_json() {
        let filter: ImageFilter = serde_json::from_str(r#"{"min_width": 400}"#).unwrap();
        assert_eq!(filter.min_width, 400);
        assert_eq!(filter.min_height, 100);
        assert!(!filter.is_vehicle_image(&image(300, 150, true)));
    }

    #[test]
    fn test_absolute_http_url() {
        assert!(is_absolute_http_url("https://x/y.jpg"));
        assert!(is_absolute_http_url("http://cdn.example.com/a.png"));
        assert!(!is_absolute_http_url("/img/clio.jpg"));
        assert!(!is_absolute_http_url("clio.jpg"));
        assert!(!is_absolute_http_url("data:image/gif;base64,R0lGOD"));
        assert!(!is_absolute_http_url(""));
    }
}
