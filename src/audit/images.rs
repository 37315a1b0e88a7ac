use crate::audit::AuditSettings;
use crate::dom::{DomError, ElementProperty, PageHandle};
use crate::filter::ImageObservation;
use crate::results::{Status, ValidationRecord};

/// Result of counting the vehicle images on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAudit {
    pub url: String,
    /// `<img>` elements looked at
    pub inspected: usize,
    /// Images that passed the vehicle-image filter
    pub count: usize,
    /// First few passing image URLs, in document order
    pub samples: Vec<String>,
}

impl ImageAudit {
    /// PASS when at least one vehicle image is visible
    pub fn into_record(self, date: &str, screenshot: Option<String>) -> ValidationRecord {
        let mut record = if self.count > 0 {
            ValidationRecord::new(date, self.url, Status::Pass, Vec::new()).with_note(format!(
                "{} vehicle images visible out of {} images",
                self.count, self.inspected
            ))
        } else {
            ValidationRecord::new(
                date,
                self.url,
                Status::Fail,
                vec![format!(
                    "no vehicle images visible ({} images inspected)",
                    self.inspected
                )],
            )
        };
        record.vehicle_images = Some(self.count);
        record.sample_images = self.samples;
        record.screenshot = screenshot;
        record
    }
}

/// Count every image on the page that looks like content rather than an icon
pub async fn audit<P: PageHandle>(page: &P, settings: &AuditSettings, page_url: &str) -> ImageAudit {
    let url = page
        .page_url()
        .await
        .unwrap_or_else(|_| page_url.to_string());

    let images = match page.query_all("img").await {
        Ok(images) => images,
        Err(e) => {
            ::log::warn!("Image query failed on {}: {}", url, e);
            Vec::new()
        }
    };

    let inspected = images.len();
    let mut count = 0;
    let mut samples = Vec::new();

    for (index, image) in images.iter().enumerate() {
        match observe(page, image).await {
            Ok(observation) if settings.image_filter.is_vehicle_image(&observation) => {
                count += 1;
                if samples.len() < settings.sample_limit {
                    samples.push(observation.src);
                }
            }
            Ok(observation) => ::log::trace!("Image {} filtered out: {:?}", index, observation),
            Err(e) => ::log::debug!("Image {} could not be evaluated: {}", index, e),
        }
    }

    ::log::info!("Counted {} vehicle images out of {} on {}", count, inspected, url);

    ImageAudit {
        url,
        inspected,
        count,
        samples,
    }
}

async fn observe<P: PageHandle>(page: &P, image: &P::Element) -> Result<ImageObservation, DomError> {
    let visible = page.bool_property(image, ElementProperty::Visible).await?;
    let complete = page.bool_property(image, ElementProperty::Complete).await?;
    let natural_width = page.number_property(image, ElementProperty::NaturalWidth).await?;
    let natural_height = page.number_property(image, ElementProperty::NaturalHeight).await?;

    let current = page.string_property(image, ElementProperty::CurrentSrc).await?;
    let src = if current.trim().is_empty() {
        String::new()
    } else {
        page.resolve_url(current.trim()).await?
    };

    Ok(ImageObservation {
        visible,
        complete,
        natural_width,
        natural_height,
        src,
    })
}
