use super::{DATE, FlakyPage, PAGE_URL, settings};
use crate::audit::images;
use crate::config::{AuditConfig, AuditMode};
use crate::dom::{ElementProperty, HtmlSnapshot};
use crate::results::Status;
use scraper::Html;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_vehicle_image_thresholds() {
        let doc = Html::parse_document(
            r#"<body>
                 <img src="https://x/y.jpg" width="150" height="100">
                 <img src="https://x/narrow.jpg" width="149" height="100">
                 <img src="https://x/hidden.jpg" width="300" height="150" style="display:none">
                 <img src="/sprites/icon.png" width="24" height="24">
               </body>"#,
        );
        let page = HtmlSnapshot::new(&doc, Some(PAGE_URL));

        let audit = images::audit(&page, &settings(), PAGE_URL).await;
        assert_eq!(audit.inspected, 4);
        assert_eq!(audit.count, 1);
        assert_eq!(audit.samples, vec!["https://x/y.jpg"]);
    }

    #[tokio::test]
    async fn test_sources_resolved_and_samples_capped() {
        let body: String = (1..=7)
            .map(|i| format!(r#"<img src="/media/car{}.jpg" width="800" height="600">"#, i))
            .collect();
        let doc = Html::parse_document(&format!("<body>{}</body>", body));
        let page = HtmlSnapshot::new(&doc, Some(PAGE_URL));

        let audit = images::audit(&page, &settings(), PAGE_URL).await;
        assert_eq!(audit.count, 7);
        assert_eq!(audit.samples.len(), 5);
        assert_eq!(audit.samples[0], "https://store.example.com/media/car1.jpg");
        assert_eq!(audit.samples[4], "https://store.example.com/media/car5.jpg");

        let record = audit.into_record(DATE, Some("shot.png".to_string()));
        assert_eq!(record.status, Status::Pass);
        assert_eq!(record.vehicle_images, Some(7));
        let row = record.to_row(AuditMode::Images);
        assert_eq!(row[1], ("URL", PAGE_URL.to_string()));
        assert_eq!(row[5], ("ScreenshotPath", "shot.png".to_string()));
        assert_eq!(row[6].1.split(';').count(), 5);
    }

    #[tokio::test]
    async fn test_no_vehicle_images_fails() {
        let doc = Html::parse_document(r#"<body><img src="/logo.svg" width="120" height="40"></body>"#);
        let page = HtmlSnapshot::new(&doc, Some(PAGE_URL));

        let record = images::audit(&page, &settings(), PAGE_URL)
            .await
            .into_record(DATE, None);
        assert_eq!(record.status, Status::Fail);
        assert_eq!(record.vehicle_images, Some(0));
        assert!(record.details().starts_with("no vehicle images visible"));
    }

    #[tokio::test]
    async fn test_unevaluable_images_are_skipped() {
        let doc = Html::parse_document(
            r#"<body><img src="https://x/a.jpg" width="800" height="600">
               <img src="https://x/b.jpg" width="800" height="600"></body>"#,
        );
        let mut page = FlakyPage::new(HtmlSnapshot::new(&doc, Some(PAGE_URL)));
        page.property_fails_for = Some(ElementProperty::Complete);

        let audit = images::audit(&page, &settings(), PAGE_URL).await;
        assert_eq!(audit.inspected, 2);
        assert_eq!(audit.count, 0);
    }

    #[tokio::test]
    async fn test_image_mode_saves_screenshot() {
        let doc = Html::parse_document(r#"<body><img src="https://x/a.jpg" width="800" height="600"></body>"#);
        let page = FlakyPage::new(HtmlSnapshot::new(&doc, Some(PAGE_URL)));

        let mut config = AuditConfig::new(PAGE_URL);
        config.mode = AuditMode::Images;
        let dir = std::env::temp_dir().join(format!("storefront-audit-shot-{}", std::process::id()));
        let path = dir.join("images.png");

        let (records, saved) = crate::audit_page(&page, &config, &settings(), DATE, Some(path.as_path())).await;
        assert_eq!(saved.as_deref(), Some(path.as_path()));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].screenshot, Some(path.display().to_string()));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, b'P', b'N', b'G']);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_static_screenshot_failure_leaves_path_empty() {
        let doc = Html::parse_document(r#"<body><img src="https://x/a.jpg" width="800" height="600"></body>"#);
        let page = HtmlSnapshot::new(&doc, Some(PAGE_URL));

        let mut config = AuditConfig::new(PAGE_URL);
        config.mode = AuditMode::Images;
        let path = std::env::temp_dir().join("storefront-audit-never-written.png");

        let (records, saved) = crate::audit_page(&page, &config, &settings(), DATE, Some(path.as_path())).await;
        assert!(saved.is_none());
        assert_eq!(records[0].status, Status::Pass);
        assert_eq!(records[0].screenshot, None);
    }
}
