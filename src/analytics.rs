//! Analytics over the stored image records

use crate::api::{ApiClient, ClientResult, ImageRecord};

/// Number of alerting images listed in the report
const RECENT_ALERTS: usize = 5;

/// Summary of the images the backend has stored
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub total_images: usize,

    /// Images with at least one alert
    pub images_with_alerts: usize,

    /// Share of alerting images in percent
    pub alert_rate: f64,

    /// Most recent alerting images, in the order the backend returned them
    pub recent_alerts: Vec<ImageRecord>,
}

impl AnalyticsReport {
    pub fn from_images(images: &[ImageRecord]) -> Self {
        let total_images = images.len();
        let images_with_alerts = images.iter().filter(|image| image.alert_count > 0).count();

        let alert_rate = if total_images > 0 {
            images_with_alerts as f64 / total_images as f64 * 100.0
        } else {
            0.0
        };

        let recent_alerts = images
            .iter()
            .filter(|image| image.alert_count > 0)
            .take(RECENT_ALERTS)
            .cloned()
            .collect();

        Self {
            total_images,
            images_with_alerts,
            alert_rate,
            recent_alerts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_images == 0
    }
}

/// Fetch up to `limit` image records and summarise them
pub async fn load_report(client: &ApiClient, limit: u32) -> ClientResult<AnalyticsReport> {
    let images = client.list_images(limit).await?;
    Ok(AnalyticsReport::from_images(&images))
}
