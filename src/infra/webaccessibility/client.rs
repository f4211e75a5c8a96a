use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

use web_a11y_rater::fetch::{HttpClient, fetch_text};
use web_a11y_rater::lookup::{AccessibilityLookup, UNAVAILABLE};

/// Result page prefix; the site's host name is appended to it.
pub const DEFAULT_BASE_URL: &str = "https://www.webaccessibility.com/results/?url=https%3A%2F%2F";

/// Element on the result page holding the percentage text.
const PERCENT_SELECTOR: &str =
    "div.MuiTypography-root.MuiTypography-caption.MuiTypography-colorTextSecondary";

pub struct WebAccessibilityClient<C> {
    client: C,
    base_url: String,
    retry_delay: Duration,
}

impl<C: HttpClient> WebAccessibilityClient<C> {
    pub fn new(client: C, base_url: String, retry_delay: Duration) -> Self {
        Self {
            client,
            base_url,
            retry_delay,
        }
    }

    fn result_url(&self, site: &str) -> String {
        format!("{}{}/", self.base_url, site)
    }

    async fn fetch_percentage(&self, site: &str) -> Result<Option<String>> {
        let html = fetch_text(&self.client, &self.result_url(site)).await?;
        Ok(extract_percentage(&html))
    }
}

/// Text of the percentage element on a result page, if it is there yet.
pub fn extract_percentage(html: &str) -> Option<String> {
    let selector = Selector::parse(PERCENT_SELECTOR).ok()?;
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .next()
        .map(|div| div.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

#[async_trait]
impl<C: HttpClient> AccessibilityLookup for WebAccessibilityClient<C> {
    /// Result pages are filled in asynchronously, so a miss is retried once
    /// after `retry_delay`.
    async fn lookup(&self, site: &str) -> String {
        match self.fetch_percentage(site).await {
            Ok(Some(percent)) => return percent,
            Ok(None) => debug!(site, "Percentage not on result page yet, retrying"),
            Err(e) => debug!(site, error = %e, "Result page request failed, retrying"),
        }

        tokio::time::sleep(self.retry_delay).await;

        match self.fetch_percentage(site).await {
            Ok(Some(percent)) => percent,
            Ok(None) => {
                warn!(site, "No accessibility percentage on result page");
                UNAVAILABLE.to_string()
            }
            Err(e) => {
                warn!(site, error = %e, "Accessibility lookup failed");
                UNAVAILABLE.to_string()
            }
        }
    }
}
