//! Blocking HTTP search source driven by a [`RetailerLayout`]

use std::time::Duration;

use scraper::Html;

use super::{ExtractionError, ProductSource, RetailerLayout};
use crate::config::RetailerConfig;
use crate::models::ProductListing;

const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

pub struct HtmlSearchSource {
    layout: RetailerLayout,
    user_agent: String,
    timeout: Duration,
    scrape_limit: usize,
}

impl HtmlSearchSource {
    pub fn new(layout: RetailerLayout, cfg: &RetailerConfig) -> Self {
        Self {
            layout,
            user_agent: cfg.user_agent.clone(),
            timeout: Duration::from_millis(cfg.fetch_timeout_ms),
            scrape_limit: cfg.scrape_limit,
        }
    }

    pub fn walmart(cfg: &RetailerConfig) -> Result<Self, ExtractionError> {
        Ok(Self::new(RetailerLayout::walmart(&cfg.origin)?, cfg))
    }

    /// Single GET, no retry. The blocking client is built per call so it is
    /// never created or dropped on an async worker thread.
    fn fetch_page(&self, query: &str) -> Result<String, ExtractionError> {
        let url = self.layout.search_url(query)?;
        tracing::info!("Searching {} for: {}", self.layout.retailer(), query);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()?;
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }
}

impl ProductSource for HtmlSearchSource {
    fn retailer(&self) -> &str {
        self.layout.retailer()
    }

    fn search(
        &self,
        query: &str,
        theme: &str,
        max_results: usize,
    ) -> Result<Vec<ProductListing>, ExtractionError> {
        let html = self.fetch_page(query)?;
        let document = Html::parse_document(&html);
        let listings = self
            .layout
            .extract(&document, theme, max_results.min(self.scrape_limit));
        tracing::info!(
            "Extracted {} listings from {}",
            listings.len(),
            self.layout.retailer()
        );
        Ok(listings)
    }
}
