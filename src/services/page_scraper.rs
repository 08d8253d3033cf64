use std::time::Duration;

use reqwest::{Client, StatusCode};
use scraper::{Html, Node};

use crate::domain::report::ContentMap;

const SKIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("status code: {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

pub struct PageScraper {
    client: Client,
}

impl PageScraper {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(PageScraper { client })
    }

    /// Visible text of the page at `url`, or an empty string if it could not
    /// be fetched.
    pub async fn scrape_url(&self, url: &str) -> String {
        match self.fetch_text(url).await {
            Ok(text) => {
                log::info!("Successfully scraped content from {}", url);
                text
            }
            Err(ScrapeError::Status(status)) => {
                log::error!(
                    "Failed to retrieve page {}, status code: {}",
                    url,
                    status.as_u16()
                );
                String::new()
            }
            Err(e) => {
                log::error!("Failed to scrape {}: {:?}", url, e);
                String::new()
            }
        }
    }

    pub async fn scrape_multiple_urls(&self, urls: &[String]) -> ContentMap {
        let mut content_map = ContentMap::new();

        for url in urls {
            let content = self.scrape_url(url).await;
            content_map.insert(url.clone(), content);
        }

        content_map
    }

    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let res = self.client.get(url).send().await?;

        match res.status() {
            StatusCode::OK => {
                let html_content = res.text().await?;
                Ok(extract_visible_text(&html_content))
            }
            status => Err(ScrapeError::Status(status)),
        }
    }
}

/// Every text node outside `<script>` and `<style>`, trimmed and joined by a
/// single space.
pub fn extract_visible_text(html_content: &str) -> String {
    let html_document = Html::parse_document(html_content);

    html_document
        .tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
                });
                match hidden {
                    true => None,
                    false => Some(text.trim()),
                }
            }
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}
