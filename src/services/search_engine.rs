use std::{collections::BTreeSet, time::Duration};

use scraper::{Html, Selector};
use thirtyfour::error::WebDriverError;
use url::Url;

use crate::domain::{
    html_tag::{extract_result_url, HtmlTag},
    query::Query,
};

use super::PageRenderer;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid search url: {0}")]
    Url(#[from] url::ParseError),
    #[error("Browser failed to render the results page: {0}")]
    Render(#[from] WebDriverError),
    #[error("Invalid selector: {0}")]
    Selector(String),
}

pub struct SearchEngine {
    cse_url: String,
    cse_id: String,
    render_wait: Duration,
    renderer: Box<dyn PageRenderer>,
}

impl SearchEngine {
    pub fn new(
        cse_url: String,
        cse_id: String,
        render_wait: Duration,
        renderer: Box<dyn PageRenderer>,
    ) -> Self {
        SearchEngine {
            cse_url,
            cse_id,
            render_wait,
            renderer,
        }
    }

    /// Urls of the result pages for `person_name` at `affiliation`, sorted
    /// and without duplicates. Empty when the results page could not be
    /// rendered.
    pub async fn fetch_urls(&self, person_name: &str, affiliation: &str) -> Vec<String> {
        match self.search(person_name, affiliation).await {
            Ok(urls) => urls,
            Err(e) => {
                log::error!("Error scraping CSE page: {}", e);
                vec![]
            }
        }
    }

    async fn search(
        &self,
        person_name: &str,
        affiliation: &str,
    ) -> Result<Vec<String>, SearchError> {
        let cse_url = self.build_search_url(person_name, affiliation)?;
        log::info!("Scraping CSE results page: {}", cse_url);

        let page_source = self
            .renderer
            .render(cse_url.as_str(), self.render_wait)
            .await?;

        let search_origin = cse_url.origin().ascii_serialization();
        let urls = extract_urls_from_results_page(&page_source, &search_origin)?;
        log::info!("Found {} URLs on CSE results page: {:?}", urls.len(), urls);

        Ok(urls)
    }

    pub fn build_search_url(
        &self,
        person_name: &str,
        affiliation: &str,
    ) -> Result<Url, url::ParseError> {
        let query = Query::new(person_name, affiliation).search_terms();

        Url::parse_with_params(
            &self.cse_url,
            &[("cx", self.cse_id.as_str()), ("q", query.as_str())],
        )
    }
}

/// Result links on a rendered results page, skipping links back to
/// `search_origin` itself.
pub fn extract_urls_from_results_page(
    page_source: &str,
    search_origin: &str,
) -> Result<Vec<String>, SearchError> {
    let a_tag_selector =
        Selector::parse("a[href]").map_err(|e| SearchError::Selector(format!("{:?}", e)))?;
    let html_document = Html::parse_document(page_source);

    let urls: BTreeSet<String> = html_document
        .select(&a_tag_selector)
        .filter_map(|tag| tag.value().attr("href"))
        .filter_map(|href| extract_result_url(HtmlTag::ATag(href.to_string()), search_origin))
        .collect();

    Ok(urls.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use async_trait::async_trait;
    use thirtyfour::error::{WebDriverError, WebDriverResult};

    use super::{extract_urls_from_results_page, SearchEngine};
    use crate::services::PageRenderer;

    struct FakeRenderer {
        page_source: Option<String>,
        requests: Arc<Mutex<Vec<(String, Duration)>>>,
    }

    #[async_trait]
    impl PageRenderer for FakeRenderer {
        async fn render(&self, url: &str, wait: Duration) -> WebDriverResult<String> {
            self.requests.lock().unwrap().push((url.to_string(), wait));
            match &self.page_source {
                Some(page_source) => Ok(page_source.clone()),
                None => Err(WebDriverError::FatalError("chromedriver went away".to_string())),
            }
        }
    }

    const CSE_ORIGIN: &str = "https://cse.google.com";

    fn search_engine_at(
        cse_url: &str,
        page_source: Option<&str>,
    ) -> (SearchEngine, Arc<Mutex<Vec<(String, Duration)>>>) {
        let requests = Arc::new(Mutex::new(vec![]));
        let renderer = FakeRenderer {
            page_source: page_source.map(|p| p.to_string()),
            requests: requests.clone(),
        };
        let engine = SearchEngine::new(
            cse_url.to_string(),
            "abc123".to_string(),
            Duration::from_secs(3),
            Box::new(renderer),
        );

        (engine, requests)
    }

    fn search_engine(
        page_source: Option<&str>,
    ) -> (SearchEngine, Arc<Mutex<Vec<(String, Duration)>>>) {
        search_engine_at("https://cse.google.com/cse", page_source)
    }

    #[test]
    fn results_page_filters_and_collapses_links() {
        let page_source = r#"
            <html><body>
                <a href="https://cse.google.com/x">cse</a>
                <a href="https://foo.com/page.pdf">pdf</a>
                <a href="https://foo.com/page">one</a>
                <a href="https://foo.com/page">two</a>
            </body></html>
        "#;

        let urls = extract_urls_from_results_page(page_source, CSE_ORIGIN).unwrap();

        assert_eq!(urls, vec!["https://foo.com/page"]);
    }

    #[test]
    fn results_page_links_are_sorted_and_unique() {
        let page_source = r#"
            <div>
                <a href="https://zeta.org/a">z</a>
                <a href="https://alpha.org/b">a</a>
                <a href="https://www.google.com/search?q=x">google</a>
                <a href="https://mid.org/IMAGE.JPG">image</a>
                <a href="/relative">relative</a>
                <a>no href</a>
                <a href="https://alpha.org/b">again</a>
                <a href="http://beta.org/">b</a>
            </div>
        "#;

        let urls = extract_urls_from_results_page(page_source, CSE_ORIGIN).unwrap();

        assert_eq!(
            urls,
            vec!["http://beta.org/", "https://alpha.org/b", "https://zeta.org/a"]
        );
    }

    #[test]
    fn search_url_is_form_encoded() {
        let (engine, _) = search_engine(Some(""));

        let url = engine
            .build_search_url("Sai Teja Lekkala", "National Institute of Technology, Silchar")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://cse.google.com/cse?cx=abc123&q=Sai+Teja+Lekkala+National+Institute+of+Technology%2C+Silchar"
        );
    }

    #[tokio::test]
    async fn fetch_urls_renders_with_wait() {
        let page_source = r#"<a href="https://b.org">b</a><a href="https://a.org">a</a>"#;
        let (engine, requests) = search_engine(Some(page_source));

        let urls = engine.fetch_urls("Ada Lovelace", "Analytical Society").await;

        assert_eq!(urls, vec!["https://a.org", "https://b.org"]);
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].0,
            "https://cse.google.com/cse?cx=abc123&q=Ada+Lovelace+Analytical+Society"
        );
        assert_eq!(requests[0].1, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn fetch_urls_skips_configured_search_host() {
        let page_source = r#"
            <a href="https://search.example.org/cse?start=10">next page</a>
            <a href="https://www.nits.ac.in/people">profile</a>
        "#;
        let (engine, requests) =
            search_engine_at("https://search.example.org/cse", Some(page_source));

        let urls = engine.fetch_urls("Ada Lovelace", "Analytical Society").await;

        assert_eq!(urls, vec!["https://www.nits.ac.in/people"]);
        assert!(requests.lock().unwrap()[0]
            .0
            .starts_with("https://search.example.org/cse?cx=abc123&q="));
    }

    #[tokio::test]
    async fn fetch_urls_render_failure_is_empty() {
        let (engine, requests) = search_engine(None);

        let urls = engine.fetch_urls("Ada Lovelace", "Analytical Society").await;

        assert!(urls.is_empty());
        assert_eq!(requests.lock().unwrap().len(), 1);
    }
}
