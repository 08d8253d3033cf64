use crate::{
    configuration::Settings,
    domain::{
        query::Query,
        report::{format_report, SnippetMap},
    },
    services::{Droid, Extractor, OpenaiClient, PageScraper, SearchEngine},
};

#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    NoUrls,
    Reported(SnippetMap),
}

pub struct Pipeline {
    query: Query,
    search_engine: SearchEngine,
    page_scraper: PageScraper,
    extractor: Extractor,
}

impl Pipeline {
    pub fn new(
        query: Query,
        search_engine: SearchEngine,
        page_scraper: PageScraper,
        extractor: Extractor,
    ) -> Self {
        Pipeline {
            query,
            search_engine,
            page_scraper,
            extractor,
        }
    }

    pub fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let query = configuration.target.query();

        let droid = Droid::new(configuration.search.webdriver_url.clone());
        let search_engine = SearchEngine::new(
            configuration.search.cse_url.clone(),
            configuration.api_keys.google_cse_id,
            configuration.search.render_wait(),
            Box::new(droid),
        );

        let page_scraper = PageScraper::new(
            &configuration.scraper.user_agent,
            configuration.scraper.timeout(),
        )?;

        let openai_client =
            OpenaiClient::new(configuration.api_keys.openai, configuration.extractor);
        let extractor = Extractor::new(query.clone(), Box::new(openai_client));

        Ok(Pipeline::new(query, search_engine, page_scraper, extractor))
    }

    /// Search, scrape and extract once, printing the report to stdout.
    pub async fn run(&self) -> RunOutcome {
        log::info!("Fetching URLs from Google CSE...");
        let urls = self
            .search_engine
            .fetch_urls(&self.query.person_name, &self.query.affiliation)
            .await;
        if urls.is_empty() {
            log::error!("No URLs found. Exiting.");
            return RunOutcome::NoUrls;
        }

        log::info!("Starting scraping process...");
        let content_map = self.page_scraper.scrape_multiple_urls(&urls).await;

        log::info!("Extracting relevant information...");
        let relevant_info = self.extractor.extract_relevant_info(&content_map).await;

        print!("{}", format_report(&self.query, &relevant_info));

        RunOutcome::Reported(relevant_info)
    }
}
