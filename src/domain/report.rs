use std::{collections::BTreeMap, fmt::Write};

use super::query::Query;

pub const SCRAPE_FAILED: &str = "No content available due to scraping failure.";
pub const EXTRACTION_FAILED: &str = "Error occurred while extracting information with OpenAI API.";
pub const NOTHING_RELEVANT: &str = "No relevant information found.";
pub const ERROR_PREFIX: &str = "Error occurred";

/// Url to visible page text. An empty value means the page could not be
/// scraped.
pub type ContentMap = BTreeMap<String, String>;

/// Url to extracted snippets, or a single sentinel message.
pub type SnippetMap = BTreeMap<String, Vec<String>>;

pub fn sentinel(message: &str) -> Vec<String> {
    vec![message.to_string()]
}

pub fn format_report(query: &Query, relevant_info: &SnippetMap) -> String {
    let mut report = format!(
        "Information for {} at {}:\n\n",
        query.person_name, query.affiliation
    );

    for (url, snippets) in relevant_info {
        _ = writeln!(report, "From URL: {}", url);
        for snippet in snippets {
            _ = writeln!(report, "  - {}", snippet);
        }
        report.push('\n');
    }

    report
}
