use crate::domain::{
    query::Query,
    report::{
        sentinel, ContentMap, SnippetMap, ERROR_PREFIX, EXTRACTION_FAILED, NOTHING_RELEVANT,
        SCRAPE_FAILED,
    },
};

use super::ChatCompletion;

pub struct Extractor {
    query: Query,
    completion: Box<dyn ChatCompletion>,
}

impl Extractor {
    pub fn new(query: Query, completion: Box<dyn ChatCompletion>) -> Self {
        Extractor { query, completion }
    }

    /// Asks the model for sentences about the target person in `content`,
    /// one snippet per non-blank line of the answer.
    pub async fn extract_with_openai(&self, content: &str) -> Vec<String> {
        let prompt = self.query.extraction_prompt(content);

        match self
            .completion
            .complete(self.query.system_instruction(), &prompt)
            .await
        {
            Ok(answer) => split_snippets(&answer),
            Err(e) => {
                log::error!("Error using OpenAI API: {}", e);
                sentinel(EXTRACTION_FAILED)
            }
        }
    }

    pub async fn extract_relevant_info(&self, content_map: &ContentMap) -> SnippetMap {
        let mut relevant_info = SnippetMap::new();

        for (url, content) in content_map {
            if content.is_empty() {
                relevant_info.insert(url.clone(), sentinel(SCRAPE_FAILED));
                continue;
            }

            let snippets = self.extract_with_openai(content).await;
            match snippets.first() {
                Some(first) if !first.starts_with(ERROR_PREFIX) => {
                    log::info!(
                        "Found {} relevant snippets for {} at {}",
                        snippets.len(),
                        self.query.person_name,
                        url
                    );
                    relevant_info.insert(url.clone(), snippets);
                }
                _ => {
                    log::info!(
                        "No relevant information found for {} at {}",
                        self.query.person_name,
                        url
                    );
                    relevant_info.insert(url.clone(), sentinel(NOTHING_RELEVANT));
                }
            }
        }

        relevant_info
    }
}

fn split_snippets(answer: &str) -> Vec<String> {
    answer
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}
