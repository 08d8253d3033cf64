const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant that extracts relevant information from text.";

/// The person being looked up, fixed for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub person_name: String,
    pub affiliation: String,
}

impl Query {
    pub fn new(person_name: &str, affiliation: &str) -> Self {
        Query {
            person_name: person_name.to_string(),
            affiliation: affiliation.to_string(),
        }
    }

    pub fn search_terms(&self) -> String {
        format!("{} {}", self.person_name, self.affiliation)
    }

    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }

    pub fn extraction_prompt(&self, content: &str) -> String {
        format!(
            "Extract all relevant information about {} who is affiliated with {} from the following text:\n\n{}\n\nReturn the information as concise sentences, one per line.",
            self.person_name, self.affiliation, content
        )
    }
}
