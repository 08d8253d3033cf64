pub mod droid;
pub mod extractor;
pub mod openai_client;
pub mod page_scraper;
pub mod search_engine;

pub use droid::*;
pub use extractor::*;
pub use openai_client::*;
pub use page_scraper::*;
pub use search_engine::*;
