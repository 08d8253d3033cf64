pub mod html_tag;
pub mod query;
pub mod report;
