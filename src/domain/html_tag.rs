const GOOGLE_PREFIX: &str = "https://www.google.com";

// Matched anywhere in the lowercased url, not only at the end of the path,
// so `https://example.com/page?ref=.pdf-article` is dropped too.
pub const DOCUMENT_EXTENSIONS: [&str; 8] = [
    ".pdf", ".jpg", ".png", ".docx", ".xlsx", ".pptx", ".zip", ".jpeg",
];

#[derive(Debug, PartialEq, Clone)]
pub enum HtmlTag {
    ATag(String),
}

/// Returns the href of an anchor if it looks like an organic search result
/// pointing at an html page. `search_origin` is the scheme and host of the
/// search widget, e.g. `https://cse.google.com`.
pub fn extract_result_url(tag: HtmlTag, search_origin: &str) -> Option<String> {
    match tag {
        HtmlTag::ATag(href) => {
            match is_external_link(&href, search_origin) && !is_document_link(&href) {
                true => Some(href),
                false => None,
            }
        }
    }
}

fn is_external_link(href: &str, search_origin: &str) -> bool {
    href.starts_with("http")
        && !href.starts_with(search_origin)
        && !href.starts_with(GOOGLE_PREFIX)
}

pub fn is_document_link(href: &str) -> bool {
    let href = href.to_lowercase();

    DOCUMENT_EXTENSIONS.iter().any(|ext| href.contains(ext))
}
