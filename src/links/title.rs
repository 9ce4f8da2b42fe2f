//! HTML title extraction

use scraper::{Html, Selector};

/// Titles at or below this many characters are treated as missing
pub const MIN_TITLE_CHARS: usize = 5;

/// Extracts the trimmed text of the first `<title>` element
///
/// # Example
///
/// ```
/// use newsletter_digest::links::extract_title;
///
/// let html = r#"<html><head><title>  Test Page  </title></head></html>"#;
/// assert_eq!(extract_title(html), Some("Test Page".to_string()));
/// ```
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns the title only if it is long enough to be useful as link text
pub fn descriptive_title(html: &str) -> Option<String> {
    extract_title(html).filter(|title| title.chars().count() > MIN_TITLE_CHARS)
}
