use url::Url;

/// Label used when a link's URL cannot be parsed at all
pub const GENERIC_LINK_TEXT: &str = "View Link";

/// Synthesizes display text for a link from its URL
///
/// The host loses a leading `www.`; if the path has a non-empty first segment
/// it is appended as `host/segment`. URLs that fail to parse, or have no host,
/// get [`GENERIC_LINK_TEXT`].
///
/// # Examples
///
/// ```
/// use newsletter_digest::links::infer_link_text;
///
/// assert_eq!(infer_link_text("https://www.example.com/foo/bar"), "example.com/foo");
/// assert_eq!(infer_link_text("https://example.com/"), "example.com");
/// assert_eq!(infer_link_text("not a url"), "View Link");
/// ```
pub fn infer_link_text(url: &str) -> String {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return GENERIC_LINK_TEXT.to_string(),
    };

    let host = match parsed.host_str() {
        Some(host) => host,
        None => return GENERIC_LINK_TEXT.to_string(),
    };
    let host = host.strip_prefix("www.").unwrap_or(host);

    let first_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()));

    match first_segment {
        Some(segment) => format!("{}/{}", host, segment),
        None => host.to_string(),
    }
}
