/// Checks if any pattern occurs inside the candidate as a plain substring
///
/// This is deliberately loose: "medium.com" matches "notmedium.com.evil.org".
/// No domain parsing or word boundaries are applied.
///
/// # Examples
///
/// ```
/// use newsletter_digest::classify::contains_any;
///
/// let domains = vec!["substack.com".to_string()];
/// assert!(contains_any("Weekly <news@substack.com>", &domains));
/// assert!(!contains_any("friend@example.com", &domains));
/// ```
pub fn contains_any(candidate: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| candidate.contains(pattern.as_str()))
}

/// Like [`contains_any`] but ignoring case
///
/// Patterns are expected to be lowercase already; the candidate is lowered here.
pub fn contains_any_ignore_case(candidate: &str, lowered_patterns: &[String]) -> bool {
    let candidate = candidate.to_lowercase();
    contains_any(&candidate, lowered_patterns)
}
