use crate::config::types::{
    ClassifierConfig, Config, DigestConfig, LinksConfig, OutputConfig, SummarizerConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Largest fixed offset accepted for day keys (UTC+14:00 / UTC-14:00)
const MAX_UTC_OFFSET_MINUTES: u32 = 14 * 60;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_classifier_config(&config.classifier)?;
    validate_links_config(&config.links)?;
    validate_summarizer_config(&config.summarizer)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_digest_config(&config.digest)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the classifier lists
///
/// Entries are substrings, not domains, so only emptiness is rejected: an empty
/// entry would match every sender.
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    let lists = [
        ("newsletter-domains", &config.newsletter_domains),
        ("subject-keywords", &config.subject_keywords),
        ("excluded-domains", &config.excluded_domains),
    ];

    for (name, entries) in lists {
        if entries.iter().any(|entry| entry.trim().is_empty()) {
            return Err(ConfigError::InvalidPattern(format!(
                "{} cannot contain empty entries",
                name
            )));
        }
    }

    Ok(())
}

/// Validates link resolution settings
fn validate_links_config(config: &LinksConfig) -> Result<(), ConfigError> {
    if config.max_links_per_message < 1 || config.max_links_per_message > 50 {
        return Err(ConfigError::Validation(format!(
            "max_links_per_message must be between 1 and 50, got {}",
            config.max_links_per_message
        )));
    }

    if config.max_concurrent_resolutions < 1 || config.max_concurrent_resolutions > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_resolutions must be between 1 and 100, got {}",
            config.max_concurrent_resolutions
        )));
    }

    if config.title_fetch_timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "title_fetch_timeout must be >= 100ms, got {}ms",
            config.title_fetch_timeout
        )));
    }

    if config.redirect_probe_timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "redirect_probe_timeout must be >= 100ms, got {}ms",
            config.redirect_probe_timeout
        )));
    }

    if config.redirect_max_hops > 20 {
        return Err(ConfigError::Validation(format!(
            "redirect_max_hops must be <= 20, got {}",
            config.redirect_max_hops
        )));
    }

    Ok(())
}

/// Validates summarization service settings
fn validate_summarizer_config(config: &SummarizerConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid summarizer endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Summarizer endpoint '{}' must use HTTP or HTTPS",
            config.endpoint
        )));
    }

    if config.model.is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    if config.api_key_env.is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    if config.timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "summarizer timeout must be >= 100ms, got {}ms",
            config.timeout
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation("name cannot be empty".to_string()));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates digest assembly settings
fn validate_digest_config(config: &DigestConfig) -> Result<(), ConfigError> {
    if config.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(ConfigError::Validation(format!(
            "utc_offset_minutes must be between -{} and {}, got {}",
            MAX_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES, config.utc_offset_minutes
        )));
    }

    if config.max_concurrent_messages < 1 || config.max_concurrent_messages > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_messages must be between 1 and 64, got {}",
            config.max_concurrent_messages
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.digest_path.is_empty() {
        return Err(ConfigError::Validation(
            "digest_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
