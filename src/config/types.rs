use serde::Deserialize;

/// Main configuration structure for Newsletter Digest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub digest: DigestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Newsletter detection rules
///
/// All three lists are matched as plain substrings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Sender substrings that mark a message as a newsletter
    #[serde(rename = "newsletter-domains")]
    pub newsletter_domains: Vec<String>,

    /// Subject substrings (case-insensitive) that mark a message as a newsletter
    #[serde(rename = "subject-keywords")]
    pub subject_keywords: Vec<String>,

    /// Sender substrings that always disqualify a message
    #[serde(rename = "excluded-domains")]
    pub excluded_domains: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            newsletter_domains: ["substack.com", "medium.com", "mailchimp.com", "campaign-archive.com"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            subject_keywords: ["Newsletter", "Update", "Digest", "Weekly", "News"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_domains: ["google.com", "cointracker.io"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Link extraction and resolution settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Maximum number of distinct links kept per message
    #[serde(rename = "max-links-per-message")]
    pub max_links_per_message: usize,

    /// Maximum number of link resolutions in flight at once
    #[serde(rename = "max-concurrent-resolutions")]
    pub max_concurrent_resolutions: usize,

    /// Timeout for fetching a page title (milliseconds)
    #[serde(rename = "title-fetch-timeout")]
    pub title_fetch_timeout: u64,

    /// Maximum redirect hops followed by the redirect probe
    #[serde(rename = "redirect-max-hops")]
    pub redirect_max_hops: usize,

    /// Timeout for the redirect probe (milliseconds)
    #[serde(rename = "redirect-probe-timeout")]
    pub redirect_probe_timeout: u64,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            max_links_per_message: 10,
            max_concurrent_resolutions: 5,
            title_fetch_timeout: 5000,
            redirect_max_hops: 5,
            redirect_probe_timeout: 5000,
        }
    }
}

/// Summarization service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Chat-completions endpoint URL
    pub endpoint: String,

    /// Model identifier sent with each request
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Request timeout (milliseconds)
    pub timeout: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout: 30_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name sent in the User-Agent header
    pub name: String,

    /// Version sent in the User-Agent header
    pub version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Digest assembly settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Fixed offset from UTC used to derive day keys (minutes east of UTC)
    #[serde(rename = "utc-offset-minutes")]
    pub utc_offset_minutes: i32,

    /// Maximum number of messages enriched at once
    #[serde(rename = "max-concurrent-messages")]
    pub max_concurrent_messages: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            max_concurrent_messages: 4,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON digest file
    #[serde(rename = "digest-path")]
    pub digest_path: String,

    /// Path to the markdown digest file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            digest_path: "./digest.json".to_string(),
            summary_path: "./digest.md".to_string(),
        }
    }
}
