use serde::Deserialize;

/// Main configuration structure for RPA-Scout
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub preview: PreviewConfig,
    pub classifier: ClassifierConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link hops from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Stop recording new pages once this many have been visited
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            request_timeout_secs: 30,
            max_pages: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "RpaScout".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/rpa-scout".to_string(),
            contact_email: "rpa-scout@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Page preview configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Maximum characters of page text sent to the model per URL
    #[serde(rename = "max-chars")]
    pub max_chars: usize,

    /// Timeout for a single preview fetch (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_chars: 800,
            timeout_secs: 10,
        }
    }
}

/// Language-model classification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Model identifier sent to the completion API
    pub model: String,

    /// Number of URLs classified per model call
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on reply length (tokens)
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Instruction text placed before the page previews
    pub prompt: Option<String>,

    /// Base URL of the chat completions API
    #[serde(rename = "api-base-url")]
    pub api_base_url: String,

    /// Environment variable holding the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Timeout for a single completion call (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            batch_size: 8,
            temperature: 0.3,
            max_tokens: 1500,
            prompt: None,
            api_base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the markdown report
    #[serde(rename = "report-path")]
    pub report_path: String,

    /// Path to the JSON export of result records
    #[serde(rename = "json-path")]
    pub json_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: "./rpa_report.md".to_string(),
            json_path: None,
        }
    }
}
