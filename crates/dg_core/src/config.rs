use std::path::Path;

use serde::Deserialize;

use crate::filter::FilterConfig;
use crate::{Error, Result};

const DEFAULT_SETTINGS_PATH: &str = "config/settings.json";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_lookback_hours() -> i64 {
    24
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Raw filter lists as they appear in the settings file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSettings {
    #[serde(default)]
    pub skip_titles: Vec<String>,
    #[serde(default)]
    pub skip_internal_domains: Vec<String>,
    #[serde(default)]
    pub skip_vc_patterns: Vec<String>,
}

/// Contents of the settings file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub gmail_senders: Vec<String>,
    #[serde(default)]
    pub rss_feeds: Vec<String>,
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recipients: Vec::new(),
            filters: FilterSettings::default(),
            gmail_senders: Vec::new(),
            rss_feeds: Vec::new(),
            lookback_hours: default_lookback_hours(),
        }
    }
}

/// OAuth2 credential blob for the Gmail API, from the `GMAIL_CREDENTIALS`
/// environment variable.
#[derive(Debug, Clone, Deserialize)]
pub struct GmailCredentials {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

impl Default for GmailCredentials {
    fn default() -> Self {
        Self {
            token: String::new(),
            refresh_token: String::new(),
            token_uri: default_token_uri(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

/// Fully loaded configuration, built once per invocation and passed down to
/// every component. No ambient lookup after this point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub recipients: Vec<String>,
    pub filters: FilterConfig,
    pub gmail_senders: Vec<String>,
    pub rss_feeds: Vec<String>,
    pub lookback_hours: i64,
    pub anthropic_api_key: String,
    pub gmail: GmailCredentials,
}

impl AppConfig {
    /// Load settings from the JSON file and secrets from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_PATH));
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        let settings: Settings = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))?;

        Self::from_settings(settings)
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let filters = FilterConfig::new(
            settings.filters.skip_titles,
            settings.filters.skip_internal_domains,
            &settings.filters.skip_vc_patterns,
        )?;

        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        let gmail = match std::env::var("GMAIL_CREDENTIALS") {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| Error::Config(format!("Invalid GMAIL_CREDENTIALS: {e}")))?,
            Err(_) => GmailCredentials::default(),
        };

        Ok(Self {
            recipients: settings.recipients,
            filters,
            gmail_senders: settings.gmail_senders,
            rss_feeds: settings.rss_feeds,
            lookback_hours: settings.lookback_hours,
            anthropic_api_key,
            gmail,
        })
    }
}
