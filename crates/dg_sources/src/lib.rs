use async_trait::async_trait;

use dg_core::config::GmailCredentials;
use dg_core::window;
use dg_core::{ContentItem, Result};

pub mod gmail;
pub mod html;
pub mod rss;
pub mod youtube;

pub use gmail::GmailClient;
pub use html::html_to_text;
pub use youtube::{extract_video_id, CaptionClient, TranscriptSource};

/// Newsletter content collaborators behind one narrow interface, so the
/// digest handlers can be exercised without the network.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_emails(&self, senders: &[String], hours_back: i64) -> Result<Vec<ContentItem>>;

    async fn fetch_articles(&self, feeds: &[String], hours_back: i64) -> Result<Vec<ContentItem>>;
}

/// The real thing: Gmail API for emails, RSS feeds over HTTP for articles.
pub struct LiveContentSource {
    gmail: GmailClient,
    http: reqwest::Client,
}

impl LiveContentSource {
    pub fn new(credentials: GmailCredentials) -> Self {
        Self {
            gmail: GmailClient::new(credentials),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ContentSource for LiveContentSource {
    async fn fetch_emails(&self, senders: &[String], hours_back: i64) -> Result<Vec<ContentItem>> {
        self.gmail.fetch_from_senders(senders, hours_back).await
    }

    async fn fetch_articles(&self, feeds: &[String], hours_back: i64) -> Result<Vec<ContentItem>> {
        rss::fetch_feed_items(&self.http, feeds, window::cutoff(hours_back)).await
    }
}

pub mod prelude {
    pub use crate::gmail::GmailClient;
    pub use crate::html::html_to_text;
    pub use crate::youtube::{extract_video_id, TranscriptSource};
    pub use crate::{ContentSource, LiveContentSource};
    pub use dg_core::{ContentItem, Error, Result};
}
