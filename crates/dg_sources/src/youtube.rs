use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};

use dg_core::{Error, Result};

const TIMEDTEXT_URL: &str = "https://video.google.com/timedtext";

fn id_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(
                r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)([a-zA-Z0-9_-]{11})",
            )
            .unwrap(),
            Regex::new(r"^([a-zA-Z0-9_-]{11})$").unwrap(),
        ]
    })
}

/// Extract the 11-character video id from the common YouTube URL shapes, or
/// a bare id. Unrecognized input is `None`, not an error.
pub fn extract_video_id(url: &str) -> Option<String> {
    id_patterns()
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .map(|captures| captures[1].to_string())
}

/// Caption transcript collaborator, narrow on purpose so handlers can be
/// tested against a canned implementation.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_transcript(&self, video_id: &str) -> Result<String>;
}

/// Fetches English captions from the public timedtext endpoint.
#[derive(Debug, Default)]
pub struct CaptionClient {
    client: reqwest::Client,
}

impl CaptionClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TranscriptSource for CaptionClient {
    async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
        let xml = self
            .client
            .get(TIMEDTEXT_URL)
            .query(&[("lang", "en"), ("v", video_id)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Fetch(format!("Failed to fetch transcript: {e}")))?
            .text()
            .await?;

        let segments = caption_segments(&xml);
        if segments.is_empty() {
            return Err(Error::Fetch(
                "No transcripts available for this video.".to_string(),
            ));
        }

        Ok(segments.join(" "))
    }
}

/// The caption payload is simple XML; the lenient HTML parser handles it
/// fine and decodes entities on the way.
fn caption_segments(xml: &str) -> Vec<String> {
    let document = Html::parse_document(xml);
    let selector = Selector::parse("text").unwrap();

    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|segment| !segment.is_empty())
        .collect()
}
