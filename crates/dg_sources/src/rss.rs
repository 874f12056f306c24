use chrono::{DateTime, Utc};
use feed_rs::model::Feed;
use feed_rs::parser;
use tracing::warn;

use dg_core::window::select_recent;
use dg_core::{ContentItem, ContentKind, Result};

const USER_AGENT: &str = "digest-service/1.0";

/// Fetch articles from the configured feeds that fall within the lookback
/// window. A feed that fails to download or parse is logged and skipped;
/// one broken feed must not sink the whole digest.
pub async fn fetch_feed_items(
    client: &reqwest::Client,
    feed_urls: &[String],
    cutoff: DateTime<Utc>,
) -> Result<Vec<ContentItem>> {
    let mut articles = Vec::new();

    for feed_url in feed_urls {
        let bytes = match client
            .get(feed_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => match response.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Error reading feed {feed_url}: {e}");
                    continue;
                }
            },
            Err(e) => {
                warn!("Error fetching feed {feed_url}: {e}");
                continue;
            }
        };

        let feed = match parser::parse(bytes.as_ref()) {
            Ok(feed) => feed,
            Err(e) => {
                warn!("Error parsing feed {feed_url}: {e}");
                continue;
            }
        };

        articles.extend(select_recent(items_from_feed(feed), cutoff));
    }

    Ok(articles)
}

/// Map parsed feed entries to content items. Entries with no published
/// timestamp fall back to the updated one; both may be absent.
fn items_from_feed(feed: Feed) -> Vec<ContentItem> {
    let feed_title = feed
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Unknown Feed".to_string());

    feed.entries
        .into_iter()
        .map(|entry| {
            let author = entry
                .authors
                .first()
                .map(|person| person.name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| feed_title.clone());

            let body = entry
                .content
                .and_then(|content| content.body)
                .or_else(|| entry.summary.map(|summary| summary.content))
                .unwrap_or_default();

            ContentItem {
                title: entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Untitled".to_string()),
                author,
                published_at: entry.published.or(entry.updated),
                body,
                source: feed_title.clone(),
                link: entry.links.first().map(|link| link.href.clone()),
                kind: ContentKind::Article,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com</link>
    <item>
      <title>First Post</title>
      <author>jane@example.com (Jane)</author>
      <pubDate>Mon, 15 Jan 2024 12:00:00 GMT</pubDate>
      <link>https://example.com/first</link>
      <description>&lt;p&gt;Body one&lt;/p&gt;</description>
    </item>
    <item>
      <title>Undated Post</title>
      <link>https://example.com/undated</link>
      <description>Body two</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_items_from_feed() {
        let feed = parser::parse(SAMPLE_RSS.as_bytes()).unwrap();
        let items = items_from_feed(feed);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First Post");
        assert_eq!(items[0].source, "Test Feed");
        assert!(items[0].published_at.is_some());
        assert_eq!(items[0].link.as_deref(), Some("https://example.com/first"));
        assert_eq!(items[0].kind, ContentKind::Article);

        assert_eq!(items[1].title, "Undated Post");
        assert!(items[1].published_at.is_none());
    }

    #[test]
    fn test_window_drops_old_keeps_undated() {
        let feed = parser::parse(SAMPLE_RSS.as_bytes()).unwrap();
        let items = items_from_feed(feed);
        // Cutoff far after the dated entry: only the undated one survives.
        let kept = select_recent(items, Utc::now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Undated Post");
    }
}
