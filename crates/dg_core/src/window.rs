use chrono::{DateTime, Duration, Utc};

use crate::types::ContentItem;

/// Cutoff for the lookback window, `hours_back` hours before now.
pub fn cutoff(hours_back: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours_back)
}

/// Keep only items published at or after `cutoff`, preserving input order.
/// An item with no resolvable timestamp is treated as recent and kept:
/// missing metadata must not cause silent data loss.
pub fn select_recent(items: Vec<ContentItem>, cutoff: DateTime<Utc>) -> Vec<ContentItem> {
    items
        .into_iter()
        .filter(|item| item.published_at.map_or(true, |published| published >= cutoff))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentKind;

    fn item(title: &str, published_at: Option<DateTime<Utc>>) -> ContentItem {
        ContentItem {
            title: title.to_string(),
            author: "author".to_string(),
            published_at,
            body: "body".to_string(),
            source: "feed".to_string(),
            link: None,
            kind: ContentKind::Article,
        }
    }

    #[test]
    fn test_old_items_excluded() {
        let cutoff = Utc::now() - Duration::hours(24);
        let kept = select_recent(
            vec![item("old", Some(cutoff - Duration::hours(1)))],
            cutoff,
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_missing_timestamp_included() {
        let cutoff = Utc::now() - Duration::hours(24);
        let kept = select_recent(vec![item("undated", None)], cutoff);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_order_preserved() {
        let cutoff = Utc::now() - Duration::hours(24);
        let recent = Some(cutoff + Duration::hours(1));
        let kept = select_recent(
            vec![
                item("first", recent),
                item("stale", Some(cutoff - Duration::hours(2))),
                item("second", None),
                item("third", recent),
            ],
            cutoff,
        );
        let titles: Vec<&str> = kept.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_exactly_at_cutoff_kept() {
        let cutoff = Utc::now() - Duration::hours(24);
        let kept = select_recent(vec![item("boundary", Some(cutoff))], cutoff);
        assert_eq!(kept.len(), 1);
    }
}
