use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored meeting records expire after this many days if cleanup never ran.
pub const RECORD_TTL_DAYS: i64 = 7;

/// "Today" for digest purposes is computed in a fixed UTC-8 offset. This is
/// deliberately not a real timezone lookup, so there is no DST adjustment.
pub fn today_pacific() -> NaiveDate {
    let offset = FixedOffset::west_opt(8 * 3600).unwrap();
    Utc::now().with_timezone(&offset).date_naive()
}

/// A meeting received over the webhook, persisted until the daily digest
/// picks it up. `date` + `meeting_id` form the storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub date: NaiveDate,
    pub meeting_id: Uuid,
    pub title: String,
    pub attendees: Vec<String>,
    pub notes: String,
    pub transcript: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Epoch seconds; the store treats this as automatic expiry.
    pub ttl: i64,
}

impl MeetingRecord {
    pub fn new(
        title: String,
        attendees: Vec<String>,
        notes: String,
        transcript: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            date: today_pacific(),
            meeting_id: Uuid::new_v4(),
            title,
            attendees,
            notes,
            transcript,
            created_at: now,
            ttl: (now + Duration::days(RECORD_TTL_DAYS)).timestamp(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Email,
    Article,
}

/// A fetched newsletter email or RSS article. Produced per invocation and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    pub author: String,
    pub published_at: Option<DateTime<Utc>>,
    pub body: String,
    pub source: String,
    pub link: Option<String>,
    pub kind: ContentKind,
}

/// Outcome of the meeting filter. `reason` is `Some` exactly when `skip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDecision {
    pub skip: bool,
    pub reason: Option<String>,
}

impl FilterDecision {
    pub fn keep() -> Self {
        Self {
            skip: false,
            reason: None,
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            skip: true,
            reason: Some(reason.into()),
        }
    }
}

/// Shared shape the digest assembler renders against, so meetings, emails
/// and articles flow through one prompt builder.
pub trait DigestEntry {
    fn kind_label(&self) -> &'static str;
    fn heading(&self) -> &str;
    fn source_label(&self) -> String;
    fn byline_label(&self) -> &'static str {
        "FROM"
    }
    fn byline(&self) -> String;
    fn body(&self) -> &str;
    fn secondary(&self) -> Option<&str> {
        None
    }
    fn link(&self) -> Option<&str> {
        None
    }
}

impl DigestEntry for MeetingRecord {
    fn kind_label(&self) -> &'static str {
        "MEETING"
    }

    fn heading(&self) -> &str {
        &self.title
    }

    fn source_label(&self) -> String {
        "Meeting notes".to_string()
    }

    fn byline_label(&self) -> &'static str {
        "ATTENDEES"
    }

    fn byline(&self) -> String {
        if self.attendees.is_empty() {
            "Not specified".to_string()
        } else {
            self.attendees.join(", ")
        }
    }

    fn body(&self) -> &str {
        &self.notes
    }

    fn secondary(&self) -> Option<&str> {
        self.transcript.as_deref()
    }
}

impl DigestEntry for ContentItem {
    fn kind_label(&self) -> &'static str {
        match self.kind {
            ContentKind::Email => "EMAIL",
            ContentKind::Article => "ARTICLE",
        }
    }

    fn heading(&self) -> &str {
        &self.title
    }

    fn source_label(&self) -> String {
        self.source.clone()
    }

    fn byline(&self) -> String {
        self.author.clone()
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}
