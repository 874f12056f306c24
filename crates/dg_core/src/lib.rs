pub mod config;
pub mod error;
pub mod filter;
pub mod mail;
pub mod models;
pub mod storage;
pub mod truncate;
pub mod types;
pub mod window;

pub use error::Error;
pub use filter::FilterConfig;
pub use mail::Mailer;
pub use models::Summarizer;
pub use storage::MeetingStore;
pub use types::{ContentItem, ContentKind, DigestEntry, FilterDecision, MeetingRecord};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::types::{ContentItem, ContentKind, DigestEntry, FilterDecision, MeetingRecord};
    pub use crate::{Error, Mailer, MeetingStore, Result, Summarizer};
}
