use std::sync::Arc;

use dg_core::config::AppConfig;
use dg_core::{Mailer, MeetingStore, Summarizer};
use dg_sources::{ContentSource, TranscriptSource};

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn MeetingStore>,
    pub summarizer: Arc<dyn Summarizer>,
    pub mailer: Arc<dyn Mailer>,
    pub sources: Arc<dyn ContentSource>,
    pub transcripts: Arc<dyn TranscriptSource>,
}
