use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use dg_core::{MeetingRecord, MeetingStore, Result};

/// In-memory store for tests and local runs. Honors the record TTL on read,
/// mirroring the managed store's automatic expiry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<MeetingRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn put_meeting(&self, record: &MeetingRecord) -> Result<()> {
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows
            .iter_mut()
            .find(|r| r.date == record.date && r.meeting_id == record.meeting_id)
        {
            *existing = record.clone();
        } else {
            rows.push(record.clone());
        }
        Ok(())
    }

    async fn meetings_for_date(&self, date: NaiveDate) -> Result<Vec<MeetingRecord>> {
        let now = Utc::now().timestamp();
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| r.date == date && r.ttl > now)
            .cloned()
            .collect())
    }

    async fn delete_meeting(&self, date: NaiveDate, meeting_id: Uuid) -> Result<()> {
        self.rows
            .write()
            .await
            .retain(|r| !(r.date == date && r.meeting_id == meeting_id));
        Ok(())
    }
}
