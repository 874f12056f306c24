use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::types::MeetingRecord;
use crate::Result;

#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Store one meeting record
    async fn put_meeting(&self, record: &MeetingRecord) -> Result<()>;

    /// All records for a date partition
    async fn meetings_for_date(&self, date: NaiveDate) -> Result<Vec<MeetingRecord>>;

    /// Delete one record by its full key
    async fn delete_meeting(&self, date: NaiveDate, meeting_id: Uuid) -> Result<()>;

    /// Delete every record for a date, returning how many went away.
    async fn delete_meetings_for_date(&self, date: NaiveDate) -> Result<usize> {
        let meetings = self.meetings_for_date(date).await?;
        for meeting in &meetings {
            self.delete_meeting(date, meeting.meeting_id).await?;
        }
        Ok(meetings.len())
    }
}
