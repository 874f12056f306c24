use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use dg_core::{Error, MeetingRecord, MeetingStore, Result};

const DEFAULT_TABLE: &str = "meetings";

/// DynamoDB-backed store. Partition key `date` (YYYY-MM-DD), sort key
/// `meeting_id`; the table's TTL attribute is `ttl`.
#[derive(Debug)]
pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    pub async fn new() -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let table = std::env::var("MEETINGS_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string());
        Ok(Self {
            client: Client::new(&config),
            table,
        })
    }
}

fn get_s(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

fn from_item(item: &HashMap<String, AttributeValue>) -> Result<MeetingRecord> {
    let date = get_s(item, "date")
        .and_then(|d| d.parse::<NaiveDate>().ok())
        .ok_or_else(|| Error::Storage("Record missing date".to_string()))?;
    let meeting_id = get_s(item, "meeting_id")
        .and_then(|id| id.parse::<Uuid>().ok())
        .ok_or_else(|| Error::Storage("Record missing meeting_id".to_string()))?;

    let attendees = item
        .get("attendees")
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_s().ok().cloned())
                .collect()
        })
        .unwrap_or_default();

    let created_at = get_s(item, "created_at")
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let ttl = item
        .get("ttl")
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<i64>().ok())
        .unwrap_or_default();

    Ok(MeetingRecord {
        date,
        meeting_id,
        title: get_s(item, "title").unwrap_or_default(),
        attendees,
        notes: get_s(item, "notes").unwrap_or_default(),
        transcript: get_s(item, "transcript"),
        created_at,
        ttl,
    })
}

#[async_trait]
impl MeetingStore for DynamoStore {
    async fn put_meeting(&self, record: &MeetingRecord) -> Result<()> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table)
            .item("date", AttributeValue::S(record.date.to_string()))
            .item(
                "meeting_id",
                AttributeValue::S(record.meeting_id.to_string()),
            )
            .item("title", AttributeValue::S(record.title.clone()))
            .item(
                "attendees",
                AttributeValue::L(
                    record
                        .attendees
                        .iter()
                        .map(|a| AttributeValue::S(a.clone()))
                        .collect(),
                ),
            )
            .item("notes", AttributeValue::S(record.notes.clone()))
            .item(
                "created_at",
                AttributeValue::S(record.created_at.to_rfc3339()),
            )
            .item("ttl", AttributeValue::N(record.ttl.to_string()));

        if let Some(transcript) = &record.transcript {
            request = request.item("transcript", AttributeValue::S(transcript.clone()));
        }

        request
            .send()
            .await
            .map_err(|e| Error::Storage(format!("put_item failed: {e}")))?;
        Ok(())
    }

    async fn meetings_for_date(&self, date: NaiveDate) -> Result<Vec<MeetingRecord>> {
        let response = self
            .client
            .query()
            .table_name(&self.table)
            .key_condition_expression("#d = :date")
            .expression_attribute_names("#d", "date")
            .expression_attribute_values(":date", AttributeValue::S(date.to_string()))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("query failed: {e}")))?;

        response.items().iter().map(from_item).collect()
    }

    async fn delete_meeting(&self, date: NaiveDate, meeting_id: Uuid) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key("date", AttributeValue::S(date.to_string()))
            .key("meeting_id", AttributeValue::S(meeting_id.to_string()))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("delete_item failed: {e}")))?;
        Ok(())
    }
}
