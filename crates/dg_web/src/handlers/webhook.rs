use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use dg_core::{filter, Error, MeetingRecord, Result};

use crate::{ApiResponse, AppState};

fn default_title() -> String {
    "Untitled Meeting".to_string()
}

/// Attendees arrive either as a list or as one comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Attendees {
    List(Vec<String>),
    Csv(String),
}

impl Default for Attendees {
    fn default() -> Self {
        Attendees::List(Vec::new())
    }
}

impl Attendees {
    fn normalize(self) -> Vec<String> {
        match self {
            Attendees::List(list) => list,
            Attendees::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    attendees: Attendees,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    transcript: Option<String>,
}

#[derive(Debug)]
pub(crate) struct WebhookPayload {
    pub title: String,
    pub attendees: Vec<String>,
    pub notes: String,
    pub transcript: Option<String>,
}

/// Parse the webhook body, which is JSON or a JSON-encoded string of JSON.
pub(crate) fn parse_webhook_body(body: &str) -> Result<WebhookPayload> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::InvalidPayload(format!("Invalid JSON payload: {e}")))?;

    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| Error::InvalidPayload(format!("Invalid JSON payload: {e}")))?,
        other => other,
    };

    let raw: RawPayload = serde_json::from_value(value)
        .map_err(|e| Error::InvalidPayload(format!("Invalid JSON payload: {e}")))?;

    Ok(WebhookPayload {
        title: raw.title,
        attendees: raw.attendees.normalize(),
        notes: raw.notes,
        transcript: raw.transcript,
    })
}

/// Webhook ingestion: filter first, store only what survives.
pub async fn receive_meeting(State(state): State<Arc<AppState>>, body: String) -> ApiResponse {
    info!("Received webhook request");

    let payload = match parse_webhook_body(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!("{e}");
            return ApiResponse::bad_request("Invalid JSON payload");
        }
    };

    info!("Meeting: {}", payload.title);
    info!("Attendees: {:?}", payload.attendees);

    let decision = filter::evaluate(&payload.title, &payload.attendees, &state.config.filters);
    if decision.skip {
        let reason = decision.reason.unwrap_or_default();
        info!("Skipping meeting: {reason}");
        return ApiResponse::ok(json!({
            "message": "Meeting skipped",
            "reason": reason,
            "title": payload.title,
        }));
    }

    let record = MeetingRecord::new(
        payload.title,
        payload.attendees,
        payload.notes,
        payload.transcript,
    );

    match state.store.put_meeting(&record).await {
        Ok(()) => {
            info!("💾 Stored meeting {}: {}", record.meeting_id, record.title);
            ApiResponse::ok(json!({
                "message": "Meeting stored for daily digest",
                "meeting_id": record.meeting_id,
                "title": record.title,
            }))
        }
        Err(e) => {
            error!("Error in webhook handler: {e}");
            ApiResponse::server_error(e.to_string())
        }
    }
}
