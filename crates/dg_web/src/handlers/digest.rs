use std::sync::Arc;

use axum::extract::State;
use serde_json::json;
use tracing::{error, info};

use dg_core::types::today_pacific;
use dg_core::{Error, Result};
use dg_inference::{prompt, render};

use crate::handlers::send_to_all;
use crate::{ApiResponse, AppState};

/// Daily digest: query today's meetings, summarize, send, then clean up.
pub async fn run_digest(State(state): State<Arc<AppState>>) -> ApiResponse {
    info!("Starting daily meeting digest");

    match generate_and_send(&state).await {
        Ok(response) => response,
        Err(e) => {
            error!("Error in digest handler: {e}");
            ApiResponse::from_error(&e)
        }
    }
}

async fn generate_and_send(state: &AppState) -> Result<ApiResponse> {
    let today = today_pacific();
    info!("Fetching meetings for {today}");

    let meetings = state.store.meetings_for_date(today).await?;
    let subject = render::digest_subject(today);

    let email_html = if meetings.is_empty() {
        info!("No meetings to summarize today - sending notification email");
        render::no_meetings_email(today)
    } else {
        info!("Found {} meetings to summarize", meetings.len());
        let prompt = prompt::meetings_prompt(&meetings)
            .ok_or_else(|| Error::Inference("Failed to generate summary".to_string()))?;
        let summary = state.summarizer.summarize(&prompt).await?;
        let titles: Vec<String> = meetings.iter().map(|m| m.title.clone()).collect();
        render::digest_email(&titles, &summary, today)
    };

    let (destinations, failed) = send_to_all(state, &subject, &email_html).await;

    if destinations.is_empty() {
        error!("Failed to send email to any recipient");
        return Ok(ApiResponse::server_error(
            "Failed to send email to any recipient",
        ));
    }

    // Destructive cleanup happens only after at least one confirmed send,
    // and only when there was anything to clean up.
    if !meetings.is_empty() {
        let deleted = state.store.delete_meetings_for_date(today).await?;
        info!("✨ Cleaned up {deleted} meetings");
    }

    Ok(ApiResponse::ok(json!({
        "message": "Daily digest sent successfully",
        "meetings_count": meetings.len(),
        "date": today.to_string(),
        "destinations": destinations,
        "failed": failed,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{make_state, test_config, MockMailer, MockSummarizer};
    use axum::http::StatusCode;
    use dg_core::{MeetingRecord, MeetingStore};
    use dg_storage::MemoryStore;

    fn meeting(title: &str) -> MeetingRecord {
        MeetingRecord::new(
            title.to_string(),
            vec!["a@b.com".to_string()],
            "notes".to_string(),
            None,
        )
    }

    async fn state_with_meetings(
        recipients: &[&str],
        fail_for: &[&str],
        titles: &[&str],
    ) -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        for title in titles {
            store.put_meeting(&meeting(title)).await.unwrap();
        }
        let state = make_state(
            test_config(recipients),
            store.clone(),
            Arc::new(MockSummarizer {
                reply: Some("<h2>Summary</h2>".to_string()),
            }),
            Arc::new(MockMailer::new(fail_for)),
        );
        (state, store)
    }

    #[tokio::test]
    async fn test_digest_success_cleans_up() {
        let (state, store) = state_with_meetings(&["a@example.com"], &[], &["Sync"]).await;
        let response = run_digest(State(Arc::new(state))).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["meetings_count"], 1);
        assert_eq!(response.body["destinations"][0], "a@example.com");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_partial_failure_still_cleans_up() {
        let (state, store) = state_with_meetings(
            &["good@example.com", "bad@example.com"],
            &["bad@example.com"],
            &["Sync"],
        )
        .await;
        let response = run_digest(State(Arc::new(state))).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["destinations"][0], "good@example.com");
        assert_eq!(response.body["failed"][0], "bad@example.com");
        // One send succeeded, so cleanup still executes.
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_all_sends_failed_no_cleanup() {
        let (state, store) = state_with_meetings(
            &["a@example.com", "b@example.com"],
            &["a@example.com", "b@example.com"],
            &["Sync"],
        )
        .await;
        let response = run_digest(State(Arc::new(state))).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        // Zero sends succeeded: the records must survive.
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_no_meetings_sends_notification() {
        let mailer = Arc::new(MockMailer::new(&[]));
        let state = make_state(
            test_config(&["a@example.com"]),
            Arc::new(MemoryStore::new()),
            Arc::new(MockSummarizer {
                reply: Some("<h2>unused</h2>".to_string()),
            }),
            mailer.clone(),
        );
        let response = run_digest(State(Arc::new(state))).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["meetings_count"], 0);

        // A notification went out even with nothing to digest.
        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
    }

    #[tokio::test]
    async fn test_summarizer_failure_is_500_and_no_send() {
        let store = Arc::new(MemoryStore::new());
        store.put_meeting(&meeting("Sync")).await.unwrap();
        let state = make_state(
            test_config(&["a@example.com"]),
            store.clone(),
            Arc::new(MockSummarizer { reply: None }),
            Arc::new(MockMailer::new(&[])),
        );
        let response = run_digest(State(Arc::new(state))).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        // Nothing was sent, so nothing may be deleted.
        assert_eq!(store.len().await, 1);
    }
}
