use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use dg_inference::prompt;
use dg_sources::extract_video_id;

use crate::{ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
struct TranscriptRequest {
    url: Option<String>,
}

fn parse_url(body: &str) -> Result<String, ApiResponse> {
    let request: TranscriptRequest = serde_json::from_str(body)
        .map_err(|_| ApiResponse::bad_request("Missing 'url' in request body."))?;

    let url = request
        .url
        .ok_or_else(|| ApiResponse::bad_request("Missing 'url' in request body."))?;

    let url = url.trim().to_string();
    if url.is_empty() {
        return Err(ApiResponse::bad_request("URL cannot be empty."));
    }

    Ok(url)
}

async fn fetch(state: &AppState, url: &str) -> Result<(String, String), ApiResponse> {
    let Some(video_id) = extract_video_id(url) else {
        return Err(ApiResponse::bad_request(
            "Could not extract video ID from URL. Please provide a valid YouTube URL.",
        ));
    };

    match state.transcripts.fetch_transcript(&video_id).await {
        Ok(transcript) => Ok((video_id, transcript)),
        Err(e) => {
            error!("Transcript fetch failed for {video_id}: {e}");
            Err(ApiResponse {
                status: axum::http::StatusCode::BAD_REQUEST,
                body: json!({
                    "success": false,
                    "video_id": video_id,
                    "error": e.to_string(),
                }),
            })
        }
    }
}

/// Fetch and summarize one video transcript.
pub async fn summarize_video(State(state): State<Arc<AppState>>, body: String) -> ApiResponse {
    let url = match parse_url(&body) {
        Ok(url) => url,
        Err(response) => return response,
    };

    let (video_id, transcript) = match fetch(&state, &url).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    info!("Summarizing transcript for {video_id}");
    let prompt = prompt::transcript_prompt(&transcript);
    match state.summarizer.summarize(&prompt).await {
        Ok(summary) => ApiResponse::ok(json!({
            "success": true,
            "video_id": video_id,
            "transcript": transcript,
            "summary": summary,
        })),
        Err(e) => {
            error!("Failed to generate summary for {video_id}: {e}");
            ApiResponse {
                status: axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({
                    "success": false,
                    "video_id": video_id,
                    "error": format!("Failed to generate summary: {e}"),
                }),
            }
        }
    }
}

/// Fetch just the transcript, no summarization.
pub async fn fetch_video_transcript(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResponse {
    let url = match parse_url(&body) {
        Ok(url) => url,
        Err(response) => return response,
    };

    match fetch(&state, &url).await {
        Ok((video_id, transcript)) => ApiResponse::ok(json!({
            "success": true,
            "video_id": video_id,
            "transcript": transcript,
        })),
        Err(response) => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{test_config, MockMailer, MockSources, MockSummarizer, MockTranscripts};
    use axum::http::StatusCode;
    use dg_storage::MemoryStore;

    fn transcript_state(transcript: Option<&str>, reply: Option<&str>) -> Arc<AppState> {
        Arc::new(AppState {
            config: test_config(&[]),
            store: Arc::new(MemoryStore::new()),
            summarizer: Arc::new(MockSummarizer {
                reply: reply.map(|s| s.to_string()),
            }),
            mailer: Arc::new(MockMailer::new(&[])),
            sources: Arc::new(MockSources {
                emails: Vec::new(),
                articles: Vec::new(),
            }),
            transcripts: Arc::new(MockTranscripts {
                transcript: transcript.map(|s| s.to_string()),
            }),
        })
    }

    const WATCH_URL: &str = r#"{"url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"}"#;

    #[tokio::test]
    async fn test_missing_url_is_400() {
        let state = transcript_state(Some("text"), Some("summary"));
        let response = summarize_video(State(state), "{}".to_string()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "Missing 'url' in request body.");
    }

    #[tokio::test]
    async fn test_empty_url_is_400() {
        let state = transcript_state(Some("text"), Some("summary"));
        let response = summarize_video(State(state), r#"{"url": "  "}"#.to_string()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "URL cannot be empty.");
    }

    #[tokio::test]
    async fn test_unrecognized_url_is_400() {
        let state = transcript_state(Some("text"), Some("summary"));
        let response =
            summarize_video(State(state), r#"{"url": "https://example.com/x"}"#.to_string()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["error"]
            .as_str()
            .unwrap()
            .contains("video ID"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_400_with_video_id() {
        let state = transcript_state(None, Some("summary"));
        let response = summarize_video(State(state), WATCH_URL.to_string()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["video_id"], "dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_summarize_success() {
        let state = transcript_state(Some("the transcript"), Some("the summary"));
        let response = summarize_video(State(state), WATCH_URL.to_string()).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["success"], true);
        assert_eq!(response.body["transcript"], "the transcript");
        assert_eq!(response.body["summary"], "the summary");
    }

    #[tokio::test]
    async fn test_summarizer_failure_is_500() {
        let state = transcript_state(Some("the transcript"), None);
        let response = summarize_video(State(state), WATCH_URL.to_string()).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body["success"], false);
    }

    #[tokio::test]
    async fn test_transcript_only_endpoint() {
        let state = transcript_state(Some("just text"), None);
        let response = fetch_video_transcript(State(state), WATCH_URL.to_string()).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["transcript"], "just text");
        assert!(response.body.get("summary").is_none());
    }
}
