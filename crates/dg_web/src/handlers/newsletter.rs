use std::sync::Arc;

use axum::extract::State;
use serde_json::json;
use tracing::{error, info};

use dg_core::types::today_pacific;
use dg_core::{ContentItem, Error, Result};
use dg_inference::{prompt, render};

use crate::handlers::send_to_all;
use crate::{ApiResponse, AppState};

/// Newsletter digest: fetch recent emails and feed articles, summarize,
/// send. No storage involved.
pub async fn run_newsletter(State(state): State<Arc<AppState>>) -> ApiResponse {
    info!("Starting newsletter summarization");

    match generate_and_send(&state).await {
        Ok(response) => response,
        Err(e) => {
            error!("Error in newsletter handler: {e}");
            ApiResponse::from_error(&e)
        }
    }
}

async fn generate_and_send(state: &AppState) -> Result<ApiResponse> {
    let config = &state.config;

    info!("Fetching emails from {} senders", config.gmail_senders.len());
    let emails = state
        .sources
        .fetch_emails(&config.gmail_senders, config.lookback_hours)
        .await?;
    info!("Found {} emails", emails.len());

    info!("Fetching articles from {} RSS feeds", config.rss_feeds.len());
    let articles = state
        .sources
        .fetch_articles(&config.rss_feeds, config.lookback_hours)
        .await?;
    info!("Found {} articles", articles.len());

    if emails.is_empty() && articles.is_empty() {
        info!("No content found to summarize");
        return Ok(ApiResponse::ok(json!({
            "message": "No content found to summarize",
            "emails": 0,
            "articles": 0,
        })));
    }

    let email_count = emails.len();
    let article_count = articles.len();

    let mut items: Vec<ContentItem> = emails;
    items.extend(articles);

    info!("🤖 Summarizing content");
    let prompt = prompt::newsletter_prompt(&items)
        .ok_or_else(|| Error::Inference("Failed to generate summary".to_string()))?;
    let summary = state.summarizer.summarize(&prompt).await?;

    let today = today_pacific();
    let email_html = render::newsletter_email(&summary, email_count, article_count, today);
    let subject = render::newsletter_subject(today);

    let (destinations, failed) = send_to_all(state, &subject, &email_html).await;

    if destinations.is_empty() {
        error!("Failed to send email to any recipient");
        return Ok(ApiResponse::server_error(
            "Failed to send email to any recipient",
        ));
    }

    Ok(ApiResponse::ok(json!({
        "message": "Newsletter digest sent successfully",
        "emails": email_count,
        "articles": article_count,
        "destinations": destinations,
        "failed": failed,
    })))
}
