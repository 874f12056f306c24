use async_trait::async_trait;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use dg_core::config::GmailCredentials;
use dg_core::{ContentItem, ContentKind, Error, Mailer, Result};

use crate::html::html_to_text;

const GMAIL_API: &str = "https://gmail.googleapis.com/gmail/v1";
const MAX_RESULTS: u32 = 50;
const MIME_BOUNDARY: &str = "=_digest_part";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize, Default)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Deserialize)]
struct Message {
    payload: Option<MessagePart>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct MessagePart {
    mime_type: String,
    headers: Vec<Header>,
    body: Option<PartBody>,
    parts: Option<Vec<MessagePart>>,
}

#[derive(Deserialize, Default)]
struct Header {
    name: String,
    value: String,
}

#[derive(Deserialize, Default)]
struct PartBody {
    data: Option<String>,
}

#[derive(Serialize)]
struct SendRequest {
    raw: String,
}

/// Gmail REST client: fetches newsletter emails and sends digests. One
/// instance per invocation, built from the OAuth credential blob.
pub struct GmailClient {
    client: reqwest::Client,
    credentials: GmailCredentials,
}

impl std::fmt::Debug for GmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailClient")
            .field("client", &"<reqwest::Client>")
            .field("credentials", &"<redacted>")
            .finish()
    }
}

impl GmailClient {
    pub fn new(credentials: GmailCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }

    /// Exchange the refresh token for an access token. Falls back to the
    /// stored token when no refresh token was configured.
    async fn access_token(&self) -> Result<String> {
        if self.credentials.refresh_token.is_empty() {
            if self.credentials.token.is_empty() {
                return Err(Error::Mail("No Gmail credentials configured".to_string()));
            }
            return Ok(self.credentials.token.clone());
        }

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Mail(format!("Token refresh failed: {e}")))?
            .json::<TokenResponse>()
            .await?;

        Ok(response.access_token)
    }

    /// Fetch emails from the given senders within the lookback window.
    /// Per-message failures are logged and skipped.
    pub async fn fetch_from_senders(
        &self,
        senders: &[String],
        hours_back: i64,
    ) -> Result<Vec<ContentItem>> {
        if senders.is_empty() {
            return Ok(Vec::new());
        }

        let token = self.access_token().await?;
        let sender_query = senders
            .iter()
            .map(|s| format!("from:{s}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let after = (Utc::now() - Duration::hours(hours_back)).timestamp();
        let query = format!("({sender_query}) after:{after}");

        let max_results = MAX_RESULTS.to_string();
        let list = self
            .client
            .get(format!("{GMAIL_API}/users/me/messages"))
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Fetch(format!("Gmail list failed: {e}")))?
            .json::<MessageList>()
            .await?;

        let mut emails = Vec::new();
        for message in &list.messages {
            match self.fetch_message(&token, &message.id).await {
                Ok(Some(item)) => emails.push(item),
                Ok(None) => {}
                Err(e) => warn!("Failed to fetch email {}: {e}", message.id),
            }
        }

        Ok(emails)
    }

    async fn fetch_message(&self, token: &str, id: &str) -> Result<Option<ContentItem>> {
        let message = self
            .client
            .get(format!("{GMAIL_API}/users/me/messages/{id}"))
            .bearer_auth(token)
            .query(&[("format", "full")])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Fetch(format!("Gmail get failed: {e}")))?
            .json::<Message>()
            .await?;

        let Some(payload) = message.payload else {
            return Ok(None);
        };

        let mut subject = String::new();
        let mut sender = String::new();
        let mut date = String::new();
        for header in &payload.headers {
            match header.name.to_lowercase().as_str() {
                "subject" => subject = header.value.clone(),
                "from" => sender = header.value.clone(),
                "date" => date = header.value.clone(),
                _ => {}
            }
        }

        let body = extract_body(&payload);
        if body.is_empty() {
            return Ok(None);
        }

        let published_at = DateTime::parse_from_rfc2822(&date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Some(ContentItem {
            title: subject,
            author: sender,
            published_at,
            body,
            source: "Gmail".to_string(),
            link: None,
            kind: ContentKind::Email,
        }))
    }
}

/// Pull a plain-text body out of a message payload, preferring text/plain
/// parts, converting text/html, and recursing into nested multiparts.
fn extract_body(payload: &MessagePart) -> String {
    let mut body_text = String::new();

    if let Some(data) = payload.body.as_ref().and_then(|b| b.data.as_deref()) {
        body_text = decode_body(data);
    }

    if let Some(parts) = &payload.parts {
        for part in parts {
            match part.mime_type.as_str() {
                "text/plain" => {
                    if let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) {
                        body_text = decode_body(data);
                        break;
                    }
                }
                "text/html" => {
                    if let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) {
                        body_text = html_to_text(&decode_body(data));
                    }
                }
                mime if mime.starts_with("multipart/") => {
                    let nested = extract_body(part);
                    if !nested.is_empty() {
                        body_text = nested;
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    body_text.trim().to_string()
}

fn decode_body(data: &str) -> String {
    let decoded = URL_SAFE
        .decode(data)
        .or_else(|_| URL_SAFE_NO_PAD.decode(data))
        .unwrap_or_default();
    String::from_utf8_lossy(&decoded).into_owned()
}

/// Build the raw multipart/alternative message the Gmail send endpoint
/// expects, plain text first.
fn build_mime(to: &str, subject: &str, body_text: &str, body_html: &str) -> String {
    format!(
        "To: {to}\r\n\
         Subject: {subject}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: multipart/alternative; boundary=\"{MIME_BOUNDARY}\"\r\n\
         \r\n\
         --{MIME_BOUNDARY}\r\n\
         Content-Type: text/plain; charset=\"UTF-8\"\r\n\
         \r\n\
         {body_text}\r\n\
         --{MIME_BOUNDARY}\r\n\
         Content-Type: text/html; charset=\"UTF-8\"\r\n\
         \r\n\
         {body_html}\r\n\
         --{MIME_BOUNDARY}--\r\n"
    )
}

#[async_trait]
impl Mailer for GmailClient {
    async fn send_html(&self, to: &str, subject: &str, body_html: &str) -> Result<()> {
        let token = self.access_token().await?;
        let body_text = html_to_text(body_html);
        let raw = URL_SAFE.encode(build_mime(to, subject, &body_text, body_html));

        self.client
            .post(format!("{GMAIL_API}/users/me/messages/send"))
            .bearer_auth(&token)
            .json(&SendRequest { raw })
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Mail(format!("Gmail send failed: {e}")))?;

        Ok(())
    }
}
