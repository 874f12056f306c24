use tracing::{error, info};

use crate::AppState;

pub mod digest;
pub mod newsletter;
pub mod transcript;
pub mod webhook;

/// Send one document to every configured recipient, sequentially, returning
/// the successful and failed recipient lists. Partial success is success.
pub(crate) async fn send_to_all(
    state: &AppState,
    subject: &str,
    body_html: &str,
) -> (Vec<String>, Vec<String>) {
    let mut successful = Vec::new();
    let mut failed = Vec::new();

    for recipient in &state.config.recipients {
        info!("📬 Sending to {recipient}");
        match state.mailer.send_html(recipient, subject, body_html).await {
            Ok(()) => successful.push(recipient.clone()),
            Err(e) => {
                error!("Failed to send to {recipient}: {e}");
                failed.push(recipient.clone());
            }
        }
    }

    (successful, failed)
}
