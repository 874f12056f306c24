use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one HTML email. Implementations attach a derived plain-text
    /// alternative alongside the HTML body.
    async fn send_html(&self, to: &str, subject: &str, body_html: &str) -> Result<()>;
}
