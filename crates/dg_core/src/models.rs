use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    /// Turn an assembled prompt into summary text
    async fn summarize(&self, prompt: &str) -> Result<String>;
}
