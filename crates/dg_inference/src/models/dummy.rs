use async_trait::async_trait;

use dg_core::{Result, Summarizer};

/// Offline summarizer: echoes the first few sentences of the prompt's tail.
/// Good enough for tests and local dry runs.
#[derive(Debug, Default)]
pub struct DummyModel;

#[async_trait]
impl Summarizer for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn summarize(&self, prompt: &str) -> Result<String> {
        let sentences: Vec<&str> = prompt
            .split(|c| c == '.' || c == '!' || c == '?')
            .filter(|s| !s.trim().is_empty())
            .take(3)
            .collect();

        Ok(sentences.join(". ") + ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel;
        let summary = model
            .summarize("First sentence. Second sentence. Third. Fourth.")
            .await
            .unwrap();
        assert!(!summary.is_empty());
        assert!(summary.contains("First sentence"));
        assert!(!summary.contains("Fourth"));
    }
}
