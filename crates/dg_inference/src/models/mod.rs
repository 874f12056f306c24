use std::sync::Arc;

use dg_core::{Error, Result, Summarizer};

pub mod claude;
pub mod dummy;

pub use claude::ClaudeModel;
pub use dummy::DummyModel;

/// Build a summarizer by name. `claude` needs an API key; `dummy` is for
/// tests and local dry runs.
pub fn create_model(name: &str, api_key: Option<String>) -> Result<Arc<dyn Summarizer>> {
    match name {
        "claude" => Ok(Arc::new(ClaudeModel::new(api_key)?)),
        "dummy" => Ok(Arc::new(DummyModel)),
        other => Err(Error::Inference(format!("Unknown model: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dummy() {
        let model = create_model("dummy", None).unwrap();
        assert_eq!(model.name(), "Dummy");
    }

    #[test]
    fn test_create_claude_requires_key() {
        assert!(create_model("claude", None).is_err());
        let model = create_model("claude", Some("test-key".to_string())).unwrap();
        assert_eq!(model.name(), "Claude");
    }

    #[test]
    fn test_create_unknown() {
        assert!(create_model("gpt", None).is_err());
    }
}
