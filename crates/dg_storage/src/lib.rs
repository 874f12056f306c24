use std::sync::Arc;

use dg_core::{Error, MeetingStore, Result};

pub mod backends;

pub use backends::memory::MemoryStore;

/// Build a store by name. `memory` is always available; `dynamodb` needs the
/// feature of the same name.
pub async fn create_store(kind: &str) -> Result<Arc<dyn MeetingStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        #[cfg(feature = "dynamodb")]
        "dynamodb" => Ok(Arc::new(backends::dynamodb::DynamoStore::new().await?)),
        other => Err(Error::Storage(format!("Unknown storage backend: {other}"))),
    }
}

pub mod prelude {
    pub use super::create_store;
    pub use super::backends::memory::MemoryStore;
    pub use dg_core::MeetingStore;
}
