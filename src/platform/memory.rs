use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::capability::KeyValueStore;

/// In-memory key-value store
///
/// Backs tests and the diagnostic binary; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }
}
