use super::AttributeStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::{collections::HashMap, sync::RwLock};
use uuid::Uuid;

/// In-memory attribute store for tests and single-process embeddings.
#[derive(Default)]
pub struct MemoryStore {
    attributes: RwLock<HashMap<(Uuid, String), String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttributeStore for MemoryStore {
    async fn get(&self, user: Uuid, name: &str) -> Result<Option<String>> {
        let attributes = self
            .attributes
            .read()
            .map_err(|_| anyhow!("attribute lock poisoned"))?;
        Ok(attributes.get(&(user, name.to_string())).cloned())
    }

    async fn set(&self, user: Uuid, name: &str, value: &str) -> Result<()> {
        let mut attributes = self
            .attributes
            .write()
            .map_err(|_| anyhow!("attribute lock poisoned"))?;
        attributes.insert((user, name.to_string()), value.to_string());
        Ok(())
    }

    async fn delete(&self, user: Uuid, name: &str) -> Result<()> {
        let mut attributes = self
            .attributes
            .write()
            .map_err(|_| anyhow!("attribute lock poisoned"))?;
        attributes.remove(&(user, name.to_string()));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete_round_trip() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        assert_eq!(store.get(user, "attr").await.unwrap(), None);

        store.set(user, "attr", "first").await.unwrap();
        assert_eq!(
            store.get(user, "attr").await.unwrap(),
            Some("first".to_string())
        );

        store.set(user, "attr", "second").await.unwrap();
        assert_eq!(
            store.get(user, "attr").await.unwrap(),
            Some("second".to_string())
        );

        store.delete(user, "attr").await.unwrap();
        assert_eq!(store.get(user, "attr").await.unwrap(), None);

        // Deleting again is not an error.
        store.delete(user, "attr").await.unwrap();
    }

    #[tokio::test]
    async fn attributes_are_scoped_per_user() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.set(alice, "attr", "value").await.unwrap();
        assert_eq!(store.get(bob, "attr").await.unwrap(), None);
    }
}
