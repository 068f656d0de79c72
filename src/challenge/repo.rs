//! Thin persistence boundary over the injected per-user attribute store.
//!
//! The store is the single source of truth: every operation reads or
//! writes through it, nothing is cached across calls, and writes are
//! last-writer-wins with no guarantees beyond the store's single-record
//! atomicity.

use crate::challenge::error::Error;
use crate::store::AttributeStore;
use std::sync::Arc;
use uuid::Uuid;

/// Attribute holding the armor-stripped public key body.
pub const PUBLIC_KEY_ATTR: &str = "_kunci_public_key";
/// Attribute holding the Argon2id hash of the pending token.
pub const PENDING_TOKEN_ATTR: &str = "_kunci_token";

/// Per-user storage of the public key record and pending challenge.
#[derive(Clone)]
pub struct ChallengeRepo {
    store: Arc<dyn AttributeStore>,
}

impl ChallengeRepo {
    #[must_use]
    pub fn new(store: Arc<dyn AttributeStore>) -> Self {
        Self { store }
    }

    /// Fetch the stored key body, `None` if the user never provisioned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    pub async fn get_key(&self, user: Uuid) -> Result<Option<String>, Error> {
        Ok(self.store.get(user, PUBLIC_KEY_ATTR).await?)
    }

    /// Store a key body, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn set_key(&self, user: Uuid, body: &str) -> Result<(), Error> {
        Ok(self.store.set(user, PUBLIC_KEY_ATTR, body).await?)
    }

    /// Fetch the pending token hash, `None` if no challenge is outstanding.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    pub async fn get_pending_hash(&self, user: Uuid) -> Result<Option<String>, Error> {
        Ok(self.store.get(user, PENDING_TOKEN_ATTR).await?)
    }

    /// Store a pending token hash, replacing any outstanding challenge.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn set_pending_hash(&self, user: Uuid, hash: &str) -> Result<(), Error> {
        Ok(self.store.set(user, PENDING_TOKEN_ATTR, hash).await?)
    }

    /// Delete the pending challenge record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store delete fails.
    pub async fn delete_pending(&self, user: Uuid) -> Result<(), Error> {
        Ok(self.store.delete(user, PENDING_TOKEN_ATTR).await?)
    }
}
