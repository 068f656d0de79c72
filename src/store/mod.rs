//! Per-user attribute storage collaborators.
//!
//! The challenge core reads and writes through [`AttributeStore`]; the
//! store is the single source of truth and nothing is cached across
//! calls. [`MemoryStore`] backs tests and single-process embeddings;
//! [`PostgresStore`] is the production implementation.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Per-user key-value attribute store provided by the host service.
///
/// Implementations guarantee single-record atomicity only; concurrent
/// writers to the same attribute race last-writer-wins.
#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// Fetch an attribute value, `None` if unset.
    async fn get(&self, user: Uuid, name: &str) -> Result<Option<String>>;

    /// Set an attribute value, replacing any existing one.
    async fn set(&self, user: Uuid, name: &str, value: &str) -> Result<()>;

    /// Delete an attribute. Deleting an absent attribute is not an error.
    async fn delete(&self, user: Uuid, name: &str) -> Result<()>;
}
