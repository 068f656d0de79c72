//! # Kunci (Public-Key Challenge Second Factor)
//!
//! `kunci` implements a second authentication factor based on asymmetric
//! encryption. The server holds a user's public key; to authenticate, it
//! encrypts a freshly generated one-time token under that key and asks the
//! user to return the plaintext after decrypting it offline. The server
//! stores only a salted hash of the expected answer, and a token is valid
//! for exactly one successful validation.
//!
//! ## Provisioning
//!
//! Users paste an ASCII-armored public-key block. The armor header and
//! footer are stripped before storage, and only a key that round-trips
//! through a probe encryption is persisted; a rejected submission leaves
//! any previously stored key untouched.
//!
//! ## Challenges
//!
//! Issuing a challenge encrypts a fresh random token (sealed-box scheme:
//! ephemeral X25519 key agreement, HKDF-SHA256, ChaCha20-Poly1305) and
//! persists an Argon2id hash of the token as the sole record of the
//! outstanding challenge. Reissuing replaces the outstanding challenge;
//! the prior token becomes permanently unanswerable.
//!
//! ## Embedding
//!
//! The crate is presentation-free: the host service supplies user
//! identities ([`uuid::Uuid`]) and a per-user [`AttributeStore`], and wires
//! [`ChallengeService`] into its own HTTP/UI layer. [`MemoryStore`] backs
//! tests and single-process embeddings; [`PostgresStore`] is the
//! production store.

pub mod challenge;
pub mod store;

pub use challenge::{ChallengeService, Error, TokenPolicy, TokenService};
pub use store::{AttributeStore, MemoryStore, PostgresStore};
