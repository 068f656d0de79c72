//! Challenge orchestration: key provisioning, issuance, verification.
//!
//! This service coordinates the challenge/response second factor:
//! 1. Provisioning validates and stores a user's public key.
//! 2. Issuance encrypts a fresh one-time token under that key and records
//!    the token hash as the sole statement of an outstanding challenge.
//! 3. Verification checks the returned plaintext and consumes the
//!    challenge on first success.

use crate::challenge::{armor, crypto, error::Error, repo::ChallengeRepo, token::TokenService};
use crate::store::AttributeStore;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Orchestrates the public-key challenge second factor.
///
/// Construct one per process with the collaborating attribute store and
/// token service; instances are cheap to clone and share across requests.
#[derive(Clone)]
pub struct ChallengeService {
    repo: ChallengeRepo,
    tokens: TokenService,
}

impl ChallengeService {
    #[must_use]
    pub fn new(store: Arc<dyn AttributeStore>, tokens: TokenService) -> Self {
        Self {
            repo: ChallengeRepo::new(store),
            tokens,
        }
    }

    /// Validates and stores a submitted public key for the user.
    ///
    /// The armor header and footer are stripped, and only a key that
    /// round-trips through the encryption engine is persisted. Rejection
    /// leaves any previously stored key untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] for a malformed or non-functional
    /// key, or [`Error::Store`] if persistence fails.
    #[instrument(skip(self, submission))]
    pub async fn provision_key(&self, user: Uuid, submission: &str) -> Result<(), Error> {
        let body = armor::strip(submission)?;
        if !crypto::test_key(&body) {
            warn!(%user, "rejected public key that failed the probe encryption");
            return Err(Error::InvalidKey);
        }
        self.repo.set_key(user, &body).await?;
        info!(%user, "public key provisioned");
        Ok(())
    }

    /// Whether the factor is available for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    pub async fn has_key(&self, user: Uuid) -> Result<bool, Error> {
        Ok(self
            .repo
            .get_key(user)
            .await?
            .is_some_and(|key| !key.is_empty()))
    }

    /// Issues a new challenge and returns the armored ciphertext for
    /// display.
    ///
    /// Reissuing silently replaces any outstanding challenge; the prior
    /// token becomes permanently unanswerable. The token hash is persisted
    /// only after encryption succeeds, so a failed issuance never strands
    /// a challenge the user cannot answer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoKeyProvisioned`] if the user has no stored key,
    /// [`Error::EncryptionFailed`] if the engine rejects the stored key,
    /// or [`Error::Store`] if persistence fails.
    #[instrument(skip(self))]
    pub async fn start_challenge(&self, user: Uuid) -> Result<String, Error> {
        let key = self
            .repo
            .get_key(user)
            .await?
            .filter(|key| !key.is_empty())
            .ok_or(Error::NoKeyProvisioned)?;

        let token = self.tokens.generate()?;
        let ciphertext = crypto::encrypt(token.plaintext.expose_secret(), &key)?;
        self.repo.set_pending_hash(user, &token.hash).await?;
        info!(%user, "challenge issued");
        Ok(ciphertext)
    }

    /// Verifies a submitted answer against the pending challenge.
    ///
    /// Tokens are single use: the pending record is deleted before `true`
    /// is returned, and a later identical submission yields `false`. A
    /// mismatch leaves the challenge pending and is a normal `false`,
    /// retryable indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if a store operation fails.
    #[instrument(skip(self, submitted))]
    pub async fn finish_challenge(&self, user: Uuid, submitted: &str) -> Result<bool, Error> {
        let Some(hash) = self.repo.get_pending_hash(user).await? else {
            return Ok(false);
        };
        if hash.is_empty() {
            return Ok(false);
        }
        if !self.tokens.verify(&hash, submitted) {
            info!(%user, "challenge answer mismatch");
            return Ok(false);
        }
        self.repo.delete_pending(user).await?;
        info!(%user, "challenge completed");
        Ok(true)
    }
}
