//! One-time token generation and verification.
//!
//! Tokens come from the OS CSPRNG and are never persisted in plaintext:
//! storage sees only an Argon2id PHC hash, and submissions are checked
//! through the password verifier's constant-time comparison. The service
//! is stateless with respect to persistence; single-use deletion is the
//! orchestrator's contract.

use crate::challenge::error::Error;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::{RngCore, rngs::OsRng};
use secrecy::SecretString;
use serde::Deserialize;

const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_[]{}<>~`+=,.;:/?|";

/// Token generation policy, deserializable from the host's config layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenPolicy {
    /// Number of characters in a generated token.
    pub length: usize,
    /// Include symbols in addition to alphanumerics.
    pub symbols: bool,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            length: 12,
            symbols: true,
        }
    }
}

/// A freshly generated one-time token: the plaintext to encrypt for the
/// user, and the hash to persist as the expected answer.
pub struct GeneratedToken {
    pub plaintext: SecretString,
    pub hash: String,
}

/// Generates random tokens and verifies submitted answers.
#[derive(Debug, Clone)]
pub struct TokenService {
    policy: TokenPolicy,
}

impl TokenService {
    #[must_use]
    pub fn new(policy: TokenPolicy) -> Self {
        Self { policy }
    }

    /// Generate a new token and its salted hash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hash`] if hashing fails.
    pub fn generate(&self) -> Result<GeneratedToken, Error> {
        let mut rng = OsRng;
        self.generate_with_rng(&mut rng)
    }

    fn generate_with_rng<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<GeneratedToken, Error> {
        let alphabet = self.alphabet();
        let mut raw = vec![0u8; self.policy.length];
        rng.fill_bytes(&mut raw);

        let mut token = String::with_capacity(self.policy.length);
        for byte in raw {
            let idx = usize::from(byte) % alphabet.len();
            if let Some(&char_byte) = alphabet.get(idx) {
                token.push(char_byte as char);
            }
        }

        let hash = hash_token(&token)?;
        Ok(GeneratedToken {
            plaintext: SecretString::from(token),
            hash,
        })
    }

    /// Check a submitted answer against the stored hash.
    ///
    /// A mismatch is a normal `false`, and so is a malformed stored hash;
    /// this path never panics on adversarial input.
    #[must_use]
    pub fn verify(&self, stored_hash: &str, submitted: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(submitted.as_bytes(), &parsed)
            .is_ok()
    }

    fn alphabet(&self) -> Vec<u8> {
        let mut alphabet = ALPHANUMERIC.to_vec();
        if self.policy.symbols {
            alphabet.extend_from_slice(SYMBOLS);
        }
        alphabet
    }
}

/// Hash a token using Argon2id with a fresh random salt.
fn hash_token(token: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(token.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| Error::Hash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use secrecy::ExposeSecret;

    #[test]
    fn token_matches_default_policy() {
        let tokens = TokenService::new(TokenPolicy::default());
        let generated = tokens.generate().unwrap();
        let plaintext = generated.plaintext.expose_secret();

        assert_eq!(plaintext.chars().count(), 12);
        let alphabet: Vec<char> = ALPHANUMERIC
            .iter()
            .chain(SYMBOLS)
            .map(|&b| b as char)
            .collect();
        assert!(plaintext.chars().all(|ch| alphabet.contains(&ch)));
    }

    #[test]
    fn policy_without_symbols_is_alphanumeric() {
        let tokens = TokenService::new(TokenPolicy {
            length: 20,
            symbols: false,
        });
        let generated = tokens.generate().unwrap();
        let plaintext = generated.plaintext.expose_secret();

        assert_eq!(plaintext.chars().count(), 20);
        assert!(plaintext.chars().all(|ch| ch.is_ascii_alphanumeric()));
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let tokens = TokenService::new(TokenPolicy::default());
        let generated = tokens.generate().unwrap();

        assert!(generated.hash.starts_with("$argon2"));
        assert!(tokens.verify(&generated.hash, generated.plaintext.expose_secret()));
        assert!(!tokens.verify(&generated.hash, "000000"));
    }

    #[test]
    fn same_token_hashes_with_different_salts() {
        let tokens = TokenService::new(TokenPolicy::default());
        let first = tokens.generate_with_rng(&mut StdRng::seed_from_u64(7)).unwrap();
        let second = tokens.generate_with_rng(&mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(
            first.plaintext.expose_secret(),
            second.plaintext.expose_secret()
        );
        assert_ne!(first.hash, second.hash);
        assert!(tokens.verify(&second.hash, first.plaintext.expose_secret()));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let tokens = TokenService::new(TokenPolicy::default());
        assert!(!tokens.verify("not-a-phc-hash", "anything"));
        assert!(!tokens.verify("", "anything"));
    }
}
