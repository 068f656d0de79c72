//! Sealed-box encryption engine for challenge tokens.
//!
//! Hybrid scheme: an ephemeral X25519 key agreement against the user's
//! stored public key, HKDF-SHA256 key derivation, and ChaCha20-Poly1305
//! for the payload. The sealed output is
//! `ephemeral_public (32 bytes) || nonce (12 bytes) || ciphertext`,
//! armored as a message block.
//!
//! This boundary sees arbitrary user-submitted key material: every
//! library-level failure is caught here and mapped to a typed error.
//! Nothing in this module panics on adversarial input.

use crate::challenge::{armor, error::Error};
use chacha20poly1305::{
    ChaCha20Poly1305, Key, Nonce,
    aead::{Aead, KeyInit},
};
use hkdf::Hkdf;
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

const KDF_INFO: &[u8] = b"kunci-challenge:v1";
const PROBE_PLAINTEXT: &str = "probe";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Encrypts `plaintext` under a stored (armor-stripped) key body and
/// returns the armored ciphertext.
///
/// # Errors
///
/// Returns [`Error::EncryptionFailed`] on malformed key material or any
/// library-level failure.
pub fn encrypt(plaintext: &str, body: &str) -> Result<String, Error> {
    let recipient = decode_public_key(body)?;

    let ephemeral = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_public = PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(&recipient);

    let key = derive_key(shared.as_bytes()).map_err(|_| Error::EncryptionFailed)?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| Error::EncryptionFailed)?;

    let mut sealed = Vec::with_capacity(KEY_LEN + NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(ephemeral_public.as_bytes());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);

    Ok(armor::wrap(&armor::encode_body(&sealed), armor::MESSAGE_LABEL))
}

/// Reports whether a stored key body is usable by the engine.
///
/// Runs a probe encryption and converts any failure into `false`; used as
/// the validity gate during provisioning.
#[must_use]
pub fn test_key(body: &str) -> bool {
    encrypt(PROBE_PLAINTEXT, body).is_ok()
}

/// A user-side keypair for answering challenges.
///
/// The server never sees the secret half; this type exists for offline
/// tooling that decrypts challenges on the user's own device, and for
/// tests exercising the full round trip.
pub struct Keypair {
    secret: StaticSecret,
    public: PublicKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// The armored public-key block a user submits during provisioning.
    #[must_use]
    pub fn armored_public(&self) -> String {
        armor::wrap(
            &armor::encode_body(self.public.as_bytes()),
            armor::PUBLIC_KEY_LABEL,
        )
    }

    /// Decrypt an armored challenge message produced by [`encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecryptionFailed`] on malformed armor, a truncated
    /// payload, or an AEAD failure (wrong key or tampering).
    pub fn decrypt(&self, armored: &str) -> Result<String, Error> {
        let body = armor::strip(armored).map_err(|_| Error::DecryptionFailed)?;
        let sealed = armor::decode_body(&body).map_err(|_| Error::DecryptionFailed)?;
        if sealed.len() < KEY_LEN + NONCE_LEN {
            return Err(Error::DecryptionFailed);
        }

        let (head, ciphertext) = sealed.split_at(KEY_LEN + NONCE_LEN);
        let (ephemeral, nonce_bytes) = head.split_at(KEY_LEN);
        let ephemeral_bytes: [u8; KEY_LEN] = ephemeral
            .try_into()
            .map_err(|_| Error::DecryptionFailed)?;

        let shared = self
            .secret
            .diffie_hellman(&PublicKey::from(ephemeral_bytes));
        let key = derive_key(shared.as_bytes()).map_err(|_| Error::DecryptionFailed)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));

        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| Error::DecryptionFailed)?;
        String::from_utf8(plaintext).map_err(|_| Error::DecryptionFailed)
    }
}

fn decode_public_key(body: &str) -> Result<PublicKey, Error> {
    let raw = armor::decode_body(body).map_err(|_| Error::EncryptionFailed)?;
    let bytes: [u8; KEY_LEN] = raw
        .as_slice()
        .try_into()
        .map_err(|_| Error::EncryptionFailed)?;
    Ok(PublicKey::from(bytes))
}

fn derive_key(shared_secret: &[u8]) -> Result<[u8; KEY_LEN], hkdf::InvalidLength> {
    let hk = Hkdf::<Sha256>::new(None, shared_secret);
    let mut key = [0u8; KEY_LEN];
    hk.expand(KDF_INFO, &mut key)?;
    Ok(key)
}
