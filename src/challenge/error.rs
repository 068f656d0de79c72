use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid public key")]
    InvalidKey,
    #[error("no public key provisioned")]
    NoKeyProvisioned,
    #[error("encryption failed")]
    EncryptionFailed,
    #[error("decryption failed")]
    DecryptionFailed,
    #[error("token hashing failed")]
    Hash,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
