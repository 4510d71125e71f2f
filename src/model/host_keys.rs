//! Host pairing key material used to open the secure channel

use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const X25519_KEY_LEN: usize = 32;

/// Host X25519 private key, wiped when dropped
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct HostPrivateKey([u8; X25519_KEY_LEN]);

impl HostPrivateKey {
    pub fn from_slice(key: &[u8]) -> Result<Self, KeyMaterialError> {
        let bytes: [u8; X25519_KEY_LEN] =
            key.try_into().map_err(|_| KeyMaterialError::InvalidLength {
                expected: X25519_KEY_LEN,
                actual: key.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; X25519_KEY_LEN] {
        &self.0
    }
}

impl From<[u8; X25519_KEY_LEN]> for HostPrivateKey {
    fn from(bytes: [u8; X25519_KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for HostPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostPrivateKey([REDACTED])")
    }
}

/// Host X25519 public key, matching a pairing key stored on the chip
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HostPublicKey([u8; X25519_KEY_LEN]);

impl HostPublicKey {
    pub fn from_slice(key: &[u8]) -> Result<Self, KeyMaterialError> {
        let bytes: [u8; X25519_KEY_LEN] =
            key.try_into().map_err(|_| KeyMaterialError::InvalidLength {
                expected: X25519_KEY_LEN,
                actual: key.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; X25519_KEY_LEN] {
        &self.0
    }
}

impl From<[u8; X25519_KEY_LEN]> for HostPublicKey {
    fn from(bytes: [u8; X25519_KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for HostPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostPublicKey({})", hex::encode(&self.0[..8]))
    }
}

/// Pairing credentials presented during session start
#[derive(Debug, Clone)]
pub struct HostKeyPair {
    pub private: HostPrivateKey,
    pub public: HostPublicKey,
}

impl HostKeyPair {
    pub fn new(private: HostPrivateKey, public: HostPublicKey) -> Self {
        Self { private, public }
    }

    pub fn from_slices(private: &[u8], public: &[u8]) -> Result<Self, KeyMaterialError> {
        Ok(Self {
            private: HostPrivateKey::from_slice(private)?,
            public: HostPublicKey::from_slice(public)?,
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterialError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
