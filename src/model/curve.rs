//! ECC curves supported by the chip's key slots

use std::fmt;

/// Curve of a key held in an ECC slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EccCurve {
    /// NIST P-256, used with ECDSA
    P256,
    /// Curve25519 in Edwards form, used with EdDSA
    Ed25519,
}

impl EccCurve {
    /// Private keys are 32 bytes on both curves
    pub const PRIVATE_KEY_LEN: usize = 32;

    /// Smallest public key of any supported curve
    pub const MIN_PUBLIC_KEY_LEN: usize = 32;

    /// Uncompressed public key length (x || y for P-256)
    pub const fn public_key_len(self) -> usize {
        match self {
            EccCurve::P256 => 64,
            EccCurve::Ed25519 => 32,
        }
    }

    pub const fn private_key_len(self) -> usize {
        Self::PRIVATE_KEY_LEN
    }
}

impl fmt::Display for EccCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EccCurve::P256 => f.write_str("P-256"),
            EccCurve::Ed25519 => f.write_str("Ed25519"),
        }
    }
}

/// How the key in a slot came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyOrigin {
    /// Generated on the chip
    Generated,
    /// Imported by the host
    Stored,
}

/// Signature produced by either scheme: r || s for ECDSA, R || S for EdDSA
pub const SIGNATURE_LEN: usize = 64;

/// Public key read back from an ECC slot
#[derive(Clone, PartialEq, Eq)]
pub struct EccPublicKey {
    pub curve: EccCurve,
    pub origin: KeyOrigin,
    bytes: Vec<u8>,
}

impl EccPublicKey {
    /// Returns `None` when the byte count does not match the curve
    pub fn new(curve: EccCurve, origin: KeyOrigin, bytes: Vec<u8>) -> Option<Self> {
        if bytes.len() != curve.public_key_len() {
            return None;
        }
        Some(Self {
            curve,
            origin,
            bytes,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for EccPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EccPublicKey({}, {:?}, {})",
            self.curve,
            self.origin,
            hex::encode(&self.bytes[..8])
        )
    }
}
