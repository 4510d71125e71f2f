//! EccKeys and Signing traits - key slot management and signatures

use super::{Link, Transport};
use crate::error::TropicResult;
use crate::model::{EccCurve, EccPublicKey, EccSlot, SIGNATURE_LEN};

/// Capability to manage keys held in ECC slots
pub trait EccKeys<T: Transport> {
    /// Generate a new key pair inside the chip
    fn ecc_key_generate(
        &mut self,
        link: &mut Link<'_, T>,
        slot: EccSlot,
        curve: EccCurve,
    ) -> TropicResult<()>;

    /// Import a private key; `key` is exactly `curve.private_key_len()` bytes
    fn ecc_key_store(
        &mut self,
        link: &mut Link<'_, T>,
        slot: EccSlot,
        curve: EccCurve,
        key: &[u8],
    ) -> TropicResult<()>;

    /// Read the public half of the key in `slot`
    fn ecc_key_read(&mut self, link: &mut Link<'_, T>, slot: EccSlot)
        -> TropicResult<EccPublicKey>;

    fn ecc_key_erase(&mut self, link: &mut Link<'_, T>, slot: EccSlot) -> TropicResult<()>;
}

/// Capability to sign with a key that never leaves the chip
pub trait Signing<T: Transport> {
    /// ECDSA over P-256; the message is hashed with SHA-256 first
    fn ecdsa_sign(
        &mut self,
        link: &mut Link<'_, T>,
        slot: EccSlot,
        msg: &[u8],
    ) -> TropicResult<[u8; SIGNATURE_LEN]>;

    /// EdDSA over Ed25519
    fn eddsa_sign(
        &mut self,
        link: &mut Link<'_, T>,
        slot: EccSlot,
        msg: &[u8],
    ) -> TropicResult<[u8; SIGNATURE_LEN]>;
}
