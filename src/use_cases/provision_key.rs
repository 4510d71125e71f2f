//! Provision key use case
//!
//! Generates a key pair in an ECC slot and reads its public half back.

use tracing::info;

use crate::error::{PreconditionError, TropicResult};
use crate::model::{EccCurve, EccPublicKey};
use crate::ports::{ChipEngine, Transport};
use crate::session::Session;

/// Generate a key in `slot` and return its public key
///
/// The session must already have a secure channel open.
///
/// # Errors
///
/// Returns errors if:
/// - No secure session is open or `slot` is out of range
/// - The chip refuses to generate (e.g. the slot is occupied)
/// - The key cannot be read back
pub fn provision_key<T, E>(
    session: &mut Session<T, E>,
    slot: u16,
    curve: EccCurve,
) -> TropicResult<EccPublicKey>
where
    T: Transport,
    E: ChipEngine<T>,
{
    session.ecc_key_generate(slot, curve)?;

    let mut out = [0u8; 64];
    let info = session.ecc_key_read(slot, &mut out)?;
    let key = EccPublicKey::new(info.curve, info.origin, out[..info.len].to_vec()).ok_or(
        PreconditionError::LengthMismatch {
            expected: info.curve.public_key_len(),
            actual: info.len,
        },
    )?;

    info!("Provisioned {} key in ECC slot {}: {:?}", curve, slot, key);
    Ok(key)
}
