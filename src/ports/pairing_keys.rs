use super::{Link, Transport};
use crate::error::TropicResult;
use crate::model::{HostPublicKey, PairingSlot};

/// Capability to manage the host pairing keys the chip accepts
pub trait PairingKeys<T: Transport> {
    fn pairing_key_write(
        &mut self,
        link: &mut Link<'_, T>,
        slot: PairingSlot,
        key: &HostPublicKey,
    ) -> TropicResult<()>;

    fn pairing_key_read(&mut self, link: &mut Link<'_, T>, slot: PairingSlot)
        -> TropicResult<HostPublicKey>;

    /// Permanently disable the slot
    fn pairing_key_invalidate(&mut self, link: &mut Link<'_, T>, slot: PairingSlot)
        -> TropicResult<()>;
}
