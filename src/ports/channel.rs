use super::{Link, Transport};
use crate::error::TropicResult;
use crate::model::{HostKeyPair, PairingSlot};

/// Capability to establish and tear down the authenticated channel
///
/// Key agreement, chip certificate checks and frame encryption all live
/// behind this trait.
pub trait SecureChannel<T: Transport> {
    /// Authenticate the chip and open an encrypted channel
    ///
    /// # Arguments
    ///
    /// * `keys` - Host pairing key pair
    /// * `slot` - Pairing key slot on the chip holding `keys.public`
    ///
    /// # Errors
    ///
    /// Returns a chip error if the handshake is refused and a transport
    /// error if the exchange itself fails. On error no channel is open.
    fn open(
        &mut self,
        link: &mut Link<'_, T>,
        keys: &HostKeyPair,
        slot: PairingSlot,
    ) -> TropicResult<()>;

    /// Ask the chip to drop the current channel
    fn abort(&mut self, link: &mut Link<'_, T>) -> TropicResult<()>;
}
