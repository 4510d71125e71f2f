use super::{Link, Transport};
use crate::error::TropicResult;
use crate::model::MacSlot;

pub const MAC_AND_DESTROY_DATA_LEN: usize = 32;

/// Capability to run one MAC-and-destroy round
///
/// Each successful call consumes the slot's current secret. Implementations
/// must not retry a failed round.
pub trait MacAndDestroy<T: Transport> {
    fn mac_and_destroy(
        &mut self,
        link: &mut Link<'_, T>,
        slot: MacSlot,
        input: &[u8; MAC_AND_DESTROY_DATA_LEN],
    ) -> TropicResult<[u8; MAC_AND_DESTROY_DATA_LEN]>;
}
