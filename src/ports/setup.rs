use super::{Link, Transport};
use crate::error::TropicResult;
use crate::model::FirmwareVersion;

/// Capability to prepare the cryptographic context for a chip
pub trait EngineSetup<T: Transport> {
    /// Seed the context and read the chip's firmware version
    ///
    /// Runs over an initialized transport but before any secure channel
    /// exists, so only unauthenticated requests may be used.
    fn init(&mut self, link: &mut Link<'_, T>, prng_seed: u32) -> TropicResult<FirmwareVersion>;

    /// Wipe all context state. Must be safe to call repeatedly.
    fn reset(&mut self);
}
