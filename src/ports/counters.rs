use super::{Link, Transport};
use crate::error::TropicResult;
use crate::model::CounterSlot;

/// Capability to use the chip's monotonic (decrement-only) counters
pub trait MonotonicCounters<T: Transport> {
    fn mcounter_init(&mut self, link: &mut Link<'_, T>, slot: CounterSlot, value: u32)
        -> TropicResult<()>;

    /// Decrement by one
    fn mcounter_update(&mut self, link: &mut Link<'_, T>, slot: CounterSlot) -> TropicResult<()>;

    fn mcounter_get(&mut self, link: &mut Link<'_, T>, slot: CounterSlot) -> TropicResult<u32>;
}
