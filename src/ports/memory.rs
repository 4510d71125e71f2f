use super::{Link, Transport};
use crate::error::TropicResult;
use crate::model::MemSlot;

/// Capability to use the chip's protected user-data memory
pub trait ProtectedMemory<T: Transport> {
    /// Write a slot. Slots are write-once until erased.
    fn mem_write(&mut self, link: &mut Link<'_, T>, slot: MemSlot, data: &[u8])
        -> TropicResult<()>;

    /// Read a slot into `out`
    ///
    /// # Returns
    ///
    /// Number of bytes written to `out`; may be less than `out.len()`
    fn mem_read(&mut self, link: &mut Link<'_, T>, slot: MemSlot, out: &mut [u8])
        -> TropicResult<usize>;

    fn mem_erase(&mut self, link: &mut Link<'_, T>, slot: MemSlot) -> TropicResult<()>;
}
