use super::{Link, Transport};
use crate::error::TropicResult;

pub trait Ping<T: Transport> {
    /// Send `msg_out` through the channel; the chip echoes it into `msg_in`
    ///
    /// Both buffers have the same length.
    fn ping(&mut self, link: &mut Link<'_, T>, msg_out: &[u8], msg_in: &mut [u8])
        -> TropicResult<()>;
}
