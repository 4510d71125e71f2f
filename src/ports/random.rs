use super::{Link, Transport};
use crate::error::TropicResult;

pub trait RandomSource<T: Transport> {
    /// Fill `out` with bytes from the chip's TRNG
    fn random_value_get(&mut self, link: &mut Link<'_, T>, out: &mut [u8]) -> TropicResult<()>;
}
