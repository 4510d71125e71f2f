//! Transport - the physical byte exchange with the chip

use crate::error::TransportError;
use crate::model::DeviceBinding;

/// Capability to exchange frames with the chip over the bus
///
/// The bus is half-duplex: every exchange sends one request frame and blocks
/// until the response frame has been read back.
pub trait Transport {
    /// Prepare the bus for the device described by `binding`
    fn init(&mut self, binding: &DeviceBinding) -> Result<(), TransportError>;

    /// Release the bus. Calling it on a released transport is a no-op.
    fn deinit(&mut self) -> Result<(), TransportError>;

    /// Send `buffer[..request_len]` and overwrite `buffer` with the response
    ///
    /// # Returns
    ///
    /// Length of the response now held at the start of `buffer`
    fn send_receive(&mut self, buffer: &mut [u8], request_len: usize)
        -> Result<usize, TransportError>;
}

/// A transport paired with the session's frame buffer
///
/// Engines receive a `Link` for each command instead of owning the transport,
/// so the session stays the single owner of both.
pub struct Link<'a, T: ?Sized> {
    transport: &'a mut T,
    buffer: &'a mut [u8],
}

impl<'a, T: Transport + ?Sized> Link<'a, T> {
    pub fn new(transport: &'a mut T, buffer: &'a mut [u8]) -> Self {
        Self { transport, buffer }
    }

    /// Largest frame that fits in the buffer
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// One request/response round trip
    pub fn exchange(&mut self, request: &[u8]) -> Result<&[u8], TransportError> {
        let capacity = self.buffer.len();
        if request.len() > capacity {
            return Err(TransportError::FrameTooLarge {
                needed: request.len(),
                capacity,
            });
        }
        self.buffer[..request.len()].copy_from_slice(request);

        let len = self
            .transport
            .send_receive(&mut *self.buffer, request.len())?;
        if len > capacity {
            return Err(TransportError::FrameTooLarge {
                needed: len,
                capacity,
            });
        }
        Ok(&self.buffer[..len])
    }
}
