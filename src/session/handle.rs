//! Session handle and its lifecycle state machine
//!
//! `status` is only written by `secure_session_start`, `secure_session_end`
//! and `end`. `Open` means the engine accepted a channel-open request that has
//! not been closed by this handle since.

use tracing::{debug, info, warn};

use crate::error::{PreconditionError, TropicResult};
use crate::model::{DeviceBinding, FirmwareVersion, HostKeyPair, PairingSlot, SessionStatus};
use crate::ports::{ChipEngine, Link, Transport};

/// Exclusive owner of one chip's binding, transport and engine context
pub struct Session<T: Transport, E: ChipEngine<T>> {
    binding: DeviceBinding,
    buffer: Box<[u8]>,
    transport: T,
    engine: E,
    status: SessionStatus,
    initialized: bool,
    firmware: Option<FirmwareVersion>,
}

impl<T: Transport, E: ChipEngine<T>> Session<T, E> {
    /// Build a handle; nothing touches the bus until [`Session::begin`]
    ///
    /// A scratch buffer attached to `binding` becomes the session's frame
    /// buffer.
    pub fn new(mut binding: DeviceBinding, transport: T, engine: E) -> Self {
        let buffer = binding.take_frame_buffer();
        Self {
            binding,
            buffer,
            transport,
            engine,
            status: SessionStatus::Closed,
            initialized: false,
            firmware: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn binding(&self) -> &DeviceBinding {
        &self.binding
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Firmware version read during `begin`
    pub fn firmware_version(&self) -> TropicResult<FirmwareVersion> {
        self.firmware
            .ok_or_else(|| PreconditionError::NotInitialized.into())
    }

    /// Initialize the transport and engine context
    ///
    /// Never opens a secure channel. Calling it on an initialized handle does
    /// nothing.
    pub fn begin(&mut self) -> TropicResult<()> {
        if self.initialized {
            debug!("begin() on initialized session, nothing to do");
            return Ok(());
        }

        self.transport.init(&self.binding)?;

        let seed = self.binding.prng_seed();
        let mut link = Link::new(&mut self.transport, &mut self.buffer[..]);
        match self.engine.init(&mut link, seed) {
            Ok(version) => {
                self.firmware = Some(version);
                self.initialized = true;
                info!(
                    "Chip on {} initialized, firmware {}",
                    self.binding.chip_select(),
                    version
                );
                Ok(())
            }
            Err(err) => {
                self.engine.reset();
                if let Err(deinit_err) = self.transport.deinit() {
                    warn!("Transport release after failed begin() also failed: {}", deinit_err);
                }
                Err(err)
            }
        }
    }

    /// Authenticate the chip and open the secure channel
    ///
    /// # Arguments
    ///
    /// * `keys` - Host pairing key pair
    /// * `pairing_index` - Pairing key slot (0-3) holding `keys.public`
    ///
    /// # Errors
    ///
    /// Precondition errors if `begin` has not run, a channel is already open
    /// or the index is out of range. Engine errors are returned unchanged and
    /// leave the status `Closed`.
    pub fn secure_session_start(
        &mut self,
        keys: &HostKeyPair,
        pairing_index: u16,
    ) -> TropicResult<()> {
        if !self.initialized {
            warn!("secure_session_start rejected: not initialized");
            return Err(PreconditionError::NotInitialized.into());
        }
        if self.status == SessionStatus::Open {
            warn!("secure_session_start rejected: session already open");
            return Err(PreconditionError::SessionAlreadyOpen.into());
        }
        let slot = PairingSlot::new(pairing_index)?;

        debug!("Opening secure session with {}", slot);
        let mut link = Link::new(&mut self.transport, &mut self.buffer[..]);
        self.engine.open(&mut link, keys, slot)?;

        self.status = SessionStatus::Open;
        info!("Secure session open ({})", slot);
        Ok(())
    }

    /// Abort the secure channel
    ///
    /// The handle considers the channel closed afterwards even if the abort
    /// request failed; the failure is still returned.
    pub fn secure_session_end(&mut self) -> TropicResult<()> {
        self.require_open("secure_session_end")?;

        let mut link = Link::new(&mut self.transport, &mut self.buffer[..]);
        let result = self.engine.abort(&mut link);
        self.status = SessionStatus::Closed;

        match &result {
            Ok(()) => info!("Secure session closed"),
            Err(err) => warn!("Secure session abort failed: {}", err),
        }
        result
    }

    /// Close any open channel, then release the transport
    ///
    /// Both steps are always attempted. An abort failure is returned in
    /// preference to a release failure since it means the chip may still hold
    /// a channel open. Repeated calls are no-ops.
    pub fn end(&mut self) -> TropicResult<()> {
        let abort_result = if self.status == SessionStatus::Open {
            self.secure_session_end()
        } else {
            Ok(())
        };

        let release_result = self.release();

        match (abort_result, release_result) {
            (Err(abort_err), Err(release_err)) => {
                warn!("Transport release failed after abort failure: {}", release_err);
                Err(abort_err)
            }
            (Err(abort_err), Ok(())) => Err(abort_err),
            (Ok(()), release_result) => release_result,
        }
    }

    fn release(&mut self) -> TropicResult<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;
        self.firmware = None;
        self.engine.reset();

        self.transport.deinit()?;
        info!("Chip on {} released", self.binding.chip_select());
        Ok(())
    }

    pub(super) fn require_open(&self, op: &'static str) -> Result<(), PreconditionError> {
        if self.status != SessionStatus::Open {
            warn!("{} rejected: no secure session", op);
            return Err(PreconditionError::SessionNotOpen);
        }
        Ok(())
    }

    /// Hand the engine a link for one command
    pub(super) fn dispatch<R>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut E, &mut Link<'_, T>) -> TropicResult<R>,
    ) -> TropicResult<R> {
        let mut link = Link::new(&mut self.transport, &mut self.buffer[..]);
        let result = f(&mut self.engine, &mut link);
        if let Err(err) = &result {
            debug!("{} failed: {}", op, err);
        }
        result
    }
}

impl<T: Transport, E: ChipEngine<T>> Drop for Session<T, E> {
    fn drop(&mut self) {
        if let Err(err) = self.end() {
            warn!("Teardown on drop failed: {}", err);
        }
    }
}
