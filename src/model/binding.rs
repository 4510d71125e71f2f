//! Device binding: the transport parameters a session is built from
//!
//! A binding is assembled once with [`DeviceBinding::builder`] and is
//! read-only afterwards. Feature-dependent inputs (interrupt pin, external
//! frame buffer) are plain optional fields rather than separate constructors.

use std::fmt;

/// Default SPI clock
pub const DEFAULT_CLOCK_HZ: u32 = 10_000_000;

/// Size of the frame buffer a session allocates when no scratch buffer is given
pub const FRAME_BUFFER_LEN: usize = 4096 + 32;

/// Board-specific GPIO identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId(pub u16);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Bit order on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// SPI bus timing profile
///
/// The chip only talks SPI mode 0, MSB first. The clock rate and the pacing
/// of response polling are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusTiming {
    /// Requested clock rate. `SpiTransport` only logs it; the actual rate is
    /// whatever the `SpiDevice` was configured with.
    pub clock_hz: u32,
    pub mode: embedded_hal::spi::Mode,
    pub bit_order: BitOrder,
    /// Delay between two response polls
    pub poll_interval_us: u32,
    /// Polls before an exchange is reported as timed out
    pub max_polls: u32,
}

impl BusTiming {
    pub fn is_supported(&self) -> bool {
        self.mode == embedded_hal::spi::MODE_0 && self.bit_order == BitOrder::MsbFirst
    }
}

impl Default for BusTiming {
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            mode: embedded_hal::spi::MODE_0,
            bit_order: BitOrder::MsbFirst,
            poll_interval_us: 25,
            max_polls: 4000,
        }
    }
}

/// Transport parameters for one chip
///
/// `SpiTransport` takes chip select and the interrupt line from the
/// `SpiDevice` and the pin passed to `SpiTransport::with_interrupt`. The pin
/// ids here identify the chip in logs and are otherwise informational.
pub struct DeviceBinding {
    chip_select: PinId,
    interrupt: Option<PinId>,
    timing: BusTiming,
    prng_seed: u32,
    scratch: Option<Box<[u8]>>,
}

impl DeviceBinding {
    pub fn builder(chip_select: PinId) -> DeviceBindingBuilder {
        DeviceBindingBuilder::new(chip_select)
    }

    pub fn chip_select(&self) -> PinId {
        self.chip_select
    }

    /// Informational for `SpiTransport`, which only warns when this is set
    /// but no input pin was handed to it
    pub fn interrupt_pin(&self) -> Option<PinId> {
        self.interrupt
    }

    pub fn timing(&self) -> &BusTiming {
        &self.timing
    }

    pub fn prng_seed(&self) -> u32 {
        self.prng_seed
    }

    /// Length of the caller-supplied scratch buffer, if one is still attached
    pub fn scratch_len(&self) -> Option<usize> {
        self.scratch.as_ref().map(|buf| buf.len())
    }

    /// Moves the scratch buffer out, or allocates the default one
    pub(crate) fn take_frame_buffer(&mut self) -> Box<[u8]> {
        self.scratch
            .take()
            .unwrap_or_else(|| vec![0u8; FRAME_BUFFER_LEN].into_boxed_slice())
    }
}

impl fmt::Debug for DeviceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceBinding")
            .field("chip_select", &self.chip_select)
            .field("interrupt", &self.interrupt)
            .field("timing", &self.timing)
            .field("scratch_len", &self.scratch_len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`DeviceBinding`]
#[derive(Debug)]
pub struct DeviceBindingBuilder {
    chip_select: PinId,
    interrupt: Option<PinId>,
    timing: BusTiming,
    prng_seed: Option<u32>,
    scratch: Option<Box<[u8]>>,
}

impl DeviceBindingBuilder {
    fn new(chip_select: PinId) -> Self {
        Self {
            chip_select,
            interrupt: None,
            timing: BusTiming::default(),
            prng_seed: None,
            scratch: None,
        }
    }

    pub fn interrupt_pin(mut self, pin: PinId) -> Self {
        self.interrupt = Some(pin);
        self
    }

    pub fn clock_hz(mut self, hz: u32) -> Self {
        self.timing.clock_hz = hz;
        self
    }

    pub fn timing(mut self, timing: BusTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn poll(mut self, interval_us: u32, max_polls: u32) -> Self {
        self.timing.poll_interval_us = interval_us;
        self.timing.max_polls = max_polls;
        self
    }

    pub fn prng_seed(mut self, seed: u32) -> Self {
        self.prng_seed = Some(seed);
        self
    }

    /// Externally owned frame buffer; the session takes exclusive ownership
    pub fn scratch_buffer(mut self, buffer: Box<[u8]>) -> Self {
        self.scratch = Some(buffer);
        self
    }

    /// Seeds from the thread RNG when no seed was given
    pub fn build(self) -> DeviceBinding {
        DeviceBinding {
            chip_select: self.chip_select,
            interrupt: self.interrupt,
            timing: self.timing,
            prng_seed: self.prng_seed.unwrap_or_else(rand::random::<u32>),
            scratch: self.scratch,
        }
    }
}
