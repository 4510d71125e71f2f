//! Error types for the tropic01 session layer
//!
//! Every operation returns a [`TropicResult`]. Failures fall in three
//! categories: a call rejected locally before anything reached the bus
//! ([`PreconditionError`]), a non-success result reported by the chip
//! ([`ChipError`]), or a failed physical exchange ([`TransportError`]).

use thiserror::Error;

use crate::model::SlotError;

/// Result type alias for tropic01 operations
pub type TropicResult<T> = Result<T, TropicError>;

/// Top-level error type for all session and dispatcher operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TropicError {
    /// Rejected locally, nothing was sent to the chip
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// The chip answered with a non-success status
    #[error("Chip error: {0}")]
    Chip(#[from] ChipError),

    /// The physical exchange failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Coarse classification of a [`TropicError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Precondition,
    Chip,
    Transport,
}

impl TropicError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TropicError::Precondition(_) => ErrorKind::Precondition,
            TropicError::Chip(_) => ErrorKind::Chip,
            TropicError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Shorthand for building a chip error from a status
    pub fn chip(status: ChipStatus) -> Self {
        TropicError::Chip(ChipError { status })
    }
}

impl From<SlotError> for TropicError {
    fn from(err: SlotError) -> Self {
        TropicError::Precondition(PreconditionError::Slot(err))
    }
}

/// Argument or session-state contract violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// `begin` has not been called, or `end` already released the transport
    #[error("device not initialized - call begin() first")]
    NotInitialized,

    /// Channel-scoped operation invoked without an open secure session
    #[error("secure session is not open")]
    SessionNotOpen,

    /// A secure session is already open on this handle
    #[error("secure session is already open")]
    SessionAlreadyOpen,

    /// Slot index outside the range of its kind
    #[error("{0}")]
    Slot(#[from] SlotError),

    /// Caller buffer cannot hold the output
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Argument must have an exact length
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Argument length must fall in an inclusive range
    #[error("length {actual} outside of [{min}, {max}]")]
    LengthOutOfRange { min: usize, max: usize, actual: usize },

    /// Monotonic counter initial value above the chip maximum
    #[error("counter value {value} exceeds maximum {max}")]
    CounterValueOutOfRange { value: u32, max: u32 },
}

/// Non-success status reported by the chip
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{status} (0x{code:02x})", code = .status.code())]
pub struct ChipError {
    pub status: ChipStatus,
}

impl ChipError {
    pub fn code(&self) -> u8 {
        self.status.code()
    }
}

/// Result codes the chip can return for an L3 command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipStatus {
    /// Current pairing keys are not authorized for the command
    Unauthorized,
    /// The command was not recognized
    InvalidCmd,
    /// Protected-memory slot is already written
    MemWriteFail,
    /// Write limit reached for the protected-memory slot
    MemSlotExpired,
    /// Key in the requested slot does not exist or is invalid
    EccInvalidKey,
    /// Monotonic counter already at zero
    CounterUpdateErr,
    /// Monotonic counter locked, must be reinitialized
    CounterInvalid,
    /// Pairing key slot is blank
    PairingKeyEmpty,
    /// Pairing key slot was invalidated
    PairingKeyInvalid,
    /// Generic failure
    Fail,
    /// Chip authentication or key agreement failed during session start
    HandshakeFailed,
    /// Status byte not known to this driver
    Other(u8),
}

impl ChipStatus {
    pub fn code(self) -> u8 {
        match self {
            ChipStatus::Unauthorized => 0x01,
            ChipStatus::InvalidCmd => 0x02,
            ChipStatus::MemWriteFail => 0x10,
            ChipStatus::MemSlotExpired => 0x11,
            ChipStatus::EccInvalidKey => 0x12,
            ChipStatus::CounterUpdateErr => 0x13,
            ChipStatus::CounterInvalid => 0x14,
            ChipStatus::PairingKeyEmpty => 0x15,
            ChipStatus::PairingKeyInvalid => 0x16,
            ChipStatus::Fail => 0x3C,
            ChipStatus::HandshakeFailed => 0x79,
            ChipStatus::Other(code) => code,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => ChipStatus::Unauthorized,
            0x02 => ChipStatus::InvalidCmd,
            0x10 => ChipStatus::MemWriteFail,
            0x11 => ChipStatus::MemSlotExpired,
            0x12 => ChipStatus::EccInvalidKey,
            0x13 => ChipStatus::CounterUpdateErr,
            0x14 => ChipStatus::CounterInvalid,
            0x15 => ChipStatus::PairingKeyEmpty,
            0x16 => ChipStatus::PairingKeyInvalid,
            0x3C => ChipStatus::Fail,
            0x79 => ChipStatus::HandshakeFailed,
            other => ChipStatus::Other(other),
        }
    }
}

impl std::fmt::Display for ChipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ChipStatus::Unauthorized => "pairing key not authorized for command",
            ChipStatus::InvalidCmd => "invalid command",
            ChipStatus::MemWriteFail => "memory slot already written",
            ChipStatus::MemSlotExpired => "memory slot write limit reached",
            ChipStatus::EccInvalidKey => "no valid key in slot",
            ChipStatus::CounterUpdateErr => "monotonic counter already at zero",
            ChipStatus::CounterInvalid => "monotonic counter locked",
            ChipStatus::PairingKeyEmpty => "pairing key slot is blank",
            ChipStatus::PairingKeyInvalid => "pairing key slot invalidated",
            ChipStatus::Fail => "command failed",
            ChipStatus::HandshakeFailed => "secure channel handshake failed",
            ChipStatus::Other(_) => "unknown status",
        };
        f.write_str(text)
    }
}

/// Physical exchange failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Exchange attempted on a transport that is not initialized
    #[error("transport not initialized")]
    NotInitialized,

    /// SPI bus reported an error
    #[error("SPI bus error: {0:?}")]
    Bus(embedded_hal::spi::ErrorKind),

    /// Reading the interrupt pin failed
    #[error("interrupt pin could not be read")]
    InterruptPin,

    /// Chip did not report a ready response in time
    #[error("no response after {attempts} polls")]
    Timeout { attempts: u32 },

    /// Frame does not fit the frame buffer
    #[error("frame of {needed} bytes exceeds buffer of {capacity}")]
    FrameTooLarge { needed: usize, capacity: usize },

    /// Bus timing does not use the polarity/phase the chip requires
    #[error("unsupported SPI mode, chip requires mode 0")]
    UnsupportedMode,
}
