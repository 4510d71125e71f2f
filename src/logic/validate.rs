//! Argument-contract checks shared by the dispatcher
//!
//! All checks run before anything is handed to the engine, so a rejected call
//! never produces bus traffic.

use crate::error::PreconditionError;

/// Output buffer must hold at least `needed` bytes
pub(crate) fn ensure_at_least(needed: usize, actual: usize) -> Result<(), PreconditionError> {
    if actual < needed {
        return Err(PreconditionError::BufferTooSmall { needed, actual });
    }
    Ok(())
}

/// Argument must be exactly `expected` bytes
pub(crate) fn ensure_exact(expected: usize, actual: usize) -> Result<(), PreconditionError> {
    if actual != expected {
        return Err(PreconditionError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Argument length must be in `min..=max`
pub(crate) fn ensure_within(min: usize, max: usize, actual: usize) -> Result<(), PreconditionError> {
    if actual < min || actual > max {
        return Err(PreconditionError::LengthOutOfRange { min, max, actual });
    }
    Ok(())
}
