//! Host-side session and command dispatch for the TROPIC01 secure element
//!
//! A [`Session`] owns the device binding, the transport and the cryptographic
//! engine for one chip. It tracks whether a secure channel is open, rejects
//! channel-scoped commands while it is not, validates slot indices and buffer
//! sizes before anything reaches the bus, and tears everything down in a fixed
//! order when ended or dropped.

mod adapters;
pub mod api;
pub mod error;
mod logic;
pub mod model;
pub mod ports;
pub mod session;
pub mod use_cases;

// Re-export commonly used types
pub use error::{ErrorKind, TropicError, TropicResult};
pub use session::{SecureSessionGuard, Session};

// Re-export public API
pub use adapters::{NoInterrupt, SpiTransport};
pub use api::{spi_session, spi_session_with_interrupt};
