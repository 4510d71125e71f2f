//! Adapters - concrete implementations of ports (traits)

mod spi;

#[cfg(test)]
pub mod mock_chip;

// Re-export for convenience
pub use spi::{NoInterrupt, SpiTransport};
