//! Convenience constructors wiring the SPI adapter into a session

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use embedded_hal::spi::SpiDevice;

use crate::adapters::{NoInterrupt, SpiTransport};
use crate::ports::ChipEngine;
use crate::session::Session;

pub use crate::model::*;

/// Session over an SPI device with response polling
pub fn spi_session<SPI, D, E>(
    binding: DeviceBinding,
    spi: SPI,
    delay: D,
    engine: E,
) -> Session<SpiTransport<SPI, D, NoInterrupt>, E>
where
    SPI: SpiDevice,
    D: DelayNs,
    E: ChipEngine<SpiTransport<SPI, D, NoInterrupt>>,
{
    Session::new(binding, SpiTransport::new(spi, delay), engine)
}

/// Session over an SPI device that waits for the chip's interrupt line
pub fn spi_session_with_interrupt<SPI, D, IRQ, E>(
    binding: DeviceBinding,
    spi: SPI,
    delay: D,
    irq: IRQ,
    engine: E,
) -> Session<SpiTransport<SPI, D, IRQ>, E>
where
    SPI: SpiDevice,
    D: DelayNs,
    IRQ: InputPin,
    E: ChipEngine<SpiTransport<SPI, D, IRQ>>,
{
    Session::new(binding, SpiTransport::with_interrupt(spi, delay, irq), engine)
}
