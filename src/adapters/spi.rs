//! SPI implementation of the transport port
//!
//! Chip select is owned by the `SpiDevice`. A request frame is written in one
//! transaction; the response is then polled with the get-response byte until
//! the chip reports it ready, optionally gated by the interrupt pin.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin};
use embedded_hal::spi::{Error as _, SpiDevice};
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::model::{BusTiming, DeviceBinding};
use crate::ports::Transport;

/// First byte clocked out when asking the chip for a response
pub const GET_RESPONSE_REQ_ID: u8 = 0xAA;

/// Bit in the chip status byte set once a response can be read
const CHIP_STATUS_READY: u8 = 0x01;

/// chip status, frame status, length, up to 255 data bytes, CRC
const RESPONSE_WINDOW_LEN: usize = 3 + 255 + 2;

/// Stand-in for a board without the interrupt line wired
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInterrupt;

impl digital::ErrorType for NoInterrupt {
    type Error = core::convert::Infallible;
}

impl InputPin for NoInterrupt {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

/// Transport over an `embedded-hal` SPI device
pub struct SpiTransport<SPI, D, IRQ = NoInterrupt> {
    spi: SPI,
    delay: D,
    irq: Option<IRQ>,
    timing: Option<BusTiming>,
}

impl<SPI, D> SpiTransport<SPI, D, NoInterrupt>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    pub fn new(spi: SPI, delay: D) -> Self {
        Self {
            spi,
            delay,
            irq: None,
            timing: None,
        }
    }
}

impl<SPI, D, IRQ> SpiTransport<SPI, D, IRQ>
where
    SPI: SpiDevice,
    D: DelayNs,
    IRQ: InputPin,
{
    /// Transport that waits for the interrupt line before each response poll
    pub fn with_interrupt(spi: SPI, delay: D, irq: IRQ) -> Self {
        Self {
            spi,
            delay,
            irq: Some(irq),
            timing: None,
        }
    }

    /// Give back the bus, delay and interrupt pin
    pub fn release(self) -> (SPI, D, Option<IRQ>) {
        (self.spi, self.delay, self.irq)
    }

    fn response_pending(&mut self) -> Result<bool, TransportError> {
        match self.irq.as_mut() {
            Some(irq) => irq
                .is_high()
                .map(|high| !high)
                .map_err(|_| TransportError::InterruptPin),
            None => Ok(false),
        }
    }
}

impl<SPI, D, IRQ> Transport for SpiTransport<SPI, D, IRQ>
where
    SPI: SpiDevice,
    D: DelayNs,
    IRQ: InputPin,
{
    fn init(&mut self, binding: &DeviceBinding) -> Result<(), TransportError> {
        let timing = *binding.timing();
        if !timing.is_supported() {
            warn!("Rejecting bus timing {:?}", timing);
            return Err(TransportError::UnsupportedMode);
        }
        if binding.interrupt_pin().is_some() && self.irq.is_none() {
            warn!(
                "Interrupt pin {:?} configured but no input pin given, polling instead",
                binding.interrupt_pin()
            );
        }

        debug!(
            "SPI transport for {} at {} Hz",
            binding.chip_select(),
            timing.clock_hz
        );
        self.timing = Some(timing);
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), TransportError> {
        self.timing = None;
        Ok(())
    }

    fn send_receive(&mut self, buffer: &mut [u8], request_len: usize) -> Result<usize, TransportError> {
        let timing = self.timing.ok_or(TransportError::NotInitialized)?;

        self.spi
            .write(&buffer[..request_len])
            .map_err(|err| TransportError::Bus(err.kind()))?;

        let window_len = RESPONSE_WINDOW_LEN.min(buffer.len());
        for _ in 0..timing.max_polls {
            if self.response_pending()? {
                self.delay.delay_us(timing.poll_interval_us);
                continue;
            }

            let window = &mut buffer[..window_len];
            window.fill(0);
            window[0] = GET_RESPONSE_REQ_ID;
            self.spi
                .transfer_in_place(window)
                .map_err(|err| TransportError::Bus(err.kind()))?;

            if window[0] & CHIP_STATUS_READY != 0 && window_len >= 3 {
                let total = 3 + usize::from(window[2]) + 2;
                if total > window_len {
                    return Err(TransportError::FrameTooLarge {
                        needed: total,
                        capacity: window_len,
                    });
                }
                // drop the chip status byte
                buffer.copy_within(1..total, 0);
                return Ok(total - 1);
            }

            self.delay.delay_us(timing.poll_interval_us);
        }

        Err(TransportError::Timeout {
            attempts: timing.max_polls,
        })
    }
}
