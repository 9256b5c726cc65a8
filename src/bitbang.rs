//! Software two-wire master on two GPIO pins.
//!
//! SDA must be an open-drain pin that can also be read back; `set_high` releases
//! the line. SCL is driven only. Clock stretching and multi-master arbitration
//! are not handled.

use crate::bus::{Acknowledge, BusTransactor};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Half clock period giving roughly 100 kHz.
pub const DEFAULT_HALF_PERIOD_NS: u32 = 5_000;

/// Bit-banged [`BusTransactor`]
#[derive(Debug)]
pub struct BitBang<SDA, SCL, Delay> {
    sda: SDA,
    scl: SCL,
    delay: Delay,
    half_period_ns: u32,
}

impl<SDA, SCL, Delay, E> BitBang<SDA, SCL, Delay>
where
    SDA: InputPin<Error = E> + OutputPin<Error = E>,
    SCL: OutputPin<Error = E>,
    Delay: DelayNs,
{
    /// Bus at [`DEFAULT_HALF_PERIOD_NS`]. The pins are not touched until the first START.
    pub fn new(sda: SDA, scl: SCL, delay: Delay) -> Self {
        Self::with_half_period(sda, scl, delay, DEFAULT_HALF_PERIOD_NS)
    }

    /// Bus with a custom half clock period
    pub fn with_half_period(sda: SDA, scl: SCL, delay: Delay, half_period_ns: u32) -> Self {
        Self { sda, scl, delay, half_period_ns }
    }

    /// Give back the pins and delay provider
    pub fn release(self) -> (SDA, SCL, Delay) {
        (self.sda, self.scl, self.delay)
    }

    fn wait(&mut self) {
        self.delay.delay_ns(self.half_period_ns);
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), E> {
        if bit {
            self.sda.set_high()?;
        } else {
            self.sda.set_low()?;
        }
        self.wait();
        self.scl.set_high()?;
        self.wait();
        self.scl.set_low()
    }

    fn read_bit(&mut self) -> Result<bool, E> {
        self.sda.set_high()?;
        self.wait();
        self.scl.set_high()?;
        self.wait();
        let bit = self.sda.is_high()?;
        self.scl.set_low()?;
        Ok(bit)
    }
}

impl<SDA, SCL, Delay, E> BusTransactor for BitBang<SDA, SCL, Delay>
where
    SDA: InputPin<Error = E> + OutputPin<Error = E>,
    SCL: OutputPin<Error = E>,
    Delay: DelayNs,
{
    type Error = E;

    // Works from idle and, with SCL low, as a repeated START.
    fn start(&mut self) -> Result<(), E> {
        self.sda.set_high()?;
        self.scl.set_high()?;
        self.wait();
        self.sda.set_low()?;
        self.wait();
        self.scl.set_low()
    }

    fn stop(&mut self) -> Result<(), E> {
        self.sda.set_low()?;
        self.wait();
        self.scl.set_high()?;
        self.wait();
        self.sda.set_high()?;
        self.wait();
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<Acknowledge, E> {
        for bit in (0..8).rev() {
            self.write_bit(byte & (1 << bit) != 0)?;
        }
        Ok(if self.read_bit()? { Acknowledge::Nack } else { Acknowledge::Ack })
    }

    fn read_byte(&mut self) -> Result<u8, E> {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | u8::from(self.read_bit()?);
        }
        Ok(byte)
    }

    fn send_ack(&mut self) -> Result<(), E> {
        self.write_bit(false)
    }

    fn send_nack(&mut self) -> Result<(), E> {
        self.write_bit(true)
    }
}
