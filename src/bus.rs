//! The bit-level bus seam the driver is written against, and the single framed
//! transaction primitive built on top of it.

use crate::logging::trace;
use crate::types::Error;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Acknowledge bit returned by the addressed device after each written byte
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Acknowledge {
    /// SDA pulled low on the ninth clock
    Ack,
    /// SDA left high on the ninth clock
    Nack,
}

/// Transfer direction carried in the R/W bit of the address byte
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Master reads from the device
    Read,
    /// Master writes to the device
    Write,
}

/// Build the address byte for a 7-bit `address` and `direction`
pub const fn address_byte(address: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Write => address << 1,
        Direction::Read => (address << 1) | 1,
    }
}

/// Blocking two-wire bus primitives
#[cfg(feature = "blocking")]
pub trait BusTransactor {
    /// Error raised by the underlying hardware, e.g. a GPIO failure
    type Error;

    /// Issue a START (or repeated START) condition
    fn start(&mut self) -> Result<(), Self::Error>;
    /// Issue a STOP condition
    fn stop(&mut self) -> Result<(), Self::Error>;
    /// Clock out one byte and sample the acknowledge bit
    fn write_byte(&mut self, byte: u8) -> Result<Acknowledge, Self::Error>;
    /// Clock in one byte without acknowledging it
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
    /// Acknowledge the byte just read
    fn send_ack(&mut self) -> Result<(), Self::Error>;
    /// Refuse the byte just read, ending the read
    fn send_nack(&mut self) -> Result<(), Self::Error>;
}

/// Async two-wire bus primitives
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncBusTransactor {
    /// Error raised by the underlying hardware, e.g. a GPIO failure
    type Error;

    /// Issue a START (or repeated START) condition
    async fn start(&mut self) -> Result<(), Self::Error>;
    /// Issue a STOP condition
    async fn stop(&mut self) -> Result<(), Self::Error>;
    /// Clock out one byte and sample the acknowledge bit
    async fn write_byte(&mut self, byte: u8) -> Result<Acknowledge, Self::Error>;
    /// Clock in one byte without acknowledging it
    async fn read_byte(&mut self) -> Result<u8, Self::Error>;
    /// Acknowledge the byte just read
    async fn send_ack(&mut self) -> Result<(), Self::Error>;
    /// Refuse the byte just read, ending the read
    async fn send_nack(&mut self) -> Result<(), Self::Error>;
}

/// Data phase of a [`Transaction`]
#[derive(Debug)]
pub enum Payload<'a> {
    /// Read `buf.len()` bytes, acknowledging all but the last
    Read(&'a mut [u8]),
    /// Write every byte, each of which must be acknowledged
    Write(&'a [u8]),
}

/// One framed bus transaction: START, optional register pointer, data phase, STOP.
///
/// | constructor        | register | payload       |
/// |--------------------|----------|---------------|
/// | [`read_register`]  | yes      | read N bytes  |
/// | [`read`]           | no       | read N bytes  |
/// | [`write_register`] | yes      | write 1 byte  |
/// | [`command`]        | yes      | empty         |
///
/// A register read switches direction with a repeated START. Any missing
/// acknowledge aborts the transaction; STOP is issued on every exit path.
///
/// [`read_register`]: Transaction::read_register
/// [`read`]: Transaction::read
/// [`write_register`]: Transaction::write_register
/// [`command`]: Transaction::command
#[derive(Debug)]
pub struct Transaction<'a> {
    /// 7-bit device address
    pub address: u8,
    /// Register pointer / command byte sent right after the write address
    pub register: Option<u8>,
    /// Data phase
    pub payload: Payload<'a>,
}
impl<'a> Transaction<'a> {
    /// Read `buf.len()` bytes from `register`
    pub fn read_register(address: u8, register: u8, buf: &'a mut [u8]) -> Self {
        Self { address, register: Some(register), payload: Payload::Read(buf) }
    }
    /// Read `buf.len()` bytes without sending a register pointer first
    pub fn read(address: u8, buf: &'a mut [u8]) -> Self {
        Self { address, register: None, payload: Payload::Read(buf) }
    }
    /// Write one byte to `register`
    pub fn write_register(address: u8, register: u8, data: &'a [u8; 1]) -> Self {
        Self { address, register: Some(register), payload: Payload::Write(data) }
    }
    /// Send `command` with no data
    pub fn command(address: u8, command: u8) -> Self {
        Self { address, register: Some(command), payload: Payload::Write(&[]) }
    }

    fn is_framable(&self) -> bool {
        !matches!(&self.payload, Payload::Read(buf) if buf.is_empty())
    }
}

fn expect_ack<E>(address: u8, byte: u8, ack: Acknowledge) -> Result<(), Error<E>> {
    match ack {
        Acknowledge::Ack => Ok(()),
        Acknowledge::Nack => {
            trace!("sht21::bus: nack from {:#x} on byte {:#x}", address, byte);
            Err(Error::Nack)
        }
    }
}

/// Run `transaction` on a blocking bus.
///
/// A zero-length read is rejected before the bus is touched.
#[cfg(feature = "blocking")]
pub fn execute<B: BusTransactor>(bus: &mut B, transaction: Transaction<'_>) -> Result<(), Error<B::Error>> {
    if !transaction.is_framable() {
        return Err(Error::InvalidInputData);
    }
    let framed = frame(bus, transaction);
    let stopped = bus.stop().map_err(Error::Bus);
    framed.and(stopped)
}

#[cfg(feature = "blocking")]
fn write_expect_ack<B: BusTransactor>(bus: &mut B, address: u8, byte: u8) -> Result<(), Error<B::Error>> {
    let ack = bus.write_byte(byte).map_err(Error::Bus)?;
    expect_ack(address, byte, ack)
}

#[cfg(feature = "blocking")]
fn frame<B: BusTransactor>(bus: &mut B, transaction: Transaction<'_>) -> Result<(), Error<B::Error>> {
    let Transaction { address, register, payload } = transaction;
    bus.start().map_err(Error::Bus)?;
    match payload {
        Payload::Read(buf) => {
            if let Some(register) = register {
                write_expect_ack(bus, address, address_byte(address, Direction::Write))?;
                write_expect_ack(bus, address, register)?;
                bus.start().map_err(Error::Bus)?;
            }
            write_expect_ack(bus, address, address_byte(address, Direction::Read))?;
            let last = buf.len() - 1;
            for (ii, byte) in buf.iter_mut().enumerate() {
                *byte = bus.read_byte().map_err(Error::Bus)?;
                if ii == last {
                    bus.send_nack().map_err(Error::Bus)?;
                } else {
                    bus.send_ack().map_err(Error::Bus)?;
                }
            }
        }
        Payload::Write(data) => {
            write_expect_ack(bus, address, address_byte(address, Direction::Write))?;
            if let Some(register) = register {
                write_expect_ack(bus, address, register)?;
            }
            for byte in data {
                write_expect_ack(bus, address, *byte)?;
            }
        }
    }
    Ok(())
}

/// Run `transaction` on an async bus.
///
/// A zero-length read is rejected before the bus is touched.
#[cfg(feature = "async")]
pub async fn execute_async<B: AsyncBusTransactor>(bus: &mut B, transaction: Transaction<'_>) -> Result<(), Error<B::Error>> {
    if !transaction.is_framable() {
        return Err(Error::InvalidInputData);
    }
    let framed = frame_async(bus, transaction).await;
    let stopped = bus.stop().await.map_err(Error::Bus);
    framed.and(stopped)
}

#[cfg(feature = "async")]
async fn write_expect_ack_async<B: AsyncBusTransactor>(bus: &mut B, address: u8, byte: u8) -> Result<(), Error<B::Error>> {
    let ack = bus.write_byte(byte).await.map_err(Error::Bus)?;
    expect_ack(address, byte, ack)
}

#[cfg(feature = "async")]
async fn frame_async<B: AsyncBusTransactor>(bus: &mut B, transaction: Transaction<'_>) -> Result<(), Error<B::Error>> {
    let Transaction { address, register, payload } = transaction;
    bus.start().await.map_err(Error::Bus)?;
    match payload {
        Payload::Read(buf) => {
            if let Some(register) = register {
                write_expect_ack_async(bus, address, address_byte(address, Direction::Write)).await?;
                write_expect_ack_async(bus, address, register).await?;
                bus.start().await.map_err(Error::Bus)?;
            }
            write_expect_ack_async(bus, address, address_byte(address, Direction::Read)).await?;
            let last = buf.len() - 1;
            for (ii, byte) in buf.iter_mut().enumerate() {
                *byte = bus.read_byte().await.map_err(Error::Bus)?;
                if ii == last {
                    bus.send_nack().await.map_err(Error::Bus)?;
                } else {
                    bus.send_ack().await.map_err(Error::Bus)?;
                }
            }
        }
        Payload::Write(data) => {
            write_expect_ack_async(bus, address, address_byte(address, Direction::Write)).await?;
            if let Some(register) = register {
                write_expect_ack_async(bus, address, register).await?;
            }
            for byte in data {
                write_expect_ack_async(bus, address, *byte).await?;
            }
        }
    }
    Ok(())
}


#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::*;
    use crate::mock::{BusEvent::*, MockBus};
    use embassy_futures::block_on;

    #[test]
    fn read_register_framing() {
        let mut bus = MockBus::new().with_reads(&[0x3A]);
        let mut buf = [0u8; 1];
        block_on(execute_async(&mut bus, Transaction::read_register(0x40, 0xE7, &mut buf))).unwrap();
        assert_eq!(buf, [0x3A]);
        assert_eq!(bus.events, vec![
            Start, Write(0x80), Write(0xE7), Start, Write(0x81), Read, SendNack, Stop,
        ]);
    }

    #[test]
    fn nack_stops_the_bus() {
        let mut bus = MockBus::new().with_nack_at(2);
        let result = block_on(execute_async(&mut bus, Transaction::write_register(0x40, 0xE6, &[0x02])));
        assert!(matches!(result, Err(Error::Nack)));
        assert_eq!(bus.events, vec![Start, Write(0x80), Write(0xE6), Write(0x02), Stop]);
    }
}
