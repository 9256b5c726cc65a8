//! Scripted bus transactor and delay used by the unit tests.

use std::collections::VecDeque;

use crate::bus::Acknowledge;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BusEvent {
    Start,
    Stop,
    Write(u8),
    Read,
    SendAck,
    SendNack,
}

#[derive(Debug, Eq, PartialEq)]
pub(crate) struct MockFault;

/// Records every bus event. Bytes written are acknowledged unless scripted otherwise.
#[derive(Debug, Default)]
pub(crate) struct MockBus {
    pub events: Vec<BusEvent>,
    reads: VecDeque<u8>,
    writes: usize,
    nack_at: Option<usize>,
    fault_at: Option<usize>,
    busy_polls: usize,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes returned by successive reads; 0xFF once exhausted.
    pub fn with_reads(mut self, bytes: &[u8]) -> Self {
        self.reads.extend(bytes);
        self
    }

    /// NACK the `index`-th written byte (counted from zero).
    pub fn with_nack_at(mut self, index: usize) -> Self {
        self.nack_at = Some(index);
        self
    }

    /// Fail the `index`-th written byte with a hardware fault.
    pub fn with_fault_at(mut self, index: usize) -> Self {
        self.fault_at = Some(index);
        self
    }

    /// NACK the first `count` read-address bytes, as a sensor does while converting.
    pub fn with_busy_polls(mut self, count: usize) -> Self {
        self.busy_polls = count;
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.events
            .iter()
            .rev()
            .find(|e| matches!(e, BusEvent::Start | BusEvent::Stop))
            .is_none_or(|e| *e == BusEvent::Stop)
    }

    /// Number of transactions that addressed the sensor for reading.
    pub fn read_addressings(&self) -> usize {
        self.events.iter().filter(|e| **e == BusEvent::Write(0x81)).count()
    }

    /// Number of START conditions not preceded by a repeated-start register write.
    pub fn transactions(&self) -> usize {
        let mut count = 0;
        let mut open = false;
        for event in &self.events {
            match event {
                BusEvent::Start if !open => {
                    count += 1;
                    open = true;
                }
                BusEvent::Stop => open = false,
                _ => {}
            }
        }
        count
    }

    fn on_start(&mut self) -> Result<(), MockFault> {
        self.events.push(BusEvent::Start);
        Ok(())
    }

    fn on_stop(&mut self) -> Result<(), MockFault> {
        self.events.push(BusEvent::Stop);
        Ok(())
    }

    fn on_write(&mut self, byte: u8) -> Result<Acknowledge, MockFault> {
        self.events.push(BusEvent::Write(byte));
        let index = self.writes;
        self.writes += 1;
        if self.fault_at == Some(index) {
            return Err(MockFault);
        }
        if self.nack_at == Some(index) {
            return Ok(Acknowledge::Nack);
        }
        if byte == 0x81 && self.busy_polls > 0 {
            self.busy_polls -= 1;
            return Ok(Acknowledge::Nack);
        }
        Ok(Acknowledge::Ack)
    }

    fn on_read(&mut self) -> Result<u8, MockFault> {
        self.events.push(BusEvent::Read);
        Ok(self.reads.pop_front().unwrap_or(0xFF))
    }

    fn on_ack(&mut self, event: BusEvent) -> Result<(), MockFault> {
        self.events.push(event);
        Ok(())
    }
}

#[cfg(feature = "blocking")]
impl crate::bus::BusTransactor for MockBus {
    type Error = MockFault;

    fn start(&mut self) -> Result<(), MockFault> {
        self.on_start()
    }
    fn stop(&mut self) -> Result<(), MockFault> {
        self.on_stop()
    }
    fn write_byte(&mut self, byte: u8) -> Result<Acknowledge, MockFault> {
        self.on_write(byte)
    }
    fn read_byte(&mut self) -> Result<u8, MockFault> {
        self.on_read()
    }
    fn send_ack(&mut self) -> Result<(), MockFault> {
        self.on_ack(BusEvent::SendAck)
    }
    fn send_nack(&mut self) -> Result<(), MockFault> {
        self.on_ack(BusEvent::SendNack)
    }
}

#[cfg(feature = "async")]
impl crate::bus::AsyncBusTransactor for MockBus {
    type Error = MockFault;

    async fn start(&mut self) -> Result<(), MockFault> {
        self.on_start()
    }
    async fn stop(&mut self) -> Result<(), MockFault> {
        self.on_stop()
    }
    async fn write_byte(&mut self, byte: u8) -> Result<Acknowledge, MockFault> {
        self.on_write(byte)
    }
    async fn read_byte(&mut self) -> Result<u8, MockFault> {
        self.on_read()
    }
    async fn send_ack(&mut self) -> Result<(), MockFault> {
        self.on_ack(BusEvent::SendAck)
    }
    async fn send_nack(&mut self) -> Result<(), MockFault> {
        self.on_ack(BusEvent::SendNack)
    }
}

/// Counts requested delays instead of sleeping.
#[derive(Debug, Default)]
pub(crate) struct MockDelay {
    pub calls: usize,
    pub total_ns: u64,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ns += u64::from(ns);
    }
    fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ns += u64::from(ns);
    }
    async fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// Raw sample bytes with a valid checksum for `ticks`.
pub(crate) fn sample(ticks: u16) -> [u8; 3] {
    let [hi, lo] = ticks.to_be_bytes();
    [hi, lo, crate::checksum::crc8(&[hi, lo])]
}
