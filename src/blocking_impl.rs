use crate::bus::{execute, BusTransactor, Transaction};
use crate::hw_def::*;
use crate::logging::{debug, trace, warn};
use crate::types::*;

use embedded_hal::delay::DelayNs;

impl<BUS, Delay, E> Sht21<BUS, Delay>
where
    BUS: BusTransactor<Error = E>,
    Delay: DelayNs,
{
    /// Create a new SHT21 driver instance
    pub fn new(bus: BUS, delay: Delay) -> Self {
        Self { bus, delay }
    }

    /// Give back the bus transactor and delay provider
    pub fn release(self) -> (BUS, Delay) {
        (self.bus, self.delay)
    }

    fn command(&mut self, command: Command) -> Result<(), Error<E>> {
        execute(&mut self.bus, Transaction::command(ADDRESS, command.as_u8()))
    }

    fn poll(&mut self) -> Result<RawSample, Error<E>> {
        let mut read_buf = [0u8; 3];
        for attempt in 1..=POLL_ATTEMPTS {
            self.delay.delay_ms(POLL_INTERVAL_MS);
            match execute(&mut self.bus, Transaction::read(ADDRESS, &mut read_buf)) {
                Ok(()) => {
                    trace!("sht21::poll(): ready after {} attempts", attempt);
                    return Ok(RawSample(read_buf));
                }
                Err(Error::Nack) => {}
                Err(e) => return Err(e),
            }
        }
        warn!("sht21::poll(): no result after {} attempts", POLL_ATTEMPTS);
        Err(Error::Timeout)
    }

    /// Trigger a conversion and return the checksum-verified sample
    pub fn raw_sample(&mut self, measurement: Measurement) -> Result<RawSample, Error<E>> {
        self.command(measurement.trigger_command())?;
        let sample = self.poll()?;
        if !sample.verify() {
            warn!("sht21::raw_sample(): crc mismatch: read_crc={:#x}, crc_expect={:#x}",
                sample.checksum(), crate::checksum::crc8(&sample.0[..2]));
            return Err(Error::CrcMismatch);
        }
        Ok(sample)
    }

    /// Trigger a conversion and return the calibrated value
    pub fn measure(&mut self, measurement: Measurement) -> Result<f32, Error<E>> {
        let sample = self.raw_sample(measurement)?;
        Ok(measurement.convert(sample.ticks()))
    }

    /// Temperature in degrees centigrade
    pub fn temperature(&mut self) -> Result<f32, Error<E>> {
        self.measure(Measurement::Temperature)
    }

    /// Relative humidity in percent
    pub fn humidity(&mut self) -> Result<f32, Error<E>> {
        self.measure(Measurement::Humidity)
    }

    /// Temperature followed by humidity; fails if either does
    pub fn climate(&mut self) -> Result<Climate, Error<E>> {
        let temperature = self.temperature()?;
        let humidity = self.humidity()?;
        debug!("sht21::climate(): {} C, {} %RH", temperature, humidity);
        Ok(Climate { temperature, humidity })
    }

    /// Read the user register
    pub fn user_register(&mut self) -> Result<UserRegister, Error<E>> {
        let mut read_buf = [0u8; 1];
        execute(&mut self.bus, Transaction::read_register(ADDRESS, Command::ReadUserRegister.as_u8(), &mut read_buf))?;
        Ok(UserRegister::from(read_buf[0]))
    }

    /// Write the user register.
    ///
    /// Reserved bits must be written back as read; start from
    /// [`user_register`](Self::user_register) and use the `with_*` builders.
    pub fn set_user_register(&mut self, value: impl Into<u8>) -> Result<(), Error<E>> {
        let data = [value.into()];
        execute(&mut self.bus, Transaction::write_register(ADDRESS, Command::WriteUserRegister.as_u8(), &data))
    }

    /// Software reset.
    ///
    /// Wait [`SOFT_RESET_SETTLE_MS`] before talking to the sensor again.
    pub fn soft_reset(&mut self) -> Result<(), Error<E>> {
        self.command(Command::SoftReset)
    }
}
