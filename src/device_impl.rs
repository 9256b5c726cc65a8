use crate::bus::{execute_async, AsyncBusTransactor, Transaction};
use crate::checksum::crc8;
use crate::hw_def::*;
use crate::logging::{debug, trace, warn};
use crate::types::*;

use embedded_hal_async::delay::DelayNs;

impl<BUS, Delay, E> Sht21Async<BUS, Delay>
where
    BUS: AsyncBusTransactor<Error = E>,
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

    async fn command(&mut self, command: Command) -> Result<(), Error<E>> {
        execute_async(&mut self.bus, Transaction::command(ADDRESS, command.as_u8())).await
    }

    // The sensor NACKs its read address until the conversion is done.
    async fn poll(&mut self) -> Result<RawSample, Error<E>> {
        let mut read_buf = [0u8; 3];
        for attempt in 1..=POLL_ATTEMPTS {
            self.delay.delay_ms(POLL_INTERVAL_MS).await;
            match execute_async(&mut self.bus, Transaction::read(ADDRESS, &mut read_buf)).await {
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
    pub async fn raw_sample(&mut self, measurement: Measurement) -> Result<RawSample, Error<E>> {
        self.command(measurement.trigger_command()).await?;
        let sample = self.poll().await?;
        if !sample.verify() {
            warn!("sht21::raw_sample(): crc mismatch: read_crc={:#x}, crc_expect={:#x}",
                sample.checksum(), crc8(&sample.0[..2]));
            return Err(Error::CrcMismatch);
        }
        Ok(sample)
    }

    /// Trigger a conversion and return the calibrated value
    pub async fn measure(&mut self, measurement: Measurement) -> Result<f32, Error<E>> {
        let sample = self.raw_sample(measurement).await?;
        Ok(measurement.convert(sample.ticks()))
    }

    /// Temperature in degrees centigrade
    pub async fn temperature(&mut self) -> Result<f32, Error<E>> {
        self.measure(Measurement::Temperature).await
    }

    /// Relative humidity in percent
    pub async fn humidity(&mut self) -> Result<f32, Error<E>> {
        self.measure(Measurement::Humidity).await
    }

    /// Temperature followed by humidity; fails if either does
    pub async fn climate(&mut self) -> Result<Climate, Error<E>> {
        let temperature = self.temperature().await?;
        let humidity = self.humidity().await?;
        debug!("sht21::climate(): {} C, {} %RH", temperature, humidity);
        Ok(Climate { temperature, humidity })
    }

    /// Read the user register
    pub async fn user_register(&mut self) -> Result<UserRegister, Error<E>> {
        let mut read_buf = [0u8; 1];
        execute_async(&mut self.bus, Transaction::read_register(ADDRESS, Command::ReadUserRegister.as_u8(), &mut read_buf)).await?;
        Ok(UserRegister::from(read_buf[0]))
    }

    /// Write the user register; keep reserved bits as read
    pub async fn set_user_register(&mut self, value: impl Into<u8>) -> Result<(), Error<E>> {
        let data = [value.into()];
        execute_async(&mut self.bus, Transaction::write_register(ADDRESS, Command::WriteUserRegister.as_u8(), &data)).await
    }

    /// software reset; wait [`SOFT_RESET_SETTLE_MS`] afterwards
    pub async fn soft_reset(&mut self) -> Result<(), Error<E>> {
        self.command(Command::SoftReset).await
    }
}
