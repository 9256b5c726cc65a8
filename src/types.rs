use crate::checksum::check_crc;
use crate::hw_def::*;

use core::fmt;

#[cfg(feature="defmt")]
use defmt::Format;

/// SHT21 device driver over a blocking bus
#[cfg(feature = "blocking")]
#[derive(Debug)]
pub struct Sht21<BUS, Delay> {
    pub(crate) bus: BUS,
    pub(crate) delay: Delay,
}

/// SHT21 device driver over an async bus
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct Sht21Async<BUS, Delay> {
    pub(crate) bus: BUS,
    pub(crate) delay: Delay,
}

/// All possible errors in this crate
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug)]
pub enum Error<E> {
    /// Bus transactor failure
    Bus(E),
    /// An expected acknowledge was not received
    Nack,
    /// The conversion did not complete within the polling window
    Timeout,
    /// Failure of a checksum from the device was detected
    CrcMismatch,
    /// Invalid input data provided
    InvalidInputData,
}
impl<E> Error<E> {
    /// Coarse classification of the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Bus(_) | Error::Nack => ErrorKind::Bus,
            Error::Timeout | Error::CrcMismatch | Error::InvalidInputData => ErrorKind::Data,
        }
    }
}
impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {e:?}"),
            Error::Nack => write!(f, "no acknowledge from device"),
            Error::Timeout => write!(f, "measurement not ready after {POLL_ATTEMPTS} polls"),
            Error::CrcMismatch => write!(f, "checksum mismatch"),
            Error::InvalidInputData => write!(f, "invalid input data"),
        }
    }
}
impl<E: fmt::Debug> core::error::Error for Error<E> {}

/// Which side of the bus an [`Error`] came from
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Framing failed: hardware error or missing acknowledge
    Bus,
    /// Data arrived but cannot be used: bad checksum or no result in time
    Data,
}

/// Physical quantity measured by one conversion
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Measurement {
    /// Temperature in degrees centigrade
    Temperature,
    /// Relative humidity in percent
    Humidity,
}
impl Measurement {
    /// Command that starts this conversion
    pub fn trigger_command(self) -> Command {
        match self {
            Measurement::Temperature => Command::TriggerTemperature,
            Measurement::Humidity => Command::TriggerHumidity,
        }
    }
    /// Convert masked sensor ticks into the physical value
    pub fn convert(self, ticks: u16) -> f32 {
        match self {
            Measurement::Temperature => raw_temp_to_centigrade(ticks),
            Measurement::Humidity => raw_rel_humid_to_percent(ticks),
        }
    }
}

/// Sample as read from the sensor: data MSB, data LSB with two status bits, checksum
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RawSample(pub [u8; 3]);
impl RawSample {
    /// Check the trailing checksum against the two data bytes
    pub fn verify(&self) -> bool {
        check_crc(&self.0[..2], self.0[2])
    }
    /// Big-endian data word with the status bits cleared
    pub fn ticks(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1] & STATUS_MASK])
    }
    /// The two status bits of the data LSB
    pub fn status(&self) -> u8 {
        self.0[1] & !STATUS_MASK
    }
    /// Checksum byte sent by the sensor
    pub fn checksum(&self) -> u8 {
        self.0[2]
    }
}

/// Convert raw temperature ticks to degrees centigrade
pub fn raw_temp_to_centigrade(ticks: u16) -> f32 {
    -46.85 + 175.72 * (ticks as f32 / 65536.0)
}

/// Convert raw humidity ticks to relative humidity in percent
pub fn raw_rel_humid_to_percent(ticks: u16) -> f32 {
    -6.0 + 125.0 * (ticks as f32 / 65536.0)
}

/// Measurement resolution, selected by user register bits 7 and 0
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// 12 bit RH, 14 bit temperature (power-on default)
    Rh12T14,
    /// 8 bit RH, 12 bit temperature
    Rh8T12,
    /// 10 bit RH, 13 bit temperature
    Rh10T13,
    /// 11 bit RH, 11 bit temperature
    Rh11T11,
}
impl Resolution {
    fn bits(self) -> u8 {
        match self {
            Resolution::Rh12T14 => 0,
            Resolution::Rh8T12 => 1 << USER_REG_RESOLUTION_LSBIT,
            Resolution::Rh10T13 => 1 << USER_REG_RESOLUTION_MSBIT,
            Resolution::Rh11T11 => USER_REG_RESOLUTION_MASK,
        }
    }
}

/// Decoded view of the user register
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UserRegister {
    raw: u8,
    /// measurement resolution
    pub resolution: Resolution,
    /// supply voltage dropped below 2.25 V
    pub end_of_battery: bool,
    /// on-chip heater is enabled
    pub heater_enabled: bool,
    /// calibration data is not reloaded from OTP before each measurement
    pub otp_reload_disabled: bool,
}
impl From<u8> for UserRegister {
    fn from(raw: u8) -> Self {
        let resolution = match ((raw >> USER_REG_RESOLUTION_MSBIT) & 1, (raw >> USER_REG_RESOLUTION_LSBIT) & 1) {
            (0, 0) => Resolution::Rh12T14,
            (0, _) => Resolution::Rh8T12,
            (_, 0) => Resolution::Rh10T13,
            _ => Resolution::Rh11T11,
        };
        Self {
            raw,
            resolution,
            end_of_battery: (raw >> USER_REG_END_OF_BATTERY) & 1 != 0,
            heater_enabled: (raw >> USER_REG_HEATER_ENABLED) & 1 != 0,
            otp_reload_disabled: (raw >> USER_REG_OTP_RELOAD_DISABLED) & 1 != 0,
        }
    }
}
impl From<UserRegister> for u8 {
    fn from(reg: UserRegister) -> Self {
        reg.raw
    }
}
impl UserRegister {
    /// Get the raw register byte
    pub fn raw(&self) -> u8 {
        self.raw
    }
    /// Same register with a different resolution; reserved bits are kept
    pub fn with_resolution(self, resolution: Resolution) -> Self {
        Self::from((self.raw & !USER_REG_RESOLUTION_MASK) | resolution.bits())
    }
    /// Same register with the heater switched on or off; reserved bits are kept
    pub fn with_heater(self, enabled: bool) -> Self {
        let bit = 1 << USER_REG_HEATER_ENABLED;
        Self::from(if enabled { self.raw | bit } else { self.raw & !bit })
    }
}
impl fmt::Display for UserRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserRegister {{ 0x{:02x}; {:?} ", self.raw, self.resolution)?;
        if self.end_of_battery {
            write!(f, "end_of_battery ")?;
        }
        if self.heater_enabled {
            write!(f, "heater_enabled ")?;
        }
        if self.otp_reload_disabled {
            write!(f, "otp_reload_disabled ")?;
        }
        write!(f, "}}")
    }
}

/// Temperature and relative humidity from one reporting cycle
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    /// degrees centigrade
    pub temperature: f32,
    /// relative humidity in percent
    pub humidity: f32,
}
/// Renders the JSON report payload, both values truncated toward zero.
impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"temperature\": {}, \"humidity\": {}}}", self.temperature as i32, self.humidity as i32)
    }
}
