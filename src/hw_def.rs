//! Addresses, command codes, timing and register layout from the SHT21 datasheet.

#[cfg(feature = "defmt")]
use defmt::Format;

/// 7-bit bus address of the SHT21. The part has no address select pin.
pub const ADDRESS: u8 = 0x40;

/// Number of times a pending conversion is polled before giving up.
///
/// 85 attempts at [`POLL_INTERVAL_MS`] cover the worst-case 14-bit temperature
/// conversion time (85 ms) listed in the datasheet.
pub const POLL_ATTEMPTS: u8 = 85;

/// Delay before each poll of a pending conversion, in milliseconds.
pub const POLL_INTERVAL_MS: u32 = 1;

/// Time the sensor needs after a soft reset before it accepts commands again.
///
/// The driver does not wait on its own; callers must honor this after
/// [`Command::SoftReset`].
pub const SOFT_RESET_SETTLE_MS: u32 = 15;

/// Mask clearing the two status bits in the low data byte of a sample.
pub const STATUS_MASK: u8 = 0xFC;

/// Command (register pointer) bytes understood by the sensor
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Command {
    /// Trigger a temperature conversion, no hold master
    TriggerTemperature = 0xF3,
    /// Trigger a relative humidity conversion, no hold master
    TriggerHumidity = 0xF5,
    /// Write the user register
    WriteUserRegister = 0xE6,
    /// Read the user register
    ReadUserRegister = 0xE7,
    /// Soft reset
    SoftReset = 0xFE,
}
impl Command {
    /// The command byte as sent on the bus
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

// User register layout
pub(crate) const USER_REG_RESOLUTION_MSBIT: u8 = 7;
pub(crate) const USER_REG_RESOLUTION_LSBIT: u8 = 0;
pub(crate) const USER_REG_END_OF_BATTERY: u8 = 6;
pub(crate) const USER_REG_HEATER_ENABLED: u8 = 2;
pub(crate) const USER_REG_OTP_RELOAD_DISABLED: u8 = 1;
pub(crate) const USER_REG_RESOLUTION_MASK: u8 = (1 << USER_REG_RESOLUTION_MSBIT) | (1 << USER_REG_RESOLUTION_LSBIT);
