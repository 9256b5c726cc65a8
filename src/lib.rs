//! This is a platform-agnostic Rust driver for the Sensirion SHT21 (and the pin-compatible
//! HTU21D) humidity and temperature digital sensor. It talks to the sensor through a small
//! bit-level bus trait, [`BusTransactor`] or [`AsyncBusTransactor`], and uses the
//! [`embedded-hal`] or [`embedded-hal-async`] delay traits while polling for results.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal
//! [`embedded-hal-async`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal-async
//!
//! This driver allows you to:
//! - Trigger temperature and relative humidity conversions (no hold master) and poll for the result.
//! - Verify every sample against the sensor's CRC-8 checksum.
//! - Convert samples to degrees centigrade and percent relative humidity.
//! - Read and write the user register (resolution, heater, end-of-battery status).
//! - Trigger a software reset.
//! - Bit-bang the bus on two GPIO pins with [`BitBang`] when no other transactor is at hand.
//! - blocking API support.
//! - async API support.
//!
//! This driver does not support:
//! - Hold master mode (clock stretching while converting).
//! - Reading the electronic identification code.
//!
//! ## Features
//!
//! - `async`: Enables async API.
//! - `blocking`: Enables blocking API and the bit-banged bus.
//! - `defmt`: Enables logging using the `defmt` framework.
//! - `log`: Enables logging using the `log` framework.
//!
//! ## Measurement cycle
//!
//! A measurement writes the trigger command, then polls the sensor every
//! [`POLL_INTERVAL_MS`] for up to [`POLL_ATTEMPTS`] attempts. The sensor does not acknowledge
//! its read address until the conversion is done. The three bytes read are two data bytes,
//! whose low two bits are status, followed by a checksum. Any failure leaves the bus stopped,
//! so the next call starts from a clean state.
//!
//! Datasheet:
//!   [SHT21](https://sensirion.com/media/documents/120BBE4C/63500094/Sensirion_Datasheet_Humidity_Sensor_SHT21.pdf)
//!
//! ## Blocking Example:
//!
//! ```ignore
//! use sht21::{BitBang, Sht21};
//!
//! // Platform-specific
//! let sda = /* open-drain embedded_hal::digital::{InputPin + OutputPin} */;
//! let scl = /* embedded_hal::digital::OutputPin */;
//! let bus_delay = /* embedded_hal::delay::DelayNs instance */;
//! let delay = /* embedded_hal::delay::DelayNs instance */;
//!
//! let mut sht21 = Sht21::new(BitBang::new(sda, scl, bus_delay), delay);
//! sht21.soft_reset().unwrap();
//! // Platform-specific: sleep sht21::SOFT_RESET_SETTLE_MS
//!
//! loop {
//!     // a failed cycle is simply skipped
//!     if let Ok(climate) = sht21.climate() {
//!         println!("{}", climate); // {"temperature": 23, "humidity": 45}
//!     }
//!     // Platform-specific: sleep a while
//!     sleep_secs(10);
//! }
//! ```
//!
//! ## Async Example:
//!
//! ```ignore
//! use sht21::{Resolution, Sht21Async};
//!
//! // Platform-specific
//! let bus = /* sht21::AsyncBusTransactor instance */;
//! let delay = /* embedded_hal_async::delay::DelayNs instance */;
//!
//! let mut sht21 = Sht21Async::new(bus, delay);
//!
//! // lower the resolution, keeping the reserved bits as read
//! let reg = sht21.user_register().await.unwrap();
//! sht21.set_user_register(reg.with_resolution(Resolution::Rh8T12)).await.unwrap();
//!
//! println!("{:0.1} °C", sht21.temperature().await.unwrap());
//! println!("{:0.1} %RH", sht21.humidity().await.unwrap());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(not(test), no_std)]

#[cfg(not(any(feature = "async", feature = "blocking")))]
compile_error!("At least one of \"async\" and \"blocking\" features must be enabled");

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

mod logging;

#[cfg(feature = "blocking")]
mod bitbang;
#[cfg(feature = "blocking")]
mod blocking_impl;
mod bus;
mod checksum;
#[cfg(feature = "async")]
mod device_impl;
mod hw_def;
#[cfg(test)]
mod mock;
mod types;

#[cfg(feature = "blocking")]
pub use crate::bitbang::{BitBang, DEFAULT_HALF_PERIOD_NS};
pub use crate::{bus::*, checksum::*, hw_def::*, types::*};
