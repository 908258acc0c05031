//! # mcp2210-hid
//!
//! A Rust crate for controlling the GPIO, SPI, and EEPROM functions of the
//! Microchip MCP2210 USB-to-SPI bridge via its USB HID interface.
//!
//! This crate uses the `hidapi` crate for cross-platform USB HID communication.
//!
//! ## Features
//!
//! *   Opening a device by VID/PID and optional serial number (`open`, `open_default`),
//!     or wrapping any [`HidTransport`] (`from_transport`).
//! *   GPIO control (GP0-GP8, addressed through a 16-bit pin word):
//!     *   Strongly-typed `GpioPin` struct.
//!     *   Reading pin levels (always fresh from the device) and writing them.
//!     *   Bulk reads and writes of the whole pin word.
//!     *   Setting/getting pin direction.
//!     *   Reading (and resetting) the GP6 interrupt event counter.
//! *   SPI:
//!     *   Reading/writing the SPI transfer settings (bit rate, chip-select levels,
//!         delays, bytes per transaction, mode).
//!     *   Full-duplex transfers of up to 60 bytes (`transfer`), with automatic
//!         bytes-per-transaction reconfiguration and chunked slave-data draining.
//! *   EEPROM: single byte and range reads/writes of the 256-byte user area.
//!
//! ## Thread Safety
//!
//! Every command/response exchange is serialized by a lock inside [`Mcp2210`],
//! so one handle can be shared (e.g. in an `Arc`) by several threads. Operations
//! that need more than one exchange (setting a pin, an SPI transfer) hold the
//! lock for their whole duration.
//!
//! ## Installation
//!
//! Add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mcp2210-hid = "0.1.0"
//! hidapi = "2.0"
//! log = "0.4"          # Optional, for logging
//! ```
//!
//! You also need the `hidapi` library installed on your system. See the [`hidapi` crate documentation](https://docs.rs/hidapi/) for details.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use mcp2210_hid::{
//!     gpio::{GpioDirection, GpioPin, GpioValue},
//!     Mcp2210, Result,
//! };
//! use hidapi::HidApi;
//!
//! fn main() -> Result<()> {
//!     // Optional: Initialize logging
//!     // env_logger::init();
//!
//!     let hid_api = HidApi::new()?;
//!     let device = Mcp2210::open_default(&hid_api)?;
//!
//!     // --- GPIO Example (GP2) ---
//!     let pin = GpioPin::new(2)?;
//!     device.set_pin_direction(pin, GpioDirection::Output)?;
//!     device.set_pin_value(pin, GpioValue::Active)?;
//!     println!("GP2 is now {:?}", device.get_pin_value(pin)?);
//!
//!     // --- SPI Example ---
//!     let reply = device.transfer(&[0x9F, 0x00, 0x00, 0x00])?;
//!     println!("Slave replied {:02X?}", reply);
//!
//!     // --- EEPROM Example ---
//!     device.write_eeprom(0x10, 0xA5)?;
//!     assert_eq!(device.read_eeprom(0x10)?, 0xA5);
//!
//!     device.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Hardware Setup Notes
//!
//! *   **Linux udev Rules:** Grant user permission to the HID device. Create `/etc/udev/rules.d/99-mcp2210.rules`:
//!     ```udev
//!     SUBSYSTEM=="hidraw", ATTRS{idVendor}=="04d8", ATTRS{idProduct}=="00de", MODE="0666", GROUP="plugdev"
//!     ```
//!     Reload: `sudo udevadm control --reload-rules && sudo udevadm trigger`
//! *   **Chip-select pins:** GP pins configured for the chip-select or alternate
//!     function ignore GPIO writes. The pin cache always takes the value the
//!     device echoes back.
//!
//! ## License
//!
//! This project is licensed under the WTFPL.

mod consts;
pub mod device;
pub mod eeprom;
mod error;
pub mod gpio;
pub mod report;
pub mod spi;
pub mod transport;

pub use device::{Mcp2210, Mcp2210Config};
pub use eeprom::EepromWriteStatus;
pub use error::{Error, Result};
pub use gpio::{GpioDirection, GpioPin, GpioValue};
pub use spi::{SpiMode, SpiStatus, SpiTransferSettings};
pub use transport::HidTransport;
// Re-export only essential public constants
pub use consts::{MCP2210_PID, MICROCHIP_VID};

/// Largest payload accepted by [`Mcp2210::transfer`].
pub const MAX_SPI_TRANSFER_LEN: usize = consts::spi::MAX_TRANSFER_LEN;
