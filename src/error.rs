use crate::spi::SpiStatus;
use thiserror::Error;

/// Errors that can occur when using an MCP2210 device.
///
/// This enum covers transport failures, protocol violations, device-reported
/// rejections, and arguments that fall outside what the chip accepts.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the underlying HID API layer.
    #[error("HID API error: {0}")]
    Hid(#[from] hidapi::HidError),
    /// The session was closed, so there is no transport to talk to.
    #[error("Device not connected (session closed)")]
    NotConnected,
    /// General I/O error during device communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid or malformed HID report received from device.
    #[error("Invalid HID report received or unexpected size ({0} bytes)")]
    InvalidReport(usize),
    /// Timeout waiting for device response.
    #[error("Timeout waiting for device response")]
    Timeout,
    /// The command code echoed by the device was not the one written to it.
    #[error("Response echoed command 0x{received:02X}, expected 0x{sent:02X}")]
    MismatchedCommandEcho {
        /// Command code that was sent.
        sent: u8,
        /// Command code found in byte 0 of the response.
        received: u8,
    },
    /// A command without a more specific failure mapping reported a non-zero status.
    #[error("Command 0x{opcode:02X} failed with status 0x{status:02X}")]
    CommandFailed {
        /// Command code that was sent.
        opcode: u8,
        /// Raw status byte from the response.
        status: u8,
    },
    /// Function argument is outside the valid range.
    #[error("Argument out of range: {0}")]
    ArgumentOutOfRange(String),
    /// GPIO pin number is outside the 16-bit pin word.
    #[error("GPIO pin {pin} argument out of range (0-15): {message}")]
    PinArgumentOutOfRange {
        /// The invalid pin number that was specified.
        pin: u8,
        /// Detailed error message explaining the constraint.
        message: String,
    },
    /// Requested operation exceeds device or protocol limits.
    #[error("Requested operation size is too large (max {max}, got {actual})")]
    OperationTooLarge {
        /// Maximum allowed size for this operation.
        max: usize,
        /// Actual size requested.
        actual: usize,
    },
    /// The EEPROM cell could not be written (e.g. worn out).
    #[error("EEPROM write failed at address 0x{address:02X}")]
    EepromWriteFailed {
        /// Address that was being written.
        address: u8,
    },
    /// The EEPROM is write-protected or permanently locked.
    #[error("EEPROM is protected or permanently locked (address 0x{address:02X})")]
    EepromProtected {
        /// Address that was being written.
        address: u8,
    },
    /// The EEPROM write returned a status code with no documented meaning.
    #[error("EEPROM write at address 0x{address:02X} returned unknown status 0x{status:02X}")]
    EepromUnknownStatus {
        /// Address that was being written.
        address: u8,
        /// Raw status byte from the response.
        status: u8,
    },
    /// The device echoed a bytes-per-transaction value other than the one requested.
    #[error("SPI bytes per transaction not applied (requested {requested}, device reports {applied})")]
    SpiLengthNotApplied { requested: usize, applied: u16 },
    /// The SPI engine reported a failure part way through a transfer.
    ///
    /// Any slave data collected before the failure is returned in `received`.
    #[error("SPI transfer failed: {status} ({} bytes received before failure)", .received.len())]
    SpiTransferFailed {
        /// Decoded status from the failing response.
        status: SpiStatus,
        /// Slave data accumulated before the failure, in arrival order.
        received: Vec<u8>,
    },
}

/// Result type alias for MCP2210 operations.
///
/// This is a convenience alias for `std::result::Result<T, Error>` used
/// throughout the crate to reduce boilerplate.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn pin_out_of_range(pin: u8) -> Error {
    Error::PinArgumentOutOfRange {
        pin,
        message: "Pin number must be 0-15".to_string(),
    }
}
