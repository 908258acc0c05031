//! Opening, closing, and the serialized command/response exchange.

use crate::consts;
use crate::error::{Error, Result};
use crate::report::{CommandReport, ResponseReport};
use crate::spi::SpiTransferSettings;
use crate::transport::HidTransport;
use hidapi::{HidApi, HidDevice};
use log::{debug, trace, warn};
use std::sync::{Mutex, PoisonError};

/// Session settings that are not part of the device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mcp2210Config {
    /// Upper bound on each response read in milliseconds. `None` blocks
    /// until the device answers.
    pub read_timeout_ms: Option<i32>,
    /// Reject responses whose byte 0 does not echo the command code.
    pub check_command_echo: bool,
}

impl Default for Mcp2210Config {
    fn default() -> Self {
        Self {
            read_timeout_ms: None,
            check_command_echo: true,
        }
    }
}

impl Mcp2210Config {
    /// Same as the default, but with a bounded read timeout.
    pub fn with_read_timeout_ms(mut self, timeout_ms: i32) -> Self {
        self.read_timeout_ms = Some(timeout_ms);
        self
    }
}

/// Everything guarded by the session lock: the transport and the caches.
#[derive(Debug)]
pub(crate) struct Session<T> {
    transport: T,
    config: Mcp2210Config,
    /// Bit n = last known level of GPn. A snapshot, refreshed on demand.
    pub(crate) pin_values: u16,
    /// Bit n set = GPn is an input, as reported on the wire.
    pub(crate) pin_directions: u16,
    pub(crate) spi_settings: SpiTransferSettings,
}

impl<T: HidTransport> Session<T> {
    /// Writes `command` and reads the matching response.
    ///
    /// The caller holds the session lock, so no other exchange can land
    /// between the write and the read.
    pub(crate) fn exchange(&mut self, command: &CommandReport) -> Result<ResponseReport> {
        let frame = command.as_bytes();
        trace!("OUT {:02X?}", frame);
        let written = self.transport.write(frame)?;
        if written != frame.len() {
            warn!(
                "Transport write returned unexpected length: {} (expected {})",
                written,
                frame.len()
            );
            return Err(Error::Io(std::io::Error::other("Partial HID write")));
        }

        let mut in_buf = [0u8; consts::REPORT_SIZE];
        let timeout = self.config.read_timeout_ms.unwrap_or(-1);
        let received = self.transport.read_timeout(&mut in_buf, timeout)?;
        if received == 0 && self.config.read_timeout_ms.is_some() {
            warn!(
                "No response to command 0x{:02X} within {}ms",
                command.opcode(),
                timeout
            );
            return Err(Error::Timeout);
        }
        let response = ResponseReport::from_bytes(&in_buf[..received])?;
        trace!("IN  {:02X?}", response.as_bytes());

        if self.config.check_command_echo && response.opcode() != command.opcode() {
            warn!(
                "Command echo mismatch: sent 0x{:02X}, received 0x{:02X}",
                command.opcode(),
                response.opcode()
            );
            return Err(Error::MismatchedCommandEcho {
                sent: command.opcode(),
                received: response.opcode(),
            });
        }
        Ok(response)
    }
}

/// A handle to an opened MCP2210.
///
/// All methods take `&self`; every command/response exchange is serialized
/// by an internal lock, so the handle can be shared between threads when the
/// transport is `Send`.
#[derive(Debug)]
pub struct Mcp2210<T: HidTransport = HidDevice> {
    session: Mutex<Option<Session<T>>>,
    config: Mcp2210Config,
}

impl Mcp2210<HidDevice> {
    // --- Constructors ---

    /// Opens a device by Vendor ID and Product ID, optionally selecting a
    /// serial number. **Warning:** Ambiguous if several devices match and
    /// no serial is given.
    pub fn open(hid_api: &HidApi, vid: u16, pid: u16, serial: Option<&str>) -> Result<Self> {
        let device = match serial {
            Some(sn) => hid_api.open_serial(vid, pid, sn)?,
            None => hid_api.open(vid, pid)?,
        };
        debug!(
            "Opened MCP2210: VID={:04X}, PID={:04X}, SN={:?}",
            vid, pid, serial
        );
        Self::from_transport(device)
    }

    /// Opens the first device with the default Microchip IDs.
    pub fn open_default(hid_api: &HidApi) -> Result<Self> {
        Self::open(hid_api, consts::MICROCHIP_VID, consts::MCP2210_PID, None)
    }

    /// Gets the USB HID device information of the open device.
    pub fn usb_device_info(&self) -> Result<hidapi::DeviceInfo> {
        self.with_session(|session| Ok(session.transport.get_device_info()?))
    }
}

impl<T: HidTransport> Mcp2210<T> {
    /// Wraps an already opened transport with the default configuration.
    pub fn from_transport(transport: T) -> Result<Self> {
        Self::from_transport_with_config(transport, Mcp2210Config::default())
    }

    /// Wraps an already opened transport and primes the caches: pin values,
    /// then SPI settings, then pin directions.
    pub fn from_transport_with_config(transport: T, config: Mcp2210Config) -> Result<Self> {
        let mut session = Session {
            transport,
            config,
            pin_values: 0,
            pin_directions: 0,
            spi_settings: SpiTransferSettings::default(),
        };
        session.refresh_pin_values()?;
        session.refresh_spi_settings()?;
        session.refresh_pin_directions()?;
        debug!(
            "Session ready: pins=0x{:04X}, dirs=0x{:04X}, spi={:?}",
            session.pin_values, session.pin_directions, session.spi_settings
        );
        Ok(Self {
            session: Mutex::new(Some(session)),
            config,
        })
    }

    /// Releases the transport. Later calls fail with [`Error::NotConnected`].
    pub fn close(&self) {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("MCP2210 session closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Gets the configuration this session was opened with.
    pub fn config(&self) -> Mcp2210Config {
        self.config
    }

    /// Sends one command and returns the device's response, unchecked apart
    /// from the command echo.
    pub fn exchange(&self, command: &CommandReport) -> Result<ResponseReport> {
        self.with_session(|session| session.exchange(command))
    }

    /// Runs `f` with exclusive access to the session.
    pub(crate) fn with_session<R>(
        &self,
        f: impl FnOnce(&mut Session<T>) -> Result<R>,
    ) -> Result<R> {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let session = guard.as_mut().ok_or(Error::NotConnected)?;
        f(session)
    }
}
