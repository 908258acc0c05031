//! Access to the 256-byte user EEPROM.

use crate::consts::{self, cmd};
use crate::device::{Mcp2210, Session};
use crate::error::{Error, Result};
use crate::report::CommandReport;
use crate::transport::HidTransport;
use log::{debug, warn};

/// Outcome of an EEPROM write, decoded from the response status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EepromWriteStatus {
    Success,
    /// The cell did not take the value (e.g. worn out).
    WriteFailed,
    /// The EEPROM is write-protected or permanently locked.
    ProtectedRegion,
    Unknown(u8),
}

impl EepromWriteStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            consts::STATUS_SUCCESS => EepromWriteStatus::Success,
            consts::eeprom::STATUS_WRITE_FAILED => EepromWriteStatus::WriteFailed,
            consts::eeprom::STATUS_PROTECTED => EepromWriteStatus::ProtectedRegion,
            other => EepromWriteStatus::Unknown(other),
        }
    }

    /// Maps the outcome of writing `address` onto the crate's error type.
    pub fn into_result(self, address: u8) -> Result<()> {
        match self {
            EepromWriteStatus::Success => Ok(()),
            EepromWriteStatus::WriteFailed => Err(Error::EepromWriteFailed { address }),
            EepromWriteStatus::ProtectedRegion => Err(Error::EepromProtected { address }),
            EepromWriteStatus::Unknown(status) => {
                Err(Error::EepromUnknownStatus { address, status })
            }
        }
    }
}

fn check_range(start: u8, len: usize) -> Result<()> {
    if len > consts::eeprom::SIZE - usize::from(start) {
        return Err(Error::ArgumentOutOfRange(format!(
            "EEPROM range 0x{:02X}+{} runs past the end ({} bytes)",
            start,
            len,
            consts::eeprom::SIZE
        )));
    }
    Ok(())
}

impl<T: HidTransport> Session<T> {
    fn read_eeprom(&mut self, address: u8) -> Result<u8> {
        let mut command = CommandReport::new(cmd::EEPROM_READ);
        command.set_byte(consts::eeprom::OFFSET_ADDRESS, address)?;
        let response = self.exchange(&command)?.expect_success()?;
        Ok(response.byte(consts::eeprom::OFFSET_READ_VALUE))
    }

    fn write_eeprom(&mut self, address: u8, value: u8) -> Result<()> {
        let mut command = CommandReport::new(cmd::EEPROM_WRITE);
        command.set_byte(consts::eeprom::OFFSET_ADDRESS, address)?;
        command.set_byte(consts::eeprom::OFFSET_WRITE_VALUE, value)?;
        let response = self.exchange(&command)?;
        let status = EepromWriteStatus::from_code(response.status());
        if status != EepromWriteStatus::Success {
            warn!("EEPROM write at 0x{:02X} rejected: {:?}", address, status);
        }
        status.into_result(address)
    }
}

impl<T: HidTransport> Mcp2210<T> {
    /// Reads one byte of user EEPROM.
    pub fn read_eeprom(&self, address: u8) -> Result<u8> {
        self.with_session(|session| session.read_eeprom(address))
    }

    /// Writes one byte of user EEPROM.
    ///
    /// # Errors
    ///
    /// [`Error::EepromWriteFailed`], [`Error::EepromProtected`], or
    /// [`Error::EepromUnknownStatus`] when the device rejects the write.
    pub fn write_eeprom(&self, address: u8, value: u8) -> Result<()> {
        debug!("EEPROM write 0x{:02X} = 0x{:02X}", address, value);
        self.with_session(|session| session.write_eeprom(address, value))
    }

    /// Reads `len` consecutive bytes starting at `start`.
    pub fn read_eeprom_range(&self, start: u8, len: usize) -> Result<Vec<u8>> {
        check_range(start, len)?;
        self.with_session(|session| {
            (0..len)
                .map(|offset| session.read_eeprom(start + offset as u8))
                .collect()
        })
    }

    /// Writes `data` starting at `start`, one byte per command. Stops at the
    /// first byte the device rejects and returns that error.
    pub fn write_eeprom_range(&self, start: u8, data: &[u8]) -> Result<()> {
        check_range(start, data.len())?;
        debug!("EEPROM write {} bytes from 0x{:02X}", data.len(), start);
        self.with_session(|session| {
            for (offset, &value) in data.iter().enumerate() {
                session.write_eeprom(start + offset as u8, value)?;
            }
            Ok(())
        })
    }
}
