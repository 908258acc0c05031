//! SPI transfer settings and the chunked transfer engine.

use crate::consts::{self, cmd};
use crate::device::{Mcp2210, Session};
use crate::error::{Error, Result};
use crate::report::{CommandReport, ResponseReport};
use crate::transport::HidTransport;
use log::{debug, trace, warn};
use std::fmt;

/// SPI clock polarity/phase combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    fn from_byte(byte: u8) -> Self {
        match byte & 0x03 {
            0 => SpiMode::Mode0,
            1 => SpiMode::Mode1,
            2 => SpiMode::Mode2,
            _ => SpiMode::Mode3,
        }
    }

    fn to_byte(self) -> u8 {
        self as u8
    }
}

/// The SPI transfer settings block (17 bytes on the wire).
///
/// Delays are in units of 100 µs. Chip-select words hold one bit per GP pin
/// that is assigned the chip-select function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiTransferSettings {
    /// SPI clock in bits per second.
    pub bit_rate: u32,
    /// Chip-select levels while idle.
    pub idle_cs_value: u16,
    /// Chip-select levels during a transfer.
    pub active_cs_value: u16,
    pub cs_to_data_delay: u16,
    pub last_data_to_cs_delay: u16,
    pub between_bytes_delay: u16,
    /// Length of one SPI transaction; the device expects every transfer
    /// request to match it.
    pub bytes_per_transaction: u16,
    pub mode: SpiMode,
}

impl Default for SpiTransferSettings {
    /// Placeholder values used only until the first read from the device.
    fn default() -> Self {
        Self {
            bit_rate: 1_000_000,
            idle_cs_value: 0x01FF,
            active_cs_value: 0x0000,
            cs_to_data_delay: 0,
            last_data_to_cs_delay: 0,
            between_bytes_delay: 0,
            bytes_per_transaction: 4,
            mode: SpiMode::Mode0,
        }
    }
}

impl SpiTransferSettings {
    /// Decodes the block from a get/set SPI settings response.
    pub(crate) fn from_response(response: &ResponseReport) -> Result<Self> {
        let block = response.slice(consts::spi::OFFSET_SETTINGS, consts::spi::SETTINGS_LEN)?;
        Ok(Self::from_bytes(block.try_into().map_err(|_| {
            Error::InvalidReport(block.len())
        })?))
    }

    pub fn from_bytes(block: &[u8; consts::spi::SETTINGS_LEN]) -> Self {
        let u16_at = |i: usize| u16::from_le_bytes([block[i], block[i + 1]]);
        Self {
            bit_rate: u32::from_le_bytes([block[0], block[1], block[2], block[3]]),
            idle_cs_value: u16_at(4),
            active_cs_value: u16_at(6),
            cs_to_data_delay: u16_at(8),
            last_data_to_cs_delay: u16_at(10),
            between_bytes_delay: u16_at(12),
            bytes_per_transaction: u16_at(14),
            mode: SpiMode::from_byte(block[16]),
        }
    }

    pub fn to_bytes(&self) -> [u8; consts::spi::SETTINGS_LEN] {
        let mut block = [0u8; consts::spi::SETTINGS_LEN];
        block[0..4].copy_from_slice(&self.bit_rate.to_le_bytes());
        block[4..6].copy_from_slice(&self.idle_cs_value.to_le_bytes());
        block[6..8].copy_from_slice(&self.active_cs_value.to_le_bytes());
        block[8..10].copy_from_slice(&self.cs_to_data_delay.to_le_bytes());
        block[10..12].copy_from_slice(&self.last_data_to_cs_delay.to_le_bytes());
        block[12..14].copy_from_slice(&self.between_bytes_delay.to_le_bytes());
        block[14..16].copy_from_slice(&self.bytes_per_transaction.to_le_bytes());
        block[16] = self.mode.to_byte();
        block
    }
}

/// Status byte of an SPI transfer response, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiStatus {
    Success,
    /// Another master is driving the bus.
    BusUnavailable,
    /// The engine is still busy with an earlier transfer and did not accept the data.
    TransferInProgress,
    Unknown(u8),
}

impl SpiStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            consts::STATUS_SUCCESS => SpiStatus::Success,
            consts::spi::STATUS_BUS_UNAVAILABLE => SpiStatus::BusUnavailable,
            consts::spi::STATUS_TRANSFER_IN_PROGRESS => SpiStatus::TransferInProgress,
            other => SpiStatus::Unknown(other),
        }
    }
}

impl fmt::Display for SpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiStatus::Success => write!(f, "success"),
            SpiStatus::BusUnavailable => write!(f, "SPI bus not available (external master)"),
            SpiStatus::TransferInProgress => write!(f, "SPI transfer already in progress"),
            SpiStatus::Unknown(code) => write!(f, "unknown status 0x{:02X}", code),
        }
    }
}

fn transfer_command(data: &[u8]) -> Result<CommandReport> {
    let mut command = CommandReport::new(cmd::TRANSFER_SPI);
    command.set_byte(consts::spi::OFFSET_TX_LEN, data.len() as u8)?;
    command.set_bytes(consts::spi::OFFSET_TX_DATA, data)?;
    Ok(command)
}

impl<T: HidTransport> Session<T> {
    pub(crate) fn refresh_spi_settings(&mut self) -> Result<SpiTransferSettings> {
        let response = self
            .exchange(&CommandReport::new(cmd::GET_SPI_SETTINGS))?
            .expect_success()?;
        self.spi_settings = SpiTransferSettings::from_response(&response)?;
        Ok(self.spi_settings)
    }

    pub(crate) fn write_spi_settings(
        &mut self,
        settings: &SpiTransferSettings,
    ) -> Result<SpiTransferSettings> {
        let mut command = CommandReport::new(cmd::SET_SPI_SETTINGS);
        command.set_bytes(consts::spi::OFFSET_SETTINGS, &settings.to_bytes())?;
        let response = self.exchange(&command)?.expect_success()?;
        self.spi_settings = SpiTransferSettings::from_response(&response)?;
        if self.spi_settings != *settings {
            warn!(
                "SPI settings echoed by device differ from request: {:?}",
                self.spi_settings
            );
        }
        Ok(self.spi_settings)
    }

    /// One full-duplex transaction: send `data`, then drain slave data until
    /// the engine reports it is finished.
    pub(crate) fn transfer(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if usize::from(self.spi_settings.bytes_per_transaction) != data.len() {
            debug!(
                "Reconfiguring bytes per transaction: {} -> {}",
                self.spi_settings.bytes_per_transaction,
                data.len()
            );
            let settings = SpiTransferSettings {
                bytes_per_transaction: data.len() as u16,
                ..self.spi_settings
            };
            let applied = self.write_spi_settings(&settings)?;
            if usize::from(applied.bytes_per_transaction) != data.len() {
                return Err(Error::SpiLengthNotApplied {
                    requested: data.len(),
                    applied: applied.bytes_per_transaction,
                });
            }
        }

        let mut received = Vec::with_capacity(data.len());
        let mut command = transfer_command(data)?;
        let mut rounds = 0usize;
        loop {
            let response = self.exchange(&command)?;
            rounds += 1;

            let status = SpiStatus::from_code(response.status());
            if status != SpiStatus::Success {
                warn!(
                    "SPI transfer failed after {} round(s): {} ({} bytes received)",
                    rounds,
                    status,
                    received.len()
                );
                return Err(Error::SpiTransferFailed { status, received });
            }

            let count = usize::from(response.byte(consts::spi::OFFSET_RX_LEN));
            if count > consts::spi::MAX_TRANSFER_LEN {
                warn!("SPI response claims {} bytes (max {})", count, consts::spi::MAX_TRANSFER_LEN);
                return Err(Error::InvalidReport(count));
            }
            let chunk = response.slice(consts::spi::OFFSET_RX_DATA, count)?;
            trace!("SPI chunk {}: {:02X?}", rounds, chunk);
            received.extend_from_slice(chunk);

            if response.byte(consts::spi::OFFSET_ENGINE_STATUS) == consts::spi::ENGINE_FINISHED {
                break;
            }
            // Draining: empty transfers until the engine is done.
            command = transfer_command(&[])?;
        }

        debug!(
            "SPI transfer done: sent {} bytes, received {} bytes in {} round(s)",
            data.len(),
            received.len(),
            rounds
        );
        Ok(received)
    }
}

impl<T: HidTransport> Mcp2210<T> {
    /// Re-reads the SPI transfer settings from the device and caches them.
    pub fn spi_settings(&self) -> Result<SpiTransferSettings> {
        self.with_session(|session| session.refresh_spi_settings())
    }

    /// The settings as of the last read or write, without touching the device.
    pub fn cached_spi_settings(&self) -> Result<SpiTransferSettings> {
        self.with_session(|session| Ok(session.spi_settings))
    }

    /// Writes new SPI transfer settings. Returns (and caches) the settings the
    /// device echoes back.
    pub fn set_spi_settings(&self, settings: &SpiTransferSettings) -> Result<SpiTransferSettings> {
        debug!("Setting SPI transfer settings: {:?}", settings);
        self.with_session(|session| session.write_spi_settings(settings))
    }

    /// Performs one full-duplex SPI transaction and returns the slave's data.
    ///
    /// At most 60 bytes can be sent. If the device's bytes-per-transaction
    /// setting differs from `data.len()`, it is updated first. The slave's
    /// reply may arrive over several USB round trips; they are concatenated
    /// in order.
    ///
    /// A non-success status at any point aborts the transfer with
    /// [`Error::SpiTransferFailed`], which carries whatever was received.
    pub fn transfer(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() > consts::spi::MAX_TRANSFER_LEN {
            return Err(Error::OperationTooLarge {
                max: consts::spi::MAX_TRANSFER_LEN,
                actual: data.len(),
            });
        }
        self.with_session(|session| session.transfer(data))
    }
}
