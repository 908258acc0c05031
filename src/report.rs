//! Command and response frames.
//!
//! Every exchange with the MCP2210 is one 64-byte command followed by one
//! 64-byte response. This module keeps byte offsets in one place so the rest
//! of the crate works with named fields.

use crate::consts;
use crate::error::{Error, Result};

/// An outgoing 64-byte command frame: opcode at byte 0, payload after it,
/// zero padding to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    buf: [u8; consts::REPORT_SIZE],
}

impl CommandReport {
    /// Creates a frame with only the opcode set.
    pub fn new(opcode: u8) -> Self {
        let mut buf = [0u8; consts::REPORT_SIZE];
        buf[consts::OFFSET_OPCODE] = opcode;
        Self { buf }
    }

    /// Creates a frame with `payload` starting at byte 1.
    ///
    /// Fails if the payload does not fit in the 63 bytes after the opcode.
    pub fn with_payload(opcode: u8, payload: &[u8]) -> Result<Self> {
        let mut report = Self::new(opcode);
        report.set_bytes(1, payload)?;
        Ok(report)
    }

    /// The command code in byte 0.
    #[inline]
    pub fn opcode(&self) -> u8 {
        self.buf[consts::OFFSET_OPCODE]
    }

    /// Writes one byte at a protocol offset (1..=63).
    pub fn set_byte(&mut self, index: usize, value: u8) -> Result<()> {
        self.set_bytes(index, &[value])
    }

    /// Writes a little-endian `u16` at `index` and `index + 1`.
    pub fn set_u16_le(&mut self, index: usize, value: u16) -> Result<()> {
        self.set_bytes(index, &value.to_le_bytes())
    }

    /// Copies `data` into the frame starting at `index`.
    pub fn set_bytes(&mut self, index: usize, data: &[u8]) -> Result<()> {
        if index == consts::OFFSET_OPCODE {
            return Err(Error::ArgumentOutOfRange(
                "byte 0 holds the opcode and cannot be overwritten".to_string(),
            ));
        }
        let end = index.saturating_add(data.len());
        if end > consts::REPORT_SIZE {
            return Err(Error::OperationTooLarge {
                max: consts::REPORT_SIZE - index.min(consts::REPORT_SIZE),
                actual: data.len(),
            });
        }
        self.buf[index..end].copy_from_slice(data);
        Ok(())
    }

    /// The complete frame as written to the transport.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// An incoming 64-byte response frame.
///
/// Byte 0 echoes the opcode and byte 1 carries a status code; the meaning of
/// the remaining bytes depends on the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseReport {
    buf: [u8; consts::REPORT_SIZE],
}

impl ResponseReport {
    /// Wraps a received buffer, which must be exactly one frame long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let buf: [u8; consts::REPORT_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::InvalidReport(bytes.len()))?;
        Ok(Self { buf })
    }

    #[inline]
    pub fn opcode(&self) -> u8 {
        self.buf[consts::OFFSET_OPCODE]
    }

    #[inline]
    pub fn status(&self) -> u8 {
        self.buf[consts::OFFSET_STATUS]
    }

    /// Returns `Err(CommandFailed)` unless the status byte is success.
    ///
    /// Only for commands whose failures carry no richer meaning.
    pub fn expect_success(self) -> Result<Self> {
        match self.status() {
            consts::STATUS_SUCCESS => Ok(self),
            status => Err(Error::CommandFailed {
                opcode: self.opcode(),
                status,
            }),
        }
    }

    /// Panics if `index` is not below 64; offsets are protocol constants.
    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        self.buf[index]
    }

    pub fn u16_le(&self, index: usize) -> u16 {
        u16::from_le_bytes([self.buf[index], self.buf[index + 1]])
    }

    pub fn u32_le(&self, index: usize) -> u32 {
        u32::from_le_bytes([
            self.buf[index],
            self.buf[index + 1],
            self.buf[index + 2],
            self.buf[index + 3],
        ])
    }

    /// `len` bytes starting at `start`, or `InvalidReport` if that runs past
    /// the end of the frame.
    pub fn slice(&self, start: usize, len: usize) -> Result<&[u8]> {
        self.buf
            .get(start..start.saturating_add(len))
            .ok_or(Error::InvalidReport(start.saturating_add(len)))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}
