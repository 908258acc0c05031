//! The byte pipe underneath a session.
//!
//! [`HidTransport`] is the seam between the protocol code and USB HID. The
//! production implementation is [`hidapi::HidDevice`]; tests plug in a mock.

use crate::consts;
use crate::error::{Error, Result};
use hidapi::HidDevice;
use log::{trace, warn};

/// A duplex packet pipe with strict one-request-one-response ordering.
///
/// Frames passed to [`write`](HidTransport::write) are the 64 protocol bytes,
/// without a HID report number; implementations add one if the platform
/// needs it.
pub trait HidTransport {
    /// Writes one command frame. Returns the number of protocol bytes written.
    fn write(&mut self, frame: &[u8]) -> Result<usize>;

    /// Reads one response frame into `buf`, waiting at most `timeout_ms`
    /// milliseconds (`-1` blocks). Returns the number of bytes read; `0` means
    /// the timeout expired.
    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize>;
}

impl HidTransport for HidDevice {
    fn write(&mut self, frame: &[u8]) -> Result<usize> {
        // hidapi wants the report number first; the MCP2210 uses report 0.
        let mut out = [0u8; consts::REPORT_SIZE + 1];
        let len = frame.len().min(consts::REPORT_SIZE);
        out[1..1 + len].copy_from_slice(&frame[..len]);
        let written = HidDevice::write(self, &out)?;
        trace!("hidapi wrote {} bytes (including report number)", written);
        if written == 0 {
            warn!("hidapi write returned 0 bytes");
            return Err(Error::Io(std::io::Error::other("HID write returned 0 bytes")));
        }
        // Some platforms report the report number, some do not.
        Ok(if written > len { len } else { written })
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize> {
        Ok(HidDevice::read_timeout(self, buf, timeout_ms)?)
    }
}
