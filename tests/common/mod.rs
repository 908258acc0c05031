//! A simulated MCP2210 behind the `HidTransport` trait.
//!
//! The device state is shared through an `Arc<Mutex<_>>` so tests can script
//! responses and inspect the recorded traffic after the transport has been
//! moved into an `Mcp2210`.
#![allow(dead_code)]

use mcp2210_hid::{HidTransport, Mcp2210, Mcp2210Config, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(Vec<u8>),
    Read(Vec<u8>),
}

/// A scripted reply to one "transfer SPI" command.
#[derive(Debug, Clone)]
pub struct SpiReply {
    pub status: u8,
    pub engine_status: u8,
    pub data: Vec<u8>,
    /// Byte count to report instead of `data.len()`.
    pub claimed_len: Option<u8>,
}

impl SpiReply {
    pub fn in_progress(data: &[u8]) -> Self {
        Self {
            status: 0x00,
            engine_status: 0x30,
            data: data.to_vec(),
            claimed_len: None,
        }
    }

    pub fn finished(data: &[u8]) -> Self {
        Self {
            status: 0x00,
            engine_status: 0x10,
            data: data.to_vec(),
            claimed_len: None,
        }
    }

    pub fn failed(status: u8) -> Self {
        Self {
            status,
            engine_status: 0x00,
            data: Vec::new(),
            claimed_len: None,
        }
    }
}

pub struct DeviceState {
    pub pin_values: u16,
    pub pin_directions: u16,
    /// Bits the device refuses to change through "set pin value".
    pub locked_pins: u16,
    pub interrupt_count: u16,
    pub spi_settings: [u8; 17],
    pub eeprom: [u8; 256],
    /// Status returned for every EEPROM write instead of storing the value.
    pub eeprom_write_status: Option<u8>,
    /// Status returned for "set SPI settings" instead of applying them.
    pub spi_settings_status: Option<u8>,
    /// Bytes-per-transaction value the device keeps regardless of requests.
    pub fixed_bytes_per_transaction: Option<u16>,
    /// Replies for transfer commands; when empty the device loops data back.
    pub spi_script: VecDeque<SpiReply>,
    /// Overrides byte 0 of every response.
    pub echo_override: Option<u8>,
    /// Never answers reads.
    pub silent: bool,
    pub log: Vec<Event>,
    pending: Option<[u8; 64]>,
}

impl DeviceState {
    pub fn new() -> Self {
        let mut spi_settings = [0u8; 17];
        spi_settings[0..4].copy_from_slice(&1_000_000u32.to_le_bytes());
        spi_settings[4..6].copy_from_slice(&0x01FFu16.to_le_bytes());
        spi_settings[14..16].copy_from_slice(&4u16.to_le_bytes());
        Self {
            pin_values: 0,
            pin_directions: 0x01FF,
            locked_pins: 0,
            interrupt_count: 0,
            spi_settings,
            eeprom: [0xFF; 256],
            eeprom_write_status: None,
            spi_settings_status: None,
            fixed_bytes_per_transaction: None,
            spi_script: VecDeque::new(),
            echo_override: None,
            silent: false,
            log: Vec::new(),
            pending: None,
        }
    }

    pub fn bytes_per_transaction(&self) -> u16 {
        u16::from_le_bytes([self.spi_settings[14], self.spi_settings[15]])
    }

    /// Command frames written with the given opcode, in order.
    pub fn writes_with_opcode(&self, opcode: u8) -> Vec<Vec<u8>> {
        self.log
            .iter()
            .filter_map(|event| match event {
                Event::Write(frame) if frame[0] == opcode => Some(frame.clone()),
                _ => None,
            })
            .collect()
    }

    fn respond(&mut self, command: &[u8]) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[0] = command[0];
        match command[0] {
            0x12 => {
                out[4..6].copy_from_slice(&self.interrupt_count.to_le_bytes());
                if command[1] == 0x00 {
                    self.interrupt_count = 0;
                }
            }
            0x30 => {
                let requested = u16::from_le_bytes([command[4], command[5]]);
                self.pin_values =
                    (requested & !self.locked_pins) | (self.pin_values & self.locked_pins);
                out[4..6].copy_from_slice(&self.pin_values.to_le_bytes());
            }
            0x31 => out[4..6].copy_from_slice(&self.pin_values.to_le_bytes()),
            0x32 => {
                self.pin_directions = u16::from_le_bytes([command[4], command[5]]);
                out[4..6].copy_from_slice(&self.pin_directions.to_le_bytes());
            }
            0x33 => out[4..6].copy_from_slice(&self.pin_directions.to_le_bytes()),
            0x40 => {
                if let Some(status) = self.spi_settings_status {
                    out[1] = status;
                    return out;
                }
                self.spi_settings.copy_from_slice(&command[4..21]);
                if let Some(bpt) = self.fixed_bytes_per_transaction {
                    self.spi_settings[14..16].copy_from_slice(&bpt.to_le_bytes());
                }
                out[2] = 17;
                out[4..21].copy_from_slice(&self.spi_settings);
            }
            0x41 => {
                out[2] = 17;
                out[4..21].copy_from_slice(&self.spi_settings);
            }
            0x42 => {
                let reply = self.spi_script.pop_front().unwrap_or_else(|| {
                    let len = command[1] as usize;
                    SpiReply::finished(&command[4..4 + len])
                });
                out[1] = reply.status;
                out[2] = reply.claimed_len.unwrap_or(reply.data.len() as u8);
                out[3] = reply.engine_status;
                out[4..4 + reply.data.len()].copy_from_slice(&reply.data);
            }
            0x50 => {
                out[2] = command[1];
                out[3] = self.eeprom[command[1] as usize];
            }
            0x51 => match self.eeprom_write_status {
                Some(status) => out[1] = status,
                None => self.eeprom[command[1] as usize] = command[2],
            },
            _ => out[1] = 0xF9,
        }
        if let Some(opcode) = self.echo_override {
            out[0] = opcode;
        }
        out
    }
}

#[derive(Clone)]
pub struct MockTransport {
    pub state: Arc<Mutex<DeviceState>>,
}

impl HidTransport for MockTransport {
    fn write(&mut self, frame: &[u8]) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.log.push(Event::Write(frame.to_vec()));
        let response = state.respond(frame);
        state.pending = Some(response);
        drop(state);
        // Give another thread a chance to sneak in between write and read.
        std::thread::yield_now();
        Ok(frame.len())
    }

    fn read_timeout(&mut self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.silent {
            return Ok(0);
        }
        let response = state.pending.take().expect("read without a pending response");
        state.log.push(Event::Read(response.to_vec()));
        buf[..64].copy_from_slice(&response);
        Ok(64)
    }
}

pub fn open_mock(state: DeviceState) -> (Mcp2210<MockTransport>, Arc<Mutex<DeviceState>>) {
    open_mock_with_config(state, Mcp2210Config::default())
}

/// Opens a session on a simulated device and clears the priming traffic
/// from the log.
pub fn open_mock_with_config(
    state: DeviceState,
    config: Mcp2210Config,
) -> (Mcp2210<MockTransport>, Arc<Mutex<DeviceState>>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let state = Arc::new(Mutex::new(state));
    let transport = MockTransport {
        state: Arc::clone(&state),
    };
    let device = Mcp2210::from_transport_with_config(transport, config)
        .expect("opening a mock device should succeed");
    state.lock().unwrap().log.clear();
    (device, state)
}
