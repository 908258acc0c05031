//! GPIO pin values, directions, and the GP6 interrupt counter.

use crate::consts::{self, cmd};
use crate::device::{Mcp2210, Session};
use crate::error::{pin_out_of_range, Result};
use crate::report::CommandReport;
use crate::transport::HidTransport;
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioDirection {
    Input,
    Output,
}

/// Logical level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioValue {
    Inactive = 0,
    Active = 1,
}

impl From<bool> for GpioValue {
    fn from(active: bool) -> Self {
        if active {
            GpioValue::Active
        } else {
            GpioValue::Inactive
        }
    }
}

/// Represents a valid GPIO Pin number (0-15), one bit of the pin word.
/// Use `GpioPin::new(num)` to create.
///
/// The MCP2210 itself exposes GP0-GP8; the upper bits of the word are
/// accepted so the whole word can be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpioPin(u8);

impl GpioPin {
    /// Creates a new GpioPin, returning an error if the number is out of range (0-15).
    pub fn new(pin_num: u8) -> Result<Self> {
        if pin_num < consts::gpio::PIN_COUNT {
            Ok(GpioPin(pin_num))
        } else {
            Err(pin_out_of_range(pin_num))
        }
    }

    /// Returns the underlying pin number (0-15).
    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Returns the bit mask (1 << number) within the pin word.
    #[inline]
    pub fn mask(&self) -> u16 {
        1u16 << self.0
    }

    /// Reads this pin's bit out of a pin word.
    #[inline]
    pub fn value_in(&self, word: u16) -> GpioValue {
        GpioValue::from(word & self.mask() != 0)
    }
}

impl TryFrom<u8> for GpioPin {
    type Error = crate::Error;

    fn try_from(pin_num: u8) -> Result<Self> {
        GpioPin::new(pin_num)
    }
}

fn pin_word_command(opcode: u8, word: u16) -> Result<CommandReport> {
    let mut command = CommandReport::new(opcode);
    command.set_u16_le(consts::gpio::OFFSET_PIN_WORD, word)?;
    Ok(command)
}

impl<T: HidTransport> Session<T> {
    pub(crate) fn refresh_pin_values(&mut self) -> Result<u16> {
        let response = self
            .exchange(&CommandReport::new(cmd::GET_PIN_VALUE))?
            .expect_success()?;
        self.pin_values = response.u16_le(consts::gpio::OFFSET_PIN_WORD);
        Ok(self.pin_values)
    }

    pub(crate) fn write_pin_values(&mut self, word: u16) -> Result<u16> {
        self.pin_values = word;
        let response = self
            .exchange(&pin_word_command(cmd::SET_PIN_VALUE, word)?)?
            .expect_success()?;
        // The device's echo is the truth; chip-select pins ignore GPIO writes.
        let echoed = response.u16_le(consts::gpio::OFFSET_PIN_WORD);
        if echoed != word {
            debug!(
                "Pin value write modified by device: sent 0x{:04X}, echoed 0x{:04X}",
                word, echoed
            );
        }
        self.pin_values = echoed;
        Ok(echoed)
    }

    pub(crate) fn refresh_pin_directions(&mut self) -> Result<u16> {
        let response = self
            .exchange(&CommandReport::new(cmd::GET_PIN_DIRECTION))?
            .expect_success()?;
        self.pin_directions = response.u16_le(consts::gpio::OFFSET_PIN_WORD);
        Ok(self.pin_directions)
    }

    pub(crate) fn write_pin_directions(&mut self, word: u16) -> Result<u16> {
        self.pin_directions = word;
        let response = self
            .exchange(&pin_word_command(cmd::SET_PIN_DIRECTION, word)?)?
            .expect_success()?;
        self.pin_directions = response.u16_le(consts::gpio::OFFSET_PIN_WORD);
        Ok(self.pin_directions)
    }

    fn read_interrupt_count(&mut self, counter_action: u8) -> Result<u16> {
        let mut command = CommandReport::new(cmd::GET_INTERRUPT_COUNT);
        command.set_byte(1, counter_action)?;
        let response = self.exchange(&command)?.expect_success()?;
        Ok(response.u16_le(consts::gpio::OFFSET_INTERRUPT_COUNT))
    }
}

impl<T: HidTransport> Mcp2210<T> {
    // --- Pin values ---

    /// Re-reads all pin levels from the device and replaces the cache.
    /// Returns the new pin word.
    pub fn refresh_pin_values(&self) -> Result<u16> {
        self.with_session(|session| session.refresh_pin_values())
    }

    /// Reads the current level of `pin`.
    ///
    /// Always queries the device: inputs and chip-select lines change
    /// without the host's involvement, so the cache is never trusted here.
    pub fn get_pin_value(&self, pin: GpioPin) -> Result<GpioValue> {
        let word = self.refresh_pin_values()?;
        Ok(pin.value_in(word))
    }

    /// Drives `pin` to `value`, leaving the other bits of the cached word as
    /// they are. The cache then takes whatever the device echoes back.
    pub fn set_pin_value(&self, pin: GpioPin, value: GpioValue) -> Result<()> {
        self.with_session(|session| {
            let word = match value {
                GpioValue::Active => session.pin_values | pin.mask(),
                GpioValue::Inactive => session.pin_values & !pin.mask(),
            };
            debug!("Setting pin {} to {:?}", pin.number(), value);
            let echoed = session.write_pin_values(word)?;
            if pin.value_in(echoed) != value {
                warn!(
                    "Pin {} did not take value {:?} (is it assigned to another function?)",
                    pin.number(),
                    value
                );
            }
            Ok(())
        })
    }

    /// Writes the whole pin word at once. Returns the word echoed by the device.
    pub fn set_pin_values(&self, word: u16) -> Result<u16> {
        self.with_session(|session| session.write_pin_values(word))
    }

    /// The pin word as of the last exchange, without touching the device.
    /// May be stale.
    pub fn cached_pin_values(&self) -> Result<u16> {
        self.with_session(|session| Ok(session.pin_values))
    }

    // --- Pin directions ---

    /// Re-reads all pin directions from the device. Bit n set means GPn is an input.
    pub fn refresh_pin_directions(&self) -> Result<u16> {
        self.with_session(|session| session.refresh_pin_directions())
    }

    pub fn get_pin_direction(&self, pin: GpioPin) -> Result<GpioDirection> {
        let word = self.refresh_pin_directions()?;
        Ok(if word & pin.mask() != 0 {
            GpioDirection::Input
        } else {
            GpioDirection::Output
        })
    }

    pub fn set_pin_direction(&self, pin: GpioPin, direction: GpioDirection) -> Result<()> {
        self.with_session(|session| {
            let word = match direction {
                GpioDirection::Input => session.pin_directions | pin.mask(),
                GpioDirection::Output => session.pin_directions & !pin.mask(),
            };
            debug!("Setting pin {} direction to {:?}", pin.number(), direction);
            session.write_pin_directions(word)?;
            Ok(())
        })
    }

    // --- Interrupt counter ---

    /// Reads the GP6 edge counter and resets it to zero.
    ///
    /// Only counts while GP6 is in its alternate (interrupt) function. Each
    /// call clears the counter, so two calls in a row do not agree.
    pub fn get_interrupt_count(&self) -> Result<u16> {
        self.with_session(|session| session.read_interrupt_count(consts::gpio::COUNTER_RESET))
    }

    /// Reads the GP6 edge counter without resetting it.
    pub fn peek_interrupt_count(&self) -> Result<u16> {
        self.with_session(|session| session.read_interrupt_count(consts::gpio::COUNTER_KEEP))
    }
}
