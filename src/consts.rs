//! Internal constants: USB IDs, command codes, and response offsets.

/// Microchip Technology vendor ID.
pub const MICROCHIP_VID: u16 = 0x04D8;
/// Default product ID of the MCP2210.
pub const MCP2210_PID: u16 = 0x00DE;

/// Size of every command and response frame, excluding the HID report number.
pub const REPORT_SIZE: usize = 64;

/// Status byte value reported by the device when a command was accepted.
pub const STATUS_SUCCESS: u8 = 0x00;

// Offsets shared by most responses
pub const OFFSET_OPCODE: usize = 0;
pub const OFFSET_STATUS: usize = 1;

// --- Command codes (datasheet section 3) ---
pub mod cmd {
    pub const GET_INTERRUPT_COUNT: u8 = 0x12;
    pub const SET_PIN_VALUE: u8 = 0x30;
    pub const GET_PIN_VALUE: u8 = 0x31;
    pub const SET_PIN_DIRECTION: u8 = 0x32;
    pub const GET_PIN_DIRECTION: u8 = 0x33;
    pub const SET_SPI_SETTINGS: u8 = 0x40;
    pub const GET_SPI_SETTINGS: u8 = 0x41;
    pub const TRANSFER_SPI: u8 = 0x42;
    pub const EEPROM_READ: u8 = 0x50;
    pub const EEPROM_WRITE: u8 = 0x51;
}

// --- GPIO ---
pub mod gpio {
    /// Pin words (values and directions) live at bytes 4 (GP0-7) and 5 (GP8-15).
    pub const OFFSET_PIN_WORD: usize = 4;
    /// Interrupt counter, u16 little-endian.
    pub const OFFSET_INTERRUPT_COUNT: usize = 4;
    pub const PIN_COUNT: u8 = 16;

    // Byte 1 of the interrupt count command
    pub const COUNTER_RESET: u8 = 0x00;
    pub const COUNTER_KEEP: u8 = 0x26;
}

// --- SPI ---
pub mod spi {
    /// Bytes of slave data a single transfer command can carry.
    pub const MAX_TRANSFER_LEN: usize = 60;

    // Transfer command layout
    pub const OFFSET_TX_LEN: usize = 1;
    pub const OFFSET_TX_DATA: usize = 4;

    // Transfer response layout
    pub const OFFSET_RX_LEN: usize = 2;
    pub const OFFSET_ENGINE_STATUS: usize = 3;
    pub const OFFSET_RX_DATA: usize = 4;

    // Engine status (response byte 3)
    pub const ENGINE_FINISHED: u8 = 0x10;

    // Transfer status (response byte 1)
    pub const STATUS_BUS_UNAVAILABLE: u8 = 0xF7;
    pub const STATUS_TRANSFER_IN_PROGRESS: u8 = 0xF8;

    /// Settings block starts at byte 4 of both get and set frames.
    pub const OFFSET_SETTINGS: usize = 4;
    /// Length of the settings block, reported in byte 2 of get/set responses.
    pub const SETTINGS_LEN: usize = 17;
}

// --- EEPROM ---
pub mod eeprom {
    pub const OFFSET_ADDRESS: usize = 1;
    pub const OFFSET_WRITE_VALUE: usize = 2;
    /// Read response carries the byte here.
    pub const OFFSET_READ_VALUE: usize = 3;
    pub const SIZE: usize = 256;

    pub const STATUS_WRITE_FAILED: u8 = 0xFA;
    pub const STATUS_PROTECTED: u8 = 0xFB;
}
