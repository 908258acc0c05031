//! Sends a pattern on MOSI and checks it comes back on MISO.
//!
//! The only circuit required is a wire between the MCP2210's MOSI and MISO
//! pins. Do not run this with a real slave on the bus.

use hidapi::HidApi;
use mcp2210_hid::{Mcp2210, Mcp2210Config, Result, SpiMode, SpiTransferSettings};

fn main() -> Result<()> {
    env_logger::init();
    let hid_api = HidApi::new()?;
    let device = hid_api.open(mcp2210_hid::MICROCHIP_VID, mcp2210_hid::MCP2210_PID)?;
    let mcp = Mcp2210::from_transport_with_config(
        device,
        Mcp2210Config::default().with_read_timeout_ms(1000),
    )?;

    let settings = mcp.set_spi_settings(&SpiTransferSettings {
        bit_rate: 1_000_000,
        mode: SpiMode::Mode0,
        ..mcp.spi_settings()?
    })?;
    println!("SPI settings: {:#?}", settings);

    for len in [2usize, 16, mcp2210_hid::MAX_SPI_TRANSFER_LEN] {
        let pattern: Vec<u8> = (0..len).map(|i| (i as u8) ^ 0xA5).collect();
        let received = mcp.transfer(&pattern)?;
        println!(
            "{:2} bytes: {}",
            len,
            if received == pattern { "ok" } else { "MISMATCH" }
        );
    }
    Ok(())
}
