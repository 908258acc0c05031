use hidapi::HidApi;
use mcp2210_hid::{Mcp2210, Result};

fn main() -> Result<()> {
    env_logger::init();
    let hid_api = HidApi::new()?;
    let device = Mcp2210::open_default(&hid_api)?;
    println!("Device info: {:?}", device.usb_device_info()?);

    let contents = device.read_eeprom_range(0x00, 256)?;
    for (row, chunk) in contents.chunks(16).enumerate() {
        println!("{:02X}: {:02X?}", row * 16, chunk);
    }
    Ok(())
}
