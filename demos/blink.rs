use hidapi::HidApi;
use mcp2210_hid::{
    gpio::{GpioDirection, GpioPin, GpioValue},
    Mcp2210, Result,
};
use std::{thread, time::Duration};

// GP0 must be configured for the GPIO function in chip settings.
const BLINK_PIN_NUM: u8 = 0;

fn main() -> Result<()> {
    env_logger::init();
    let hid_api = HidApi::new()?;
    println!("Opening first MCP2210 device...");
    let device = Mcp2210::open_default(&hid_api)?;
    println!("Device opened. Pin word: 0x{:04X}", device.cached_pin_values()?);

    let blink_pin = GpioPin::new(BLINK_PIN_NUM)?;
    device.set_pin_direction(blink_pin, GpioDirection::Output)?;

    println!("Blinking pin {} ten times...", blink_pin.number());
    for _ in 0..10 {
        device.set_pin_value(blink_pin, GpioValue::Active)?;
        thread::sleep(Duration::from_millis(250));
        device.set_pin_value(blink_pin, GpioValue::Inactive)?;
        thread::sleep(Duration::from_millis(250));
    }

    // Set back to input
    device.set_pin_direction(blink_pin, GpioDirection::Input)?;
    println!("Interrupt events seen on GP6: {}", device.get_interrupt_count()?);
    device.close();
    Ok(())
}
