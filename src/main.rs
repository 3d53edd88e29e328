use std::thread;
use std::time::{Duration, SystemTime};

use argh::FromArgs;
use eyre::{eyre, Result};
use log::{info, warn};
use mcp9808::{Mcp9808, Resolution, DEFAULT_ADDRESS, DEVICE_ID, MANUFACTURER_ID};
use std::convert::TryInto;

mod smbus;
use smbus::LinuxSmbus;

#[derive(FromArgs)]
#[argh(description = "print mcp9808 temperature readings")]
struct InputArgs {
    #[argh(option, short = 'b', default = "1", description = "i2c bus number")]
    bus: u8,
    #[argh(option, short = 'a', default = "DEFAULT_ADDRESS", from_str_fn(from_base_16), description = "device address (hex)")]
    addr: u8,
    #[argh(option, short = 'r', default = "Resolution::Bits12", from_str_fn(get_resolution), description = "resolution in bits (9 to 12)")]
    res: Resolution,
    #[argh(option, short = 'n', description = "number of samples (default: run forever)")]
    num: Option<u32>,
    #[argh(option, short = 'i', default = "1000", description = "milliseconds between samples")]
    interval: u64,
}

fn from_base_16(val: &str) -> Result<u8, String> {
    u8::from_str_radix(val.trim_start_matches("0x"), 16)
        .map_err(|_| "Unable to convert address from base 16".into())
}

fn get_resolution(val: &str) -> Result<Resolution, String> {
    match u8::from_str_radix(val, 10) {
        Ok(r) => r
            .try_into()
            .map_err(|_| "Invalid resolution (expected 9, 10, 11, or 12)".into()),
        _ => Err("Invalid resolution (not a base-10 number)".into()),
    }
}

fn wants_more(num: Option<u32>, taken: u32) -> bool {
    num.map_or(true, |n| taken < n)
}

fn fahrenheit(cels: f32) -> f32 {
    1.8 * cels + 32.0
}

fn main() -> Result<()> {
    env_logger::init();
    let args: InputArgs = argh::from_env();

    let mut dev = Mcp9808::new(LinuxSmbus::new(), args.bus, args.addr);

    let manufacturer = dev
        .manufacturer_id()
        .map_err(|e| eyre!("failed to read manufacturer id: {}", e))?;
    let (id, rev) = dev
        .device_id()
        .map_err(|e| eyre!("failed to read device id: {}", e))?;

    if manufacturer != MANUFACTURER_ID || id != DEVICE_ID {
        warn!(
            "unexpected device at 0x{:02x}: manufacturer 0x{:04x}, device 0x{:02x}",
            args.addr, manufacturer, id
        );
    } else {
        info!("found MCP9808 revision {} at 0x{:02x}", rev, args.addr);
    }

    dev.set_resolution(args.res)
        .map_err(|e| eyre!("failed to set resolution: {}", e))?;

    // Never sample faster than the sensor converts.
    let interval = args.interval.max(args.res.conversion_time_ms().into());
    let mut taken = 0;

    while wants_more(args.num, taken) {
        let cels = dev
            .get_temperature()
            .map_err(|e| eyre!("failed to read a temperature: {}", e))?;

        let now = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH)?.as_secs();
        println!("{:?}: {:?} C, {:?} F", now, cels, fahrenheit(cels));

        taken = taken.saturating_add(1);
        if wants_more(args.num, taken) {
            thread::sleep(Duration::from_millis(interval));
        }
    }

    Ok(())
}
