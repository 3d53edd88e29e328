use cfg_if::cfg_if;
use std::io::{stdout, Write};

cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        use crossterm::{cursor, ExecutableCommand};
        use linux_embedded_hal::I2cdev;
        use mcp9808::*;
        use argh::FromArgs;
        // no_std crates don't have access to the Error trait. However, because mcp9808 crate
        // error types impl Display, we can use the eyre crate to ad-hoc convert our error types
        // to ones that impl Error via the eyre! macro.
        use eyre::{eyre, Result};
        use std::convert::TryInto;
        use std::thread::sleep;
        use std::time::Duration;

        #[derive(FromArgs)]
        #[argh(description = "trip mcp9808 alarm limits")]
        struct InputArgs {
            #[argh(positional)]
            bus: u8,
            #[argh(positional, from_str_fn(from_base_16))]
            addr: u8,
        }

        fn from_base_16(val: &str) -> Result<u8, String> {
            match u8::from_str_radix(val.trim_start_matches("0x"), 16) {
                Ok(v) => Ok(v),
                Err(_) => {
                    Err("Unable to convert address from base 16".into())
                }
            }
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> Result<()> {
    let args: InputArgs = argh::from_env();

    let i2c: I2cdev = I2cdev::new(format!("/dev/i2c-{}", args.bus))?;
    let mut mcp = Mcp9808::new(HalBus::new(i2c), args.bus, args.addr);

    mcp.set_resolution(Resolution::Bits10)
        .map_err(|e| eyre!("failed to set resolution: {}", e))?;

    let cfg = Configuration::new()
        .with_alert_mode(AlertMode::Comparator)
        .with_alert_polarity(AlertPolarity::ActiveHigh)
        .with_alert_control(AlertControl::Enabled);
    mcp.set_configuration(cfg)
        .map_err(|e| eyre!("failed to set config reg: {}", e))?;

    let temp = mcp
        .get_temperature()
        .map_err(|e| eyre!("failed to read a temperature: {}", e))?;

    let temp_lo = temp + 1.0;
    let temp_hi = temp + 2.0;
    let limits: Limits = (temp_lo, temp_hi, temp + 10.0)
        .try_into()
        .map_err(|e: LimitError| eyre!("bad limits: {}", e))?;
    mcp.set_limits(limits)
        .map_err(|e| eyre!("failed to set temperature sensor limits: {}", e))?;

    println!(
        "Target temp is {} C! Press your finger against the sensor!",
        temp_hi
    );

    let mut stdout = stdout();
    let sample_time = Resolution::Bits10.conversion_time_ms();

    loop {
        let temp = mcp
            .get_temperature()
            .map_err(|e| eyre!("failed to read a temperature: {}", e))?;

        stdout.execute(cursor::SavePosition)?;
        stdout.write(format!("Current temp is {} C.\r", temp).as_bytes())?;
        stdout.execute(cursor::RestorePosition)?;
        stdout.flush()?;

        sleep(Duration::from_millis(sample_time.into()));

        if temp >= temp_hi {
            break;
        }
    }

    let alert = mcp
        .configuration()
        .map_err(|e| eyre!("failed to read config reg: {}", e))?
        .alert_status();
    println!("\nAlert output is {:?}.", alert);

    println!("Release finger from sensor! Waiting for {} C!", temp_lo);

    loop {
        let temp = mcp
            .get_temperature()
            .map_err(|e| eyre!("failed to read a temperature: {}", e))?;

        stdout.execute(cursor::SavePosition)?;
        stdout.write(format!("Current temp is {} C.\r", temp).as_bytes())?;
        stdout.execute(cursor::RestorePosition)?;
        stdout.flush()?;

        sleep(Duration::from_millis(sample_time.into()));

        if temp <= temp_lo {
            break;
        }
    }

    println!("\nLimits demo done!");

    let _i2c_old = mcp.free().free();

    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {}
