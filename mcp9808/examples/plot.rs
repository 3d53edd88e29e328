use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        use argh::FromArgs;
        use eyre::{eyre, Result, WrapErr};
        use indicatif::{ProgressBar, ProgressStyle};
        use linux_embedded_hal::I2cdev;
        use mcp9808::*;
        use serde_json::{json, Value};
        use std::convert::TryInto;
        use std::fs;
        use std::thread::sleep;
        use std::time::Duration;
        use textplots::{Chart, Plot, Shape};

        /// Sample an MCP9808 and plot the readings along with its alarm flags.
        #[derive(FromArgs)]
        struct PlotArgs {
            /// i2c bus number (/dev/i2c-N)
            #[argh(option, short = 'b', default = "1")]
            bus: u8,
            /// device address in hex
            #[argh(option, short = 'a', default = "DEFAULT_ADDRESS", from_str_fn(parse_addr))]
            addr: u8,
            /// number of samples to take
            #[argh(option, short = 'n', default = "100")]
            num: u32,
            /// resolution in bits (9 to 12)
            #[argh(option, short = 'r', default = "Resolution::Bits11", from_str_fn(parse_resolution))]
            res: Resolution,
            /// write samples as json to this file instead of stdout
            #[argh(option, short = 'o')]
            out_file: Option<String>,
        }

        fn parse_addr(val: &str) -> Result<u8, String> {
            u8::from_str_radix(val.trim_start_matches("0x"), 16)
                .map_err(|_| format!("{} is not a hex address", val))
        }

        fn parse_resolution(val: &str) -> Result<Resolution, String> {
            val.parse::<u8>()
                .ok()
                .and_then(|bits| bits.try_into().ok())
                .ok_or_else(|| format!("{} is not a resolution (9, 10, 11 or 12)", val))
        }

        struct Sample {
            celsius: f32,
            flags: TemperatureFlags,
        }

        fn identify<B: Smbus>(mcp: &mut Mcp9808<B>) -> Result<()>
        where
            B::Error: std::fmt::Debug,
        {
            let manufacturer = mcp.manufacturer_id().map_err(|e| eyre!("{}", e))?;
            let (id, rev) = mcp.device_id().map_err(|e| eyre!("{}", e))?;

            if manufacturer != MANUFACTURER_ID || id != DEVICE_ID {
                return Err(eyre!(
                    "not an MCP9808 (manufacturer 0x{:04x}, device 0x{:02x})",
                    manufacturer,
                    id
                ));
            }

            println!("MCP9808 revision {} at 0x{:02x} on bus {}", rev, mcp.address(), mcp.bus());
            Ok(())
        }

        fn flag_summary(samples: &[Sample]) -> (usize, usize, usize, usize) {
            samples.iter().fold((0, 0, 0, 0), |(c, u, l, n), s| {
                (
                    c + s.flags.critical as usize,
                    u + s.flags.upper as usize,
                    l + s.flags.lower as usize,
                    n + s.flags.negative as usize,
                )
            })
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> Result<()> {
    let args: PlotArgs = argh::from_env();

    let i2c = I2cdev::new(format!("/dev/i2c-{}", args.bus))
        .wrap_err_with(|| format!("failed to open i2c bus {}", args.bus))?;
    let mut mcp = Mcp9808::new(HalBus::new(i2c), args.bus, args.addr);

    identify(&mut mcp)?;

    mcp.set_resolution(args.res).map_err(|e| eyre!("{}", e))?;
    let res = mcp.resolution().map_err(|e| eyre!("{}", e))?;
    let period = res.conversion_time_ms();
    println!("Resolution {} C, 1 sample every {} ms", res.step(), period);

    let bar = ProgressBar::new(args.num.into());
    bar.set_style(ProgressStyle::default_bar().progress_chars("=> "));

    let mut samples = Vec::with_capacity(args.num as usize);
    for _ in 0..args.num {
        let (celsius, flags) = mcp
            .get_temperature_with_flags()
            .map_err(|e| eyre!("failed to read a temperature: {}", e))?;
        samples.push(Sample { celsius, flags });

        bar.inc(1);
        sleep(Duration::from_millis(period.into()));
    }
    bar.finish_and_clear();

    // Readings below 0 C come back as magnitudes; plot them with their sign restored.
    let points: Vec<(f32, f32)> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f32, if s.flags.negative { -s.celsius } else { s.celsius }))
        .collect();
    Chart::new(120, 60, 0.0, args.num as f32)
        .lineplot(&Shape::Steps(&points))
        .display();

    let (crit, upper, lower, negative) = flag_summary(&samples);
    println!(
        "{} samples: {} above critical, {} above upper, {} below lower, {} below 0 C (reported as magnitudes)",
        samples.len(), crit, upper, lower, negative
    );

    let json = Value::Array(
        samples
            .iter()
            .map(|s| {
                json!({
                    "celsius": s.celsius,
                    "negative": s.flags.negative,
                    "critical": s.flags.critical,
                    "upper": s.flags.upper,
                    "lower": s.flags.lower,
                })
            })
            .collect(),
    )
    .to_string();

    match args.out_file {
        Some(path) => fs::write(&path, json).wrap_err_with(|| format!("failed to write {}", path))?,
        None => println!("{}", json),
    }

    mcp.free().free();
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {}
