/*! `mcp9808` is an [`embedded_hal`](https://github.com/rust-embedded/embedded-hal) crate for
accessing [Microchip MCP9808](https://www.microchip.com/wwwproducts/MCP9808) temperature sensors
over an I2C bus.

The MCP9808 exposes nine registers at pointer addresses `0x00` through `0x08`. All of them are
16-bit except the Resolution Register, which is a single byte. Each [`Register`] carries its
[`Access`] permission; reads of write-only registers and writes of read-only registers are refused
before anything touches the bus.

Registers are accessed with SMBus-style byte and word transfers through the [`Smbus`] trait. The
driver opens the bus for each transfer and closes it straight after, so nothing is cached between
calls. [`HalBus`] adapts any [`embedded_hal::i2c::I2c`] implementation.

```
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use mcp9808::{HalBus, Mcp9808, DEFAULT_ADDRESS};

// The sensor sends its temperature MSB first: 0x01, 0x50 is 21 °C.
let i2c = I2cMock::new(&[
    I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x05], vec![0x01, 0x50]),
]);
let mut sensor = Mcp9808::new(HalBus::new(i2c), 1, DEFAULT_ADDRESS);

assert_eq!(sensor.get_temperature(), Ok(21.0));
sensor.free().free().done();
``` */
#![no_std]

use core::convert::TryFrom;
use core::fmt;
use core::result::Result;

use log::{debug, trace};

mod bus;
mod config;
mod device;
mod limit;
mod register;
mod temp;

pub use bus::{HalBus, HalHandle, Smbus, SmbusHandle};
pub use config::*;
pub use device::I2cDevice;
pub use limit::{LimitError, Limits};
pub use register::{Access, AccessError, BitWidth, Register};
pub use temp::{
    decode_temperature, encode_limit, temperature_flags, word_join, word_swap, TemperatureFlags,
};

/// Address with A2, A1 and A0 all tied low.
pub const DEFAULT_ADDRESS: u8 = 0x18;

/// Value of the Manufacturer ID Register.
pub const MANUFACTURER_ID: u16 = 0x0054;

/// Upper byte of the Device ID/Revision Register.
pub const DEVICE_ID: u8 = 0x04;

/**
```text
 ----------------------------------
|   Address Code    | Slave Address|
|----------------------------------|
| A6 | A5 | A4 | A3 | A2 | A1 | A0 |
|  0 |  0 |  1 |  1 |  x |  x |  x |
 ----------------------------------
```

Returns the 7-bit address for the given levels of the A2, A1 and A0 pins. */
pub const fn address_with_pins(a2: bool, a1: bool, a0: bool) -> u8 {
    DEFAULT_ADDRESS | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8)
}

/// The MCP9808 register map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub reserved: Register,
    pub configuration: Register,
    pub alert_upper: Register,
    pub alert_lower: Register,
    pub critical: Register,
    pub temperature: Register,
    pub manufacturing_id: Register,
    pub device_id_revision: Register,
    pub resolution: Register,
}

impl Registers {
    pub const fn new() -> Self {
        use BitWidth::*;

        Registers {
            reserved: Register::read_only("Reserved", 0x00, Word),
            configuration: Register::read_write("Configuration", 0x01, Word),
            alert_upper: Register::read_write("Alert Temperature Upper Boundary Trip", 0x02, Word),
            alert_lower: Register::read_write("Alert Temperature Lower Boundary Trip", 0x03, Word),
            critical: Register::read_write("Critical Temperature Trip", 0x04, Word),
            temperature: Register::read_write("Temperature", 0x05, Word),
            manufacturing_id: Register::read_only("Manufacturing ID", 0x06, Word),
            device_id_revision: Register::read_only("Device ID/Revision", 0x07, Word),
            resolution: Register::read_write("Resolution", 0x08, Byte),
        }
    }

    /// All registers, ordered by address.
    pub fn all(&self) -> [Register; 9] {
        [
            self.reserved,
            self.configuration,
            self.alert_upper,
            self.alert_lower,
            self.critical,
            self.temperature,
            self.manufacturing_id,
            self.device_id_revision,
            self.resolution,
        ]
    }
}

impl Default for Registers {
    fn default() -> Self {
        Registers::new()
    }
}

/** A struct for describing how to read and write an MCP9808 temperature sensor's registers via an
[`Smbus`] transport.

The register map is fixed at construction. No bus handle is held between calls; every register
access opens the transport, performs one transfer and closes it again. */
pub struct Mcp9808<B>
where
    B: Smbus,
{
    ctx: B,
    bus: u8,
    address: u8,
    regs: Registers,
}

#[derive(Debug, PartialEq)]
/// Enum for describing possible error conditions when reading/writing an MCP9808 temperature sensor.
pub enum Error<E> {
    /** The register's permission does not allow the attempted access. No bus transfer was
    attempted. */
    Access(AccessError),
    /** The value does not fit the register's width. No bus transfer was attempted. */
    OutOfRange,
    /** Opening the bus or the transfer itself failed. Contains the error propagated from the
    [`Smbus`] implementation, unmodified. */
    Bus(E),
}

impl<E> From<AccessError> for Error<E> {
    fn from(err: AccessError) -> Self {
        Error::Access(err)
    }
}

impl<E> fmt::Display for Error<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Access(e) => write!(f, "{}", e),
            Error::OutOfRange => write!(f, "value does not fit in register"),
            Error::Bus(e) => write!(f, "bus error: {:?}", e),
        }
    }
}

impl<B> Mcp9808<B>
where
    B: Smbus,
{
    pub fn new(ctx: B, bus: u8, address: u8) -> Self {
        Mcp9808 {
            ctx,
            bus,
            address,
            regs: Registers::new(),
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Read the ambient temperature in degrees Celsius. See [`decode_temperature`].
    pub fn get_temperature(&mut self) -> Result<f32, Error<B::Error>> {
        let raw = self.read_register(self.regs.temperature)?;
        Ok(decode_temperature(raw))
    }

    /// Read the temperature along with the alarm and sign bits from the same transfer.
    pub fn get_temperature_with_flags(
        &mut self,
    ) -> Result<(f32, TemperatureFlags), Error<B::Error>> {
        let raw = self.read_register(self.regs.temperature)?;
        Ok((decode_temperature(raw), temperature_flags(raw)))
    }

    pub fn manufacturer_id(&mut self) -> Result<u16, Error<B::Error>> {
        self.read_word(self.regs.manufacturing_id)
    }

    /// Returns `(device id, revision)`.
    pub fn device_id(&mut self) -> Result<(u8, u8), Error<B::Error>> {
        let raw = self.read_register(self.regs.device_id_revision)?;
        Ok(word_swap(raw))
    }

    pub fn configuration(&mut self) -> Result<Configuration, Error<B::Error>> {
        self.read_word(self.regs.configuration).map(Configuration::from_word)
    }

    pub fn set_configuration(&mut self, cfg: Configuration) -> Result<(), Error<B::Error>> {
        self.write_word(self.regs.configuration, cfg.into_word())
    }

    pub fn resolution(&mut self) -> Result<Resolution, Error<B::Error>> {
        let raw = self.read_register(self.regs.resolution)?;
        Ok(Resolution::from_register(raw as u8))
    }

    pub fn set_resolution(&mut self, res: Resolution) -> Result<(), Error<B::Error>> {
        self.write_register(self.regs.resolution, u16::from(u8::from(res)))
    }

    /// Write the lower, upper and critical alarm limits, in that order.
    pub fn set_limits(&mut self, limits: Limits) -> Result<(), Error<B::Error>> {
        self.write_word(self.regs.alert_lower, encode_limit(limits.lower()))?;
        self.write_word(self.regs.alert_upper, encode_limit(limits.upper()))?;
        self.write_word(self.regs.critical, encode_limit(limits.critical()))
    }

    pub fn free(self) -> B {
        self.ctx
    }

    // Word registers in datasheet order, undoing the SMBus byte swap.
    fn read_word(&mut self, register: Register) -> Result<u16, Error<B::Error>> {
        let (msb, lsb) = word_swap(self.read_register(register)?);
        Ok(u16::from_be_bytes([msb, lsb]))
    }

    fn write_word(&mut self, register: Register, value: u16) -> Result<(), Error<B::Error>> {
        let [msb, lsb] = value.to_be_bytes();
        self.write_register(register, word_join(msb, lsb))
    }
}

impl<B> I2cDevice for Mcp9808<B>
where
    B: Smbus,
{
    type Error = Error<B::Error>;

    fn bus(&self) -> u8 {
        self.bus
    }

    fn address(&self) -> u8 {
        self.address
    }

    fn read_register(&mut self, register: Register) -> Result<u16, Self::Error> {
        if let Err(e) = register.check_readable() {
            debug!("{}", e);
            return Err(e.into());
        }

        let address = self.address;
        let mut handle = self.ctx.open(self.bus).map_err(Error::Bus)?;
        let val = match register.width() {
            BitWidth::Word => handle.read_word_data(address, register.address()),
            BitWidth::Byte => handle
                .read_byte_data(address, register.address())
                .map(u16::from),
        }
        .map_err(Error::Bus)?;

        trace!("0x{:02x}: read {} = 0x{:04x}", address, register, val);
        Ok(val)
    }

    fn write_register(&mut self, register: Register, value: u16) -> Result<(), Self::Error> {
        if let Err(e) = register.check_writable() {
            debug!("{}", e);
            return Err(e.into());
        }

        let address = self.address;
        match register.width() {
            BitWidth::Word => {
                let mut handle = self.ctx.open(self.bus).map_err(Error::Bus)?;
                handle
                    .write_word_data(address, register.address(), value)
                    .map_err(Error::Bus)?;
            }
            BitWidth::Byte => {
                let byte = u8::try_from(value).map_err(|_| Error::<B::Error>::OutOfRange)?;
                let mut handle = self.ctx.open(self.bus).map_err(Error::Bus)?;
                handle
                    .write_byte_data(address, register.address(), byte)
                    .map_err(Error::Bus)?;
            }
        }

        trace!("0x{:02x}: wrote {} = 0x{:04x}", address, register, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;

    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    fn mk_mcp9808(expectations: &[I2cTransaction], addr: u8) -> Mcp9808<HalBus<I2cMock>> {
        let i2c = I2cMock::new(expectations);
        let mcp = Mcp9808::new(HalBus::new(i2c), 1, addr);

        mcp
    }

    fn done(mcp: Mcp9808<HalBus<I2cMock>>) {
        mcp.free().free().done();
    }

    #[test]
    fn register_map() {
        let regs = Registers::new().all();

        for (i, reg) in regs.iter().enumerate() {
            assert_eq!(reg.address(), i as u8);
            assert_eq!(regs.iter().filter(|r| *r == reg).count(), 1);
        }

        let widths: vec::Vec<BitWidth> = regs.iter().map(|r| r.width()).collect();
        assert_eq!(widths[..8], [BitWidth::Word; 8]);
        assert_eq!(widths[8], BitWidth::Byte);

        let read_only: vec::Vec<u8> = regs
            .iter()
            .filter(|r| r.access() == Access::ReadOnly)
            .map(|r| r.address())
            .collect();
        assert_eq!(read_only, [0x00, 0x06, 0x07]);
        assert!(regs.iter().all(|r| r.access() != Access::WriteOnly));
    }

    #[test]
    fn addresses() {
        assert_eq!(address_with_pins(false, false, false), 0x18);
        assert_eq!(address_with_pins(true, false, true), 0x1d);
        assert_eq!(address_with_pins(true, true, true), 0x1f);
    }

    #[test]
    fn read_word_register_raw() {
        let mut mcp = mk_mcp9808(&[I2cTransaction::write_read(0x18, vec![0x05], vec![0xc1, 0x50])], 0x18);

        let reg = mcp.registers().temperature;
        assert_eq!(mcp.read_register(reg), Ok(0x50c1));
        done(mcp);
    }

    #[test]
    fn read_byte_register() {
        let mut mcp = mk_mcp9808(&[I2cTransaction::write_read(0x18, vec![0x08], vec![0x03])], 0x18);

        let reg = mcp.registers().resolution;
        assert_eq!(mcp.read_register(reg), Ok(0x03));
        done(mcp);
    }

    #[test]
    fn write_dispatches_on_width() {
        let mut mcp = mk_mcp9808(&[
            I2cTransaction::write(0x1a, vec![0x01, 0x08, 0x00]),
            I2cTransaction::write(0x1a, vec![0x08, 0x02]),
        ], 0x1a);

        let (cfg, res) = (mcp.registers().configuration, mcp.registers().resolution);
        assert_eq!(mcp.write_register(cfg, 0x0008), Ok(()));
        assert_eq!(mcp.write_register(res, 0x0002), Ok(()));
        done(mcp);
    }

    #[test]
    fn write_read_only_register() {
        let mut mcp = mk_mcp9808(&[], 0x18);

        let reg = mcp.registers().manufacturing_id;
        assert_eq!(
            mcp.write_register(reg, 0x1234),
            Err(Error::Access(AccessError::ReadOnly(reg)))
        );
        done(mcp);
    }

    #[test]
    fn read_write_only_register() {
        let mut mcp = mk_mcp9808(&[], 0x18);

        let reg = Register::write_only("Scratch", 0x09, BitWidth::Word);
        assert_eq!(mcp.read_register(reg), Err(Error::Access(AccessError::WriteOnly(reg))));
        done(mcp);
    }

    #[test]
    fn byte_write_out_of_range() {
        let mut mcp = mk_mcp9808(&[], 0x18);

        let reg = mcp.registers().resolution;
        assert_eq!(mcp.write_register(reg, 0x100), Err(Error::OutOfRange));
        done(mcp);
    }

    #[test]
    fn bus_error_propagates() {
        let mut mcp = mk_mcp9808(&[
            I2cTransaction::write_read(0x18, vec![0x05], vec![0x00, 0x00]).with_error(ErrorKind::Other),
            I2cTransaction::write_read(0x18, vec![0x05], vec![0x01, 0x50]),
        ], 0x18);

        assert_eq!(mcp.get_temperature(), Err(Error::Bus(ErrorKind::Other)));
        assert_eq!(mcp.get_temperature(), Ok(21.0));
        done(mcp);
    }

    #[test]
    fn temperatures() {
        let mut mcp = mk_mcp9808(&[
            I2cTransaction::write_read(0x18, vec![0x05], vec![0xc1, 0x94]),
            I2cTransaction::write_read(0x18, vec![0x05], vec![0x11, 0x00]),
        ], 0x18);

        assert_eq!(mcp.get_temperature(), Ok(25.25));
        assert_eq!(mcp.get_temperature(), Ok(240.0));
        done(mcp);
    }

    #[test]
    fn temperature_with_flags() {
        let mut mcp = mk_mcp9808(&[I2cTransaction::write_read(0x18, vec![0x05], vec![0x5f, 0x60])], 0x18);

        let (celsius, flags) = mcp.get_temperature_with_flags().unwrap();
        assert_eq!(celsius, 10.0);
        assert!(flags.negative && flags.upper);
        assert!(!flags.critical && !flags.lower);
        done(mcp);
    }

    #[test]
    fn identification() {
        let mut mcp = mk_mcp9808(&[
            I2cTransaction::write_read(0x18, vec![0x06], vec![0x00, 0x54]),
            I2cTransaction::write_read(0x18, vec![0x07], vec![0x04, 0x01]),
        ], 0x18);

        assert_eq!(mcp.manufacturer_id(), Ok(MANUFACTURER_ID));
        assert_eq!(mcp.device_id(), Ok((DEVICE_ID, 0x01)));
        done(mcp);
    }

    #[test]
    fn configuration() {
        let mut mcp = mk_mcp9808(&[
            I2cTransaction::write_read(0x18, vec![0x01], vec![0x01, 0x10]),
            I2cTransaction::write(0x18, vec![0x01, 0x02, 0x09]),
        ], 0x18);

        let cfg = mcp.configuration().unwrap();
        assert_eq!(cfg.shutdown(), Shutdown::Shutdown);
        assert_eq!(cfg.alert_status(), AlertStatus::Asserted);

        let cfg = Configuration::new()
            .with_alert_mode(AlertMode::Interrupt)
            .with_alert_control(AlertControl::Enabled)
            .with_hysteresis(Hysteresis::Deg1_5);
        assert_eq!(mcp.set_configuration(cfg), Ok(()));
        done(mcp);
    }

    #[test]
    fn resolution() {
        let mut mcp = mk_mcp9808(&[
            I2cTransaction::write_read(0x18, vec![0x08], vec![0x03]),
            I2cTransaction::write(0x18, vec![0x08, 0x00]),
        ], 0x18);

        assert_eq!(mcp.resolution(), Ok(Resolution::Bits12));
        assert_eq!(mcp.set_resolution(Resolution::Bits9), Ok(()));
        done(mcp);
    }

    #[test]
    fn limits() {
        let mut mcp = mk_mcp9808(&[
            I2cTransaction::write(0x18, vec![0x03, 0x1f, 0x60]),
            I2cTransaction::write(0x18, vec![0x02, 0x01, 0x50]),
            I2cTransaction::write(0x18, vec![0x04, 0x05, 0x50]),
        ], 0x18);

        let limits = Limits::try_from((-10.0, 21.0, 85.0)).unwrap();
        assert_eq!(mcp.set_limits(limits), Ok(()));
        done(mcp);
    }
}
