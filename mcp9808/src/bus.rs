/*! SMBus-style transport used by devices in this crate.

A device never holds on to a bus between calls. Each register access opens a handle with
[`Smbus::open`], performs exactly one transfer, and drops the handle, which closes it regardless
of whether the transfer succeeded.

Word transfers follow SMBus convention: the first byte on the wire is the _low_ byte of the
returned `u16`. Devices with big-endian registers (like the MCP9808) therefore see their bytes
swapped; see [`word_swap`](crate::word_swap). */

use embedded_hal::i2c::I2c;
use log::trace;

/// A bus transport that can be opened for the duration of a single transaction.
pub trait Smbus {
    type Error;

    /// Handle to an opened bus. Dropping it closes the bus.
    type Handle<'a>: SmbusHandle<Error = Self::Error>
    where
        Self: 'a;

    fn open(&mut self, bus: u8) -> Result<Self::Handle<'_>, Self::Error>;
}

/// Byte and word transfers on an opened bus.
pub trait SmbusHandle {
    type Error;

    fn read_byte_data(&mut self, address: u8, register: u8) -> Result<u8, Self::Error>;
    fn read_word_data(&mut self, address: u8, register: u8) -> Result<u16, Self::Error>;
    fn write_byte_data(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;
    fn write_word_data(&mut self, address: u8, register: u8, value: u16)
        -> Result<(), Self::Error>;
}

/** Adapts an [`embedded_hal`] I2C bus to [`Smbus`].

An `I2c` implementation is already bound to one physical bus, so the bus number passed to
[`Smbus::open`] is ignored. Opening never fails; the returned handle mutably borrows the wrapped
bus until it is dropped. */
pub struct HalBus<I2C> {
    i2c: I2C,
}

impl<I2C> HalBus<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        HalBus { i2c }
    }

    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Smbus for HalBus<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;
    type Handle<'a> = HalHandle<'a, I2C> where Self: 'a;

    fn open(&mut self, bus: u8) -> Result<Self::Handle<'_>, Self::Error> {
        trace!("open i2c bus {}", bus);
        Ok(HalHandle { i2c: &mut self.i2c })
    }
}

pub struct HalHandle<'a, I2C> {
    i2c: &'a mut I2C,
}

impl<I2C> SmbusHandle for HalHandle<'_, I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn read_byte_data(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn read_word_data(&mut self, address: u8, register: u8) -> Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(address, &[register], &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn write_byte_data(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(address, &[register, value])
    }

    fn write_word_data(
        &mut self,
        address: u8,
        register: u8,
        value: u16,
    ) -> Result<(), Self::Error> {
        let [lo, hi] = value.to_le_bytes();
        self.i2c.write(address, &[register, lo, hi])
    }
}

impl<I2C> Drop for HalHandle<'_, I2C> {
    fn drop(&mut self) {
        trace!("close i2c bus");
    }
}
