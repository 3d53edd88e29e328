use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use log::trace;
use mcp9808::{Smbus, SmbusHandle};

/// SMBus transport over the Linux `/dev/i2c-N` character devices.
#[derive(Debug, Default)]
pub struct LinuxSmbus;

impl LinuxSmbus {
    pub fn new() -> Self {
        LinuxSmbus
    }
}

impl Smbus for LinuxSmbus {
    type Error = LinuxI2CError;
    type Handle<'a> = LinuxHandle where Self: 'a;

    fn open(&mut self, bus: u8) -> Result<Self::Handle<'_>, Self::Error> {
        let path = format!("/dev/i2c-{}", bus);
        trace!("open {}", path);

        Ok(LinuxHandle {
            dev: LinuxI2CDevice::new(path, 0)?,
            selected: 0,
        })
    }
}

/// An open bus. The file descriptor is closed when this is dropped.
pub struct LinuxHandle {
    dev: LinuxI2CDevice,
    selected: u16,
}

impl LinuxHandle {
    fn select(&mut self, address: u8) -> Result<&mut LinuxI2CDevice, LinuxI2CError> {
        let address = u16::from(address);

        if self.selected != address {
            self.dev.set_slave_address(address)?;
            self.selected = address;
        }

        Ok(&mut self.dev)
    }
}

impl SmbusHandle for LinuxHandle {
    type Error = LinuxI2CError;

    fn read_byte_data(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        self.select(address)?.smbus_read_byte_data(register)
    }

    fn read_word_data(&mut self, address: u8, register: u8) -> Result<u16, Self::Error> {
        self.select(address)?.smbus_read_word_data(register)
    }

    fn write_byte_data(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.select(address)?.smbus_write_byte_data(register, value)
    }

    fn write_word_data(&mut self, address: u8, register: u8, value: u16) -> Result<(), Self::Error> {
        self.select(address)?.smbus_write_word_data(register, value)
    }
}

impl Drop for LinuxHandle {
    fn drop(&mut self) {
        trace!("close i2c bus");
    }
}
