use crate::register::Register;

/** A device reachable at `address` on I2C bus number `bus`, accessed one register at a time.

Implementations decide how a register maps onto bus transfers and are responsible for refusing
accesses that the register's [`Access`](crate::Access) does not permit. */
pub trait I2cDevice {
    type Error;

    fn bus(&self) -> u8;
    fn address(&self) -> u8;

    /// Read a register, returning the value exactly as the bus transport delivered it.
    fn read_register(&mut self, register: Register) -> Result<u16, Self::Error>;

    /// Write a register with a single bus transfer.
    fn write_register(&mut self, register: Register, value: u16) -> Result<(), Self::Error>;
}
