use core::fmt;

/// How many bytes a single transaction on a register moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitWidth {
    /// One byte.
    Byte,
    /// Two bytes, transferred as an SMBus word.
    Word,
}

/// Access permission of a register, fixed when the register is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub const fn readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }

    pub const fn writable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }
}

/** A named, addressed register on a device.

Registers are plain values: the name is only for display, while the address, width and access
mode identify the register. All constructors are `const fn`, so a device's register map can be
built at compile time. */
#[derive(Debug, Clone, Copy)]
pub struct Register {
    name: &'static str,
    address: u8,
    width: BitWidth,
    access: Access,
}

impl Register {
    pub const fn new(name: &'static str, address: u8, width: BitWidth, access: Access) -> Self {
        Register {
            name,
            address,
            width,
            access,
        }
    }

    pub const fn read_only(name: &'static str, address: u8, width: BitWidth) -> Self {
        Register::new(name, address, width, Access::ReadOnly)
    }

    pub const fn write_only(name: &'static str, address: u8, width: BitWidth) -> Self {
        Register::new(name, address, width, Access::WriteOnly)
    }

    pub const fn read_write(name: &'static str, address: u8, width: BitWidth) -> Self {
        Register::new(name, address, width, Access::ReadWrite)
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn address(&self) -> u8 {
        self.address
    }

    pub const fn width(&self) -> BitWidth {
        self.width
    }

    pub const fn access(&self) -> Access {
        self.access
    }

    /// Fails with [`AccessError::WriteOnly`] if this register cannot be read.
    pub fn check_readable(&self) -> Result<(), AccessError> {
        if self.access.readable() {
            Ok(())
        } else {
            Err(AccessError::WriteOnly(*self))
        }
    }

    /// Fails with [`AccessError::ReadOnly`] if this register cannot be written.
    pub fn check_writable(&self) -> Result<(), AccessError> {
        if self.access.writable() {
            Ok(())
        } else {
            Err(AccessError::ReadOnly(*self))
        }
    }
}

// The name is display-only; two definitions of the same register compare equal.
impl PartialEq for Register {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.width == other.width && self.access == other.access
    }
}

impl Eq for Register {}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name, self.address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enum describing an attempt to use a register against its access permission.
pub enum AccessError {
    /// A write was attempted on a register without write permission.
    ReadOnly(Register),
    /// A read was attempted on a register without read permission.
    WriteOnly(Register),
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccessError::ReadOnly(r) => {
                write!(f, "cannot write to {} register with read only permissions", r)
            }
            AccessError::WriteOnly(r) => {
                write!(f, "cannot read from {} register with write only permissions", r)
            }
        }
    }
}
