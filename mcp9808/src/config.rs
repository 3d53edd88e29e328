use core::convert::TryFrom;

use modular_bitfield::prelude::*;

/** Contents of the Sensor Configuration Register.

Fields are listed from bit 0 upward. Use [`Configuration::from_word`] and
[`Configuration::into_word`] to convert to and from the register's datasheet (big-endian) value.

```
use mcp9808::{AlertControl, AlertMode, Configuration, Hysteresis};

let cfg = Configuration::new()
    .with_alert_mode(AlertMode::Interrupt)
    .with_alert_control(AlertControl::Enabled)
    .with_hysteresis(Hysteresis::Deg1_5);

assert_eq!(cfg.into_word(), 0x0209);
``` */
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub alert_mode: AlertMode,
    pub alert_polarity: AlertPolarity,
    pub alert_select: AlertSelect,
    pub alert_control: AlertControl,
    pub alert_status: AlertStatus,
    pub interrupt_clear: InterruptClear,
    pub window_lock: WindowLock,
    pub critical_lock: CriticalLock,
    pub shutdown: Shutdown,
    pub hysteresis: Hysteresis,
    #[skip]
    __: B5,
}

impl Configuration {
    pub fn from_word(word: u16) -> Self {
        Configuration::from_bytes(word.to_le_bytes())
    }

    pub fn into_word(self) -> u16 {
        u16::from_le_bytes(self.into_bytes())
    }
}

impl Default for Configuration {
    /// Power-on reset value (all zeros).
    fn default() -> Self {
        Configuration::new()
    }
}

#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertMode {
    Comparator,
    Interrupt,
}

#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPolarity {
    ActiveLow,
    ActiveHigh,
}

#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSelect {
    /// Alert output for upper, lower and critical limits.
    All,
    /// Alert output only when above the critical limit.
    CriticalOnly,
}

#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertControl {
    Disabled,
    Enabled,
}

#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    NotAsserted,
    Asserted,
}

#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptClear {
    NoEffect,
    Clear,
}

#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLock {
    Unlocked,
    Locked,
}

#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalLock {
    Unlocked,
    Locked,
}

#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Continuous conversion.
    Continuous,
    Shutdown,
}

/// Limit hysteresis, applied when the temperature falls back below a limit.
#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hysteresis {
    Deg0,
    Deg1_5,
    Deg3,
    Deg6,
}

/** Measurement resolution, stored in the Resolution Register.

Variants are named by the number of significant temperature bits, matching its `TryFrom<u8>` conversion. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 0.5 °C
    Bits9,
    /// 0.25 °C
    Bits10,
    /// 0.125 °C
    Bits11,
    /// 0.0625 °C (power-on default)
    Bits12,
}

impl Resolution {
    pub(crate) const MASK: u8 = 0x03;

    /// Degrees Celsius per least significant bit.
    pub fn step(self) -> f32 {
        match self {
            Resolution::Bits9 => 0.5,
            Resolution::Bits10 => 0.25,
            Resolution::Bits11 => 0.125,
            Resolution::Bits12 => 0.0625,
        }
    }

    /// Typical conversion time in milliseconds.
    pub fn conversion_time_ms(self) -> u16 {
        match self {
            Resolution::Bits9 => 30,
            Resolution::Bits10 => 65,
            Resolution::Bits11 => 130,
            Resolution::Bits12 => 250,
        }
    }

    pub(crate) fn from_register(val: u8) -> Self {
        match val & Self::MASK {
            0 => Resolution::Bits9,
            1 => Resolution::Bits10,
            2 => Resolution::Bits11,
            _ => Resolution::Bits12,
        }
    }
}

impl From<Resolution> for u8 {
    /// Value as written to the Resolution Register.
    fn from(res: Resolution) -> u8 {
        match res {
            Resolution::Bits9 => 0,
            Resolution::Bits10 => 1,
            Resolution::Bits11 => 2,
            Resolution::Bits12 => 3,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Bits12
    }
}

/// Converts a number of significant bits (9 to 12) to a [`Resolution`].
impl TryFrom<u8> for Resolution {
    type Error = ();

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            9 => Ok(Resolution::Bits9),
            10 => Ok(Resolution::Bits10),
            11 => Ok(Resolution::Bits11),
            12 => Ok(Resolution::Bits12),
            _ => Err(()),
        }
    }
}
