use core::convert::TryFrom;
use core::fmt;

/** Alarm limits in degrees Celsius: `(lower, upper, critical)`.

Each limit must fit the limit registers, the lower limit must be below the upper limit, and the
critical limit must not be below the upper limit. */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits(f32, f32, f32);

#[derive(Debug, PartialEq)]
pub enum LimitError {
    LowOutOfRange,
    HighOutOfRange,
    CriticalOutOfRange,
    LowExceedsHigh,
    CriticalBelowHigh,
}

impl Limits {
    /// Lowest value a limit register can hold.
    pub const MIN: f32 = -256.0;
    /// Limits must be strictly less than this.
    pub const MAX: f32 = 256.0;

    pub fn lower(&self) -> f32 {
        self.0
    }

    pub fn upper(&self) -> f32 {
        self.1
    }

    pub fn critical(&self) -> f32 {
        self.2
    }

    fn in_range(val: f32) -> bool {
        val >= Self::MIN && val < Self::MAX
    }
}

impl TryFrom<(f32, f32, f32)> for Limits {
    type Error = LimitError;

    fn try_from(val: (f32, f32, f32)) -> Result<Self, Self::Error> {
        if !Self::in_range(val.0) {
            Err(LimitError::LowOutOfRange)
        } else if !Self::in_range(val.1) {
            Err(LimitError::HighOutOfRange)
        } else if !Self::in_range(val.2) {
            Err(LimitError::CriticalOutOfRange)
        } else if val.0 >= val.1 {
            Err(LimitError::LowExceedsHigh)
        } else if val.2 < val.1 {
            Err(LimitError::CriticalBelowHigh)
        } else {
            Ok(Limits(val.0, val.1, val.2))
        }
    }
}

impl From<Limits> for (f32, f32, f32) {
    fn from(limits: Limits) -> (f32, f32, f32) {
        (limits.0, limits.1, limits.2)
    }
}

impl fmt::Display for LimitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LimitError::LowOutOfRange => write!(f, "lower limit out of range"),
            LimitError::HighOutOfRange => write!(f, "upper limit out of range"),
            LimitError::CriticalOutOfRange => write!(f, "critical limit out of range"),
            LimitError::LowExceedsHigh => write!(f, "lower limit not below upper limit"),
            LimitError::CriticalBelowHigh => write!(f, "critical limit below upper limit"),
        }
    }
}
