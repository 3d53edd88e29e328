/* The MCP9808 stores temperatures big-endian, but an SMBus word read returns the first byte on the
wire as the low byte. Everything here works on the raw word as the transport returned it. */

/** Split a word read over SMBus into the register's `(msb, lsb)` as documented by the datasheet.

A 16 bit word read when using SMBus returns the MSB and LSB swapped. */
pub const fn word_swap(word: u16) -> (u8, u8) {
    ((word & 0xff) as u8, ((word & !0xff) >> 8) as u8)
}

/// Inverse of [`word_swap`]: build the word to hand to an SMBus word write.
pub const fn word_join(msb: u8, lsb: u8) -> u16 {
    (msb as u16) | ((lsb as u16) << 8)
}

/** Decode a raw temperature-register word (as read over SMBus) to degrees Celsius.

The upper byte holds three alarm flags, a sign bit and the upper four bits of the integer part;
the lower byte holds the remaining integer bits and four fractional bits (1/16 °C each).

For readings below 0 °C this applies the datasheet's sample formula, `256 - (msb * 16 + lsb / 16)`,
which yields the _magnitude_ of the negative temperature, not a negative number. */
pub fn decode_temperature(raw: u16) -> f32 {
    let (msb, lsb) = word_swap(raw);
    let msb = msb & 0x1f; // clear T_CRIT, T_UPPER, and T_LOWER flags

    if msb & (1 << 4) != 0 {
        let msb = msb & 0x0f; // clear sign bit
        256.0 - (f32::from(msb) * 16.0 + f32::from(lsb) / 16.0)
    } else {
        f32::from(msb) * 16.0 + f32::from(lsb) / 16.0
    }
}

/// Alarm and sign bits carried in the upper byte of the temperature register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemperatureFlags {
    /// Temperature is at or above the critical limit.
    pub critical: bool,
    /// Temperature is above the upper limit.
    pub upper: bool,
    /// Temperature is below the lower limit.
    pub lower: bool,
    /// Temperature is below 0 °C; [`decode_temperature`] then returns the magnitude.
    pub negative: bool,
}

/// Extract the flag bits from a raw temperature-register word (as read over SMBus).
pub const fn temperature_flags(raw: u16) -> TemperatureFlags {
    let (msb, _) = word_swap(raw);

    TemperatureFlags {
        critical: msb & (1 << 7) != 0,
        upper: msb & (1 << 6) != 0,
        lower: msb & (1 << 5) != 0,
        negative: msb & (1 << 4) != 0,
    }
}

/// Limit registers only implement bits 12..2 (sign plus 0.25 °C steps).
pub(crate) const LIMIT_MASK: u16 = 0x1ffc;

/** Encode degrees Celsius as a limit-register value in datasheet (big-endian) order.

The value is stored as 13-bit two's complement in 1/16 °C units and truncated toward zero to the
0.25 °C resolution of the limit registers. Callers are expected to range check first; see
[`Limits`](crate::Limits). */
pub fn encode_limit(celsius: f32) -> u16 {
    let quarters = (celsius * 4.0) as i16;
    ((quarters << 2) as u16) & LIMIT_MASK
}
