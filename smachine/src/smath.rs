bitstruct! {
    Wrap15: u32 {
        val: Wrapped, Width = U15, Offset = U0
    }
}

/// Reduces a wide intermediate into the 15-bit value range.
pub fn wrap(v: u32) -> u16 {
    Wrap15::new(v).val.value_of() as u16
}

pub fn add(lhs: u16, rhs: u16) -> u16 {
    wrap(lhs as u32 + rhs as u32)
}

pub fn mul(lhs: u16, rhs: u16) -> u16 {
    wrap(lhs as u32 * rhs as u32)
}

/// 15-bit complement; bit 15 is never set.
pub fn not(v: u16) -> u16 {
    0x7FFF ^ v
}
