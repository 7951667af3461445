use crate::{
    constants::number::REGISTER_COUNT,
    error::VmError,
};

bitstruct! {
    RawOperand: u16 {
        register_flag: RegisterFlag, Width = U1, Offset = U15,
        payload: Payload, Width = U15, Offset = U0
    }
}

/// A decoded operand.
///
/// Register references carry the register's content as it was when the
/// operand was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Number {
    Literal(u16),
    Register { index: usize, value: u16 },
}

impl Number {
    pub fn decode(raw: u16, registers: &[u16; REGISTER_COUNT]) -> Result<Number, VmError> {
        let word = RawOperand::new(raw);
        if !word.register_flag.is_set() {
            return Ok(Number::Literal(word.payload.value_of()));
        }

        let index = word.payload.value_of() as usize;
        match registers.get(index) {
            Some(value) => Ok(Number::Register { index, value: *value }),
            None => Err(VmError::InvalidNumber(raw)),
        }
    }

    pub fn value(&self) -> u16 {
        match self {
            Number::Literal(v) => *v,
            Number::Register { value, .. } => *value,
        }
    }

    /// The register this operand names, if any.
    pub fn register(&self) -> Option<usize> {
        match self {
            Number::Literal(_) => None,
            Number::Register { index, .. } => Some(*index),
        }
    }

    /// Byte offset of the word this value addresses.
    pub fn to_address(&self) -> usize {
        self.value() as usize * 2
    }
}
