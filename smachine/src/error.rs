use thiserror::Error;

/// Conditions that end a run. The machine records the first one and stops.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("invalid number {0}")]
    InvalidNumber(u16),
    #[error("invalid opcode {0}")]
    InvalidOpcode(u16),
    #[error("modulo by zero at {pc:#06x}")]
    DivideByZero { pc: usize },
    #[error("address {0:#06x} is outside of memory")]
    AddressOutOfRange(usize),
    #[error("unable to write output: {0}")]
    Output(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("program image is {0} bytes, more than fits in memory")]
    ImageTooLarge(usize),
}
