
pub mod memory {
    /// Size of the address space in bytes, 32767 little-endian words.
    pub const MEMORY_SIZE: usize = 0xFFFE;
    pub const WORD_SIZE: usize = 2;

    /// Fetching at or past this byte offset yields a halt. Only the lower
    /// half of memory holds code; the upper half is reachable as data.
    pub const PROGRAM_CEILING: usize = 0x8000;
}

pub mod number {
    pub const REGISTER_COUNT: usize = 8;
}

pub mod input {
    pub const LINE_FEED: u16 = 0x0A;
    pub const SPACE: u16 = 0x20;
}
