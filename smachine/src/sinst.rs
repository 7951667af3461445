use crate::{
    constants::{
        memory::WORD_SIZE,
        number::REGISTER_COUNT,
    },
    error::VmError,
    smemory::SMemory,
    snumber::Number,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Halt,
    Set,
    Push,
    Pop,
    EqualTo,
    GreaterThan,
    JumpTo,
    JumpToIfNotZero,
    JumpToIfZero,
    Add,
    Multiply,
    Modulous,
    And,
    Or,
    Not,
    ReadMemory,
    WriteMemory,
    Call,
    Return,
    Output,
    Input,
    NoOperation,
}

impl Opcode {
    pub fn from_word(word: u16) -> Option<Opcode> {
        let op = match word {
            0 => Opcode::Halt,
            1 => Opcode::Set,
            2 => Opcode::Push,
            3 => Opcode::Pop,
            4 => Opcode::EqualTo,
            5 => Opcode::GreaterThan,
            6 => Opcode::JumpTo,
            7 => Opcode::JumpToIfNotZero,
            8 => Opcode::JumpToIfZero,
            9 => Opcode::Add,
            10 => Opcode::Multiply,
            11 => Opcode::Modulous,
            12 => Opcode::And,
            13 => Opcode::Or,
            14 => Opcode::Not,
            15 => Opcode::ReadMemory,
            16 => Opcode::WriteMemory,
            17 => Opcode::Call,
            18 => Opcode::Return,
            19 => Opcode::Output,
            20 => Opcode::Input,
            21 => Opcode::NoOperation,
            _ => return None,
        };

        Some(op)
    }

    /// Number of operand words following the opcode word.
    pub fn arity(self) -> usize {
        match self {
            Opcode::Halt | Opcode::Return | Opcode::NoOperation => 0,

            Opcode::Push | Opcode::Pop | Opcode::JumpTo |
            Opcode::Call | Opcode::Output | Opcode::Input => 1,

            Opcode::Set | Opcode::JumpToIfNotZero | Opcode::JumpToIfZero |
            Opcode::Not | Opcode::ReadMemory | Opcode::WriteMemory => 2,

            Opcode::EqualTo | Opcode::GreaterThan | Opcode::Add | Opcode::Multiply |
            Opcode::Modulous | Opcode::And | Opcode::Or => 3,
        }
    }

    /// Encoded length in bytes, opcode word included.
    pub fn width(self) -> usize {
        WORD_SIZE * (1 + self.arity())
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "HALT",
            Opcode::Set => "SET",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::EqualTo => "EQ",
            Opcode::GreaterThan => "GT",
            Opcode::JumpTo => "JMP",
            Opcode::JumpToIfNotZero => "JT",
            Opcode::JumpToIfZero => "JF",
            Opcode::Add => "ADD",
            Opcode::Multiply => "MULT",
            Opcode::Modulous => "MOD",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::ReadMemory => "RMEM",
            Opcode::WriteMemory => "WMEM",
            Opcode::Call => "CALL",
            Opcode::Return => "RET",
            Opcode::Output => "OUT",
            Opcode::Input => "IN",
            Opcode::NoOperation => "NOOP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pc: usize,
    opcode: Opcode,
    ops: Vec<Number>,
}

impl Instruction {
    pub(crate) fn halt(pc: usize) -> Instruction {
        Instruction { pc, opcode: Opcode::Halt, ops: vec![] }
    }

    /// Byte offset of the opcode word.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Operands in program order; always `opcode().arity()` of them.
    pub fn ops(&self) -> &[Number] {
        &self.ops
    }

    /// Decodes the operands of `opcode`, whose opcode word sits at `pc`.
    ///
    /// Operands are read from the last one back to the first. A bad word
    /// decodes as a literal 0 so the instruction can still run once, and its
    /// error is handed back alongside; if several are bad, the one nearest the
    /// opcode is reported.
    pub(crate) fn decode_operands(
        opcode: Opcode,
        mem: &SMemory,
        pc: usize,
        registers: &[u16; REGISTER_COUNT],
    ) -> Result<(Instruction, Option<VmError>), VmError> {
        let mut ops: Vec<Number> = Vec::with_capacity(opcode.arity());
        let mut failure = None;

        for slot in (1..=opcode.arity()).rev() {
            let raw = mem.read_word(pc + slot * WORD_SIZE)?;
            match Number::decode(raw, registers) {
                Ok(n) => ops.push(n),
                Err(e) => {
                    ops.push(Number::Literal(0));
                    failure = Some(e);
                },
            }
        }
        ops.reverse();

        Ok((Instruction { pc, opcode, ops }, failure))
    }
}
