use crate::{
    constants::{
        input::{LINE_FEED, SPACE},
        memory::{PROGRAM_CEILING, WORD_SIZE},
        number::REGISTER_COUNT,
    },
    error::{LoadError, VmError},
    sinst::{Instruction, Opcode},
    smath,
    smemory::SMemory,
    snumber::Number,
    sstack::SStack,
};

use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SMachineExecResult {
    NeedInput,
    Next,
    Exit,
}

/// Observes every instruction after it is fetched and before it runs.
pub trait Tracer {
    fn trace(&mut self, instr: &Instruction, registers: &[u16; REGISTER_COUNT], stack: &SStack);

    /// Called for an opcode word that names no instruction, before the run stops.
    fn trace_invalid(&mut self, _pc: usize, _word: u16, _registers: &[u16; REGISTER_COUNT], _stack: &SStack) {}
}

#[derive(Debug)]
pub struct SMachine<W: Write = io::Stdout> {
    memory: SMemory,
    registers: [u16; REGISTER_COUNT],
    stack: SStack,
    pc: usize,
    halted: bool,
    error: Option<VmError>,
    input_buffer: VecDeque<char>,
    pending_input: Option<Number>,
    output: W,
}

impl SMachine<io::Stdout> {
    pub fn new() -> SMachine<io::Stdout> {
        SMachine::with_output(io::stdout())
    }
}

impl Default for SMachine<io::Stdout> {
    fn default() -> SMachine<io::Stdout> {
        SMachine::new()
    }
}

impl<W: Write> SMachine<W> {
    pub fn with_output(output: W) -> SMachine<W> {
        SMachine {
            memory: SMemory::default(),
            registers: [0; REGISTER_COUNT],
            stack: SStack::new(),
            pc: 0,
            halted: false,
            error: None,
            input_buffer: VecDeque::new(),
            pending_input: None,
            output,
        }
    }

    pub fn load<P: AsRef<Path>>(&mut self, filename: P) -> Result<(), LoadError> {
        let buf = fs::read(filename)?;
        self.load_image(buf)
    }

    /// Replaces memory with `image` and puts the machine back at its
    /// starting state.
    pub fn load_image(&mut self, image: Vec<u8>) -> Result<(), LoadError> {
        self.memory.reset(image)?;

        self.registers = [0; REGISTER_COUNT];
        self.stack = SStack::new();
        self.pc = 0;
        self.halted = false;
        self.error = None;
        self.input_buffer.clear();
        self.pending_input = None;

        Ok(())
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn registers(&self) -> &[u16; REGISTER_COUNT] {
        &self.registers
    }

    pub fn stack(&self) -> &SStack {
        &self.stack
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn error(&self) -> Option<&VmError> {
        self.error.as_ref()
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Queues a line of input. A pending `in` picks it up on the next `exec`.
    pub fn send_input(&mut self, input: &str) {
        log::debug!("received {} chars of input", input.chars().count());
        self.input_buffer.extend(input.replace("\r\n", "\n").chars());
    }

    pub fn exec(&mut self) -> SMachineExecResult {
        self.run(None)
    }

    pub fn exec_traced(&mut self, tracer: &mut dyn Tracer) -> SMachineExecResult {
        self.run(Some(tracer))
    }

    fn run(&mut self, mut tracer: Option<&mut dyn Tracer>) -> SMachineExecResult {
        loop {
            let traced = match tracer {
                Some(ref mut t) => Some(&mut **t as &mut dyn Tracer),
                None => None,
            };

            match self.exec_one(traced) {
                SMachineExecResult::Next => continue,
                result => return result,
            }
        }
    }

    fn exec_one(&mut self, tracer: Option<&mut dyn Tracer>) -> SMachineExecResult {
        if self.halted || self.error.is_some() {
            return SMachineExecResult::Exit;
        }

        if let Some(dest) = self.pending_input {
            match self.take_input() {
                Some(code) => {
                    self.pending_input = None;
                    self.store(&dest, code);
                },
                None => return self.wait_for_input(),
            }
        }

        let instr = match self.fetch() {
            Ok(instr) => instr,
            Err(VmError::InvalidOpcode(word)) => {
                if let Some(tracer) = tracer {
                    tracer.trace_invalid(self.pc - WORD_SIZE, word, &self.registers, &self.stack);
                }
                return SMachineExecResult::Exit;
            },
            Err(_) => return SMachineExecResult::Exit,
        };

        if let Some(tracer) = tracer {
            tracer.trace(&instr, &self.registers, &self.stack);
        }

        self.execute(&instr).unwrap_or(SMachineExecResult::Exit)
    }

    /// Reads the instruction at the program counter and moves past it.
    ///
    /// An operand that fails to decode is recorded as the run's error, but
    /// the instruction is still returned with a literal 0 in its place and
    /// the program counter moves past it. The driver stops after executing it.
    pub fn fetch(&mut self) -> Result<Instruction, VmError> {
        match self.fetch_next_instr() {
            Ok((instr, fault)) => {
                if let Some(e) = fault {
                    self.fail(e);
                }
                Ok(instr)
            },
            Err(e) => {
                self.fail(e.clone());
                Err(e)
            },
        }
    }

    fn fetch_next_instr(&mut self) -> Result<(Instruction, Option<VmError>), VmError> {
        if self.pc >= PROGRAM_CEILING {
            return Ok((Instruction::halt(self.pc), None));
        }

        let word = self.memory.read_word(self.pc)?;
        let opcode = match Opcode::from_word(word) {
            Some(op) => op,
            None => {
                self.pc += WORD_SIZE;
                return Err(VmError::InvalidOpcode(word));
            },
        };

        let start = self.pc;
        self.pc += opcode.width();
        log::trace!("fetched {} at {:#06x}", opcode.mnemonic(), start);

        Instruction::decode_operands(opcode, &self.memory, start, &self.registers)
    }

    /// Applies one instruction. Failures are recorded and end the run.
    pub fn execute(&mut self, instr: &Instruction) -> Result<SMachineExecResult, VmError> {
        let result = self.execute_instr(instr);
        self.record(result)
    }

    fn execute_instr(&mut self, instr: &Instruction) -> Result<SMachineExecResult, VmError> {
        let ops = instr.ops();

        match instr.opcode() {
            Opcode::Halt => {
                self.halted = true;
                return Ok(SMachineExecResult::Exit);
            },
            Opcode::Set => {
                self.store(&ops[0], ops[1].value());
            },
            Opcode::Push => {
                self.stack.push(ops[0].value());
            },
            Opcode::Pop => {
                if let Some(idx) = ops[0].register() {
                    if let Some(top) = self.stack.pop() {
                        self.registers[idx] = top.value();
                    }
                }
            },
            Opcode::EqualTo => {
                let cond = ops[1].value() == ops[2].value();
                self.store(&ops[0], cond as u16);
            },
            Opcode::GreaterThan => {
                let cond = ops[1].value() > ops[2].value();
                self.store(&ops[0], cond as u16);
            },
            Opcode::JumpTo => {
                self.pc = ops[0].to_address();
            },
            Opcode::JumpToIfNotZero => {
                if ops[0].value() != 0 {
                    self.pc = ops[1].to_address();
                }
            },
            Opcode::JumpToIfZero => {
                if ops[0].value() == 0 {
                    self.pc = ops[1].to_address();
                }
            },
            Opcode::Add => {
                self.store(&ops[0], smath::add(ops[1].value(), ops[2].value()));
            },
            Opcode::Multiply => {
                self.store(&ops[0], smath::mul(ops[1].value(), ops[2].value()));
            },
            Opcode::Modulous => {
                if ops[0].register().is_some() {
                    let rhs = ops[2].value();
                    if rhs == 0 {
                        return Err(VmError::DivideByZero { pc: instr.pc() });
                    }

                    self.store(&ops[0], ops[1].value() % rhs);
                }
            },
            Opcode::And => {
                self.store(&ops[0], ops[1].value() & ops[2].value());
            },
            Opcode::Or => {
                self.store(&ops[0], ops[1].value() | ops[2].value());
            },
            Opcode::Not => {
                self.store(&ops[0], smath::not(ops[1].value()));
            },
            Opcode::ReadMemory => {
                if ops[0].register().is_some() {
                    let val = self.memory.read_word(ops[1].to_address())?;
                    self.store(&ops[0], val);
                }
            },
            Opcode::WriteMemory => {
                self.memory.set_word(ops[0].to_address(), ops[1].value())?;
            },
            Opcode::Call => {
                self.stack.push((self.pc / WORD_SIZE) as u16);
                self.pc = ops[0].to_address();
            },
            Opcode::Return => {
                match self.stack.pop() {
                    Some(ret) => self.pc = ret.to_address(),
                    None => {
                        self.halted = true;
                        return Ok(SMachineExecResult::Exit);
                    },
                }
            },
            Opcode::Output => {
                let ch = char::from_u32(ops[0].value() as u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                write!(self.output, "{}", ch).map_err(|e| VmError::Output(e.to_string()))?;
            },
            Opcode::Input => {
                match self.take_input() {
                    Some(code) => self.store(&ops[0], code),
                    None => {
                        self.pending_input = Some(ops[0]);
                        return self.flush_output().map(|_| SMachineExecResult::NeedInput);
                    },
                }
            },
            Opcode::NoOperation => {},
        }

        Ok(SMachineExecResult::Next)
    }

    fn store(&mut self, dest: &Number, val: u16) {
        if let Some(idx) = dest.register() {
            self.registers[idx] = val;
        }
    }

    fn take_input(&mut self) -> Option<u16> {
        self.input_buffer.pop_front().map(|c| match c {
            '\n' | '\r' => LINE_FEED,
            ' ' => SPACE,
            c => smath::wrap(c as u32),
        })
    }

    fn wait_for_input(&mut self) -> SMachineExecResult {
        let result = self.flush_output();
        match self.record(result) {
            Ok(()) => SMachineExecResult::NeedInput,
            Err(_) => SMachineExecResult::Exit,
        }
    }

    fn flush_output(&mut self) -> Result<(), VmError> {
        self.output.flush().map_err(|e| VmError::Output(e.to_string()))
    }

    fn fail(&mut self, e: VmError) {
        if self.error.is_none() {
            log::warn!("stopping at {:#06x}: {}", self.pc, e);
            self.error = Some(e);
        }
    }

    fn record<T>(&mut self, result: Result<T, VmError>) -> Result<T, VmError> {
        if let Err(e) = &result {
            self.fail(e.clone());
        }

        result
    }
}
