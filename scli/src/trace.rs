use smachine::{Instruction, Number, Opcode, SStack, Tracer, REGISTER_COUNT};

/// Writes each instruction with the machine state to stderr, leaving stdout
/// to the program.
pub struct StderrTracer {
    width: usize,
}

impl StderrTracer {
    pub fn new() -> StderrTracer {
        StderrTracer { width: textwrap::termwidth() }
    }

    fn state(&self, registers: &[u16; REGISTER_COUNT], stack: &SStack) {
        eprintln!("{}", textwrap::fill(&format!("Registers: {:?}", registers), self.width));
        eprintln!("{}", textwrap::fill(&format!("Stack: {:?}", stack.as_slice()), self.width));
        eprintln!();
    }
}

impl Tracer for StderrTracer {
    fn trace(&mut self, instr: &Instruction, registers: &[u16; REGISTER_COUNT], stack: &SStack) {
        // output is interleaved with the program's text otherwise
        if instr.opcode() == Opcode::Output {
            return;
        }

        eprintln!("{}", describe(instr));
        self.state(registers, stack);
    }

    fn trace_invalid(&mut self, pc: usize, word: u16, registers: &[u16; REGISTER_COUNT], stack: &SStack) {
        eprintln!("{:#06x} invalid opcode {}", pc, word);
        self.state(registers, stack);
    }
}

fn describe(instr: &Instruction) -> String {
    let ops: Vec<String> = instr.ops().iter().map(number).collect();
    format!("{:#06x} {} [{}]", instr.pc(), instr.opcode().mnemonic(), ops.join(", "))
}

fn number(n: &Number) -> String {
    match n {
        Number::Literal(v) => format!("{}", v),
        Number::Register { index, value } => format!("Register #{} - {}", index, value),
    }
}
