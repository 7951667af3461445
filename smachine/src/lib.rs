#![recursion_limit = "512"]

#[macro_use]
mod bits;

mod constants;
mod error;
mod smath;
mod smemory;
mod snumber;
mod sstack;
mod sinst;
mod smachine;

#[macro_use]
extern crate typenum;

pub use crate::constants::number::REGISTER_COUNT;
pub use crate::error::{LoadError, VmError};
pub use crate::sinst::{Instruction, Opcode};
pub use crate::smachine::{SMachine, SMachineExecResult, Tracer};
pub use crate::snumber::Number;
pub use crate::sstack::SStack;
