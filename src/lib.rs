#![doc = r#"
TZR1 library crate.

Software model of the TZR1 soft-CPU: a 16-bit-instruction, 8-bit-datapath
single-cycle core with a hardware subroutine stack, plus the matching
two-pass assembler.

Modules:
- asm: mnemonic source text -> 16-bit program image
- bus: external data-bus trait and the Ram reference device
- cpu: ALU, register file, instruction decoder, program counter, core
- isa: opcode set, instruction word field layout, encoders

The core executes one instruction per `step()`: every combinational value
(decode, ALU, operand muxes, bus request) is derived from the committed
state, then registers, status flags, PC and call stack commit together.

In tests, shared program builders are available under `crate::test_utils`.
"#]

use thiserror::Error;

pub mod asm;
pub mod bus;
pub mod cpu;
pub mod isa;

// Re-export commonly used types at the crate root for convenience.
pub use bus::{DataBus, Ram};
pub use cpu::core::{Cpu, PROGRAM_DEPTH};
pub use cpu::{CARRY, ZERO};

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("program image holds {0} words; instruction memory holds {depth}", depth = cpu::core::PROGRAM_DEPTH)]
    ProgramTooLarge(usize),
}

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
