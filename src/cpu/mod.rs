/*!
cpu::mod - The TZR1 processor core, leaf components first:

    alu.rs      - combinational operate-and-flag unit
    regfile.rs  - 8x8-bit dual-read/single-write register file
    decoder.rs  - opcode -> control-signal table
    pc.rs       - program counter + hardware call stack
    core.rs     - composition: fetch/decode/execute with a two-phase step()

The public surface is the [`core::Cpu`] type plus the status-flag constants;
the leaf components are exported too so harnesses can exercise them in
isolation, the way the test suites here do.
*/

pub mod alu;
pub mod core;
pub mod decoder;
pub mod pc;
pub mod regfile;

pub use crate::cpu::alu::{AluFn, CARRY, ZERO};
pub use crate::cpu::core::{Cpu, PROGRAM_DEPTH};
pub use crate::cpu::decoder::{ControlWord, decode};
pub use crate::cpu::pc::DEFAULT_STACK_DEPTH;
