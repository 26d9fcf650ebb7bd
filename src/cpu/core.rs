/*!
core.rs - Top-level composition: fetch, decode, operand muxes, ALU, status
register, program counter, external bus.

`step()` is one clock edge, split into the two phases the hardware's
independently triggered processes collapse into:

1. Combinational: fetch `program[pc]`, decode it against the current status
   register, read both register-file ports, resolve the operand mux
   (literal vs port B), evaluate the ALU, and perform the external bus
   transaction. `addr_out` is the operand-mux output; `data_out` is the ALU
   result (stores force the ALU to pass Ra through).
2. Commit: register-file write (ALU result or bus `data_in` per the
   writeback mux), status register (when enabled), and the PC/stack
   transition all land together. Nothing committed in a step is observable
   within that same step.

Reset is level-sensitive: while the line is asserted every `step()` forces
the reset state instead of executing.

Undefined opcodes stall - the decoder de-asserts every enable and PC-path
line, so the core re-fetches the same word forever. On top of the stall the
core latches `halted` so harnesses can tell "stuck on an undefined word"
from "still running"; `run()` stops on it. Reset clears the latch.
*/

use crate::bus::DataBus;
use crate::cpu::alu;
use crate::cpu::decoder::{self, OperandSelect, WritebackSelect};
use crate::cpu::pc::{DEFAULT_STACK_DEPTH, ProgramCounter};
use crate::cpu::regfile::RegisterFile;
use crate::isa;
use crate::{CoreError, Result};

/// Instruction memory depth in 16-bit words (11-bit program counter).
pub const PROGRAM_DEPTH: usize = 2048;

/// Fill value for words beyond the supplied image: an undefined opcode, so
/// runaway fetch stalls instead of executing residue.
const UNPROGRAMMED_WORD: u16 = 0b11111 << 11;

/// The TZR1 core: program image plus all architectural state.
#[derive(Debug, Clone)]
pub struct Cpu {
    program: Vec<u16>,
    regs: RegisterFile,
    status: u8,
    pc: ProgramCounter,
    reset_line: bool,
    halted: bool,
}

impl Cpu {
    /// Build a core around `image` with the default call-stack depth.
    ///
    /// The image is read-only during execution and may hold at most
    /// [`PROGRAM_DEPTH`] words; shorter images are padded with an undefined
    /// opcode.
    pub fn new(image: &[u16]) -> Result<Self> {
        Self::with_stack_depth(image, DEFAULT_STACK_DEPTH)
    }

    /// Build a core with an explicit call-stack depth (hardware default 16).
    pub fn with_stack_depth(image: &[u16], stack_depth: usize) -> Result<Self> {
        if image.len() > PROGRAM_DEPTH {
            return Err(CoreError::ProgramTooLarge(image.len()));
        }
        let mut program = vec![UNPROGRAMMED_WORD; PROGRAM_DEPTH];
        program[..image.len()].copy_from_slice(image);
        Ok(Self {
            program,
            regs: RegisterFile::new(),
            status: 0,
            pc: ProgramCounter::new(stack_depth),
            reset_line: false,
            halted: false,
        })
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// One clock edge: compute everything from the committed state, then
    /// commit the new state atomically.
    pub fn step<B: DataBus>(&mut self, bus: &mut B) {
        if self.reset_line {
            self.apply_reset();
            return;
        }

        // Phase 1: combinational.
        let word = self.program[self.pc.value() as usize];
        let ctrl = decoder::decode(word, self.status);

        let ra = self.regs.read(ctrl.addr_a);
        let rb = self.regs.read(ctrl.addr_b);
        let operand_b = match ctrl.operand_select {
            OperandSelect::Literal => ctrl.literal,
            OperandSelect::RegB => rb,
        };
        let alu_out = alu::evaluate(ra, operand_b, ctrl.alu_fn);

        // External bus transaction: address is the operand-mux output,
        // data_out the ALU result. Completes within this cycle.
        let mut data_in = 0;
        if ctrl.mem_read {
            data_in = bus.read(operand_b);
        }
        if ctrl.mem_write {
            bus.write(operand_b, alu_out.result);
        }

        // Phase 2: synchronous commit.
        if ctrl.reg_write {
            let value = match ctrl.writeback_select {
                WritebackSelect::Alu => alu_out.result,
                WritebackSelect::Memory => data_in,
            };
            self.regs.stage_write(ctrl.addr_a, value);
        }
        self.regs.clock();
        if ctrl.status_write {
            self.status = alu_out.status;
        }
        self.pc.clock(&ctrl);

        if !isa::opcode(word).is_defined() {
            self.halted = true;
        }
    }

    /// Step until the core halts on an undefined opcode or `max_steps`
    /// cycles have run. Returns the number of cycles executed.
    pub fn run<B: DataBus>(&mut self, bus: &mut B, max_steps: usize) -> usize {
        let mut executed = 0;
        for _ in 0..max_steps {
            if self.halted {
                break;
            }
            self.step(bus);
            executed += 1;
        }
        executed
    }

    // ---------------------------------------------------------------------
    // Reset
    // ---------------------------------------------------------------------

    /// Drive the level-sensitive reset line. While high, every `step()`
    /// forces the reset state.
    pub fn set_reset(&mut self, level: bool) {
        self.reset_line = level;
    }

    /// Convenience one-cycle reset pulse.
    pub fn reset(&mut self) {
        self.apply_reset();
    }

    fn apply_reset(&mut self) {
        self.pc.reset();
        self.regs.reset();
        self.status = 0;
        self.halted = false;
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc.value()
    }

    #[inline]
    pub fn reg(&self, index: u8) -> u8 {
        self.regs.read(index)
    }

    /// Raw 2-bit status register, see [`alu::CARRY`] and [`alu::ZERO`].
    #[inline]
    pub fn status(&self) -> u8 {
        self.status
    }

    #[inline]
    pub fn carry(&self) -> bool {
        self.status & alu::CARRY != 0
    }

    #[inline]
    pub fn zero(&self) -> bool {
        self.status & alu::ZERO != 0
    }

    /// True once the core has fetched an undefined opcode. The stall itself
    /// is architectural; this latch is the reporting layer on top.
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Current call-stack nesting (the hardware stack pointer).
    #[inline]
    pub fn call_depth(&self) -> usize {
        self.pc.stack().depth()
    }
}
