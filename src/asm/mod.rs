/*!
asm - Two-pass assembler for the TZR1 instruction set.

Statement form, one per line:

    [label:] op [arg1[, arg2]] [# comment]

Operands:
- `rN`        register, N = 0..7
- `[rN]`      external-bus address held in a register (mov only)
- `[int]`     external-bus address literal (mov only)
- `int`       literal: decimal, `0x..` hex, or `0b..` binary
- identifier  label reference (jump/call targets)

Pass 1 collects label definitions (label value = instruction index) and the
parsed statements; pass 2 resolves labels and encodes each statement to its
16-bit word. Errors carry the source line number.
*/

mod errors;
#[cfg(test)]
mod tests;

pub use errors::AsmError;

use std::collections::HashMap;

use crate::cpu::core::PROGRAM_DEPTH;
use crate::isa::{
    self, Opcode, encode_implied, encode_reg, encode_reg_lit, encode_reg_reg, encode_target,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Reg(u8),
    Int(u32),
    IndReg(u8),
    IndInt(u8),
    Ident(String),
}

#[derive(Debug)]
struct Stmt {
    line: usize,
    mnemonic: String,
    operands: Vec<Operand>,
}

/// Assemble source text into a program image.
pub fn assemble(text: &str) -> Result<Vec<u16>, AsmError> {
    let mut labels: HashMap<String, u16> = HashMap::new();
    let mut stmts: Vec<Stmt> = Vec::new();

    // Pass 1: labels and statements.
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let without_comment = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let mut line = without_comment.trim();

        while let Some(pos) = line.find(':') {
            let name = line[..pos].trim();
            if !is_ident(name) {
                return Err(AsmError::new(line_no, format!("malformed label: {name:?}")));
            }
            if labels.insert(name.to_string(), stmts.len() as u16).is_some() {
                return Err(AsmError::new(line_no, format!("duplicate label: {name}")));
            }
            line = line[pos + 1..].trim_start();
        }

        if line.is_empty() {
            continue;
        }
        stmts.push(parse_stmt(line, line_no)?);
    }

    if stmts.len() > PROGRAM_DEPTH {
        return Err(AsmError::new(
            stmts[PROGRAM_DEPTH].line,
            format!("program exceeds {PROGRAM_DEPTH} instructions"),
        ));
    }

    // Pass 2: encode.
    stmts.iter().map(|s| encode_stmt(s, &labels)).collect()
}

fn parse_stmt(line: &str, line_no: usize) -> Result<Stmt, AsmError> {
    let (mnemonic, rest) = match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], line[pos..].trim_start()),
        None => (line, ""),
    };

    let mut operands = Vec::new();
    if !rest.is_empty() {
        for part in rest.split(',') {
            operands.push(parse_operand(part.trim(), line_no)?);
        }
    }

    Ok(Stmt {
        line: line_no,
        mnemonic: mnemonic.to_string(),
        operands,
    })
}

fn parse_operand(tok: &str, line: usize) -> Result<Operand, AsmError> {
    if tok.is_empty() {
        return Err(AsmError::new(line, "empty operand"));
    }

    if let Some(inner) = tok.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| AsmError::new(line, format!("unterminated address operand: {tok}")))?
            .trim();
        return match parse_operand(inner, line)? {
            Operand::Reg(r) => Ok(Operand::IndReg(r)),
            Operand::Int(v) if v <= 0xFF => Ok(Operand::IndInt(v as u8)),
            Operand::Int(v) => Err(AsmError::new(
                line,
                format!("bus address out of range (0..=255): {v}"),
            )),
            _ => Err(AsmError::new(
                line,
                format!("address operand must be a register or literal: {tok}"),
            )),
        };
    }

    if let Some(digits) = tok.strip_prefix('r') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let n: u32 = digits
                .parse()
                .map_err(|_| AsmError::new(line, format!("malformed register: {tok}")))?;
            if n > 7 {
                return Err(AsmError::new(line, format!("register out of range: {tok}")));
            }
            return Ok(Operand::Reg(n as u8));
        }
    }

    if let Some(v) = parse_int(tok) {
        return Ok(Operand::Int(v));
    }

    if is_ident(tok) {
        return Ok(Operand::Ident(tok.to_string()));
    }

    Err(AsmError::new(line, format!("malformed operand: {tok}")))
}

fn parse_int(tok: &str) -> Option<u32> {
    if let Some(hex) = tok.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = tok.strip_prefix("0b") {
        u32::from_str_radix(bin, 2).ok()
    } else if tok.bytes().all(|b| b.is_ascii_digit()) {
        tok.parse().ok()
    } else {
        None
    }
}

fn is_ident(tok: &str) -> bool {
    let mut bytes = tok.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn encode_stmt(stmt: &Stmt, labels: &HashMap<String, u16>) -> Result<u16, AsmError> {
    let line = stmt.line;
    let ops = &stmt.operands;

    match stmt.mnemonic.as_str() {
        "nop" => {
            expect_operands(stmt, 0)?;
            Ok(encode_implied(Opcode::Nop))
        }
        "ret" => {
            expect_operands(stmt, 0)?;
            Ok(encode_implied(Opcode::Ret))
        }

        m @ ("not" | "shl" | "shr") => {
            expect_operands(stmt, 1)?;
            let op = match m {
                "not" => Opcode::NotRa,
                "shl" => Opcode::ShlRa,
                _ => Opcode::ShrRa,
            };
            match ops[0] {
                Operand::Reg(ra) => Ok(encode_reg(op, ra)),
                _ => Err(AsmError::new(line, format!("{m} operates on a register"))),
            }
        }

        m @ ("jmp" | "jc" | "jz" | "call") => {
            expect_operands(stmt, 1)?;
            let op = match m {
                "jmp" => Opcode::JmpPck,
                "jc" => Opcode::JcPck,
                "jz" => Opcode::JzPck,
                _ => Opcode::CallPck,
            };
            let pck = match &ops[0] {
                Operand::Int(v) if *v <= isa::PC_MASK as u32 => *v as u16,
                Operand::Int(v) => {
                    return Err(AsmError::new(line, format!("target out of range: {v}")));
                }
                Operand::Ident(name) => {
                    let addr = *labels.get(name).ok_or_else(|| {
                        AsmError::new(line, format!("undefined label: {name}"))
                    })?;
                    if addr > isa::PC_MASK {
                        return Err(AsmError::new(
                            line,
                            format!("label {name} is beyond addressable program memory"),
                        ));
                    }
                    addr
                }
                _ => {
                    return Err(AsmError::new(
                        line,
                        format!("{m} target must be a label or address"),
                    ));
                }
            };
            Ok(encode_target(op, pck))
        }

        m @ ("add" | "and" | "or" | "sub" | "cmp" | "mov") => {
            expect_operands(stmt, 2)?;
            let (op_lit, op_reg) = match m {
                "add" => (Opcode::AddRaK, Opcode::AddRaRb),
                "and" => (Opcode::AndRaK, Opcode::AndRaRb),
                "or" => (Opcode::OrRaK, Opcode::OrRaRb),
                "sub" => (Opcode::SubRaK, Opcode::SubRaRb),
                "cmp" => (Opcode::CmpRaK, Opcode::CmpRaRb),
                _ => (Opcode::MovRaK, Opcode::MovRaRb),
            };
            match (&ops[0], &ops[1]) {
                (Operand::Reg(ra), Operand::Reg(rb)) => Ok(encode_reg_reg(op_reg, *ra, *rb)),
                (Operand::Reg(ra), Operand::Int(v)) if *v <= 0xFF => {
                    Ok(encode_reg_lit(op_lit, *ra, *v as u8))
                }
                (Operand::Reg(_), Operand::Int(v)) => Err(AsmError::new(
                    line,
                    format!("literal out of range (0..=255): {v}"),
                )),

                // The memory-addressed forms exist for mov only.
                (Operand::Reg(ra), Operand::IndInt(k)) if m == "mov" => {
                    Ok(encode_reg_lit(Opcode::MovRaMemK, *ra, *k))
                }
                (Operand::Reg(ra), Operand::IndReg(rb)) if m == "mov" => {
                    Ok(encode_reg_reg(Opcode::MovRaMemRb, *ra, *rb))
                }
                (Operand::IndInt(k), Operand::Reg(ra)) if m == "mov" => {
                    Ok(encode_reg_lit(Opcode::MovMemKRa, *ra, *k))
                }
                (Operand::IndReg(rb), Operand::Reg(ra)) if m == "mov" => {
                    Ok(encode_reg_reg(Opcode::MovMemRbRa, *ra, *rb))
                }

                _ => Err(AsmError::new(line, format!("unsupported operands for {m}"))),
            }
        }

        other => Err(AsmError::new(line, format!("unknown mnemonic: {other}"))),
    }
}

fn expect_operands(stmt: &Stmt, count: usize) -> Result<(), AsmError> {
    if stmt.operands.len() == count {
        Ok(())
    } else {
        Err(AsmError::new(
            stmt.line,
            format!(
                "{} takes {count} operand(s), got {}",
                stmt.mnemonic,
                stmt.operands.len()
            ),
        ))
    }
}
