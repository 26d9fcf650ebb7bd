/*!
isa.rs - TZR1 instruction-set definition: opcode enumeration, instruction
word field layout, and encoders.

An instruction is a single 16-bit word whose top 5 bits select the opcode.
The remaining 11 bits are interpreted per opcode as one of three shapes:

    | op (5) | Ra (3) | K (8)              |  register + 8-bit literal
    | op (5) | Ra (3) | Rb (3) | 00000     |  register + register
    | op (5) | PCK (11)                    |  absolute instruction address

25 of the 32 opcode values are defined. The rest map to `Opcode::Invalid`,
which the decoder turns into a full stall (no enables, PC held).

Field accessors are unconditional: every field bus is always driven from the
same bit ranges and the control lines decide what is consumed, mirroring the
hardware wiring.
*/

/// Mask for the 11-bit program-counter / jump-target value space.
pub const PC_MASK: u16 = 0x07FF;

/// The 25 defined TZR1 opcodes plus a catch-all for the 7 unused encodings.
///
/// Variant order follows the numeric opcode assignment (alphabetical by
/// mnemonic in the original instruction set listing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    AddRaK,
    AddRaRb,
    AndRaK,
    AndRaRb,
    CallPck,
    CmpRaK,
    CmpRaRb,
    JcPck,
    JmpPck,
    JzPck,
    MovRaK,
    MovRaRb,
    /// MOV Ra, [K] - load Ra from the external bus at address K.
    MovRaMemK,
    /// MOV Ra, [Rb] - load Ra from the external bus at the address in Rb.
    MovRaMemRb,
    /// MOV [K], Ra - store Ra to the external bus at address K.
    MovMemKRa,
    /// MOV [Rb], Ra - store Ra to the external bus at the address in Rb.
    MovMemRbRa,
    Nop,
    NotRa,
    OrRaK,
    OrRaRb,
    Ret,
    ShlRa,
    ShrRa,
    SubRaK,
    SubRaRb,
    /// One of the 7 undefined 5-bit codes (25..=31), payload is the raw code.
    Invalid(u8),
}

impl Opcode {
    /// Decode a 5-bit opcode field.
    pub fn from_bits(code: u8) -> Opcode {
        match code & 0x1F {
            0 => Opcode::AddRaK,
            1 => Opcode::AddRaRb,
            2 => Opcode::AndRaK,
            3 => Opcode::AndRaRb,
            4 => Opcode::CallPck,
            5 => Opcode::CmpRaK,
            6 => Opcode::CmpRaRb,
            7 => Opcode::JcPck,
            8 => Opcode::JmpPck,
            9 => Opcode::JzPck,
            10 => Opcode::MovRaK,
            11 => Opcode::MovRaRb,
            12 => Opcode::MovRaMemK,
            13 => Opcode::MovRaMemRb,
            14 => Opcode::MovMemKRa,
            15 => Opcode::MovMemRbRa,
            16 => Opcode::Nop,
            17 => Opcode::NotRa,
            18 => Opcode::OrRaK,
            19 => Opcode::OrRaRb,
            20 => Opcode::Ret,
            21 => Opcode::ShlRa,
            22 => Opcode::ShrRa,
            23 => Opcode::SubRaK,
            24 => Opcode::SubRaRb,
            other => Opcode::Invalid(other),
        }
    }

    /// The 5-bit opcode field value.
    pub fn bits(self) -> u8 {
        match self {
            Opcode::AddRaK => 0,
            Opcode::AddRaRb => 1,
            Opcode::AndRaK => 2,
            Opcode::AndRaRb => 3,
            Opcode::CallPck => 4,
            Opcode::CmpRaK => 5,
            Opcode::CmpRaRb => 6,
            Opcode::JcPck => 7,
            Opcode::JmpPck => 8,
            Opcode::JzPck => 9,
            Opcode::MovRaK => 10,
            Opcode::MovRaRb => 11,
            Opcode::MovRaMemK => 12,
            Opcode::MovRaMemRb => 13,
            Opcode::MovMemKRa => 14,
            Opcode::MovMemRbRa => 15,
            Opcode::Nop => 16,
            Opcode::NotRa => 17,
            Opcode::OrRaK => 18,
            Opcode::OrRaRb => 19,
            Opcode::Ret => 20,
            Opcode::ShlRa => 21,
            Opcode::ShrRa => 22,
            Opcode::SubRaK => 23,
            Opcode::SubRaRb => 24,
            Opcode::Invalid(code) => code & 0x1F,
        }
    }

    /// True for the 25 architecturally defined codes.
    pub fn is_defined(self) -> bool {
        !matches!(self, Opcode::Invalid(_))
    }
}

// ---------------------------------------------------------------------------
// Field buses
// ---------------------------------------------------------------------------

/// Opcode field, bits 15..11.
#[inline]
pub fn opcode(word: u16) -> Opcode {
    Opcode::from_bits((word >> 11) as u8)
}

/// Ra register address, bits 10..8.
#[inline]
pub fn reg_a(word: u16) -> u8 {
    ((word >> 8) & 0x07) as u8
}

/// Rb register address, bits 7..5.
#[inline]
pub fn reg_b(word: u16) -> u8 {
    ((word >> 5) & 0x07) as u8
}

/// Immediate literal K, bits 7..0.
#[inline]
pub fn literal(word: u16) -> u8 {
    (word & 0x00FF) as u8
}

/// Absolute jump/call target PCK, bits 10..0.
#[inline]
pub fn target(word: u16) -> u16 {
    word & PC_MASK
}

// ---------------------------------------------------------------------------
// Encoders (used by the assembler and by tests)
// ---------------------------------------------------------------------------

/// Encode a register + literal instruction (`op Ra, K`).
pub fn encode_reg_lit(op: Opcode, ra: u8, k: u8) -> u16 {
    debug_assert!(ra < 8, "register address out of range: r{ra}");
    ((op.bits() as u16) << 11) | ((ra as u16) << 8) | k as u16
}

/// Encode a register + register instruction (`op Ra, Rb`).
pub fn encode_reg_reg(op: Opcode, ra: u8, rb: u8) -> u16 {
    debug_assert!(ra < 8, "register address out of range: r{ra}");
    debug_assert!(rb < 8, "register address out of range: r{rb}");
    ((op.bits() as u16) << 11) | ((ra as u16) << 8) | ((rb as u16) << 5)
}

/// Encode a single-register instruction (`not`/`shl`/`shr`).
pub fn encode_reg(op: Opcode, ra: u8) -> u16 {
    encode_reg_lit(op, ra, 0)
}

/// Encode a jump/call with an absolute 11-bit target.
pub fn encode_target(op: Opcode, pck: u16) -> u16 {
    debug_assert!(pck <= PC_MASK, "target out of range: {pck}");
    ((op.bits() as u16) << 11) | (pck & PC_MASK)
}

/// Encode an operand-less instruction (`nop`/`ret`).
pub fn encode_implied(op: Opcode) -> u16 {
    (op.bits() as u16) << 11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_bits_round_trip() {
        for code in 0..32u8 {
            let op = Opcode::from_bits(code);
            assert_eq!(op.bits(), code);
            assert_eq!(op.is_defined(), code < 25);
        }
    }

    #[test]
    fn field_extraction() {
        // ADD r1, 3 per the instruction set listing:
        // 00000 . 001 . 00000011
        let word = 0b00000_001_00000011u16;
        assert_eq!(opcode(word), Opcode::AddRaK);
        assert_eq!(reg_a(word), 1);
        assert_eq!(literal(word), 3);

        // SUB r7, r2: 11000 . 111 . 010 00000
        let word = 0b11000_111_010_00000u16;
        assert_eq!(opcode(word), Opcode::SubRaRb);
        assert_eq!(reg_a(word), 7);
        assert_eq!(reg_b(word), 2);

        // JMP 0x123: 01000 . 00100100011
        let word = 0b01000_00100100011u16;
        assert_eq!(opcode(word), Opcode::JmpPck);
        assert_eq!(target(word), 0x123);
    }

    #[test]
    fn encoders_match_bit_layout() {
        assert_eq!(encode_reg_lit(Opcode::AddRaK, 1, 3), 0b00000_001_00000011);
        assert_eq!(encode_reg_reg(Opcode::SubRaRb, 7, 2), 0b11000_111_010_00000);
        assert_eq!(encode_target(Opcode::JmpPck, 0x123), 0b01000_00100100011);
        assert_eq!(encode_implied(Opcode::Nop), 0b10000_00000000000);
        assert_eq!(encode_implied(Opcode::Ret), 0b10100_00000000000);
        assert_eq!(encode_reg(Opcode::NotRa, 4), 0b10001_100_00000000);
    }

    #[test]
    fn undefined_codes_carry_their_raw_value() {
        for code in 25..32u8 {
            match Opcode::from_bits(code) {
                Opcode::Invalid(raw) => assert_eq!(raw, code),
                other => panic!("code {code} decoded as {other:?}"),
            }
        }
    }
}
