use super::*;
use crate::bus::Ram;
use crate::cpu::core::Cpu;

#[test]
fn encodes_every_two_operand_form() {
    let words = assemble(
        "\
add r1, 3
add r1, r2
and r3, 0xF0
and r3, r4
or r5, 0b1010
or r5, r6
sub r7, 200
sub r7, r0
cmp r1, 9
cmp r1, r2
mov r0, 255
mov r0, r1
",
    )
    .unwrap();

    assert_eq!(
        words,
        vec![
            encode_reg_lit(Opcode::AddRaK, 1, 3),
            encode_reg_reg(Opcode::AddRaRb, 1, 2),
            encode_reg_lit(Opcode::AndRaK, 3, 0xF0),
            encode_reg_reg(Opcode::AndRaRb, 3, 4),
            encode_reg_lit(Opcode::OrRaK, 5, 0b1010),
            encode_reg_reg(Opcode::OrRaRb, 5, 6),
            encode_reg_lit(Opcode::SubRaK, 7, 200),
            encode_reg_reg(Opcode::SubRaRb, 7, 0),
            encode_reg_lit(Opcode::CmpRaK, 1, 9),
            encode_reg_reg(Opcode::CmpRaRb, 1, 2),
            encode_reg_lit(Opcode::MovRaK, 0, 255),
            encode_reg_reg(Opcode::MovRaRb, 0, 1),
        ]
    );
}

#[test]
fn cmp_literal_lands_in_the_k_field() {
    // Regression guard for the encoding: the literal belongs in bits 7..0,
    // not in the Rb field.
    let words = assemble("cmp r1, 9").unwrap();
    assert_eq!(words[0] & 0x00FF, 9);
    assert_eq!(isa::reg_a(words[0]), 1);
}

#[test]
fn encodes_memory_forms() {
    let words = assemble(
        "\
mov r3, [0x20]
mov r3, [r4]
mov [0x20], r3
mov [r4], r3
",
    )
    .unwrap();

    assert_eq!(
        words,
        vec![
            encode_reg_lit(Opcode::MovRaMemK, 3, 0x20),
            encode_reg_reg(Opcode::MovRaMemRb, 3, 4),
            encode_reg_lit(Opcode::MovMemKRa, 3, 0x20),
            encode_reg_reg(Opcode::MovMemRbRa, 3, 4),
        ]
    );
}

#[test]
fn encodes_single_register_and_implied_forms() {
    let words = assemble("not r1\nshl r2\nshr r3\nnop\nret\n").unwrap();
    assert_eq!(
        words,
        vec![
            encode_reg(Opcode::NotRa, 1),
            encode_reg(Opcode::ShlRa, 2),
            encode_reg(Opcode::ShrRa, 3),
            encode_implied(Opcode::Nop),
            encode_implied(Opcode::Ret),
        ]
    );
}

#[test]
fn resolves_forward_and_backward_labels() {
    let words = assemble(
        "\
start: nop
jmp end
jmp start
end: nop
",
    )
    .unwrap();

    assert_eq!(words[1], encode_target(Opcode::JmpPck, 3));
    assert_eq!(words[2], encode_target(Opcode::JmpPck, 0));
}

#[test]
fn label_may_sit_on_its_own_line() {
    let words = assemble(
        "\
        jmp target

target:
        nop
",
    )
    .unwrap();
    assert_eq!(words[0], encode_target(Opcode::JmpPck, 1));
}

#[test]
fn numeric_jump_targets_are_accepted() {
    let words = assemble("jmp 0x7FF\ncall 5\n").unwrap();
    assert_eq!(words[0], encode_target(Opcode::JmpPck, 0x7FF));
    assert_eq!(words[1], encode_target(Opcode::CallPck, 5));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let words = assemble(
        "\
# leading comment

nop      # trailing comment
   # indented comment
ret
",
    )
    .unwrap();
    assert_eq!(words.len(), 2);
}

#[test]
fn rejects_unknown_mnemonic() {
    let err = assemble("nop\nfrobnicate r1\n").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.msg.contains("unknown mnemonic"));
}

#[test]
fn rejects_register_out_of_range() {
    let err = assemble("mov r9, 1").unwrap_err();
    assert_eq!(err.line, 1);
    assert!(err.msg.contains("register out of range"));
}

#[test]
fn rejects_literal_out_of_range() {
    let err = assemble("add r0, 256").unwrap_err();
    assert!(err.msg.contains("literal out of range"));

    let err = assemble("jmp 2048").unwrap_err();
    assert!(err.msg.contains("target out of range"));

    let err = assemble("mov r0, [256]").unwrap_err();
    assert!(err.msg.contains("bus address out of range"));
}

#[test]
fn rejects_undefined_and_duplicate_labels() {
    let err = assemble("jmp nowhere").unwrap_err();
    assert!(err.msg.contains("undefined label: nowhere"));

    let err = assemble("a: nop\na: ret\n").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.msg.contains("duplicate label"));
}

#[test]
fn rejects_malformed_statements() {
    assert!(assemble("mov r0").is_err());
    assert!(assemble("nop r0").is_err());
    assert!(assemble("not 5").is_err());
    assert!(assemble("jmp r3").is_err());
    assert!(assemble("mov [5], 3").is_err());
    assert!(assemble("mov r0, [r1").is_err());
    assert!(assemble("add r0,, 1").is_err());
}

#[test]
fn fibonacci_demo_assembles_and_runs() {
    let words = assemble(include_str!("../../demos/fibo.asm")).unwrap();
    let mut cpu = Cpu::new(&words).unwrap();
    let mut ram = Ram::new();
    cpu.run(&mut ram, 200);

    let expected: [u8; 13] = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];
    for (addr, term) in expected.iter().enumerate() {
        assert_eq!(ram.peek(addr as u8), *term, "term {addr}");
    }
    assert!(!cpu.is_halted(), "demo parks on a self-jump");
}
