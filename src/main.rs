use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tzr1::cpu::DEFAULT_STACK_DEPTH;
use tzr1::{Cpu, Ram};

/// Assemble a TZR1 source file and run it on the simulated core.
#[derive(Parser, Debug)]
#[command(name = "tzr1", about = "TZR1 soft-CPU assembler and simulator")]
struct Args {
    /// Assembly source file: [label:] op [arg1[, arg2]] [# comment]
    source: PathBuf,

    /// Stop after this many clock cycles if the core has not halted
    #[arg(long, default_value_t = 10_000)]
    steps: usize,

    /// Call-stack depth in return-address slots
    #[arg(long, default_value_t = DEFAULT_STACK_DEPTH)]
    stack_depth: usize,

    /// Print the assembled 16-bit words instead of running
    #[arg(long)]
    emit_words: bool,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if args.stack_depth == 0 {
        return Err("--stack-depth must be at least 1".into());
    }

    let text = fs::read_to_string(&args.source)
        .map_err(|e| format!("{}: {e}", args.source.display()))?;
    let words =
        tzr1::asm::assemble(&text).map_err(|e| format!("{}: {e}", args.source.display()))?;

    if args.emit_words {
        for (addr, word) in words.iter().enumerate() {
            println!("{addr:04}: {word:04X}");
        }
        return Ok(());
    }

    let mut cpu = Cpu::with_stack_depth(&words, args.stack_depth).map_err(|e| e.to_string())?;
    let mut ram = Ram::new();
    let executed = cpu.run(&mut ram, args.steps);

    if cpu.is_halted() {
        println!("halted on an undefined opcode after {executed} cycles");
    } else {
        println!("step limit reached after {executed} cycles");
    }

    for i in 0..8u8 {
        println!("r{i}: 0x{:02X}", cpu.reg(i));
    }
    println!("carry: {}  zero: {}", cpu.carry(), cpu.zero());
    println!("pc: 0x{:03X}  call depth: {}", cpu.pc(), cpu.call_depth());

    // First 32 bytes of the data RAM, the region demo programs write to.
    for row in 0..2u8 {
        let base = row * 16;
        let bytes: Vec<String> = (0..16u8)
            .map(|i| format!("{:02X}", ram.peek(base + i)))
            .collect();
        println!("ram[0x{base:02X}..]: {}", bytes.join(" "));
    }

    Ok(())
}
