//! Shared test utilities: program-image builders and an instrumented bus.
//!
//! These helpers de-duplicate setup across the cpu, decoder, and assembler
//! test suites. They intentionally support just what the tests need.

#![allow(dead_code)]

use crate::asm;
use crate::bus::{DataBus, Ram};
use crate::cpu::core::Cpu;

/// Assemble `src` and build a core around it (default stack depth).
pub fn asm_cpu(src: &str) -> Cpu {
    let words = asm::assemble(src).expect("assemble");
    Cpu::new(&words).expect("image fits instruction memory")
}

/// Build a core around raw instruction words.
pub fn cpu_with(words: &[u16]) -> Cpu {
    Cpu::new(words).expect("image fits instruction memory")
}

/// Ram wrapper recording every bus transaction, so tests can assert on the
/// read/write strobes (or their absence) rather than only on end state.
pub struct RecordingBus {
    pub ram: Ram,
    pub reads: Vec<u8>,
    pub writes: Vec<(u8, u8)>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self {
            ram: Ram::new(),
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }
}

impl DataBus for RecordingBus {
    fn read(&mut self, addr: u8) -> u8 {
        self.reads.push(addr);
        self.ram.read(addr)
    }

    fn write(&mut self, addr: u8, value: u8) {
        self.writes.push((addr, value));
        self.ram.write(addr, value)
    }
}
