use std::io::Write;

use crate::{
    memory::{Address, Memory, Word},
    Result,
};

/// Reads a lower and an upper bound from `start`, then stores a running
/// counter into every address between them.
#[derive(Debug, Default)]
pub struct Cpu {
    pub pc: Address,
    pub a: Word,
    pub b: Word,
    pub c: Word,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu::default()
    }

    pub fn run<M, W>(&mut self, mem: &mut M, out: &mut W, start: Address) -> Result<()>
    where
        M: Memory + ?Sized,
        W: Write,
    {
        self.pc = start;
        self.a = mem.read(self.pc)?;
        mem.report(out)?;
        self.pc += 1;
        self.b = mem.read(self.pc)?;
        mem.report(out)?;
        self.pc += 1;
        self.c = 1;

        while self.a <= self.b {
            mem.write(self.a, self.c)?;
            mem.report(out)?;
            writeln!(out, "{} -> {}", self.a, self.c)?;
            self.c += 1;
            self.a += 1;
        }
        Ok(())
    }
}
