//! Shared HDL sources and bit-twiddling helpers for the end-to-end tests.

#![allow(dead_code)]

use volt_lower::Compiler;
use volt_sim::Simulation;

/// Combinational gate library built from NAND.
pub const GATES: &str = "
module Not(in) -> out { Nand(in, in) -> out }

module And(a, b) -> out {
    Nand(a, b) -> t
    Not(t) -> out
}

module Or(a, b) -> out {
    Not(a) -> na
    Not(b) -> nb
    Nand(na, nb) -> out
}

module Xor(a, b) -> out {
    Nand(a, b) -> t
    Nand(a, t) -> u
    Nand(b, t) -> v
    Nand(u, v) -> out
}

module Mux(a, b, sel) -> out {
    Not(sel) -> ns
    Nand(a, ns) -> t
    Nand(b, sel) -> u
    Nand(t, u) -> out
}
";

/// Ripple-carry adders.
pub const ADDERS: &str = "
module HalfAdder(a, b) -> sum, carry {
    Xor(a, b) -> sum
    And(a, b) -> carry
}

module FullAdder(a, b, cin) -> sum, carry {
    HalfAdder(a, b) -> s1, c1
    HalfAdder(s1, cin) -> sum, c2
    Or(c1, c2) -> carry
}

module Add8(a[8], b[8]) -> sum[8] {
    HalfAdder(a[0], b[0]) -> sum[0], c0
    FullAdder(a[1], b[1], c0) -> sum[1], c1
    FullAdder(a[2], b[2], c1) -> sum[2], c2
    FullAdder(a[3], b[3], c2) -> sum[3], c3
    FullAdder(a[4], b[4], c3) -> sum[4], c4
    FullAdder(a[5], b[5], c4) -> sum[5], c5
    FullAdder(a[6], b[6], c5) -> sum[6], c6
    FullAdder(a[7], b[7], c6) -> sum[7], c7
}
";

/// A loadable 1-bit cell and 8-bit register.
pub const REGISTERS: &str = "
module Bit(in, load) -> out {
    Mux(out, in, load) -> d
    Dff(d) -> out
}

module Register8(in[8], load) -> out[8] {
    Bit(in[0], load) -> out[0]
    Bit(in[1], load) -> out[1]
    Bit(in[2], load) -> out[2]
    Bit(in[3], load) -> out[3]
    Bit(in[4], load) -> out[4]
    Bit(in[5], load) -> out[5]
    Bit(in[6], load) -> out[6]
    Bit(in[7], load) -> out[7]
}
";

/// Compiles all given sources in order and instantiates `top`.
pub fn simulate(sources: &[&str], top: &str) -> Simulation {
    let mut compiler = Compiler::new();
    for (i, source) in sources.iter().enumerate() {
        assert!(
            compiler.compile_source(format!("source{i}.hdl"), source),
            "compile failed: {}",
            compiler.render_diagnostics()
        );
    }
    Simulation::new(compiler.registry(), compiler.interner(), top).unwrap()
}

/// Sets the `width` input bits starting at `base`, LSB-first.
pub fn set_bus(sim: &mut Simulation, base: usize, width: usize, value: u32) {
    for i in 0..width {
        sim.set_input(base + i, (value >> i) & 1 == 1);
    }
}

/// Reads `width` output bits starting at `base`, LSB-first.
pub fn read_bus(sim: &Simulation, base: usize, width: usize) -> u32 {
    (0..width).fold(0, |acc, i| acc | (u32::from(sim.output(base + i)) << i))
}

/// Renders output bits LSB-first as a `0`/`1` string.
pub fn output_string(sim: &Simulation, width: usize) -> String {
    (0..width)
        .map(|i| if sim.output(i) { '1' } else { '0' })
        .collect()
}
