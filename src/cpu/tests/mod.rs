//! CPU test helpers and instruction-level test suites.


use super::{Cpu, Phase};
use crate::bus::Bus;
use crate::memory::Ram;

/// A bus with a single RAM device covering the full 16-bit address space,
/// pre-loaded with `program` starting at address 0.
fn bus_with_program(program: &[u8]) -> Bus {
    let mut bus = Bus::new();
    let mut ram = Ram::new(0x10000);
    for (offset, &byte) in program.iter().enumerate() {
        ram.write8(offset as u16, byte);
    }
    use crate::device::Device;
    bus.add_mmio_device(0, Box::new(ram));
    bus
}

/// Run a CPU through one full Fetch/Decode/Execute cycle, returning the
/// total cycles consumed.
fn run_one_instruction(cpu: &mut Cpu, bus: &mut Bus) -> u8 {
    assert_eq!(cpu.phase, Phase::Fetch, "must start a fresh instruction at Fetch");
    let mut total = 0;
    total += cpu.tick(bus).expect("fetch");
    total += cpu.tick(bus).expect("decode");
    total += cpu.tick(bus).expect("execute");
    total
}

/// Assert that exactly the named flag bits are set in `f`, nothing else.
fn assert_flags(f: u8, expected_mask: u8) {
    use super::flags::UNUSED_MASK;
    assert_eq!(
        f & !UNUSED_MASK,
        expected_mask & !UNUSED_MASK,
        "flags {f:#010b} did not match expected {expected_mask:#010b}"
    );
}
