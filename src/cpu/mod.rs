//! The Z80-subset CPU: a three-phase fetch/decode/execute interpreter.
//!
//! # Module Organization
//!
//! - `flags`: Flag-byte bit constants for the `F` register
//! - `regs`: The register file (main set, shadow set, special-purpose)
//! - `helpers`: Register-operand table access, immediate fetch, flag helpers
//! - `execute`: One handler per dispatch-table entry
//!
//! # Phase state machine
//!
//! Each call to [`Cpu::tick`] advances exactly one phase and returns that
//! phase's cycle cost:
//!
//! - `Fetch` (4 cycles): read the byte at `PC`, increment `PC`, cache it as
//!   `current_opcode`.
//! - `Decode` (0 cycles): reject the four unimplemented prefix bytes
//!   (`0xCB`/`0xDD`/`0xED`/`0xFD`); otherwise split `current_opcode` into
//!   the `(x, y, z, p, q)` octal fields and cache them as `current_decoded`.
//! - `Execute` (variable cycles): dispatch on `x` to the handler in
//!   `execute.rs` and return its cycle cost.
//!
//! `current_opcode` and `current_decoded` are cached between phases rather
//! than passed as parameters, so a test can seed `current_opcode`, set
//! `phase = Phase::Decode`, and drive the CPU one tick at a time.

mod execute;
pub mod flags;
mod helpers;
pub mod regs;

#[cfg(test)]
mod tests;

pub use helpers::{
    DECODE_CYCLES, FETCH_CYCLES, INC_DEC_REG_CYCLES, MEMORY_ACCESS_CYCLES, TEST_REG_CYCLES,
};
use regs::Registers;

use crate::bus::Bus;
use crate::error::CpuError;

/// One of the three phases a `tick` can advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// About to read the opcode byte at `PC`.
    Fetch,
    /// About to split the fetched opcode into its octal fields.
    Decode,
    /// About to dispatch and run the decoded instruction.
    Execute,
}

/// The "Z80 octal" decomposition of an opcode: `x = op[7:6]`, `y = op[5:3]`,
/// `z = op[2:0]`, `p = y >> 1`, `q = y & 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub p: u8,
    pub q: u8,
}

impl DecodedInstruction {
    fn decode(opcode: u8) -> Self {
        let x = (opcode >> 6) & 0x03;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let p = y >> 1;
        let q = y & 0x01;
        DecodedInstruction { x, y, z, p, q }
    }
}

/// Opcodes the decode phase rejects outright: the CB/DD/ED/FD prefix bytes.
const PREFIX_BYTES: [u8; 4] = [0xCB, 0xDD, 0xED, 0xFD];

/// A Z80-subset CPU core: register file plus the fetch/decode/execute state
/// machine described in the module docs above.
#[derive(Debug, Clone)]
pub struct Cpu {
    /// The register file.
    pub regs: Registers,
    /// The phase the next `tick` will advance.
    pub phase: Phase,
    /// The opcode fetched by the most recent Fetch phase.
    pub current_opcode: u8,
    /// The octal decomposition produced by the most recent Decode phase.
    /// `None` before the first Decode.
    pub current_decoded: Option<DecodedInstruction>,
}

impl Cpu {
    /// A freshly reset CPU: all registers zeroed, `phase = Fetch`.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            phase: Phase::Fetch,
            current_opcode: 0,
            current_decoded: None,
        }
    }

    /// Advance exactly one phase, returning the cycles it consumed.
    ///
    /// On a decode or execute failure, the CPU's state is left exactly as
    /// it was at the point of failure — `phase` does not advance — so the
    /// caller can inspect `current_opcode`/`current_decoded` before
    /// resetting or aborting.
    pub fn tick(&mut self, bus: &mut Bus) -> Result<u8, CpuError> {
        match self.phase {
            Phase::Fetch => {
                self.current_opcode = self.fetch_byte(bus);
                self.phase = Phase::Decode;
                Ok(FETCH_CYCLES)
            }
            Phase::Decode => {
                if PREFIX_BYTES.contains(&self.current_opcode) {
                    return Err(CpuError::PrefixedOpcode(self.current_opcode));
                }
                self.current_decoded = Some(DecodedInstruction::decode(self.current_opcode));
                self.phase = Phase::Execute;
                Ok(DECODE_CYCLES)
            }
            Phase::Execute => {
                let cycles = self.execute(bus)?;
                self.phase = Phase::Fetch;
                Ok(cycles)
            }
        }
    }

    fn execute(&mut self, bus: &mut Bus) -> Result<u8, CpuError> {
        let decoded = self
            .current_decoded
            .expect("Execute phase always follows a successful Decode");

        match decoded.x {
            0 => self.execute_x0(decoded, bus),
            1 => self.execute_x1(decoded, bus),
            2 => self.execute_x2(decoded, bus),
            _ => Err(self.op_unimplemented("unknown x=3 opcode group")),
        }
    }

    fn execute_x0(&mut self, decoded: DecodedInstruction, bus: &mut Bus) -> Result<u8, CpuError> {
        match decoded.z {
            0 => match decoded.y {
                0 => Ok(self.op_nop()),
                2 => Ok(self.op_djnz(bus)),
                3 => Ok(self.op_jr(bus)),
                4..=7 => Ok(self.op_jr_cc(bus)),
                // y == 1: real-Z80 EX AF,AF'; not implemented by this core.
                _ => Err(self.op_unimplemented("EX AF,AF'")),
            },
            4 => Ok(self.op_inc_r(bus)),
            5 => Ok(self.op_dec_r(bus)),
            6 => Ok(self.op_ld_r_imm(bus)),
            _ => Err(self.op_unimplemented("unimplemented x=0 opcode")),
        }
    }

    fn execute_x1(&mut self, decoded: DecodedInstruction, bus: &mut Bus) -> Result<u8, CpuError> {
        if decoded.y == 6 && decoded.z == 6 {
            return Err(self.op_unimplemented("HALT"));
        }
        Ok(self.op_ld_r_r(bus))
    }

    fn execute_x2(&mut self, decoded: DecodedInstruction, bus: &mut Bus) -> Result<u8, CpuError> {
        match decoded.y {
            0 => Ok(self.op_add_a_r(bus)),
            2 => Ok(self.op_sub_r(bus)),
            _ => Err(self.op_unimplemented("unimplemented ALU opcode")),
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
