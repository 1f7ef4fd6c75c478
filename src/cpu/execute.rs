//! Instruction execute handlers, one per entry in the dispatch table
//! described in the module doc of [`super`].
//!
//! Every handler reads its operands from `self.current_decoded` (the
//! `x`/`y`/`z`/`p`/`q` fields cached during Decode) and returns the number
//! of cycles the Execute phase consumed.

use super::helpers::{INC_DEC_REG_CYCLES, MEMORY_ACCESS_CYCLES, REG_HL_INDIRECT, TEST_REG_CYCLES};
use super::{flags, Cpu};
use crate::bus::Bus;
use crate::error::CpuError;

impl Cpu {
    /// `NOP` — no state change.
    pub(super) fn op_nop(&mut self) -> u8 {
        0
    }

    /// `DJNZ d` — decrement `B`; if nonzero, jump by the signed displacement.
    pub(super) fn op_djnz(&mut self, bus: &Bus) -> u8 {
        self.regs.bc.add_upper((-1i8) as u8);
        let displacement = self.fetch_displacement(bus);
        let mut cycles = TEST_REG_CYCLES + INC_DEC_REG_CYCLES;
        if self.regs.bc.upper() != 0 {
            self.jump_relative(displacement);
            cycles += MEMORY_ACCESS_CYCLES + 2 * INC_DEC_REG_CYCLES;
        }
        cycles
    }

    /// `JR d` — unconditional relative jump.
    pub(super) fn op_jr(&mut self, bus: &Bus) -> u8 {
        let displacement = self.fetch_displacement(bus);
        self.jump_relative(displacement);
        // The "+5" retains the source's formula verbatim; see DESIGN.md.
        MEMORY_ACCESS_CYCLES + 5
    }

    /// `JR cc,d` — relative jump taken only if the condition (selected by
    /// `y - 4`: 0=NZ, 1=Z, 2=NC, 3=C) holds.
    pub(super) fn op_jr_cc(&mut self, bus: &Bus) -> u8 {
        let y = self.current_decoded.unwrap().y;
        let taken = match y - 4 {
            0 => !self.flag(flags::Z),
            1 => self.flag(flags::Z),
            2 => !self.flag(flags::C),
            3 => self.flag(flags::C),
            _ => unreachable!("y-4 is in 0..=3 for this dispatch arm"),
        };
        let displacement = self.fetch_displacement(bus);
        let mut cycles = TEST_REG_CYCLES;
        if taken {
            self.jump_relative(displacement);
            cycles += MEMORY_ACCESS_CYCLES + 2 * INC_DEC_REG_CYCLES;
        }
        cycles
    }

    fn jump_relative(&mut self, displacement: i8) {
        self.regs.pc = self.regs.pc.wrapping_add(displacement as i16 as u16);
    }

    /// `INC r` — increment the operand selected by `y`.
    pub(super) fn op_inc_r(&mut self, bus: &mut Bus) -> u8 {
        let y = self.current_decoded.unwrap().y;
        let v = self.get_operand(y, bus);
        let result = v.wrapping_add(1);
        self.set_operand(y, result, bus);

        self.set_flag(flags::S, result & 0x80 != 0);
        self.set_flag(flags::Z, result == 0);
        self.set_flag(flags::H, (v & 0xf) + 1 > 0xf);
        self.set_flag(flags::PV, v == 0x7f);
        self.set_flag(flags::N, false);

        if y == REG_HL_INDIRECT {
            MEMORY_ACCESS_CYCLES
        } else {
            0
        }
    }

    /// `DEC r` — decrement the operand selected by `y`.
    ///
    /// Half-carry uses the authoritative rule `H = (orig & 0xf) < 1`, i.e.
    /// set iff the low nibble was zero before the decrement (see DESIGN.md).
    pub(super) fn op_dec_r(&mut self, bus: &mut Bus) -> u8 {
        let y = self.current_decoded.unwrap().y;
        let v = self.get_operand(y, bus);
        let result = v.wrapping_sub(1);
        self.set_operand(y, result, bus);

        self.set_flag(flags::S, result & 0x80 != 0);
        self.set_flag(flags::Z, result == 0);
        self.set_flag(flags::H, (v & 0xf) < 1);
        self.set_flag(flags::PV, v == 0x80);
        self.set_flag(flags::N, true);

        if y == REG_HL_INDIRECT {
            MEMORY_ACCESS_CYCLES
        } else {
            0
        }
    }

    /// `LD r,n` — load an immediate byte into the operand selected by `y`.
    pub(super) fn op_ld_r_imm(&mut self, bus: &mut Bus) -> u8 {
        let y = self.current_decoded.unwrap().y;
        let value = bus.read8(self.regs.pc, false);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.set_operand(y, value, bus);

        let mut cycles = MEMORY_ACCESS_CYCLES;
        if y == REG_HL_INDIRECT {
            cycles += MEMORY_ACCESS_CYCLES;
        }
        cycles
    }

    /// `LD r,r'` — move the operand selected by `z` into the one selected
    /// by `y`.
    pub(super) fn op_ld_r_r(&mut self, bus: &mut Bus) -> u8 {
        let decoded = self.current_decoded.unwrap();
        let value = self.get_operand(decoded.z, bus);
        self.set_operand(decoded.y, value, bus);

        if decoded.z == REG_HL_INDIRECT || decoded.y == REG_HL_INDIRECT {
            MEMORY_ACCESS_CYCLES
        } else {
            0
        }
    }

    /// `ADD A,r`.
    ///
    /// The carry flag retains the source's signed-16-bit `> 255` check,
    /// which misses the unsigned wraparound case when both operands are
    /// negative (see DESIGN.md).
    pub(super) fn op_add_a_r(&mut self, bus: &Bus) -> u8 {
        let z = self.current_decoded.unwrap().z;
        let a = self.regs.a;
        let v = self.get_operand(z, bus);

        let signed_sum = (a as i8 as i16) + (v as i8 as i16);
        let result = a.wrapping_add(v);

        self.set_flag(flags::C, signed_sum > 255);
        self.set_flag(flags::N, false);
        let operand_signs_equal = (a ^ v) & 0x80 == 0;
        let result_sign_differs = (a ^ result) & 0x80 != 0;
        self.set_flag(flags::PV, operand_signs_equal && result_sign_differs);
        self.set_flag(flags::H, (a & 0xf) + (v & 0xf) > 0xf);
        self.set_flag(flags::Z, result == 0);
        self.set_flag(flags::S, (result as i8) < 0);

        self.regs.a = result;

        if z == REG_HL_INDIRECT {
            MEMORY_ACCESS_CYCLES
        } else {
            0
        }
    }

    /// `SUB r`.
    pub(super) fn op_sub_r(&mut self, bus: &Bus) -> u8 {
        let z = self.current_decoded.unwrap().z;
        let a = self.regs.a;
        let v = self.get_operand(z, bus);
        let result = a.wrapping_sub(v);

        self.set_flag(flags::C, a < v);
        self.set_flag(flags::N, true);
        let operand_signs_differ = (a ^ v) & 0x80 != 0;
        let result_sign_differs_from_a = (a ^ result) & 0x80 != 0;
        self.set_flag(
            flags::PV,
            operand_signs_differ && result_sign_differs_from_a,
        );
        self.set_flag(flags::H, (a & 0xf) < (v & 0xf));
        self.set_flag(flags::Z, result == 0);
        self.set_flag(flags::S, (result as i8) < 0);

        self.regs.a = result;

        if z == REG_HL_INDIRECT {
            MEMORY_ACCESS_CYCLES
        } else {
            0
        }
    }

    pub(super) fn op_unimplemented(&self, mnemonic: &'static str) -> CpuError {
        log::debug!(
            "unimplemented instruction {mnemonic} (opcode {:#04x})",
            self.current_opcode
        );
        CpuError::unimplemented_named(mnemonic)
    }
}
