//! The Z80 register file: main set, shadow set, and special-purpose registers.

use crate::register_pair::RegisterPair;

/// Main and shadow register sets plus the special-purpose registers.
///
/// The shadow set (`a_prime`, `bc_prime`, ...) is allocated but unused by
/// this core's instruction subset — `EX AF,AF'` and `EXX` are out of scope
/// — and exists purely so the field layout matches the full Z80 register
/// model.
#[derive(Debug, Clone)]
pub struct Registers {
    /// Accumulator.
    pub a: u8,
    /// Flag byte (see [`super::flags`]).
    pub f: u8,
    /// `BC` register pair.
    pub bc: RegisterPair,
    /// `DE` register pair.
    pub de: RegisterPair,
    /// `HL` register pair.
    pub hl: RegisterPair,

    /// Shadow accumulator.
    pub a_prime: u8,
    /// Shadow flag byte.
    pub f_prime: u8,
    /// Shadow `BC`.
    pub bc_prime: RegisterPair,
    /// Shadow `DE`.
    pub de_prime: RegisterPair,
    /// Shadow `HL`.
    pub hl_prime: RegisterPair,

    /// Program counter.
    pub pc: u16,
    /// Stack pointer.
    pub sp: u16,
    /// `IX` index register.
    pub ix: u16,
    /// `IY` index register.
    pub iy: u16,
    /// Interrupt vector base.
    pub i: u8,
    /// Memory refresh register.
    pub r: u8,
    /// Set by `HALT`; this core never reaches it (HALT is unimplemented)
    /// but the field exists for state-snapshot completeness.
    pub halted: bool,
}

impl Registers {
    /// All registers zeroed, not halted.
    pub fn new() -> Self {
        Self {
            a: 0,
            f: 0,
            bc: RegisterPair::new(0),
            de: RegisterPair::new(0),
            hl: RegisterPair::new(0),
            a_prime: 0,
            f_prime: 0,
            bc_prime: RegisterPair::new(0),
            de_prime: RegisterPair::new(0),
            hl_prime: RegisterPair::new(0),
            pc: 0,
            sp: 0,
            ix: 0,
            iy: 0,
            i: 0,
            r: 0,
            halted: false,
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
