//! Error types surfaced by the bus and CPU.
//!
//! Everything else in this crate is infallible: missing devices yield zero on
//! read and silently drop writes (see [`crate::bus::Bus`] and
//! [`crate::device::Device`]).

use thiserror::Error;

/// Raised by [`crate::bus::Bus::add_port_device`] when the requested port
/// already has a device installed. Locally recoverable: the caller can pick
/// a different port.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("port {port} already has a device installed")]
pub struct PortOccupied {
    /// Port index that was already occupied.
    pub port: u8,
}

/// Raised by [`crate::cpu::Cpu::tick`] during the decode or execute phase
/// when the opcode falls outside the implemented subset.
///
/// The CPU leaves its state at the point of failure; the caller may choose
/// to reset the CPU or abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuError {
    /// Decode saw one of the `0xCB`/`0xDD`/`0xED`/`0xFD` prefix bytes.
    PrefixedOpcode(u8),
    /// Execute reached an opcode outside the implemented instruction subset.
    UnimplementedInstruction {
        /// Mnemonic, when known (e.g. `"HALT"`, `"EX AF,AF'"`).
        mnemonic: Option<String>,
    },
}

impl std::fmt::Display for CpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CpuError::PrefixedOpcode(op) => {
                write!(f, "prefixed opcode not implemented: {op:#04x}")
            }
            CpuError::UnimplementedInstruction { mnemonic: Some(m) } => {
                write!(f, "unimplemented instruction: {m}")
            }
            CpuError::UnimplementedInstruction { mnemonic: None } => {
                write!(f, "unimplemented instruction")
            }
        }
    }
}

impl std::error::Error for CpuError {}

impl CpuError {
    /// Build an [`CpuError::UnimplementedInstruction`] without a known mnemonic.
    pub fn unimplemented() -> Self {
        CpuError::UnimplementedInstruction { mnemonic: None }
    }

    /// Build an [`CpuError::UnimplementedInstruction`] carrying a mnemonic.
    pub fn unimplemented_named(mnemonic: impl Into<String>) -> Self {
        CpuError::UnimplementedInstruction {
            mnemonic: Some(mnemonic.into()),
        }
    }
}
