//! A cycle-counting core for a Zilog Z80-family CPU and its MMIO/port bus.
//!
//! This crate provides a CPU interpreter and a pluggable bus, both
//! deliberately decoupled from any host platform — there is no display, no
//! input, no file loader. A caller wires up [`bus::Bus`] with whatever
//! [`device::Device`] implementations its system needs (this crate ships
//! generic [`memory::Ram`] and [`memory::Rom`]) and drives [`cpu::Cpu`] one
//! phase at a time with [`cpu::Cpu::tick`].
//!
//! # Module Organization
//!
//! - `device`: The `Device` trait every bus-attached peripheral implements
//! - `memory`: Generic RAM and ROM device implementations
//! - `register_pair`: The 8-bit-pair/16-bit-combined register representation
//! - `bus`: Address decoding and memory/port access routing
//! - `cpu`: The fetch/decode/execute interpreter
//! - `error`: Error types raised by the bus and CPU

pub mod bus;
pub mod cpu;
pub mod device;
pub mod error;
pub mod memory;
pub mod register_pair;

pub use bus::Bus;
pub use cpu::Cpu;
pub use error::{CpuError, PortOccupied};
