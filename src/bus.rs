//! System bus: routes 16-bit memory addresses and 8-bit port addresses to
//! pluggable devices.
//!
//! Memory-mapped devices are keyed by base address in a [`BTreeMap`], which
//! keeps iteration ordered by key — exactly what the nearest-base lookup in
//! [`Bus::nearest_mmio`] needs. Port-mapped devices sit in a dense array of
//! 256 slots, one per 8-bit port number.

use std::collections::BTreeMap;

use crate::device::Device;
use crate::error::PortOccupied;

/// Number of addressable 8-bit I/O ports.
const PORT_COUNT: usize = 256;

/// Routes memory and port accesses to the devices installed on it.
///
/// All read/write paths are infallible: a miss yields `0` on read and drops
/// the write. Only [`Bus::add_port_device`] can fail, when the requested
/// port slot is already occupied.
pub struct Bus {
    mmio: BTreeMap<u16, Box<dyn Device>>,
    ports: Vec<Option<Box<dyn Device>>>,
}

impl Bus {
    /// Create a bus with no devices installed.
    pub fn new() -> Self {
        let mut ports = Vec::with_capacity(PORT_COUNT);
        ports.resize_with(PORT_COUNT, || None);
        Self {
            mmio: BTreeMap::new(),
            ports,
        }
    }

    /// Install (or replace) a memory-mapped device at `base`.
    ///
    /// If another device already occupies `base`, it is silently replaced —
    /// the original source does the same. Overlapping base addresses can
    /// make part of a device's address space unreachable; avoiding that is
    /// the driver's responsibility, not this bus's.
    pub fn add_mmio_device(&mut self, base: u16, device: Box<dyn Device>) {
        if self.mmio.contains_key(&base) {
            log::warn!("mmio base {base:#06x} already occupied; replacing device");
        }
        self.mmio.insert(base, device);
    }

    /// Install a port-mapped device at `port`.
    ///
    /// Fails with [`PortOccupied`] if the slot already has a device —
    /// unlike MMIO, port installation does not silently overwrite.
    pub fn add_port_device(
        &mut self,
        port: u8,
        device: Box<dyn Device>,
    ) -> Result<(), PortOccupied> {
        let slot = &mut self.ports[port as usize];
        if slot.is_some() {
            return Err(PortOccupied { port });
        }
        *slot = Some(device);
        Ok(())
    }

    /// Find the device whose base address is the greatest key `<= addr`.
    ///
    /// Returns `None` if the MMIO table is empty, or if `addr` falls before
    /// every installed base.
    fn nearest_mmio(&self, addr: u16) -> Option<(u16, &Box<dyn Device>)> {
        self.mmio.range(..=addr).next_back().map(|(&b, d)| (b, d))
    }

    fn nearest_mmio_mut(&mut self, addr: u16) -> Option<(u16, &mut Box<dyn Device>)> {
        self.mmio
            .range_mut(..=addr)
            .next_back()
            .map(|(&b, d)| (b, d))
    }

    /// Read a byte from memory (`iorq = false`) or from an 8-bit port
    /// (`iorq = true`, using the low 8 bits of `addr`).
    ///
    /// A miss — no device at all, or an unoccupied port — returns `0`.
    pub fn read8(&self, addr: u16, iorq: bool) -> u8 {
        if iorq {
            let port = addr as u8;
            return self.ports[port as usize]
                .as_ref()
                .map(|dev| dev.read8(0))
                .unwrap_or(0);
        }

        match self.nearest_mmio(addr) {
            Some((base, dev)) => dev.read8(addr & !base),
            None => 0,
        }
    }

    /// Write a byte to memory (`iorq = false`) or to an 8-bit port
    /// (`iorq = true`). Symmetric with [`Bus::read8`]; a miss drops the
    /// write silently.
    pub fn write8(&mut self, addr: u16, value: u8, iorq: bool) {
        if iorq {
            let port = addr as u8;
            if let Some(dev) = self.ports[port as usize].as_mut() {
                dev.write8(0, value);
            }
            return;
        }

        if let Some((base, dev)) = self.nearest_mmio_mut(addr) {
            dev.write8(addr & !base, value);
        }
    }

    /// Little-endian 16-bit memory read: low byte from `addr`, high byte
    /// from `addr.wrapping_add(1)`. Two independent MMIO accesses — they may
    /// resolve to different devices if `addr` sits on a device boundary.
    /// There is no port-addressed variant.
    pub fn read16(&self, addr: u16) -> u16 {
        let lo = self.read8(addr, false);
        let hi = self.read8(addr.wrapping_add(1), false);
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian 16-bit memory write, symmetric with [`Bus::read16`].
    pub fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo, false);
        self.write8(addr.wrapping_add(1), hi, false);
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Ram, Rom};

    #[test]
    fn read_write_round_trip_through_mmio() {
        let mut bus = Bus::new();
        bus.add_mmio_device(0, Box::new(Ram::new(16)));
        bus.write8(5, 0x42, false);
        assert_eq!(bus.read8(5, false), 0x42);
    }

    #[test]
    fn read_miss_on_empty_bus_returns_zero() {
        let bus = Bus::new();
        assert_eq!(bus.read8(0x1234, false), 0);
    }

    #[test]
    fn query_before_smallest_base_misses() {
        let mut bus = Bus::new();
        bus.add_mmio_device(0x1000, Box::new(Ram::new(16)));
        assert_eq!(bus.read8(0x0FFF, false), 0);
    }

    #[test]
    fn nearest_base_lookup_picks_greatest_key_not_exceeding_query() {
        let mut bus = Bus::new();
        bus.add_mmio_device(0x0000, Box::new(Ram::new(0x10)));
        bus.add_mmio_device(0x0010, Box::new(Rom::with_contents(0x10, &[0xAA; 0x10])));
        bus.add_mmio_device(0x0100, Box::new(Ram::new(0x10)));

        // 0x0005 routes to the device based at 0x0000.
        bus.write8(0x0005, 7, false);
        assert_eq!(bus.read8(0x0005, false), 7);

        // 0x0015 routes to the ROM based at 0x0010 (local addr 0x0015 & !0x0010 = 5).
        assert_eq!(bus.read8(0x0015, false), 0xAA);

        // 0x0105 routes to the device based at 0x0100.
        bus.write8(0x0105, 9, false);
        assert_eq!(bus.read8(0x0105, false), 9);
    }

    #[test]
    fn add_mmio_device_overwrites_existing_base() {
        let mut bus = Bus::new();
        bus.add_mmio_device(0, Box::new(Ram::new(16)));
        bus.write8(1, 0x11, false);
        bus.add_mmio_device(0, Box::new(Ram::new(16)));
        // Replaced device is fresh, so the old write is gone.
        assert_eq!(bus.read8(1, false), 0);
    }

    #[test]
    fn port_read_write_round_trips() {
        let mut bus = Bus::new();
        bus.add_port_device(0x10, Box::new(Ram::new(1))).unwrap();
        bus.write8(0x10, 0x99, true);
        assert_eq!(bus.read8(0x10, true), 0x99);
    }

    #[test]
    fn port_miss_returns_zero_and_drops_write() {
        let mut bus = Bus::new();
        bus.write8(0x20, 0xFF, true);
        assert_eq!(bus.read8(0x20, true), 0);
    }

    #[test]
    fn add_port_device_twice_fails_with_port_occupied() {
        let mut bus = Bus::new();
        bus.add_port_device(5, Box::new(Ram::new(1))).unwrap();
        let err = bus.add_port_device(5, Box::new(Ram::new(1))).unwrap_err();
        assert_eq!(err, PortOccupied { port: 5 });
    }

    #[test]
    fn read16_is_little_endian_across_two_mmio_accesses() {
        let mut bus = Bus::new();
        bus.add_mmio_device(0, Box::new(Ram::new(16)));
        bus.write16(4, 0xBEEF);
        assert_eq!(bus.read8(4, false), 0xEF);
        assert_eq!(bus.read8(5, false), 0xBE);
        assert_eq!(bus.read16(4), 0xBEEF);
    }

    #[test]
    fn read16_can_span_two_distinct_devices() {
        let mut bus = Bus::new();
        bus.add_mmio_device(0, Box::new(Rom::with_contents(1, &[0x11])));
        bus.add_mmio_device(1, Box::new(Rom::with_contents(1, &[0x22])));
        // addr=0 is the last byte of the first device, addr+1=1 is the
        // first byte of the second device.
        assert_eq!(bus.read16(0), 0x2211);
    }
}
