// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! GBA memory map and BIOS interface constants shared by the device and host crates.

/// Start of the protected BIOS region.
pub const BIOS_BASE: u32 = 0x0000_0000;
/// Size of the BIOS image in bytes.
pub const BIOS_SIZE: usize = 0x4000;
/// Size of the BIOS image in 32-bit words.
pub const BIOS_WORDS: usize = BIOS_SIZE / 4;

/// Entry of the `CpuFastSet` copy loop inside the BIOS, past the SWI's source-range check.
pub const FAST_COPY_CORE: u32 = 0x0000_0C14;
/// Bytes moved by one iteration of the fast-copy loop (`ldmia`/`stmia` of 8 registers).
pub const FAST_COPY_BLOCK: usize = 32;

/// SWI numbers used by the dumper.
pub mod swi {
    pub const HALT: u8 = 0x02;
    pub const CPU_FAST_SET: u8 = 0x0C;
    pub const BIOS_CHECKSUM: u8 = 0x0D;
}

/// Working RAM regions.
pub const EWRAM_BASE: u32 = 0x0200_0000;
pub const IWRAM_BASE: u32 = 0x0300_0000;

/// Battery-backed SRAM on the cartridge bus (8-bit access only).
pub const SRAM_BASE: u32 = 0x0E00_0000;
pub const SRAM_SIZE: usize = 32 * 1024;
/// Value written to SRAM offset 0 to confirm the save chip accepts writes.
pub const SRAM_CHECK_BYTE: u8 = 0x55;

/// Save-type marker that save managers and emulators scan the ROM for.
pub const SAVE_TYPE_TAG: &[u8] = b"SRAM_V123";

/// Timer 0 and interrupt controller registers.
pub const REG_TM0CNT_L: u32 = 0x0400_0100;
pub const REG_TM0CNT_H: u32 = 0x0400_0102;
pub const REG_IE: u32 = 0x0400_0200;
pub const REG_IME: u32 = 0x0400_0208;
pub const IRQ_TIMER0: u16 = 1 << 3;
/// Timer control: enable + IRQ on overflow, prescaler 1.
pub const TIMER_START_IRQ: u16 = 0x00C0;

/// A region of the 32-bit device address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AddrRange {
    pub base: u32,
    pub len: u32,
}

impl AddrRange {
    pub const fn new(base: u32, len: u32) -> Self {
        Self { base, len }
    }

    /// One past the last byte, the value a copy loop's end pointer holds.
    pub const fn end(&self) -> u32 {
        self.base.wrapping_add(self.len)
    }

    /// Offset of `addr` from the base, wrapping below it so such addresses never match.
    pub const fn delta(&self, addr: u32) -> u32 {
        addr.wrapping_sub(self.base)
    }

    pub const fn contains(&self, addr: u32) -> bool {
        self.delta(addr) < self.len
    }
}

/// The BIOS region as seen from the fast-copy loop.
pub const BIOS_RANGE: AddrRange = AddrRange::new(BIOS_BASE, BIOS_SIZE as u32);
