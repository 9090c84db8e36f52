// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Host-side stand-ins for the hardware seams.
//!
//! Used by the tests and by the host tool's `simulate` command to run the
//! whole dump sequence against a BIOS image file.

use crate::checksum::word_sum;
use crate::copy::{BulkCopy, Granularity, OracleShot, Platform};
use crate::image::ImageBuffer;
use crate::layout::{AddrRange, BIOS_SIZE, EWRAM_BASE, FAST_COPY_BLOCK, IWRAM_BASE};
use crate::oracle::Scratch;
use crate::save::SaveMemory;
use crate::stack::{Corrections, Redirect};

/// Read-only memory mapped at a device address. Reads outside it return 0.
#[derive(Debug, Clone, Copy)]
pub struct MemoryBus<'a> {
    base: u32,
    bytes: &'a [u8],
}

impl<'a> MemoryBus<'a> {
    pub fn new(base: u32, bytes: &'a [u8]) -> Self {
        Self { base, bytes }
    }

    pub fn range(&self) -> AddrRange {
        AddrRange::new(self.base, self.bytes.len() as u32)
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn read(&self, addr: u32) -> u8 {
        let offset = addr.wrapping_sub(self.base) as usize;
        self.bytes.get(offset).copied().unwrap_or(0)
    }
}

impl BulkCopy for MemoryBus<'_> {
    fn bulk_copy(&mut self, src: u32, dst: &mut [u8], count: usize, granularity: Granularity) {
        let len = count * granularity.unit();
        for (i, out) in dst.iter_mut().take(len).enumerate() {
            *out = self.read(src.wrapping_add(i as u32));
        }
    }
}

/// Where the simulated scratch and destination buffers appear to the copy loop.
pub const SIM_SCRATCH_BASE: u32 = EWRAM_BASE;
pub const SIM_DEST_BASE: u32 = IWRAM_BASE + 0x0100;

/// Model of a fast copy interrupted by the countdown timer.
///
/// The timer overflows `0x10000 - timing` ticks after arming. The copy loop
/// starts `latency` ticks after arming and moves one 32-byte block every
/// `ticks_per_block` ticks. When the interrupt lands, the loop's source,
/// destination and end registers are run through the stack correction, then
/// the loop resumes with whatever values came back.
#[derive(Debug, Clone)]
pub struct SimulatedOracle<'a> {
    bus: MemoryBus<'a>,
    pub latency: u32,
    pub ticks_per_block: u32,
    last_corrections: Option<Corrections>,
}

impl<'a> SimulatedOracle<'a> {
    pub fn new(bus: MemoryBus<'a>) -> Self {
        Self {
            bus,
            latency: 280,
            ticks_per_block: 8,
            last_corrections: None,
        }
    }

    pub fn with_timing(mut self, latency: u32, ticks_per_block: u32) -> Self {
        self.latency = latency;
        self.ticks_per_block = ticks_per_block.max(1);
        self
    }

    /// Corrections made by the last interrupt, `None` if it missed the copy loop.
    pub fn last_corrections(&self) -> Option<Corrections> {
        self.last_corrections
    }

    /// Block index at which the interrupt lands, `None` if it fires before the loop starts.
    pub fn interrupt_block(&self, timing: u16) -> Option<u32> {
        let fire_at = 0x1_0000 - u32::from(timing);
        fire_at
            .checked_sub(self.latency)
            .map(|t| t / self.ticks_per_block.max(1))
    }

    fn read(&self, scratch: &Scratch<'_>, scratch_range: AddrRange, addr: u32) -> u8 {
        if scratch_range.contains(addr) {
            let offset = scratch_range.delta(addr) as usize;
            scratch.words()[offset / 4].to_le_bytes()[offset % 4]
        } else {
            self.bus.read(addr)
        }
    }
}

impl OracleShot for SimulatedOracle<'_> {
    fn fire(&mut self, timing: u16, scratch: &Scratch<'_>, dest: &mut ImageBuffer) {
        let scratch_range = AddrRange::new(SIM_SCRATCH_BASE, scratch.byte_len() as u32);
        let dest_range = AddrRange::new(SIM_DEST_BASE, BIOS_SIZE as u32);
        let redirect = Redirect {
            source: self.bus.range(),
            scratch: scratch_range,
            dest: dest_range,
        };

        let interrupt_at = self.interrupt_block(timing);
        self.last_corrections = None;

        // Loop registers: source cursor, destination cursor, destination end.
        let mut regs = [scratch_range.base, dest_range.base, dest_range.end()];
        let out = dest.as_mut_bytes();
        let mut block = 0u32;
        loop {
            if interrupt_at == Some(block) {
                self.last_corrections = Some(redirect.apply(&mut regs));
            }
            if regs[1] >= regs[2] {
                break;
            }
            for i in 0..FAST_COPY_BLOCK as u32 {
                let byte = self.read(scratch, scratch_range, regs[0].wrapping_add(i));
                let offset = dest_range.delta(regs[1].wrapping_add(i)) as usize;
                if let Some(slot) = out.get_mut(offset) {
                    *slot = byte;
                }
            }
            regs[0] = regs[0].wrapping_add(FAST_COPY_BLOCK as u32);
            regs[1] = regs[1].wrapping_add(FAST_COPY_BLOCK as u32);
            block += 1;
        }
    }
}

/// Save memory backed by a host buffer.
pub struct RamSave<'a> {
    bytes: &'a mut [u8],
    write_protected: bool,
}

impl<'a> RamSave<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self {
            bytes,
            write_protected: false,
        }
    }

    /// Ignore every write, like a missing or locked save chip.
    pub fn write_protected(bytes: &'a mut [u8]) -> Self {
        Self {
            bytes,
            write_protected: true,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }
}

impl SaveMemory for RamSave<'_> {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read_byte(&self, offset: usize) -> u8 {
        // Open bus on a missing chip reads as 0xFF.
        self.bytes.get(offset).copied().unwrap_or(0xFF)
    }

    fn write_byte(&mut self, offset: usize, value: u8) {
        if self.write_protected {
            return;
        }
        if let Some(slot) = self.bytes.get_mut(offset) {
            *slot = value;
        }
    }
}

/// A whole simulated console.
pub struct SimPlatform<'a> {
    pub bus: MemoryBus<'a>,
    pub oracle: SimulatedOracle<'a>,
    /// Value `firmware_checksum` reports; defaults to the word sum of the region.
    pub reported_checksum: u32,
}

impl<'a> SimPlatform<'a> {
    /// Map `bios` at address 0.
    pub fn new(bios: &'a [u8]) -> Self {
        let bus = MemoryBus::new(0, bios);
        Self {
            bus,
            oracle: SimulatedOracle::new(bus),
            reported_checksum: word_sum(bios),
        }
    }
}

impl BulkCopy for SimPlatform<'_> {
    fn bulk_copy(&mut self, src: u32, dst: &mut [u8], count: usize, granularity: Granularity) {
        self.bus.bulk_copy(src, dst, count, granularity);
    }
}

impl OracleShot for SimPlatform<'_> {
    fn fire(&mut self, timing: u16, scratch: &Scratch<'_>, dest: &mut ImageBuffer) {
        self.oracle.fire(timing, scratch, dest);
    }
}

impl Platform for SimPlatform<'_> {
    fn firmware_checksum(&mut self) -> u32 {
        self.reported_checksum
    }
}
