// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Battery-backed cartridge SRAM. The bus is 8 bits wide, so every access is a
//! single volatile byte load or store.

use biosdump_common::layout::{SRAM_BASE, SRAM_SIZE};
use biosdump_common::save::SaveMemory;

pub struct Sram;

impl Sram {
    fn addr(offset: usize) -> Option<*mut u8> {
        (offset < SRAM_SIZE).then(|| (SRAM_BASE as usize + offset) as *mut u8)
    }
}

impl SaveMemory for Sram {
    fn capacity(&self) -> usize {
        SRAM_SIZE
    }

    fn read_byte(&self, offset: usize) -> u8 {
        match Self::addr(offset) {
            // SAFETY: inside the cartridge SRAM window.
            Some(p) => unsafe { p.read_volatile() },
            None => 0xFF,
        }
    }

    fn write_byte(&mut self, offset: usize, value: u8) {
        if let Some(p) = Self::addr(offset) {
            // SAFETY: inside the cartridge SRAM window.
            unsafe { p.write_volatile(value) }
        }
    }
}
