// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! The console as seen by the dump sequence.

use biosdump_common::copy::{BulkCopy, Granularity, OracleShot, Platform};
use biosdump_common::layout::FAST_COPY_BLOCK;
use biosdump_common::oracle::Scratch;
use biosdump_common::ImageBuffer;

use crate::bios;
use crate::blackbox::BlackBox;

/// One core block, word aligned for the core's `stmia`.
#[repr(C, align(4))]
struct Bounce([u8; FAST_COPY_BLOCK]);

const BLOCK_MASK: u32 = !(FAST_COPY_BLOCK as u32 - 1);

pub struct GbaPlatform {
    blackbox: BlackBox,
}

impl GbaPlatform {
    pub fn new(blackbox: BlackBox) -> Self {
        Self { blackbox }
    }

    /// Copy arbitrary bytes by running the core over each containing block.
    fn copy_via_bounce(&mut self, src: u32, dst: &mut [u8]) {
        let mut bounce = Bounce([0; FAST_COPY_BLOCK]);
        let mut cached: Option<u32> = None;

        for (i, out) in dst.iter_mut().enumerate() {
            let addr = src.wrapping_add(i as u32);
            let block = addr & BLOCK_MASK;
            if cached != Some(block) {
                let ptr = bounce.0.as_mut_ptr();
                // SAFETY: the bounce buffer is one aligned 32-byte block.
                unsafe { bios::fast_copy_core(block, ptr, ptr.add(FAST_COPY_BLOCK)) };
                cached = Some(block);
            }
            *out = bounce.0[(addr - block) as usize];
        }
    }
}

impl BulkCopy for GbaPlatform {
    fn bulk_copy(&mut self, src: u32, dst: &mut [u8], count: usize, granularity: Granularity) {
        let len = (count * granularity.unit()).min(dst.len());
        let dst = &mut dst[..len];

        let aligned = dst.as_ptr() as usize % 4 == 0 && src % 4 == 0;
        let whole = if granularity == Granularity::Word && aligned {
            len & BLOCK_MASK as usize
        } else {
            0
        };

        if whole > 0 {
            let ptr = dst.as_mut_ptr();
            // SAFETY: `whole` is a non-zero 32-byte multiple inside `dst`, which is aligned.
            unsafe { bios::fast_copy_core(src, ptr, ptr.add(whole)) };
        }
        if whole < len {
            self.copy_via_bounce(src.wrapping_add(whole as u32), &mut dst[whole..]);
        }
    }
}

impl OracleShot for GbaPlatform {
    fn fire(&mut self, timing: u16, scratch: &Scratch<'_>, dest: &mut ImageBuffer) {
        self.blackbox.fire(timing, scratch, dest);
    }
}

impl Platform for GbaPlatform {
    fn firmware_checksum(&mut self) -> u32 {
        bios::bios_checksum()
    }
}
