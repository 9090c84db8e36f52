// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Stack-slot correction applied from the timer interrupt.
//!
//! When the timer fires inside `CpuFastSet`, the copy loop's live source and
//! destination cursors sit in the registers the BIOS IRQ entry stacked. Any
//! slot that points into the scratch buffer is moved to the start of the
//! protected region, and any slot inside the destination is rewound to its
//! base, so the resumed loop copies the BIOS from the top into the real buffer.

use crate::layout::AddrRange;

/// Platform-quirk constants. These were found empirically on AGB hardware and
/// carry no portable meaning; re-derive them for any other target.
pub mod quirk {
    /// First word of the scanned IWRAM stack window.
    pub const STACK_WINDOW_START: u32 = 0x0300_7F00;
    /// One past the last word of the scanned window.
    pub const STACK_WINDOW_END: u32 = 0x0300_7FE0;
    /// Number of 32-bit slots in the window.
    pub const STACK_WINDOW_SLOTS: usize = ((STACK_WINDOW_END - STACK_WINDOW_START) / 4) as usize;
}

/// Address ranges the correction needs to know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    /// Protected region the copy should read from.
    pub source: AddrRange,
    /// Scratch buffer the copy was started from.
    pub scratch: AddrRange,
    /// Real destination buffer.
    pub dest: AddrRange,
}

/// Which rule rewrote a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Dest,
    DestEnd,
    Scratch,
    ScratchEnd,
}

/// Per-rule tally from one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Corrections {
    pub dest: u32,
    pub dest_end: u32,
    pub scratch: u32,
    pub scratch_end: u32,
}

impl Corrections {
    pub fn total(&self) -> u32 {
        self.dest + self.dest_end + self.scratch + self.scratch_end
    }

    fn record(&mut self, kind: SlotKind) {
        match kind {
            SlotKind::Dest => self.dest += 1,
            SlotKind::DestEnd => self.dest_end += 1,
            SlotKind::Scratch => self.scratch += 1,
            SlotKind::ScratchEnd => self.scratch_end += 1,
        }
    }
}

impl Redirect {
    /// Corrected value for one stack slot, or `None` if the slot is left alone.
    ///
    /// Rules are tested in order against the original value and the last match
    /// wins. A pointer sitting exactly at a range base is not touched.
    pub fn correct(&self, value: u32) -> Option<(u32, SlotKind)> {
        let d = self.dest.delta(value);
        let s = self.scratch.delta(value);
        let mut out = None;

        if d > 0 && d < self.dest.len {
            out = Some((self.dest.base, SlotKind::Dest));
        }
        if d == self.dest.len {
            out = Some((self.dest.end(), SlotKind::DestEnd));
        }
        if s > 0 && s < self.scratch.len {
            out = Some((self.source.base, SlotKind::Scratch));
        }
        if s == self.scratch.len {
            out = Some((self.source.end(), SlotKind::ScratchEnd));
        }
        out
    }

    /// Rewrite every matching slot in `slots`.
    pub fn apply(&self, slots: &mut [u32]) -> Corrections {
        let mut tally = Corrections::default();
        for slot in slots.iter_mut() {
            if let Some((value, kind)) = self.correct(*slot) {
                log::trace!("stack slot {:#010x} -> {:#010x} ({:?})", *slot, value, kind);
                *slot = value;
                tally.record(kind);
            }
        }
        tally
    }
}
