// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Platform seams for the privileged copy primitives.
//!
//! Every addressing constant and calling trick lives behind these traits, so
//! the extraction logic runs unchanged against synthetic memory on the host.

use crate::image::ImageBuffer;
use crate::oracle::Scratch;

/// Transfer unit of a bulk copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Byte,
    Word,
}

impl Granularity {
    pub const fn unit(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Word => 4,
        }
    }
}

/// A copy primitive that can read the protected region.
pub trait BulkCopy {
    /// Copy `count` units starting at device address `src` into the front of `dst`.
    ///
    /// `dst` holds at least `count * granularity.unit()` bytes. Nothing is
    /// reported: a primitive that cannot reach `src` produces wrong bytes,
    /// which only the checksum comparison downstream detects.
    fn bulk_copy(&mut self, src: u32, dst: &mut [u8], count: usize, granularity: Granularity);
}

/// One armed attempt of the timing-oracle copy.
pub trait OracleShot {
    /// Arm the countdown timer with reload value `timing`, then run the
    /// regular fast copy from `scratch` into `dest`. The timer interrupt is
    /// expected to land inside that copy and redirect it to the protected region.
    fn fire(&mut self, timing: u16, scratch: &Scratch<'_>, dest: &mut ImageBuffer);
}

/// Everything the dump sequence needs from the hardware.
pub trait Platform: BulkCopy + OracleShot {
    /// The firmware's own checksum of the protected region (`BiosChecksum`).
    fn firmware_checksum(&mut self) -> u32;
}
