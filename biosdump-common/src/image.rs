// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Destination buffer for the BIOS image.
//!
//! The buffer is write-only until an extraction routine hands back a
//! [`Captured`] view, which is the only way to read the bytes.

use core::ops::Deref;

use crate::layout::{AddrRange, BIOS_SIZE, BIOS_WORDS};

/// Word-aligned buffer sized to exactly one BIOS image.
///
/// Outside this crate the buffer can be written but not read:
///
/// ```compile_fail
/// let mut image = biosdump_common::ImageBuffer::new();
/// let first = image.as_mut_bytes()[0];
/// ```
#[repr(C, align(4))]
pub struct ImageBuffer {
    bytes: [u8; BIOS_SIZE],
}

impl ImageBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; BIOS_SIZE],
        }
    }

    pub const fn len(&self) -> usize {
        BIOS_SIZE
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Device address range of this buffer. Only meaningful on a 32-bit target.
    pub fn device_range(&self) -> AddrRange {
        AddrRange::new(self.bytes.as_ptr() as usize as u32, BIOS_SIZE as u32)
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; BIOS_SIZE] {
        &mut self.bytes
    }

    /// Overwrite every byte with `f(offset)`.
    pub fn fill_with<F: FnMut(usize) -> u8>(&mut self, mut f: F) {
        for (i, out) in self.bytes.iter_mut().enumerate() {
            *out = f(i);
        }
    }

    /// Copy `data` in at `offset`, clipped to the buffer. Returns the bytes written.
    pub fn write_at(&mut self, offset: usize, data: &[u8]) -> usize {
        let Some(room) = self.bytes.get_mut(offset..) else {
            return 0;
        };
        let n = room.len().min(data.len());
        room[..n].copy_from_slice(&data[..n]);
        n
    }

    /// Raw destination pointer for copy primitives that take an address.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }

    /// Marks the buffer as filled by a full-length copy.
    pub(crate) fn captured(&self) -> Captured<'_> {
        Captured { bytes: &self.bytes }
    }
}

impl Default for ImageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a buffer that an extraction routine has filled.
#[derive(Clone, Copy)]
pub struct Captured<'a> {
    bytes: &'a [u8; BIOS_SIZE],
}

impl<'a> Captured<'a> {
    pub fn as_bytes(&self) -> &'a [u8; BIOS_SIZE] {
        self.bytes
    }

    /// Little-endian 32-bit words of the image.
    pub fn words(&self) -> impl Iterator<Item = u32> + 'a {
        self.bytes
            .chunks_exact(4)
            .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
    }

    pub fn word_count(&self) -> usize {
        BIOS_WORDS
    }
}

impl Deref for Captured<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}
