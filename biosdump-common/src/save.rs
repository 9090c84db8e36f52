// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Persisting the captured image to battery-backed save memory.
//!
//! The dump format is positional: the image bytes start at offset 0, with no
//! header and nothing appended.

use core::fmt;

use crate::image::Captured;
use crate::layout::{SAVE_TYPE_TAG, SRAM_CHECK_BYTE};

/// Byte-addressable non-volatile memory.
pub trait SaveMemory {
    fn capacity(&self) -> usize;
    fn read_byte(&self, offset: usize) -> u8;
    fn write_byte(&mut self, offset: usize, value: u8);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveError {
    /// The check byte did not read back; the chip is absent or write-protected.
    WriteCheckFailed { read_back: u8 },
    /// The medium cannot hold a full image.
    TooSmall { capacity: usize, needed: usize },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteCheckFailed { read_back } => write!(
                f,
                "SRAM write check failed: wrote {:#04x}, read back {:#04x}",
                SRAM_CHECK_BYTE, read_back
            ),
            Self::TooSmall { capacity, needed } => {
                write!(f, "save memory holds {} bytes, need {}", capacity, needed)
            }
        }
    }
}

impl core::error::Error for SaveError {}

/// Confirm the save memory accepts writes.
pub fn check_writable<M: SaveMemory>(mem: &mut M) -> Result<(), SaveError> {
    mem.write_byte(0, SRAM_CHECK_BYTE);
    let read_back = mem.read_byte(0);
    if read_back == SRAM_CHECK_BYTE {
        Ok(())
    } else {
        Err(SaveError::WriteCheckFailed { read_back })
    }
}

/// Write the image to the start of save memory, one byte store at a time.
pub fn persist<M: SaveMemory>(mem: &mut M, image: &Captured<'_>) -> Result<(), SaveError> {
    let needed = image.len();
    if mem.capacity() < needed {
        return Err(SaveError::TooSmall {
            capacity: mem.capacity(),
            needed,
        });
    }

    for (offset, &byte) in image.iter().enumerate() {
        mem.write_byte(offset, byte);
    }
    log::debug!("persisted {} bytes to save memory", needed);
    Ok(())
}

/// Whether an embedded save-type tag reads `SRAM_V123`. Anything after the
/// first NUL is padding and ignored.
pub fn check_save_tag(tag: &[u8]) -> bool {
    let end = tag.iter().position(|&b| b == 0).unwrap_or(tag.len());
    &tag[..end] == SAVE_TYPE_TAG
}
