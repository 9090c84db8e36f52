// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Whole-image checksums.

use crc::{Crc, CRC_32_ISO_HDLC};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Wrapping sum of the buffer read as little-endian 32-bit words.
///
/// This is the value the BIOS `BiosChecksum` call returns for its own image.
/// A trailing partial word is zero-padded.
pub fn word_sum(bytes: &[u8]) -> u32 {
    let mut words = bytes.chunks_exact(4);
    let mut sum = words.by_ref().fold(0u32, |acc, w| {
        acc.wrapping_add(u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
    });

    let tail = words.remainder();
    if !tail.is_empty() {
        let mut last = [0u8; 4];
        last[..tail.len()].copy_from_slice(tail);
        sum = sum.wrapping_add(u32::from_le_bytes(last));
    }
    sum
}

/// CRC-32 (ISO HDLC), the fingerprint dump catalogs list next to the hash.
pub fn crc32(bytes: &[u8]) -> u32 {
    CRC32.checksum(bytes)
}
