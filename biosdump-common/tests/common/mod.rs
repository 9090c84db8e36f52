// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use biosdump_common::BIOS_SIZE;

/// Deterministic stand-in for a 16 KiB BIOS image.
pub fn mock_bios() -> Vec<u8> {
    (0..BIOS_SIZE as u32)
        .map(|i| (i.wrapping_mul(0x9E37_79B1) >> 24) as u8 ^ (i as u8))
        .collect()
}

/// Sum of the image's little-endian words, computed independently of the crate.
pub fn reference_word_sum(bytes: &[u8]) -> u32 {
    let mut sum = 0u32;
    let mut i = 0;
    while i + 4 <= bytes.len() {
        let word = u32::from(bytes[i])
            | u32::from(bytes[i + 1]) << 8
            | u32::from(bytes[i + 2]) << 16
            | u32::from(bytes[i + 3]) << 24;
        sum = sum.wrapping_add(word);
        i += 4;
    }
    sum
}
