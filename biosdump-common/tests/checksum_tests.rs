// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the word-sum and CRC fingerprints.

mod common;

use biosdump_common::checksum::{crc32, word_sum};

#[test]
fn test_word_sum_empty_is_zero() {
    assert_eq!(word_sum(&[]), 0);
}

#[test]
fn test_word_sum_little_endian_words() {
    let bytes = [0x78, 0x56, 0x34, 0x12, 0x01, 0x00, 0x00, 0x00];
    assert_eq!(word_sum(&bytes), 0x1234_5679);
}

#[test]
fn test_word_sum_wraps() {
    let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x02, 0x00, 0x00, 0x00];
    assert_eq!(word_sum(&bytes), 1);
}

#[test]
fn test_word_sum_trailing_bytes_zero_padded() {
    let bytes = [0x01, 0x00, 0x00, 0x00, 0xAA, 0xBB];
    assert_eq!(word_sum(&bytes), 0x0000_BBAB);
}

#[test]
fn test_word_sum_deterministic() {
    let bios = common::mock_bios();
    assert_eq!(word_sum(&bios), word_sum(&bios));
}

#[test]
fn test_word_sum_matches_independent_sum() {
    let bios = common::mock_bios();
    assert_eq!(word_sum(&bios), common::reference_word_sum(&bios));
}

#[test]
fn test_word_sum_sensitive_to_byte_lane_order() {
    let bytes = [0x01, 0x02, 0x03, 0x04];
    let swapped = [0x04, 0x03, 0x02, 0x01];
    assert_ne!(word_sum(&bytes), word_sum(&swapped));

    let mut bios = common::mock_bios();
    let before = word_sum(&bios);
    // Move a byte across a word boundary.
    let (a, b) = (bios[3], bios[4]);
    assert_ne!(a, b);
    bios[3] = b;
    bios[4] = a;
    assert_ne!(word_sum(&bios), before);
}

#[test]
fn test_word_sum_whole_word_reorder_is_invariant() {
    // Addition commutes, so reordering entire words keeps the BIOS-compatible sum.
    let bytes = [1, 0, 0, 0, 2, 0, 0, 0];
    let reordered = [2, 0, 0, 0, 1, 0, 0, 0];
    assert_eq!(word_sum(&bytes), word_sum(&reordered));
}

#[test]
fn test_crc32_check_value() {
    assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
}
