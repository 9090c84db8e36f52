// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the interrupt-time stack-slot correction.

use biosdump_common::layout::{AddrRange, BIOS_RANGE, BIOS_SIZE};
use biosdump_common::stack::{quirk, Redirect, SlotKind};

const N: u32 = BIOS_SIZE as u32;
const DEST: u32 = 0x0300_0200;
const SCRATCH: u32 = 0x0200_0000;

fn redirect() -> Redirect {
    Redirect {
        source: BIOS_RANGE,
        scratch: AddrRange::new(SCRATCH, N),
        dest: AddrRange::new(DEST, N),
    }
}

#[test]
fn test_dest_interior_rewinds_to_base() {
    let r = redirect();
    for k in [1, 4, 0x20, N / 2, N - 1] {
        assert_eq!(r.correct(DEST + k), Some((DEST, SlotKind::Dest)), "k = {:#x}", k);
    }
}

#[test]
fn test_dest_end_sentinel_keeps_real_length() {
    let r = redirect();
    assert_eq!(r.correct(DEST + N), Some((DEST + N, SlotKind::DestEnd)));
}

#[test]
fn test_dest_end_uses_real_length_when_ranges_differ() {
    let mut r = redirect();
    r.dest = AddrRange::new(DEST, 0x100);
    assert_eq!(r.correct(DEST + 0x100), Some((DEST + 0x100, SlotKind::DestEnd)));
    assert_eq!(r.correct(DEST + 0x80), Some((DEST, SlotKind::Dest)));
    assert_eq!(r.correct(DEST + 0x101), None);
}

#[test]
fn test_scratch_interior_points_at_source() {
    let r = redirect();
    assert_eq!(r.correct(SCRATCH + 0x40), Some((0, SlotKind::Scratch)));
    assert_eq!(r.correct(SCRATCH + N - 4), Some((0, SlotKind::Scratch)));
}

#[test]
fn test_scratch_end_points_at_source_end() {
    let r = redirect();
    assert_eq!(r.correct(SCRATCH + N), Some((N, SlotKind::ScratchEnd)));
}

#[test]
fn test_bases_and_unrelated_values_untouched() {
    let r = redirect();
    assert_eq!(r.correct(DEST), None);
    assert_eq!(r.correct(SCRATCH), None);
    assert_eq!(r.correct(DEST - 1), None);
    assert_eq!(r.correct(SCRATCH + N + 4), None);
    assert_eq!(r.correct(0x0800_0000), None);
    assert_eq!(r.correct(0), None);
}

#[test]
fn test_apply_rewrites_synthetic_stack() {
    let r = redirect();
    let mut stack = [
        0xDEAD_BEEF,
        SCRATCH + 0x80,
        DEST + 0x80,
        DEST + N,
        0x0300_7F40,
        SCRATCH + N,
        DEST,
    ];
    let tally = r.apply(&mut stack);

    assert_eq!(
        stack,
        [0xDEAD_BEEF, 0, DEST, DEST + N, 0x0300_7F40, N, DEST]
    );
    assert_eq!(tally.dest, 1);
    assert_eq!(tally.dest_end, 1);
    assert_eq!(tally.scratch, 1);
    assert_eq!(tally.scratch_end, 1);
    assert_eq!(tally.total(), 4);
}

#[test]
fn test_later_rule_wins_on_overlap() {
    // Scratch placed right after dest: dest's end sentinel is scratch's base,
    // and dest + N + 4 is a scratch interior pointer.
    let r = Redirect {
        source: BIOS_RANGE,
        scratch: AddrRange::new(DEST + N - 0x10, N),
        dest: AddrRange::new(DEST, N),
    };
    assert_eq!(r.correct(DEST + N - 8), Some((0, SlotKind::Scratch)));
}

#[test]
fn test_stack_window_size() {
    assert_eq!(quirk::STACK_WINDOW_SLOTS, 56);
}
