// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Timing-oracle ("black box") retry schedule.
//!
//! Each attempt arms the timer, fires the copy, then compares the word sum of
//! the result against the firmware's own checksum:
//!
//! - `Armed`: timer loaded with the current timing value
//! - `Fired`: the interrupt landed and the copy returned
//! - `Verified`: the checksum matched, the capture is trusted
//! - `Exhausted`: every attempt mismatched, the last capture is kept as-is

use serde::{Deserialize, Serialize};

use crate::layout::{AddrRange, BIOS_WORDS};

/// Timer reload value of the first attempt.
pub const INITIAL_TIMING: u16 = 0xFF00;
/// Amount the reload value drops after each mismatch.
pub const TIMING_STEP: u16 = 0x10;
/// Upper bound on attempts; the loop always stops here.
pub const MAX_ATTEMPTS: u8 = 8;

/// Words in the scratch source buffer.
pub const SCRATCH_WORDS: usize = BIOS_WORDS;
/// High bits of every scratch word, so leftover scratch data stands out in a dump.
pub const SCRATCH_TAG: u32 = 0x5C00_0000;

/// Scratch source the fast copy is started from.
pub struct Scratch<'a> {
    words: &'a mut [u32; SCRATCH_WORDS],
}

impl<'a> Scratch<'a> {
    /// Take over `words` and fill it with the recognisable pattern.
    pub fn new(words: &'a mut [u32; SCRATCH_WORDS]) -> Self {
        for (i, w) in words.iter_mut().enumerate() {
            *w = pattern_word(i);
        }
        Self { words }
    }

    pub fn words(&self) -> &[u32; SCRATCH_WORDS] {
        &*self.words
    }

    pub fn byte_len(&self) -> usize {
        self.words.len() * 4
    }

    pub fn as_ptr(&self) -> *const u32 {
        self.words.as_ptr()
    }

    /// Device address range of the buffer. Only meaningful on a 32-bit target.
    pub fn device_range(&self) -> AddrRange {
        AddrRange::new(self.as_ptr() as usize as u32, self.byte_len() as u32)
    }

    /// Number of words in `image` that still hold scratch pattern data.
    pub fn leftovers(&self, image: &[u8]) -> usize {
        image
            .chunks_exact(4)
            .enumerate()
            .filter(|(i, w)| u32::from_le_bytes([w[0], w[1], w[2], w[3]]) == pattern_word(*i))
            .count()
    }
}

/// Scratch word at index `i`.
pub const fn pattern_word(i: usize) -> u32 {
    SCRATCH_TAG | (i as u32 & 0x00FF_FFFF)
}

/// Retry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleState {
    Armed { attempt: u8, timing: u16 },
    Fired { attempt: u8, timing: u16 },
    Verified { attempt: u8, timing: u16 },
    Exhausted { attempts: u8, timing: u16 },
}

/// Inputs that drive the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleEvent {
    TimerExpired,
    ChecksumCompared { observed: u32, reference: u32 },
}

/// What to do after comparing one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retry { next_timing: u16 },
    Stop { verified: bool },
}

/// Pure retry decision for attempt number `attempt` (1-based).
pub fn next_attempt(attempt: u8, observed: u32, reference: u32, timing: u16) -> Decision {
    if observed == reference {
        Decision::Stop { verified: true }
    } else if attempt >= MAX_ATTEMPTS {
        Decision::Stop { verified: false }
    } else {
        Decision::Retry {
            next_timing: timing.wrapping_sub(TIMING_STEP),
        }
    }
}

impl OracleState {
    pub const fn start() -> Self {
        Self::Armed {
            attempt: 1,
            timing: INITIAL_TIMING,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Verified { .. } | Self::Exhausted { .. })
    }

    /// Apply one event. Events that do not fit the current state leave it unchanged.
    pub fn on_event(self, event: OracleEvent) -> Self {
        match (self, event) {
            (Self::Armed { attempt, timing }, OracleEvent::TimerExpired) => {
                Self::Fired { attempt, timing }
            }
            (
                Self::Fired { attempt, timing },
                OracleEvent::ChecksumCompared {
                    observed,
                    reference,
                },
            ) => match next_attempt(attempt, observed, reference, timing) {
                Decision::Stop { verified: true } => Self::Verified { attempt, timing },
                Decision::Stop { verified: false } => Self::Exhausted {
                    attempts: attempt,
                    timing,
                },
                Decision::Retry { next_timing } => Self::Armed {
                    attempt: attempt + 1,
                    timing: next_timing,
                },
            },
            (state, _) => state,
        }
    }
}

/// Result of a timing-oracle extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleOutcome {
    pub attempts: u8,
    /// Timing value of the last attempt.
    pub timing: u16,
    /// Word sum of the last capture.
    pub checksum: u32,
    pub verified: bool,
}
