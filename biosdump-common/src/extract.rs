// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! BIOS extraction routines.
//!
//! All state that the dumper used to keep in globals (destination buffer,
//! timing value, scratch buffer) is passed in explicitly, so the same code
//! runs on hardware and against synthetic memory in tests.

use crate::checksum::word_sum;
use crate::copy::{BulkCopy, Granularity, OracleShot};
use crate::image::{Captured, ImageBuffer};
use crate::layout::{AddrRange, BIOS_RANGE, BIOS_WORDS};
use crate::oracle::{OracleEvent, OracleOutcome, OracleState, Scratch};

/// Extraction context: the destination buffer and the region it is filled from.
pub struct Extractor<'a> {
    image: &'a mut ImageBuffer,
    source: AddrRange,
}

impl<'a> Extractor<'a> {
    /// Extract from the BIOS region.
    pub fn new(image: &'a mut ImageBuffer) -> Self {
        Self::with_source(image, BIOS_RANGE)
    }

    pub fn with_source(image: &'a mut ImageBuffer, source: AddrRange) -> Self {
        Self { image, source }
    }

    pub fn source(&self) -> AddrRange {
        self.source
    }

    /// Copy the whole region in one word-granular call.
    pub fn direct<C: BulkCopy>(&mut self, copier: &mut C) -> Captured<'_> {
        copier.bulk_copy(
            self.source.base,
            self.image.as_mut_bytes(),
            BIOS_WORDS,
            Granularity::Word,
        );
        self.image.captured()
    }

    /// Copy the region one byte per call. Slow, but avoids relying on the
    /// primitive's block addressing near the region edges.
    pub fn bytewise<C: BulkCopy>(&mut self, copier: &mut C) -> Captured<'_> {
        let base = self.source.base;
        for (i, byte) in self.image.as_mut_bytes().iter_mut().enumerate() {
            copier.bulk_copy(
                base.wrapping_add(i as u32),
                core::slice::from_mut(byte),
                1,
                Granularity::Byte,
            );
        }
        self.image.captured()
    }

    /// Run the timing-oracle retry loop until the capture's word sum matches
    /// `reference` or the attempt budget is spent.
    ///
    /// An exhausted loop still returns the last capture, flagged unverified.
    pub fn timing_oracle<S: OracleShot>(
        &mut self,
        shot: &mut S,
        scratch: &Scratch<'_>,
        reference: u32,
    ) -> (OracleOutcome, Captured<'_>) {
        let mut state = OracleState::start();
        let mut checksum = 0;

        let outcome = loop {
            match state {
                OracleState::Armed { attempt, timing } => {
                    log::debug!("black box attempt {}, timing {:#06x}", attempt, timing);
                    shot.fire(timing, scratch, self.image);
                    state = state.on_event(OracleEvent::TimerExpired);
                }
                OracleState::Fired { timing, .. } => {
                    let captured = self.image.captured();
                    checksum = word_sum(&captured);
                    log::debug!("calculated checksum: {:08X}", checksum);
                    state = state.on_event(OracleEvent::ChecksumCompared {
                        observed: checksum,
                        reference,
                    });
                    if matches!(state, OracleState::Armed { .. }) {
                        log::warn!(
                            "incorrect checksum at timing {:#06x} ({} scratch words left), retrying",
                            timing,
                            scratch.leftovers(&captured)
                        );
                    }
                }
                OracleState::Verified { attempt, timing } => {
                    break OracleOutcome {
                        attempts: attempt,
                        timing,
                        checksum,
                        verified: true,
                    };
                }
                OracleState::Exhausted { attempts, timing } => {
                    log::warn!(
                        "black box gave up after {} attempts, keeping last capture",
                        attempts
                    );
                    break OracleOutcome {
                        attempts,
                        timing,
                        checksum,
                        verified: false,
                    };
                }
            }
        };

        (outcome, self.image.captured())
    }
}
