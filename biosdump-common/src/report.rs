// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Human-readable and serializable dump summary.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::checksum::{crc32, word_sum};
use crate::classify::Revision;
use crate::oracle::OracleOutcome;
use crate::sha256::{sha256, Digest};

/// Fingerprints of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub checksum: u32,
    pub crc32: u32,
    pub digest: Option<Digest>,
}

impl Fingerprint {
    pub fn compute(image: &[u8], with_digest: bool) -> Self {
        Self {
            checksum: word_sum(image),
            crc32: crc32(image),
            digest: with_digest.then(|| sha256(image)),
        }
    }

    /// Revision by digest when one was computed, otherwise by word sum.
    pub fn revision(&self) -> Revision {
        match &self.digest {
            Some(d) => Revision::from_digest(d),
            None => Revision::from_checksum(self.checksum),
        }
    }
}

/// Summary of one dump run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpReport {
    /// Checksum the firmware reported for itself.
    pub bios_checksum: u32,
    /// Revision inferred from `bios_checksum`.
    pub cpu: Revision,
    /// Fingerprints of the captured image.
    pub image: Fingerprint,
    /// Revision inferred from the captured image.
    pub image_revision: Revision,
    pub oracle: Option<OracleOutcome>,
    pub save_tag_ok: bool,
}

impl DumpReport {
    /// The capture agrees with the firmware's own checksum.
    pub fn checksum_matches(&self) -> bool {
        self.image.checksum == self.bios_checksum
    }
}

impl fmt::Display for DumpReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BIOS Checksum: {:08X}", self.bios_checksum)?;
        writeln!(f, "CPU {}", self.cpu)?;
        if let Some(oracle) = &self.oracle {
            writeln!(
                f,
                "Black box: {} attempt(s), timing {:#06X}, {}",
                oracle.attempts,
                oracle.timing,
                if oracle.verified { "verified" } else { "unverified" }
            )?;
        }
        writeln!(f, "Calculated Checksum: {:08X}", self.image.checksum)?;
        if !self.checksum_matches() {
            writeln!(f, "Incorrect checksum!")?;
        }
        writeln!(f, "CRC32: {:08x}", self.image.crc32)?;
        if let Some(digest) = &self.image.digest {
            writeln!(f, "SHA-256: {}", digest)?;
        }
        write!(f, "Image: {}", self.image_revision)
    }
}
