// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Top-level dump sequence: save check, extract, fingerprint, classify, persist.

use core::fmt;

use crate::classify::Revision;
use crate::copy::Platform;
use crate::extract::Extractor;
use crate::image::ImageBuffer;
use crate::oracle::{Scratch, SCRATCH_WORDS};
use crate::report::{DumpReport, Fingerprint};
use crate::save::{self, SaveError, SaveMemory};

/// Extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One word-granular call into the fast-copy core.
    Direct,
    /// One call per byte through the fast-copy core.
    Bytewise,
    /// Timer-interrupt redirection of a regular fast copy, with retries.
    TimingOracle,
}

/// What a dump run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpPlan {
    pub strategy: Strategy,
    /// Also compute the SHA-256 digest.
    pub digest: bool,
}

impl Default for DumpPlan {
    fn default() -> Self {
        Self {
            strategy: Strategy::Direct,
            digest: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpError {
    Save(SaveError),
    /// The timing-oracle strategy was requested without a scratch buffer.
    NoScratch,
}

impl From<SaveError> for DumpError {
    fn from(e: SaveError) -> Self {
        Self::Save(e)
    }
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Save(e) => write!(f, "Fatal SRAM error! {}", e),
            Self::NoScratch => f.write_str("timing oracle needs a scratch buffer"),
        }
    }
}

impl core::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Save(e) => Some(e),
            Self::NoScratch => None,
        }
    }
}

/// Run one dump.
///
/// A save-tag mismatch only logs a warning. A failed save write check is fatal and
/// stops before anything is extracted.
pub fn run<P, M>(
    plan: &DumpPlan,
    platform: &mut P,
    save_mem: &mut M,
    image: &mut ImageBuffer,
    scratch: Option<&mut [u32; SCRATCH_WORDS]>,
    save_tag: &[u8],
) -> Result<DumpReport, DumpError>
where
    P: Platform,
    M: SaveMemory,
{
    let save_tag_ok = save::check_save_tag(save_tag);
    if !save_tag_ok {
        log::warn!("Cartridge error, continuing anyway");
    }

    save::check_writable(save_mem)?;

    let bios_checksum = platform.firmware_checksum();
    let cpu = Revision::from_checksum(bios_checksum);
    log::info!("BIOS Checksum: {:08X}", bios_checksum);
    log::info!("CPU {}", cpu);

    let mut extractor = Extractor::new(image);
    let (oracle, captured) = match plan.strategy {
        Strategy::Direct => (None, extractor.direct(platform)),
        Strategy::Bytewise => (None, extractor.bytewise(platform)),
        Strategy::TimingOracle => {
            let words = scratch.ok_or(DumpError::NoScratch)?;
            let scratch = Scratch::new(words);
            let (outcome, captured) = extractor.timing_oracle(platform, &scratch, bios_checksum);
            (Some(outcome), captured)
        }
    };

    let fingerprint = Fingerprint::compute(&captured, plan.digest);
    // An unverified oracle capture is never classified.
    let image_revision = match &oracle {
        Some(outcome) if !outcome.verified => Revision::Unknown,
        _ => fingerprint.revision(),
    };
    if let Some(digest) = &fingerprint.digest {
        log::info!("SHA-256: {}", digest);
    }

    save::persist(save_mem, &captured)?;

    Ok(DumpReport {
        bios_checksum,
        cpu,
        image: fingerprint,
        image_revision,
        oracle,
        save_tag_ok,
    })
}
