// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use biosdump_common::dump::{self, DumpPlan};
use biosdump_common::layout::{SAVE_TYPE_TAG, SRAM_SIZE};
use biosdump_common::oracle::SCRATCH_WORDS;
use biosdump_common::sim::{RamSave, SimPlatform};
use biosdump_common::{DumpReport, Fingerprint, ImageBuffer, Revision, Strategy, BIOS_SIZE};

/// Erased SRAM reads back as all ones.
const SRAM_FILL: u8 = 0xFF;

/// What `inspect` reports about a save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub file: PathBuf,
    pub file_len: usize,
    pub checksum: u32,
    pub crc32: u32,
    pub sha256: String,
    pub revision: Revision,
}

/// Read a save file and return its leading BIOS-sized image.
pub fn load_image(save: &Path) -> Result<Vec<u8>> {
    let mut data = fs::read(save).with_context(|| format!("Failed to read {}", save.display()))?;
    if data.len() < BIOS_SIZE {
        bail!(
            "{} holds {} bytes, a BIOS image needs {}",
            save.display(),
            data.len(),
            BIOS_SIZE
        );
    }
    if data.len() > BIOS_SIZE {
        log::debug!("ignoring {} trailing bytes", data.len() - BIOS_SIZE);
    }
    data.truncate(BIOS_SIZE);
    Ok(data)
}

fn fingerprint(image: &[u8]) -> (Fingerprint, String) {
    let fp = Fingerprint::compute(image, true);
    let hex = fp
        .digest
        .map(|d| d.to_hex().as_str().to_owned())
        .unwrap_or_default();
    (fp, hex)
}

/// Fingerprint and classify the image at the start of a save file.
pub fn inspect(save: &Path, json: bool) -> Result<Inspection> {
    let file_len = fs::metadata(save)
        .with_context(|| format!("Failed to stat {}", save.display()))?
        .len() as usize;
    let image = load_image(save)?;
    let (fp, sha256) = fingerprint(&image);

    let inspection = Inspection {
        file: save.to_path_buf(),
        file_len,
        checksum: fp.checksum,
        crc32: fp.crc32,
        sha256,
        revision: fp.revision(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        println!("File:     {} ({} bytes)", save.display(), file_len);
        println!("Checksum: {:08X}", inspection.checksum);
        println!("CRC32:    {:08x}", inspection.crc32);
        println!("SHA-256:  {}", inspection.sha256);
        println!("Revision: {}", inspection.revision);
    }

    Ok(inspection)
}

/// Write the BIOS image out of a save file.
///
/// Images matching no known revision are refused unless `force` is set.
pub fn extract(save: &Path, output: &Path, force: bool) -> Result<Revision> {
    let image = load_image(save)?;
    let (fp, sha256) = fingerprint(&image);
    let revision = fp.revision();

    if !revision.is_known() {
        if !force {
            bail!(
                "{} matches no known BIOS (checksum {:08X}, SHA-256 {}); use --force to write it anyway",
                save.display(),
                fp.checksum,
                sha256
            );
        }
        log::warn!("writing unrecognised image (SHA-256 {})", sha256);
    }

    fs::write(output, &image).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "BIOS: {} ({} bytes, {}, CRC32: 0x{:08x})",
        output.display(),
        image.len(),
        revision,
        fp.crc32
    );

    Ok(revision)
}

/// Options for [`simulate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulateOptions {
    pub strategy: Strategy,
    /// Overrides the simulated copy-loop latency.
    pub latency: Option<u32>,
    pub digest: bool,
    /// Where to write the simulated SRAM.
    pub save: Option<PathBuf>,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Direct,
            latency: None,
            digest: true,
            save: None,
        }
    }
}

/// Run the dump sequence against `bios` on a simulated console.
pub fn simulate(bios: &Path, opts: &SimulateOptions) -> Result<DumpReport> {
    let data = fs::read(bios).with_context(|| format!("Failed to read {}", bios.display()))?;
    if data.len() != BIOS_SIZE {
        bail!(
            "{} is {} bytes, expected a {}-byte BIOS image",
            bios.display(),
            data.len(),
            BIOS_SIZE
        );
    }

    let mut platform = SimPlatform::new(&data);
    if let Some(latency) = opts.latency {
        platform.oracle.latency = latency;
    }
    let mut sram = vec![SRAM_FILL; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());
    let mut scratch = Box::new([0u32; SCRATCH_WORDS]);

    let plan = DumpPlan {
        strategy: opts.strategy,
        digest: opts.digest,
    };
    let report = dump::run(
        &plan,
        &mut platform,
        &mut save,
        &mut image,
        Some(&mut *scratch),
        SAVE_TYPE_TAG,
    )
    .context("Simulated dump failed")?;

    println!("{}", report);

    if let Some(path) = &opts.save {
        fs::write(path, save.bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("SRAM: {} ({} bytes)", path.display(), save.bytes().len());
    }

    Ok(report)
}
