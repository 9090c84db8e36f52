// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! End-to-end runs of the dump sequence against the simulated console.

mod common;

use biosdump_common::checksum::{crc32, word_sum};
use biosdump_common::classify::{Revision, AGB_CHECKSUM, NTR_CHECKSUM};
use biosdump_common::copy::{BulkCopy, Granularity, OracleShot, Platform};
use biosdump_common::oracle::Scratch;
use biosdump_common::dump::{run, DumpError, DumpPlan, Strategy};
use biosdump_common::layout::{BIOS_SIZE, SAVE_TYPE_TAG, SRAM_SIZE};
use biosdump_common::oracle::{MAX_ATTEMPTS, SCRATCH_WORDS};
use biosdump_common::save::SaveError;
use biosdump_common::sha256::sha256;
use biosdump_common::sim::{RamSave, SimPlatform};
use biosdump_common::ImageBuffer;

fn plan(strategy: Strategy) -> DumpPlan {
    DumpPlan {
        strategy,
        digest: true,
    }
}

#[test]
fn test_direct_dump_end_to_end() {
    let bios = common::mock_bios();
    let mut platform = SimPlatform::new(&bios);
    let mut sram = vec![0u8; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());

    let report = run(
        &plan(Strategy::Direct),
        &mut platform,
        &mut save,
        &mut image,
        None,
        SAVE_TYPE_TAG,
    )
    .expect("dump succeeds");

    assert_eq!(report.bios_checksum, word_sum(&bios));
    assert!(report.checksum_matches());
    assert_eq!(report.image.crc32, crc32(&bios));
    assert_eq!(report.image.digest, Some(sha256(&bios)));
    assert_eq!(report.image_revision, Revision::Unknown);
    assert_eq!(report.oracle, None);
    assert!(report.save_tag_ok);
    assert_eq!(&save.bytes()[..BIOS_SIZE], &bios[..]);
}

#[test]
fn test_bytewise_dump_end_to_end() {
    let bios = common::mock_bios();
    let mut platform = SimPlatform::new(&bios);
    let mut sram = vec![0u8; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());

    let report = run(
        &plan(Strategy::Bytewise),
        &mut platform,
        &mut save,
        &mut image,
        None,
        SAVE_TYPE_TAG,
    )
    .expect("dump succeeds");

    assert!(report.checksum_matches());
    assert_eq!(&save.bytes()[..BIOS_SIZE], &bios[..]);
}

#[test]
fn test_oracle_dump_end_to_end() {
    let bios = common::mock_bios();
    let mut platform = SimPlatform::new(&bios);
    let mut sram = vec![0u8; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());
    let mut scratch = Box::new([0u32; SCRATCH_WORDS]);

    let report = run(
        &plan(Strategy::TimingOracle),
        &mut platform,
        &mut save,
        &mut image,
        Some(&mut *scratch),
        SAVE_TYPE_TAG,
    )
    .expect("dump succeeds");

    let oracle = report.oracle.expect("oracle outcome");
    assert!(oracle.verified);
    assert_eq!(oracle.attempts, 3);
    assert!(report.checksum_matches());
    assert_eq!(&save.bytes()[..BIOS_SIZE], &bios[..]);
}

#[test]
fn test_oracle_exhaustion_still_persists() {
    let bios = common::mock_bios();
    let mut platform = SimPlatform::new(&bios);
    platform.oracle.latency = 100_000;
    let mut sram = vec![0u8; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());
    let mut scratch = Box::new([0u32; SCRATCH_WORDS]);

    let report = run(
        &plan(Strategy::TimingOracle),
        &mut platform,
        &mut save,
        &mut image,
        Some(&mut *scratch),
        SAVE_TYPE_TAG,
    )
    .expect("exhaustion is not an error");

    let oracle = report.oracle.expect("oracle outcome");
    assert!(!oracle.verified);
    assert_eq!(oracle.attempts, MAX_ATTEMPTS);
    assert!(!report.checksum_matches());
    // Best effort: the last capture (scratch data) is written anyway.
    assert_ne!(&save.bytes()[..BIOS_SIZE], &bios[..]);
    assert_eq!(&save.bytes()[..4], &0x5C00_0000u32.to_le_bytes());
}

#[test]
fn test_oracle_without_scratch_is_rejected() {
    let bios = common::mock_bios();
    let mut platform = SimPlatform::new(&bios);
    let mut sram = vec![0u8; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());

    let err = run(
        &plan(Strategy::TimingOracle),
        &mut platform,
        &mut save,
        &mut image,
        None,
        SAVE_TYPE_TAG,
    )
    .unwrap_err();
    assert_eq!(err, DumpError::NoScratch);
}

#[test]
fn test_write_check_failure_is_fatal() {
    let bios = common::mock_bios();
    let mut platform = SimPlatform::new(&bios);
    let mut sram = vec![0xFFu8; SRAM_SIZE];
    let mut save = RamSave::write_protected(&mut sram);
    let mut image = Box::new(ImageBuffer::new());

    let err = run(
        &plan(Strategy::Direct),
        &mut platform,
        &mut save,
        &mut image,
        None,
        SAVE_TYPE_TAG,
    )
    .unwrap_err();
    assert_eq!(err, DumpError::Save(SaveError::WriteCheckFailed { read_back: 0xFF }));
}

#[test]
fn test_tag_mismatch_only_warns() {
    let bios = common::mock_bios();
    let mut platform = SimPlatform::new(&bios);
    let mut sram = vec![0u8; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());

    let report = run(
        &DumpPlan::default(),
        &mut platform,
        &mut save,
        &mut image,
        None,
        b"EEPROM_V124",
    )
    .expect("dump proceeds");
    assert!(!report.save_tag_ok);
    assert_eq!(&save.bytes()[..BIOS_SIZE], &bios[..]);
}

#[test]
fn test_reported_checksum_drives_cpu_label() {
    let bios = common::mock_bios();
    let mut platform = SimPlatform::new(&bios);
    platform.reported_checksum = AGB_CHECKSUM;
    let mut sram = vec![0u8; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());

    let report = run(
        &DumpPlan {
            strategy: Strategy::Direct,
            digest: false,
        },
        &mut platform,
        &mut save,
        &mut image,
        None,
        SAVE_TYPE_TAG,
    )
    .expect("dump succeeds");

    assert_eq!(report.cpu, Revision::Agb);
    assert_eq!(report.image.digest, None);
    assert!(!report.checksum_matches());

    let text = report.to_string();
    assert!(text.contains("BIOS Checksum: BAAE187F"));
    assert!(text.contains("CPU AGB"));
    assert!(text.contains("Incorrect checksum!"));
    assert!(!text.contains("SHA-256"));
}

/// Console whose black box always yields an image summing to the AGB checksum
/// while the firmware reports the NTR one, so verification never succeeds.
struct MismatchedConsole;

impl BulkCopy for MismatchedConsole {
    fn bulk_copy(&mut self, _src: u32, _dst: &mut [u8], _count: usize, _g: Granularity) {}
}

impl OracleShot for MismatchedConsole {
    fn fire(&mut self, _timing: u16, _scratch: &Scratch<'_>, dest: &mut ImageBuffer) {
        let head = AGB_CHECKSUM.to_le_bytes();
        dest.fill_with(|i| head.get(i).copied().unwrap_or(0));
    }
}

impl Platform for MismatchedConsole {
    fn firmware_checksum(&mut self) -> u32 {
        NTR_CHECKSUM
    }
}

#[test]
fn test_unverified_oracle_capture_is_not_classified() {
    let mut platform = MismatchedConsole;
    let mut sram = vec![0u8; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());
    let mut scratch = Box::new([0u32; SCRATCH_WORDS]);

    let report = run(
        &DumpPlan {
            strategy: Strategy::TimingOracle,
            digest: false,
        },
        &mut platform,
        &mut save,
        &mut image,
        Some(&mut *scratch),
        SAVE_TYPE_TAG,
    )
    .expect("exhaustion is not an error");

    assert_eq!(report.image.checksum, AGB_CHECKSUM);
    assert_eq!(report.cpu, Revision::Ntr);
    assert!(!report.oracle.expect("oracle outcome").verified);
    assert_eq!(report.image_revision, Revision::Unknown);
}

#[test]
fn test_direct_capture_is_classified_by_checksum() {
    let head = AGB_CHECKSUM.to_le_bytes();
    let mut bios = vec![0u8; BIOS_SIZE];
    bios[..4].copy_from_slice(&head);
    let mut platform = SimPlatform::new(&bios);
    let mut sram = vec![0u8; SRAM_SIZE];
    let mut save = RamSave::new(&mut sram);
    let mut image = Box::new(ImageBuffer::new());

    let report = run(
        &DumpPlan {
            strategy: Strategy::Direct,
            digest: false,
        },
        &mut platform,
        &mut save,
        &mut image,
        None,
        SAVE_TYPE_TAG,
    )
    .expect("dump succeeds");

    assert_eq!(report.image_revision, Revision::Agb);
}

#[test]
fn test_dump_error_is_std_error_with_source() {
    use std::error::Error;

    let err = DumpError::Save(SaveError::WriteCheckFailed { read_back: 0xFF });
    let source = err.source().expect("save error is the source");
    assert_eq!(source.to_string(), SaveError::WriteCheckFailed { read_back: 0xFF }.to_string());
    assert!(DumpError::NoScratch.source().is_none());

    let wrapped: Box<dyn Error + Send + Sync> = Box::new(DumpError::NoScratch);
    assert_eq!(wrapped.to_string(), "timing oracle needs a scratch buffer");
}

#[test]
fn test_dump_error_messages_name_the_cause() {
    let save_err = DumpError::Save(SaveError::WriteCheckFailed { read_back: 0xFF }).to_string();
    assert!(save_err.starts_with("Fatal SRAM error!"));
    assert!(save_err.contains("read back 0xff"));

    let scratch = DumpError::NoScratch.to_string();
    assert!(!scratch.contains("SRAM"));
    assert!(scratch.contains("scratch buffer"));
}
