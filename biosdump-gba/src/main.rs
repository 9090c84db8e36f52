// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

#![no_std]
#![no_main]

extern crate alloc;

mod bios;
mod blackbox;
mod platform;
mod sram;

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec;
use core::cell::UnsafeCell;

use biosdump_common::dump::{self, DumpPlan, Strategy};
use biosdump_common::oracle::SCRATCH_WORDS;
use biosdump_common::ImageBuffer;

use blackbox::BlackBox;
use platform::GbaPlatform;
use sram::Sram;

/// Save-type marker for save managers and emulators. NUL padded to a word.
#[used]
#[no_mangle]
pub static SAVE_TYPE: [u8; 12] = *b"SRAM_V123\0\0\0";

const PLAN: DumpPlan = DumpPlan {
    strategy: if cfg!(feature = "blackbox") {
        Strategy::TimingOracle
    } else if cfg!(feature = "bytewise") {
        Strategy::Bytewise
    } else {
        Strategy::Direct
    },
    digest: cfg!(feature = "digest"),
};

/// Wrapper to hold the image buffer in IWRAM without `static mut`.
///
/// SAFETY: Only `main` takes a reference, once.
struct SyncImage(UnsafeCell<ImageBuffer>);
unsafe impl Sync for SyncImage {}

static IMAGE: SyncImage = SyncImage(UnsafeCell::new(ImageBuffer::new()));

/// Scratch source for the black box, on the EWRAM heap.
fn alloc_scratch() -> Option<Box<[u32; SCRATCH_WORDS]>> {
    match vec![0u32; SCRATCH_WORDS].into_boxed_slice().try_into() {
        Ok(words) => Some(words),
        Err(_) => {
            log::error!("Could not allocate the scratch buffer");
            None
        }
    }
}

#[agb::entry]
fn main(_gba: agb::Gba) -> ! {
    // Only mGBA exposes the debug console; on hardware the log goes nowhere.
    let _ = mgba_log::init();
    log::info!("BIOS dumper ({:?})", PLAN.strategy);

    let mut platform = GbaPlatform::new(BlackBox::install());
    let mut save = Sram;
    // SAFETY: the only reference to IMAGE ever taken.
    let image = unsafe { &mut *IMAGE.0.get() };
    let mut scratch = match PLAN.strategy {
        Strategy::TimingOracle => alloc_scratch(),
        _ => None,
    };

    let tag = core::hint::black_box(&SAVE_TYPE);
    match dump::run(
        &PLAN,
        &mut platform,
        &mut save,
        image,
        scratch.as_deref_mut(),
        tag,
    ) {
        Ok(report) => {
            for line in report.to_string().lines() {
                log::info!("{}", line);
            }
            log::info!("Done dumping!");
        }
        Err(e) => log::error!("{}", e),
    }

    loop {
        bios::halt();
    }
}
