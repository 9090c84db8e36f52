// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Core of the GBA BIOS dumper.
//!
//! This crate supports both `no_std` (embedded) and `std` (host) environments:
//! - Default: `no_std` mode for the GBA target
//! - `std` feature: Enables `std` support for the host tool
//!
//! Hardware access goes through the traits in [`copy`] and [`save`]; the
//! [`sim`] module provides host implementations of them.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod checksum;
pub mod classify;
pub mod copy;
pub mod dump;
pub mod extract;
pub mod image;
pub mod layout;
pub mod oracle;
pub mod report;
pub mod save;
pub mod sha256;
pub mod sim;
pub mod stack;

// Re-export commonly used types
pub use classify::{classify, Classification, Revision};
pub use copy::{BulkCopy, Granularity, OracleShot, Platform};
pub use dump::{DumpError, DumpPlan, Strategy};
pub use extract::Extractor;
pub use image::{Captured, ImageBuffer};
pub use layout::{AddrRange, BIOS_BASE, BIOS_SIZE, BIOS_WORDS, SRAM_BASE, SRAM_SIZE};
pub use report::{DumpReport, Fingerprint};
pub use sha256::{sha256, Digest, Sha256};
