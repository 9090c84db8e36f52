// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Host side of the GBA BIOS dumper: reads the save files the ROM writes and
//! runs the same dump sequence against a BIOS image in simulation.

pub mod cli;
pub mod commands;
