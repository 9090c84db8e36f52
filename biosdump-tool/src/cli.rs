// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use biosdump_common::Strategy;

use crate::commands::{self, SimulateOptions};

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "biosdump")]
#[command(about = "Inspect GBA BIOS save dumps and simulate the dumper")]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fingerprint the BIOS image at the start of a save file
    Inspect {
        /// Save file written by the dumper ROM
        #[arg(value_name = "SAV")]
        save: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the BIOS image out of a save file
    Extract {
        /// Save file written by the dumper ROM
        #[arg(value_name = "SAV")]
        save: PathBuf,

        /// Output BIOS image
        #[arg(value_name = "OUT")]
        output: PathBuf,

        /// Write the image even if it matches no known revision
        #[arg(short, long)]
        force: bool,
    },

    /// Run the dump sequence against a BIOS image on a simulated console
    Simulate {
        /// BIOS image mapped at address 0
        #[arg(value_name = "BIOS")]
        bios: PathBuf,

        /// Extraction strategy
        #[arg(short, long, value_enum, default_value_t = StrategyArg::Direct)]
        strategy: StrategyArg,

        /// Timer ticks between arming and the start of the copy loop (oracle only)
        #[arg(short, long)]
        latency: Option<u32>,

        /// Skip the SHA-256 digest
        #[arg(long)]
        no_digest: bool,

        /// Write the simulated SRAM contents to this file
        #[arg(long, value_name = "OUT")]
        save: Option<PathBuf>,
    },
}

/// Strategy names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Direct,
    Bytewise,
    Oracle,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Direct => Strategy::Direct,
            StrategyArg::Bytewise => Strategy::Bytewise,
            StrategyArg::Oracle => Strategy::TimingOracle,
        }
    }
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Inspect { save, json } => commands::inspect(&save, json).map(|_| ()),
        Commands::Extract {
            save,
            output,
            force,
        } => commands::extract(&save, &output, force).map(|_| ()),
        Commands::Simulate {
            bios,
            strategy,
            latency,
            no_digest,
            save,
        } => {
            let opts = SimulateOptions {
                strategy: strategy.into(),
                latency,
                digest: !no_digest,
                save,
            };
            commands::simulate(&bios, &opts).map(|_| ())
        }
    }
}
