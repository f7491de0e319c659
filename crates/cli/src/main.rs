// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use junction_cli::{color, commands, OutputFormat};

/// junction — operator utilities for a connector config file (§6).
#[derive(Parser)]
#[command(name = "junction")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Command {
    /// Check a connector config file for duplicate ids and parse errors.
    ValidateConfig { path: PathBuf },
    /// Preview the type identifiers `autoDiscoverTypes` would derive from a directory.
    DiscoverTypes { dir: PathBuf },
}

fn main() -> ExitCode {
    let matches = Cli::command().styles(color::styles()).get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    let result = match cli.command {
        Command::ValidateConfig { path } => commands::validate_config::run(&path, cli.format),
        Command::DiscoverTypes { dir } => commands::discover_types::run(&dir, cli.format),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.code as u8)
        }
    }
}
