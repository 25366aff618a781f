// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::commands::{self, FindArgs, NameArgs};
use cmd::common::FinderArgs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "filefinder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find files or directories matching a pattern and print their metadata
    Find(FindArgs),
    /// Build a path, file or full name from field values
    Name(NameArgs),
    /// Show the patterns and their fields
    Keys(FinderArgs),
}

#[allow(clippy::print_stdout)]
fn print_line(line: String) {
    println!("{}", line);
}

fn main() -> Result<()> {
    diagnostics::init_diagnostics();

    let cli = Cli::parse();
    match cli.command {
        Commands::Find(args) => commands::find_command(&args, print_line),
        Commands::Name(args) => commands::name_command(&args, print_line),
        Commands::Keys(args) => commands::keys_command(&args, print_line),
    }
}
