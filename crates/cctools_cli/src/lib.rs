//! CCTools command line
//!
//! Inspects, checks and assembles CC1 levelsets, and lists the maps of CC2 game scripts.

use cctools_utils::{ok, AnyResult};
use clap::{ArgAction, Parser, Subcommand};
use commands::{
    build::BuildCommand, check::CheckCommand, dac::DacCommand, info::InfoCommand,
    maps::MapsCommand, merge::MergeCommand, renumber::RenumberCommand, script::ScriptCommand,
};

pub mod commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Logs more details, can be repeated
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Prints a summary of a levelset
    Info(InfoCommand),
    /// Looks for common design errors in a levelset
    Check(CheckCommand),
    /// Rewrites a levelset, numbering its levels in order
    Renumber(RenumberCommand),
    /// Joins several levelsets together
    Merge(MergeCommand),
    /// Builds a levelset from specification
    Build(BuildCommand),
    /// Writes a TWorld descriptor for a levelset
    Dac(DacCommand),
    /// Lists the maps played by a game script
    Maps(MapsCommand),
    /// Dumps the parsed contents of a game script
    Script(ScriptCommand),
}

pub trait Command {
    fn run(self) -> AnyResult;
}

/// Runs `cctools` as if it was ran from the command line.
pub fn run(cli: Cli) -> AnyResult {
    match cli.command {
        CliCommand::Info(c) => c.run()?,
        CliCommand::Check(c) => c.run()?,
        CliCommand::Renumber(c) => c.run()?,
        CliCommand::Merge(c) => c.run()?,
        CliCommand::Build(c) => c.run()?,
        CliCommand::Dac(c) => c.run()?,
        CliCommand::Maps(c) => c.run()?,
        CliCommand::Script(c) => c.run()?,
    }
    ok()
}
