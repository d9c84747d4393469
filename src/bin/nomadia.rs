//! Nomadia CLI binary.

use std::io::Write;
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use nomadia::cli::args::*;
use nomadia::cli::commands::*;

fn main() {
    // Parse command line arguments using clap
    let args = NomadiaArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    // RUST_LOG, when set, refines the level chosen on the command line
    Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: NomadiaArgs) -> anyhow::Result<()> {
    let name = command_name(&args.command);
    execute_command(args).with_context(|| format!("`nomadia {name}` failed"))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Train(_) => "train",
        Command::Classify(_) => "classify",
        Command::Retrieve(_) => "retrieve",
        Command::Prompt(_) => "prompt",
        Command::Knowledge(_) => "knowledge",
    }
}
