//! ahocorasick - multi-keyword search with Aho-Corasick automata
//!
//! Builds, inspects and searches with keyword trees from the command line.

use clap::Parser;
use colored::Colorize;
use std::process;

use libahocorasick::cli::commands;
use libahocorasick::cli::logger;
use libahocorasick::cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init() {
        eprintln!("{}: failed to initialise logging: {}", "Warning".yellow().bold(), e);
    }

    if let Err(e) = commands::execute(cli.command) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}
