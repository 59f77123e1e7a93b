//! Volt CLI — compile and simulate Volt HDL designs.
//!
//! Provides `volt check` for compiling a design and reporting diagnostics,
//! and `volt run` for stepping a compiled module with host-supplied inputs.

#![warn(missing_docs)]

pub mod check;
pub mod run;

use std::process;

use clap::{Parser, Subcommand};

/// Volt — a gate-level HDL compiler and cycle-accurate simulator.
#[derive(Parser, Debug)]
#[command(name = "volt", version, about = "Volt HDL compiler and simulator")]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a design and report diagnostics.
    Check {
        /// Path to the `.hdl` source file.
        file: String,
    },
    /// Compile a design, instantiate a module, and step the simulation.
    Run(run::RunArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check { file } => check::check(&file),
        Command::Run(args) => run::run(&args),
    };

    match result {
        Ok(()) => {}
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    }
}
