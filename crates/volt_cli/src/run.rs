//! The `volt run` subcommand: instantiate a module and step it.

use clap::Parser;

use volt_sim::Simulation;

use crate::check;

/// Arguments for the `volt run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the `.hdl` source file.
    pub file: String,

    /// The module to instantiate as the top of the simulation.
    #[arg(long)]
    pub top: String,

    /// Input bits, LSB-first (e.g. `01011`). Unset bits stay low.
    #[arg(long)]
    pub inputs: Option<String>,

    /// Number of half-clock steps to run.
    #[arg(long, default_value_t = 2)]
    pub steps: u32,

    /// A submodule label whose state is printed after each step.
    #[arg(long)]
    pub watch: Option<String>,
}

/// Compiles, instantiates, and steps the requested module, printing the
/// clock level and outputs after each half-clock.
pub fn run(args: &RunArgs) -> Result<(), String> {
    let compiler = check::compile(&args.file)?;
    let mut sim = Simulation::new(compiler.registry(), compiler.interner(), &args.top)
        .map_err(|e| e.to_string())?;

    if let Some(inputs) = &args.inputs {
        let bits = parse_bits(inputs)?;
        if bits.len() > sim.input_count() {
            return Err(format!(
                "`{}` supplies {} input bits, but `{}` has only {}",
                inputs,
                bits.len(),
                args.top,
                sim.input_count()
            ));
        }
        sim.set_inputs(&bits);
    }

    for step in 1..=args.steps {
        let clock = sim.step();
        let outputs: String = (0..sim.output_count())
            .map(|i| if sim.output(i) { '1' } else { '0' })
            .collect();
        println!(
            "step {step}: clock {} outputs {outputs}",
            if clock { "high" } else { "low " }
        );

        if let Some(label) = &args.watch {
            let states = sim.submodule_states(label).map_err(|e| e.to_string())?;
            let rendered: String = states
                .iter()
                .take(64)
                .map(|&b| if b { '1' } else { '0' })
                .collect();
            let ellipsis = if states.len() > 64 { "…" } else { "" };
            println!("  {label}: {rendered}{ellipsis}");
        }
    }

    Ok(())
}

/// Parses an LSB-first bit string like `01011`.
fn parse_bits(text: &str) -> Result<Vec<bool>, String> {
    text.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(format!("invalid input bit '{other}' (expected 0 or 1)")),
        })
        .collect()
}
