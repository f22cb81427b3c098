//! Command-line interface for FIFO ILA synthesis.

use clap::{Parser, Subcommand};
use ila_model::ModelError;
use ila_synth::{synthesize_all, ElementOutcome, SynthConfig};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("model build error: {0}")]
    Model(#[from] ModelError),

    #[error("{failed} of {total} elements failed to synthesize")]
    PartialSynthesis { failed: usize, total: usize },
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ila", version)]
#[command(about = "Synthesize the FIFO peripheral's instruction-level abstraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize every state element against the golden simulator
    Synth {
        /// Output directory for the exported ASTs
        #[arg(long, default_value = "ast")]
        out: PathBuf,

        /// Base seed for probe sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Probes drawn per decode region
        #[arg(long)]
        probes: Option<usize>,
    },

    /// Show the model: elements, candidate counts, decode space
    Show,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Synth { out, seed, probes } => cmd_synth(out, seed, probes),
        Commands::Show => cmd_show(),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn cmd_synth(out: PathBuf, seed: Option<u64>, probes: Option<usize>) -> CliResult<()> {
    let ila = ila_fifo::build()?;
    let sim = ila_fifo::FifoSim::new(&ila);

    let mut config = SynthConfig::default();
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(probes) = probes {
        config.probes_per_case = probes;
    }
    info!(
        model = ila.model.name(),
        seed = config.seed,
        decode = ila.model.decode().len(),
        "starting synthesis"
    );

    let report = synthesize_all(&ila.model, &sim, &config, &out);
    let total = report.entries.len();
    let mut failed = 0usize;
    for entry in &report.entries {
        match &entry.outcome {
            ElementOutcome::Exported { path, .. } => {
                println!("{:<18} -> {}", entry.element, path.display());
            }
            ElementOutcome::Failed { error } => {
                failed += 1;
                println!("{:<18} -> FAILED: {error}", entry.element);
            }
        }
    }
    if failed > 0 {
        return Err(CliError::PartialSynthesis { failed, total });
    }
    Ok(())
}

fn cmd_show() -> CliResult<()> {
    let ila = ila_fifo::build()?;
    let model = &ila.model;

    println!("model {}", model.name());
    println!("  inputs:");
    for decl in model.vars().iter().filter(|v| !v.is_state_element()) {
        println!("    {:<18} {}", decl.name, decl.sort);
    }
    println!("  constants:");
    for c in model.consts() {
        println!("    {:<18} {}", c.name, c.word);
    }
    println!("  state elements:");
    for decl in model.state_elements() {
        let cands = model.candidates(decl.id).map_or(0, |c| c.len());
        println!(
            "    {:<18} {:<14} {} candidate(s)",
            decl.name,
            decl.sort.to_string(),
            cands
        );
    }
    println!("  decode predicates: {}", model.decode().len());
    Ok(())
}
