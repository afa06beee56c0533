//! Patchsmith CLI - generate, validate, and send synth patches

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;

use patchsmith::macro_map::{self, MacroMap};
use patchsmith::patch::PatchDocument;
use patchsmith::randomizer::{self, GeneratorSpec};
use patchsmith::validate;
use patchsmith::{io, midi};

#[derive(Parser)]
#[command(name = "patchsmith")]
#[command(about = "Constrained-random synth presets with MIDI macro control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available MIDI output ports
    ListPorts {},

    /// Generate a batch of validated patch files from a generator spec
    Generate {
        /// Generator spec TOML (per-category ranges and weights)
        spec: PathBuf,

        /// Sound category to generate (must exist in the spec)
        #[arg(short = 't', long = "type")]
        category: String,

        /// Number of patches to generate
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output directory for the patch files
        #[arg(short, long, default_value = "presets")]
        out_dir: PathBuf,
    },

    /// Compute a patch's 8 macro values and send them as MIDI CCs
    SendMacros {
        /// Patch JSON file
        patch: PathBuf,

        /// MIDI output port name (exact or substring; default: first
        /// IAC/virtual bus)
        #[arg(short, long)]
        port: Option<String>,

        /// Macro map TOML
        #[arg(short, long, default_value = "configs/macro_map.toml")]
        map: PathBuf,

        /// MIDI channel (0-15)
        #[arg(short, long, default_value = "0")]
        channel: u8,
    },

    /// Validate a patch file and print any violations
    ValidatePatch {
        /// Patch JSON file
        patch: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> patchsmith::Result<()> {
    match command {
        Commands::ListPorts {} => {
            let ports = midi::list_ports()?;
            if ports.is_empty() {
                println!("No MIDI output ports available");
            } else {
                for (i, name) in ports.iter().enumerate() {
                    println!("{}: {}", i, name);
                }
            }
            Ok(())
        }

        Commands::Generate {
            spec,
            category,
            count,
            seed,
            out_dir,
        } => {
            let spec = GeneratorSpec::load(&spec)?;
            let patches = randomizer::generate(&spec, &category, count, seed)?;
            let written = io::save_batch(&patches, &out_dir)?;
            println!(
                "Generated {} '{}' patches in {}",
                written.len(),
                category,
                out_dir.display()
            );
            Ok(())
        }

        Commands::SendMacros {
            patch,
            port,
            map,
            channel,
        } => {
            let map = MacroMap::load(&map)?;
            let doc = PatchDocument::load(&patch)?;
            let values = macro_map::compute_macros(&doc, &map)?;
            info!("macro values for {}: {:?}", patch.display(), values);
            midi::send_macros(port.as_deref(), &values, &map.cc_numbers(), channel)?;
            println!("Sent macros {:?}", values);
            Ok(())
        }

        Commands::ValidatePatch { patch } => {
            let text = std::fs::read_to_string(&patch)?;
            let value: serde_json::Value = serde_json::from_str(&text)?;
            let result = validate::validate(&value);
            if result.ok() {
                println!("{} is valid", patch.display());
                Ok(())
            } else {
                Err(patchsmith::Error::Invalid(result))
            }
        }
    }
}
