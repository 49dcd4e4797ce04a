//! # Etiqueta CLI
//!
//! Command-line interface for warehouse label generation.
//!
//! ## Usage
//!
//! ```bash
//! # Render a label to etiqueta_11522_P06-C2-A2-G11.png
//! etiqueta generate 11522 P06-C2-A2-G11
//!
//! # Pick a preset and output file
//! etiqueta generate 11522 P06-C2-A2-G11 --preset compact-8x4 --output label.png
//!
//! # Start the web UI
//! etiqueta serve --listen 0.0.0.0:8080
//!
//! # List presets
//! etiqueta presets
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use etiqueta::{
    LabelConfig, LabelError,
    render::{render_label, suggested_filename, validate_inputs},
    server::{ServerConfig, serve},
};

/// Etiqueta - warehouse label generator
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a label PNG to a file
    Generate {
        /// Product code printed in large type
        code: String,

        /// Storage location encoded in the barcode
        location: String,

        /// Label preset (see `etiqueta presets`)
        #[arg(long, default_value = "wide-8x6")]
        preset: String,

        /// Output file (defaults to the etiqueta_<code>_<location>.png convention)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Force the 90° rotation on
        #[arg(long)]
        rotate: bool,

        /// Force the 90° rotation off
        #[arg(long, conflicts_with = "rotate")]
        no_rotate: bool,
    },

    /// Start the label generator web UI
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
    },

    /// List the built-in label presets
    Presets,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            code,
            location,
            preset,
            output,
            rotate,
            no_rotate,
        } => {
            validate_inputs(&code, &location)?;
            let mut config = LabelConfig::preset(&preset).ok_or_else(|| {
                LabelError::InvalidInput(format!(
                    "unknown preset '{preset}'. Run `etiqueta presets` to see the available names."
                ))
            })?;
            if rotate {
                config.rotate_90 = true;
            }
            if no_rotate {
                config.rotate_90 = false;
            }

            let label = render_label(&code, &location, &config)?;
            for warning in &label.warnings {
                eprintln!("warning: {warning}");
            }

            let path = output.unwrap_or_else(|| PathBuf::from(suggested_filename(&code, &location)));
            std::fs::write(&path, &label.png)?;
            println!(
                "Saved {}x{} label to {}",
                label.width,
                label.height,
                path.display()
            );
        }

        Commands::Serve { listen } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(serve(ServerConfig {
                listen_addr: listen,
            }))?;
        }

        Commands::Presets => {
            println!("Available presets:");
            for name in LabelConfig::presets() {
                println!("  {name}");
            }
        }
    }

    Ok(())
}
