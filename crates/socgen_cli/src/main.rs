//! socgen CLI: generates and runs Vivado block design scripts from JSON design descriptions.
//!
//! Provides `socgen build` to generate a design's script and run it through
//! Vivado in batch mode, `socgen script` to print the script without touching
//! the file system, and `socgen map` to print the interconnect and address map.

#![warn(missing_docs)]

mod build;
mod error;
mod map;
mod pipeline;
mod script;
mod vivado;
mod workspace;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// socgen: SoC block designs from JSON descriptions.
#[derive(Parser, Debug)]
#[command(name = "socgen", version, about = "Vivado block design generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Board and tool settings file (JSON, or TOML by extension).
    #[arg(short, long, global = true, default_value = "configuration.json")]
    pub config: PathBuf,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the script, prepare the output directory, and run Vivado.
    Build(BuildArgs),
    /// Print the generated script to stdout.
    Script(DesignArgs),
    /// Print the interconnect ports and memory map.
    Map(DesignArgs),
}

/// Selects the design description.
#[derive(Parser, Debug)]
pub struct DesignArgs {
    /// Design description file.
    #[arg(short = 'f', long = "design", default_value = "verilog_json.json")]
    pub design: PathBuf,
}

/// Arguments for the `socgen build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Design description file.
    #[arg(short = 'f', long = "design", default_value = "verilog_json.json")]
    pub design: PathBuf,

    /// Write the output directory and script but do not launch Vivado.
    #[arg(long)]
    pub no_run: bool,

    /// Leave Vivado journal, log, and cache files in the working directory.
    #[arg(long)]
    pub keep_artifacts: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print debug information.
    pub verbose: bool,
    /// Path of the tool settings file.
    pub config: PathBuf,
}

impl GlobalArgs {
    /// The default log filter for these flags. `RUST_LOG` takes precedence.
    fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(global.log_filter()))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Script(ref args) => script::run(args, &global),
        Command::Map(ref args) => map::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    }
}
