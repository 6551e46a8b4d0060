//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flowsight")]
#[command(version)]
#[command(about = "Render serverless workflow definitions and execution traces as a graph")]
#[command(long_about = "
flowsight combines a workflow definition with an optional execution trace
and produces a positioned, annotated graph for a rendering frontend.

Example usage:
  flowsight render workflow.json                 # Layout of the bare definition
  flowsight render workflow.json trace.json      # Overlay the recorded execution
  flowsight validate workflow.yaml               # Check structural consistency
  flowsight report workflow.json trace.json      # Human-readable execution report
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the renderable graph and emit it as JSON
    #[command(long_about = "
Builds the {nodes, edges} graph for a workflow definition, optionally
overlaying an execution trace. Accepts one or two files (JSON or YAML) in
any order; which one is the definition and which the trace is detected
from their shape.

Example:
  flowsight render workflow.json trace.json --pretty
")]
    Render {
        /// Definition file, optionally paired with a trace file
        #[arg(num_args = 1..=2, required = true)]
        files: Vec<PathBuf>,

        /// Write the graph to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the emitted JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Check a workflow definition for structural problems
    #[command(long_about = "
Parses a workflow definition and reports structural findings: a missing
start state, duplicate state names, and transitions targeting states that
do not exist. Exits 0 when clean, 2 when findings exist.
")]
    Validate {
        /// Definition file to check
        file: PathBuf,
    },

    /// Print a human-readable execution report
    #[command(long_about = "
Merges a definition with an execution trace and prints one line per state:
execution status, duration, the switch branch taken, and the error handler
that fired, if any.
")]
    Report {
        /// Definition file, optionally paired with a trace file
        #[arg(num_args = 1..=2, required = true)]
        files: Vec<PathBuf>,
    },
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
