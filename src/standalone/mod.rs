//! Runs a named [`workload`](crate::workload) over local files on the
//! in-process engine.

use clap::{Parser, Subcommand};

pub mod runner;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a job over local files
    Submit {
        /// Glob spec for the input files
        #[arg(short, long)]
        input: String,

        /// Name of the workload
        #[arg(short, long)]
        workload: String,

        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Number of worker threads [default: available cores]
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        threads: Option<i64>,

        /// Auxiliary arguments to pass to the MapReduce application.
        #[clap(value_parser, last = true)]
        args: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Job {
    pub input: String,
    pub workload: String,
    pub output: String,
    pub threads: Option<i64>,
    pub args: Vec<String>,
}

impl From<Commands> for Job {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Submit {
                input,
                workload,
                output,
                threads,
                args,
            } => Job {
                input,
                workload,
                output,
                threads,
                args,
            },
        }
    }
}
