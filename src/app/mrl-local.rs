use anyhow::Result;
use clap::Parser;
use mrthreads::standalone::{runner, Args, Job};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let job = Job::from(Args::parse().command);
    let path = runner::run_job(&job)?;
    println!("{}", path.display());
    Ok(())
}
