use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use glob::glob;
use itertools::Itertools;
use tracing::{debug, info};

use super::Job;
use crate::engine::{self, EngineConfig};
use crate::workload::{self, WorkloadClient};

/// Name of the single output file written into the job's output directory.
pub const OUTPUT_FILE: &str = "mr-out";

/// Read every file matching the job's glob into a `(filename, contents)` pair.
pub fn load_input(pattern: &str) -> Result<Vec<(Bytes, Bytes)>> {
    let mut input = Vec::new();
    for pathspec in glob(pattern)?.flatten() {
        if !pathspec.is_file() {
            continue;
        }
        let contents = fs::read(&pathspec)
            .with_context(|| format!("failed to read {}", pathspec.display()))?;
        let filename = pathspec.to_string_lossy().into_owned();
        debug!(file = %filename, bytes = contents.len(), "loaded input");
        input.push((Bytes::from(filename), Bytes::from(contents)));
    }
    Ok(input)
}

/// Write reduce outputs in key order, one after another.
pub fn write_output(dir: &Path, output: Vec<(Bytes, Bytes)>) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(OUTPUT_FILE);
    let contents: Vec<u8> = output
        .into_iter()
        .sorted_unstable_by(|a, b| a.0.cmp(&b.0))
        .flat_map(|(_, value)| value)
        .collect();
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Run `job` end to end and return the path of the output file.
pub fn run_job(job: &Job) -> Result<PathBuf> {
    let config = match job.threads {
        Some(threads) => EngineConfig::try_from(threads)?,
        None => EngineConfig::default(),
    };
    let app = workload::named(&job.workload)?;
    let aux = Bytes::from(serde_json::to_string(&job.args)?);

    let input = load_input(&job.input)?;
    info!(
        workload = %job.workload,
        files = input.len(),
        threads = config.thread_count(),
        "running job"
    );

    let client = WorkloadClient::new(app, aux);
    let output = engine::run_with_config(&client, &input, &config)?;
    let keys = output.len();

    let path = write_output(Path::new(&job.output), output)?;
    info!(keys, output = %path.display(), "job complete");
    Ok(path)
}
