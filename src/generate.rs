//! Generate command handler.
//!
//! Jobs (one per user and round) are dealt round-robin to the workers. Each
//! worker runs on the blocking pool with its own seeded [`QueryGenerator`],
//! and results are printed in worker order once all workers finish.

use crate::args::GenerateArgs;
use anyhow::Context;
use std::io::Write;
use std::sync::Arc;
use synth_core::{AppConfig, ConfigLoader};
use synth_generator::{GenerationResult, QueryGenerator};

/// Output of one worker.
#[derive(Debug, Default)]
pub struct WorkerReport {
    pub results: Vec<GenerationResult>,
    /// Generations that produced no queries
    pub skipped: usize,
}

/// Seed for worker `index`, spread from the base seed.
pub fn worker_seed(base_seed: u64, index: u64) -> u64 {
    base_seed.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))
}

/// Users to generate for: the requested ones, or every configured user.
pub fn resolve_users(config: &AppConfig, requested: &[String]) -> anyhow::Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(config.user_names().into_iter().map(str::to_string).collect());
    }

    let unknown: Vec<&str> = requested
        .iter()
        .map(String::as_str)
        .filter(|name| !config.has_user(name))
        .collect();
    if !unknown.is_empty() {
        anyhow::bail!("Unknown users: {}", unknown.join(", "));
    }
    Ok(requested.to_vec())
}

/// Deal `rounds` jobs per user across `workers` queues.
pub fn plan_jobs(users: &[String], rounds: u32, workers: usize) -> Vec<Vec<String>> {
    let workers = workers.max(1);
    let mut queues = vec![Vec::new(); workers];
    let jobs = (0..rounds).flat_map(|_| users.iter());
    for (i, user) in jobs.enumerate() {
        queues[i % workers].push(user.clone());
    }
    queues
}

/// Run one worker's queue to completion.
pub fn run_worker(
    config: Arc<AppConfig>,
    jobs: &[String],
    seed: u64,
    now: i64,
) -> anyhow::Result<WorkerReport> {
    let mut generator = QueryGenerator::new(config, seed);
    let mut report = WorkerReport::default();

    for user in jobs {
        match generator
            .generate_at(user, now)
            .with_context(|| format!("Failed to generate queries for user '{user}'"))?
        {
            Some(result) => report.results.push(result),
            None => report.skipped += 1,
        }
    }
    Ok(report)
}

/// Write results as JSON, one object per line unless `pretty`.
pub fn write_results<W: Write>(
    out: &mut W,
    results: &[GenerationResult],
    pretty: bool,
) -> anyhow::Result<()> {
    for result in results {
        if pretty {
            serde_json::to_writer_pretty(&mut *out, result)?;
        } else {
            serde_json::to_writer(&mut *out, result)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Run every queue on the blocking pool. Reports come back in queue order.
pub async fn run_workers(
    config: Arc<AppConfig>,
    queues: Vec<Vec<String>>,
    base_seed: u64,
    now: i64,
) -> anyhow::Result<Vec<WorkerReport>> {
    let mut handles = Vec::with_capacity(queues.len());
    for (index, jobs) in queues.into_iter().enumerate() {
        let config = Arc::clone(&config);
        let seed = worker_seed(base_seed, index as u64);
        handles.push(tokio::task::spawn_blocking(move || {
            run_worker(config, &jobs, seed, now)
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        let report = handle
            .await
            .with_context(|| format!("Worker {index} panicked"))?
            .with_context(|| format!("Worker {index} failed"))?;
        reports.push(report);
    }
    Ok(reports)
}

/// Run the generate command.
pub async fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let loader = ConfigLoader::new(&args.config);
    let config = loader.load().with_context(|| {
        format!(
            "Failed to load configuration from {}",
            loader.config_path().display()
        )
    })?;
    let config = Arc::new(config);

    let users = resolve_users(&config, &args.users)?;
    let now = args.now.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let queues = plan_jobs(&users, args.rounds, args.workers);

    tracing::info!(
        "Generating {} round(s) for {} user(s) with {} worker(s), seed {}",
        args.rounds,
        users.len(),
        queues.len(),
        args.seed
    );

    let reports = run_workers(config, queues, args.seed, now).await?;

    let mut stdout = std::io::stdout().lock();
    let mut generated = 0;
    let mut skipped = 0;
    for report in &reports {
        write_results(&mut stdout, &report.results, args.pretty)?;
        generated += report.results.len();
        skipped += report.skipped;
    }
    stdout.flush()?;

    tracing::info!("Generated {generated} result(s), skipped {skipped} empty selection(s)");
    Ok(())
}
