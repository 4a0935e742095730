//! Pipeline task: clear-and-load on a fixed daily trigger.
//!
//! Runs execute one after another on this task, so at most one is ever
//! active. A missed trigger is not caught up.

use anyhow::Result;
use chrono::Local;
use clap::Args;
use colored::Colorize;
use tracing::{error, info};

use unigraph_core::{IngestReport, IngestResult};

use crate::config::AppConfig;
use crate::output;
use crate::pipeline::{next_run_after, run_task, run_with_retry, RetryPolicy};
use super::connect_store;

#[derive(Args)]
pub struct ScheduleArgs {
    /// Run the task immediately (with retries) and exit
    #[arg(long)]
    pub once: bool,

    /// Daily trigger time, HH:MM local
    #[arg(long)]
    pub at: Option<String>,

    /// Number of whole-run retries after a store failure
    #[arg(long)]
    pub retries: Option<u32>,

    /// Seconds to wait between retries
    #[arg(long)]
    pub retry_delay: Option<u64>,
}

pub async fn execute(args: ScheduleArgs, mut config: AppConfig) -> Result<()> {
    if let Some(at) = args.at {
        config.schedule.daily_at = at;
    }
    if let Some(retries) = args.retries {
        config.schedule.retries = retries;
    }
    if let Some(delay) = args.retry_delay {
        config.schedule.retry_delay_secs = delay;
    }

    let policy = RetryPolicy {
        retries: config.schedule.retries,
        delay: config.schedule.retry_delay(),
    };

    if args.once {
        let report = run_scheduled(&config, &policy).await?;
        output::print_report(&report);
        return Ok(());
    }

    let at = config.schedule.trigger_time()?;
    println!(
        "{} daily at {} ({} retries, {}s apart). Ctrl+C to stop.",
        "Scheduled".green().bold(),
        config.schedule.daily_at.cyan(),
        policy.retries,
        policy.delay.as_secs()
    );

    loop {
        let next = next_run_after(&Local::now(), at);
        info!(next_run = %next, "Waiting for next scheduled run");
        let wait = (next - Local::now()).to_std().unwrap_or_default();

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Scheduler stopped");
                return Ok(());
            }
        }

        // A failed day is logged; the schedule carries on.
        match run_scheduled(&config, &policy).await {
            Ok(report) => info!(
                nodes = report.nodes_created(),
                rels = report.relationships_created(),
                "Scheduled run complete"
            ),
            Err(e) => error!(error = %e, "Scheduled run failed"),
        }
    }
}

/// One scheduled run: a fresh connection per attempt, clear, then load.
async fn run_scheduled(config: &AppConfig, policy: &RetryPolicy) -> IngestResult<IngestReport> {
    let options = config.mapping_options();
    run_with_retry(policy, |attempt| {
        let options = options.clone();
        async move {
            info!(attempt, input = %config.input.path.display(), "Starting scheduled run");
            let store = connect_store(&config.graph).await?;
            run_task(&store, &config.input.path, &options).await
        }
    })
    .await
}
