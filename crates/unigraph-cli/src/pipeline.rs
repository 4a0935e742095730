//! Scheduled pipeline task: daily trigger and whole-run retries.

use chrono::{DateTime, Days, NaiveTime, TimeZone};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use unigraph_core::{ingest_file, GraphStore, IngestReport, IngestResult, MappingOptions};

/// How often, and how far apart, a failed run is restarted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

/// Run `attempt` until it succeeds, fails with a non-retryable error, or
/// the retry budget is spent. `attempt` receives the 1-based attempt number.
///
/// Retries restart the whole run; nothing from a failed attempt is kept.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut attempt: F) -> IngestResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = IngestResult<T>>,
{
    let mut n = 0;
    loop {
        n += 1;
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && n <= policy.retries => {
                warn!(
                    attempt = n,
                    retries = policy.retries,
                    delay_secs = policy.delay.as_secs_f64(),
                    error = %e,
                    "Run failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// The unit of work of the scheduled task: clear the graph, then load the
/// entry. Clearing first keeps repeated runs from piling up duplicates.
pub async fn run_task<S: GraphStore + ?Sized>(
    store: &S,
    input: &Path,
    options: &MappingOptions,
) -> IngestResult<IngestReport> {
    info!("Clearing graph before scheduled ingest");
    store.clear().await?;
    ingest_file(store, input, options).await
}

/// The first time strictly after `now` whose wall-clock time is `at`.
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let local = now.naive_local();
    let mut date = local.date();
    if date.and_time(at) <= local {
        date = date + Days::new(1);
    }

    loop {
        // A wall-clock time skipped by a DST jump has no mapping; try the next day.
        if let Some(next) = now.timezone().from_local_datetime(&date.and_time(at)).earliest() {
            return next;
        }
        date = date + Days::new(1);
    }
}
