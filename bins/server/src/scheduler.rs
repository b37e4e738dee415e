//! Cron-driven feed refresh.


use kaizen_core::feed::{FeedRefresher, FeedStore, PageFetcher};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Refresher over the configured fetcher and store.
pub type SharedRefresher = FeedRefresher<dyn PageFetcher, dyn FeedStore>;

/// Runs one refresh of every feed and logs the outcome.
pub async fn refresh_feeds(refresher: &SharedRefresher) {
    for (kind, result) in refresher.refresh_all().await {
        match result {
            Ok(count) => info!(%kind, count, "feed refresh finished"),
            Err(e) => error!(%kind, error = %e, "feed refresh failed"),
        }
    }
}

/// Starts a scheduler that refreshes every feed on `schedule` (six-field cron).
pub async fn start(schedule: &str, refresher: SharedRefresher) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let refresher = refresher.clone();
        Box::pin(async move {
            info!("scheduled feed refresh triggered");
            refresh_feeds(&refresher).await;
        })
    })?;
    scheduler.add(job).await?;
    scheduler.start().await?;

    info!(%schedule, "feed refresh scheduler started");
    Ok(scheduler)
}
