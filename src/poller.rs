//! Fixed-interval refresh jobs on top of `tokio-cron-scheduler`

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DashboardError;

/// Owns the job scheduler shared by every view's poller
#[derive(Clone)]
pub struct Poller {
    scheduler: JobScheduler,
}

/// Teardown hook of one recurring job
#[derive(Clone)]
pub struct PollerHandle {
    id: Uuid,
    name: &'static str,
    scheduler: JobScheduler,
}

impl Poller {
    pub async fn start() -> Result<Self, DashboardError> {
        let scheduler = JobScheduler::new().await?;
        scheduler.start().await?;
        Ok(Self { scheduler })
    }

    /// Run `task` every `period`, first firing one period from now
    pub async fn every<F, Fut>(
        &self,
        name: &'static str,
        period: Duration,
        task: F,
    ) -> Result<PollerHandle, DashboardError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = Arc::new(task);
        let job = Job::new_repeated_async(period, move |_uuid, _scheduler| {
            let task = task.clone();
            Box::pin(async move {
                debug!("⏱️ [POLLER] {} tick", name);
                task().await;
            })
        })?;

        let id = self.scheduler.add(job).await?;
        info!("⏱️ [POLLER] {} scheduled every {}s", name, period.as_secs());
        Ok(PollerHandle { id, name, scheduler: self.scheduler.clone() })
    }
}

impl PollerHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stop future firings; a tick already running completes
    pub async fn cancel(&self) -> Result<(), DashboardError> {
        self.scheduler.remove(&self.id).await?;
        info!("⏱️ [POLLER] {} cancelled", self.name);
        Ok(())
    }
}
