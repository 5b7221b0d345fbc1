use std::time::Duration;

use tracing::{info, warn};

use crate::stores::{CoursesStore, LoadOutcome};

/// Reloads the courses store on a fixed interval.
pub struct RefreshScheduler {
    courses: CoursesStore,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(courses: CoursesStore, interval: Duration) -> Self {
        Self { courses, interval }
    }

    /// Runs until the task is dropped or aborted.
    pub async fn start(self) {
        info!("Starting refresh scheduler (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            match self.courses.load().await {
                Ok(LoadOutcome::Applied { courses, events }) => {
                    info!("Refresh completed - {} courses, {} events", courses, events);
                }
                Ok(outcome) => {
                    info!("Refresh finished without publishing: {:?}", outcome);
                }
                Err(e) => {
                    // keep the loop alive; the next tick retries
                    warn!("Refresh failed: {:?}", e);
                }
            }
        }
    }
}
