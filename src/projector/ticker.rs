//! Fixed-cadence countdown projection loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::{project, Clock, Countdown, DisplaySurface};
use crate::state::Snapshot;

/// Default projection cadence.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Why the projection loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectorExit {
    /// The display surface went away.
    SurfaceClosed,
    /// The cancellation token fired.
    Cancelled,
}

/// Recomputes the countdown on a fixed cadence, independent of file activity.
pub struct CountdownProjector {
    tick: Duration,
    clock: Arc<dyn Clock>,
}

impl CountdownProjector {
    #[must_use]
    pub fn new(tick: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { tick, clock }
    }

    /// Project the latest snapshot at the current time.
    #[must_use]
    pub fn project_now(&self, snapshot: &Snapshot) -> Countdown {
        project(&snapshot.state, self.clock.now())
    }

    /// Render countdown frames until the surface dies or `cancel` fires.
    ///
    /// The first frame is rendered immediately.
    pub async fn run<S: DisplaySurface>(
        &self,
        snapshots: watch::Receiver<Arc<Snapshot>>,
        mut surface: S,
        cancel: CancellationToken,
    ) -> ProjectorExit {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("Countdown projector cancelled");
                    return ProjectorExit::Cancelled;
                }
                _ = ticker.tick() => {}
            }

            if !surface.is_alive() {
                tracing::debug!("Display surface closed, stopping countdown");
                return ProjectorExit::SurfaceClosed;
            }

            let snapshot = Arc::clone(&snapshots.borrow());
            let countdown = self.project_now(&snapshot);
            tracing::trace!(
                progress = countdown.progress_percent,
                status = %countdown.status,
                "Countdown tick"
            );
            surface.render(&countdown);
        }
    }
}

impl std::fmt::Debug for CountdownProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownProjector")
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}
