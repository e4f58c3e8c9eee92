use crate::session::{CycleId, EventSender, SessionEvent};

use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, trace, warn};

/// Shortest period a ticker runs at; shorter requests are raised to it.
pub(crate) const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Cancellable periodic timer feeding `Tick` events into the session channel.
///
/// Must be started from within a tokio runtime. Dropping it cancels the task.
#[derive(Debug)]
pub struct Ticker {
    events: EventSender,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Creates an idle ticker.
    pub fn new(events: EventSender) -> Self {
        Self { events, task: None }
    }

    /// Starts ticking every `period` for `cycle`, replacing any running task.
    ///
    /// The first tick arrives one full period after this call. A period
    /// below [`MIN_TICK_PERIOD`], including zero, runs at the minimum.
    pub fn start(&mut self, cycle: CycleId, period: Duration) {
        self.cancel();

        let period = if period < MIN_TICK_PERIOD {
            warn!(requested_ms = period.as_millis(), "Tick period too short, clamping");
            MIN_TICK_PERIOD
        } else {
            period
        };

        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                trace!(cycle = %cycle, "Tick");
                if events.send(SessionEvent::Tick { cycle }).is_err() {
                    break;
                }
            }
        });

        debug!(cycle = %cycle, period_ms = period.as_millis(), "Ticker started");
        self.task = Some(task);
    }

    /// Stops the running task, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Ticker cancelled");
        }
    }

    /// Whether a tick task is currently scheduled.
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
