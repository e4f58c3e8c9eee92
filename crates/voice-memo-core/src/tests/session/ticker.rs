use crate::{CycleId, SessionEvent, Ticker, event_channel, session::MIN_TICK_PERIOD};

use std::time::Duration;

use tokio::time::timeout;

// Test constants
const FAST_PERIOD: Duration = Duration::from_millis(10);
const WAIT_LIMIT: Duration = Duration::from_secs(2);

/// WHAT: A started ticker emits tick events tagged with its cycle
/// WHY: The controller drops ticks from other cycles
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_started_ticker_when_waiting_then_tick_for_cycle_received() {
    // Given: A ticker for cycle 7
    let (events_tx, mut events_rx) = event_channel();
    let mut ticker = Ticker::new(events_tx);
    ticker.start(CycleId(7), FAST_PERIOD);

    // When: Waiting for two events
    let first = timeout(WAIT_LIMIT, events_rx.recv()).await.unwrap();
    let second = timeout(WAIT_LIMIT, events_rx.recv()).await.unwrap();

    // Then: Both are ticks for cycle 7
    assert_eq!(first, Some(SessionEvent::Tick { cycle: CycleId(7) }));
    assert_eq!(second, Some(SessionEvent::Tick { cycle: CycleId(7) }));
    assert!(ticker.is_active());
}

/// WHAT: A cancelled ticker stops emitting
/// WHY: No tick may arrive after the cycle is reset
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_ticker_when_cancelled_then_inactive_and_silent() {
    // Given: A running ticker
    let (events_tx, mut events_rx) = event_channel();
    let mut ticker = Ticker::new(events_tx);
    ticker.start(CycleId(1), FAST_PERIOD);

    // When: Cancelling and draining anything already queued
    ticker.cancel();
    while events_rx.try_recv().is_ok() {}
    tokio::time::sleep(FAST_PERIOD * 5).await;

    // Then: Inactive and nothing new arrived
    assert!(!ticker.is_active());
    assert!(events_rx.try_recv().is_err());
}

/// WHAT: Restarting replaces the previous schedule
/// WHY: Only one tick source may exist at a time
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_ticker_when_restarted_then_only_new_cycle_ticks() {
    // Given: A ticker running for cycle 1
    let (events_tx, mut events_rx) = event_channel();
    let mut ticker = Ticker::new(events_tx);
    ticker.start(CycleId(1), FAST_PERIOD);

    // When: Restarting for cycle 2
    ticker.start(CycleId(2), FAST_PERIOD);
    while events_rx.try_recv().is_ok() {}

    // Then: Subsequent ticks belong to cycle 2
    for _ in 0..3 {
        let event = timeout(WAIT_LIMIT, events_rx.recv()).await.unwrap();
        assert_eq!(event, Some(SessionEvent::Tick { cycle: CycleId(2) }));
    }
}

/// WHAT: A zero period is clamped and the ticker still runs
/// WHY: A misconfigured tick period must not kill the tick task
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_zero_period_when_started_then_clamped_and_ticks_arrive() {
    // Given: A ticker and a zero period
    let (events_tx, mut events_rx) = event_channel();
    let mut ticker = Ticker::new(events_tx);
    assert!(MIN_TICK_PERIOD > Duration::ZERO);

    // When: Starting with the zero period
    ticker.start(CycleId(3), Duration::ZERO);

    // Then: Ticks keep arriving for the cycle
    for _ in 0..2 {
        let event = timeout(WAIT_LIMIT, events_rx.recv()).await.unwrap();
        assert_eq!(event, Some(SessionEvent::Tick { cycle: CycleId(3) }));
    }
    ticker.cancel();
}
