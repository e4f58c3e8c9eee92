use crate::{
    CycleId, Permission, RouteChangeReason, STORED_NAMES_KEY, SessionError, SessionEvent,
    SessionOptions, SessionState, SettingsStore, StorageMode, ZERO_DISPLAY,
    tests::support::Harness,
};

use std::{fs, time::Duration};

fn persisted_names(harness: &Harness) -> Vec<String> {
    SettingsStore::new(harness.dir.path().join("settings.toml"))
        .string_list(STORED_NAMES_KEY)
        .unwrap_or_default()
}

/// WHAT: Starting from idle enters Recording and appends a persisted entry
/// WHY: Entries exist only once the capture object was built
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_controller_when_starting_recording_then_recording_with_new_entry() {
    // Given: An idle controller with microphone access
    let mut harness = Harness::new().unwrap();

    // When: Starting a recording
    harness.controller.start_recording().unwrap();

    // Then: Recording, one entry on disk and in the store, ticker running
    assert_eq!(
        harness.controller.state(),
        SessionState::Recording { paused: false }
    );
    let entries = harness.controller.entries().to_vec();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].ends_with(".wav"));
    assert!(harness.entry_path(&entries[0]).is_file());
    assert_eq!(persisted_names(&harness), entries);
    assert!(harness.controller.is_ticking());
}

/// WHAT: Recording without permission is refused and nothing is allocated
/// WHY: The controller must stay idle on every failure
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_denied_permission_when_starting_recording_then_permission_denied() {
    // Given: Microphone access denied
    let mut harness = Harness::with(
        Permission::Denied,
        StorageMode::Multiple,
        SessionOptions::default(),
    )
    .unwrap();

    // When: Starting a recording
    let result = harness.controller.start_recording();

    // Then: Refused, idle, no recorder and no entry
    assert!(matches!(result, Err(SessionError::PermissionDenied { .. })));
    assert!(harness.controller.state().is_idle());
    assert!(harness.controller.entries().is_empty());
    assert_eq!(harness.audio.borrow().recorders_created, 0);
}

/// WHAT: An undetermined permission is requested once and its answer is cached
/// WHY: The prompt answer arrives asynchronously through the session channel
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_undetermined_permission_when_user_grants_then_recording_allowed() {
    // Given: A controller whose permission has not been decided
    let mut harness = Harness::with(
        Permission::Undetermined,
        StorageMode::Multiple,
        SessionOptions::default(),
    )
    .unwrap();
    assert_eq!(harness.replies.borrow().len(), 1);

    // When: Recording before the answer, then answering yes
    let early = harness.controller.start_recording();
    let reply = harness.replies.borrow_mut().pop().unwrap();
    reply.resolve(true);
    let results = harness.pump();

    // Then: The early attempt was refused without a second prompt,
    // and recording works after the grant
    assert!(matches!(early, Err(SessionError::PermissionDenied { .. })));
    assert!(harness.replies.borrow().is_empty());
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(harness.controller.permission(), Permission::Granted);
    harness.controller.start_recording().unwrap();
    assert!(harness.controller.state().is_recording());
}

/// WHAT: A permission granted outside the prompt is honoured on the next attempt
/// WHY: The refreshed status decides the attempt, not the stale cached one
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_undetermined_permission_granted_elsewhere_when_starting_then_recording() {
    // Given: Undetermined at construction, granted by the system afterwards
    let mut harness = Harness::with(
        Permission::Undetermined,
        StorageMode::Multiple,
        SessionOptions::default(),
    )
    .unwrap();
    harness.permission.set(Permission::Granted);

    // When: Starting a recording before any reply arrived
    let result = harness.controller.start_recording();

    // Then: The refreshed grant is used and recording begins
    assert!(result.is_ok());
    assert_eq!(harness.controller.permission(), Permission::Granted);
    assert!(harness.controller.state().is_recording());
    assert_eq!(harness.audio.borrow().recorders_created, 1);
}

/// WHAT: Recorder construction failure surfaces the I/O cause and stays idle
/// WHY: No entry may be appended for a recorder that was never built
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recorder_setup_failure_when_starting_then_idle_without_entry() {
    // Given: A backend that cannot build recorders
    let mut harness = Harness::new().unwrap();
    harness.audio.borrow_mut().fail_recorder_setup = true;

    // When: Starting a recording
    let result = harness.controller.start_recording();

    // Then: Setup failure with its source, idle, empty library
    match result {
        Err(SessionError::RecorderSetupFailed { source, .. }) => {
            assert_eq!(source.to_string(), "input device busy");
        }
        other => unreachable!("unexpected result: {other:?}"),
    }
    assert!(harness.controller.state().is_idle());
    assert!(harness.controller.entries().is_empty());
    assert!(!harness.controller.is_ticking());
}

/// WHAT: A recorder that refuses to start leaves no orphaned entry or file
/// WHY: Stopping a recording that never started must not pollute the library
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recorder_that_fails_to_start_when_starting_then_entry_and_file_discarded() {
    // Given: Recorders build but refuse to record
    let mut harness = Harness::new().unwrap();
    harness.audio.borrow_mut().fail_record = true;

    // When: Starting a recording
    let result = harness.controller.start_recording();

    // Then: Setup failure, no entry persisted, recordings directory empty
    assert!(matches!(result, Err(SessionError::RecorderSetupFailed { .. })));
    assert!(harness.controller.entries().is_empty());
    assert!(persisted_names(&harness).is_empty());
    let leftovers = fs::read_dir(harness.controller.library().directory())
        .unwrap()
        .count();
    assert_eq!(leftovers, 0);
}

/// WHAT: Stop only requests finalize; the completion event returns to idle
/// WHY: Hardware finalize is not synchronous with the stop request
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_stopped_and_finalized_then_idle_with_entry_kept() {
    // Given: An active recording
    let mut harness = Harness::new().unwrap();
    harness.controller.start_recording().unwrap();
    harness.controller.on_tick();

    // When: Stopping
    harness.controller.stop_recording().unwrap();

    // Then: Still recording until the completion is processed
    assert!(harness.controller.state().is_recording());
    assert!(harness.controller.is_finalizing());

    let results = harness.pump();
    assert!(results.iter().all(Result::is_ok));
    assert!(harness.controller.state().is_idle());
    assert_eq!(harness.controller.entries().len(), 1);
    assert_eq!(harness.controller.elapsed_display(), ZERO_DISPLAY);
    assert!(!harness.controller.is_ticking());
}

/// WHAT: An unsuccessful finalize drops the entry and reports RecordingFailed
/// WHY: Every persisted name must point at a usable file
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failed_finalize_when_completion_arrives_then_entry_removed() {
    // Given: A recording whose finalize will fail
    let mut harness = Harness::new().unwrap();
    harness.audio.borrow_mut().stop_outcome = Some(false);
    harness.controller.start_recording().unwrap();
    let name = harness.controller.entries()[0].clone();

    // When: Stopping and processing the completion
    harness.controller.stop_recording().unwrap();
    let results = harness.pump();

    // Then: Failure surfaced once, idle, entry and file gone
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(SessionError::RecordingFailed { .. })));
    assert!(harness.controller.state().is_idle());
    assert!(harness.controller.entries().is_empty());
    assert!(persisted_names(&harness).is_empty());
    assert!(!harness.entry_path(&name).exists());
}

/// WHAT: A recorder failing on its own ends the cycle with RecordingFailed
/// WHY: A device error must not leave the session stuck in Recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_recorder_fails_without_stop_then_failed_and_entry_discarded() {
    // Given: A live recording
    let mut harness = Harness::new().unwrap();
    harness.controller.start_recording().unwrap();
    let name = harness.controller.entries()[0].clone();

    // When: The recorder reports failure before any stop request
    assert!(harness.fail_recording());
    let results = harness.pump();

    // Then: Failure surfaced once, idle, ticker stopped, entry and file gone
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(SessionError::RecordingFailed { .. })));
    assert!(harness.controller.state().is_idle());
    assert!(!harness.controller.is_ticking());
    assert!(harness.controller.entries().is_empty());
    assert!(persisted_names(&harness).is_empty());
    assert!(!harness.entry_path(&name).exists());
    assert!(!harness.audio.borrow().calls.contains(&"recorder_stop"));
}

/// WHAT: Five unpaused ticks read 00:00:05 and paused ticks change nothing
/// WHY: The recording readout counts only unpaused seconds
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_ticking_paused_and_unpaused_then_only_unpaused_counted() {
    // Given: An active recording
    let mut harness = Harness::new().unwrap();
    harness.controller.start_recording().unwrap();

    // When: Ticking five times
    for _ in 0..5 {
        harness.controller.on_tick();
    }

    // Then: Five seconds shown
    assert_eq!(harness.controller.elapsed_display(), "00:00:05");

    // When: Pausing and ticking five more times
    assert!(harness.controller.pause_toggle().unwrap());
    for _ in 0..5 {
        assert!(harness.controller.on_tick().is_none());
    }

    // Then: Unchanged
    assert_eq!(harness.controller.elapsed_display(), "00:00:05");
}

/// WHAT: Two pause toggles return to the original flag and forward to the recorder
/// WHY: Pause must pause and resume the active capture object
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_pause_toggled_twice_then_unpaused_and_recorder_resumed() {
    // Given: An active recording
    let mut harness = Harness::new().unwrap();
    harness.controller.start_recording().unwrap();

    // When: Toggling twice
    let first = harness.controller.pause_toggle().unwrap();
    let second = harness.controller.pause_toggle().unwrap();

    // Then: Paused then resumed, top-level state untouched
    assert!(first);
    assert!(!second);
    assert_eq!(
        harness.controller.state(),
        SessionState::Recording { paused: false }
    );
    assert_eq!(
        harness.audio.borrow().calls,
        vec!["record", "recorder_pause", "record"]
    );
}

/// WHAT: Pause is refused when the feature is disabled or nothing is active
/// WHY: Single-file variants shipped without pause
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_pause_disabled_or_idle_when_toggling_then_refused() {
    // Given: One controller without pause support, one idle with it
    let options = SessionOptions {
        pause_enabled: false,
        ..SessionOptions::default()
    };
    let mut without_pause =
        Harness::with(Permission::Granted, StorageMode::Single, options).unwrap();
    without_pause.controller.start_recording().unwrap();
    let mut idle = Harness::new().unwrap();

    // When: Toggling pause on both
    let disabled = without_pause.controller.pause_toggle();
    let inactive = idle.controller.pause_toggle();

    // Then: Distinct refusals, no state change
    assert!(matches!(disabled, Err(SessionError::PauseUnsupported { .. })));
    assert!(matches!(inactive, Err(SessionError::InvalidTransition { .. })));
    assert!(!without_pause.controller.state().is_paused());
}

/// WHAT: Playing an entry whose file vanished reports FileMissing
/// WHY: No player may be allocated for a missing file
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_missing_file_when_starting_playback_then_file_missing_and_idle() {
    // Given: A recorded entry whose file was removed behind our back
    let mut harness = Harness::new().unwrap();
    let name = harness.record_entry().unwrap();
    fs::remove_file(harness.entry_path(&name)).unwrap();

    // When: Playing it
    let result = harness.controller.start_playback(0);

    // Then: FileMissing, idle, no player built
    assert!(matches!(result, Err(SessionError::FileMissing { .. })));
    assert!(harness.controller.state().is_idle());
    assert_eq!(harness.audio.borrow().players_created, 0);
}

/// WHAT: Playback readout follows the player position and stop returns to idle
/// WHY: Playback time comes from the platform, not the tick counter
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_playback_when_ticking_and_stopping_then_position_shown_then_idle() {
    // Given: A recorded entry being played at 75 seconds in
    let mut harness = Harness::new().unwrap();
    harness.record_entry().unwrap();
    harness.controller.start_playback(0).unwrap();
    harness.audio.borrow_mut().position = Duration::from_millis(75_400);

    // When: Ticking
    let shown = harness.controller.on_tick().map(str::to_string);

    // Then: Whole seconds of the position
    assert_eq!(shown.as_deref(), Some("00:01:15"));
    assert_eq!(
        harness.controller.state(),
        SessionState::Playing { paused: false }
    );

    // When: Stopping and processing the completion
    harness.controller.stop_playback().unwrap();
    assert!(harness.controller.state().is_playing());
    let results = harness.pump();

    // Then: Idle with a reset readout and no ticker
    assert!(results.iter().all(Result::is_ok));
    assert!(harness.controller.state().is_idle());
    assert_eq!(harness.controller.elapsed_display(), ZERO_DISPLAY);
    assert!(!harness.controller.is_ticking());
}

/// WHAT: Bad indices and player failures leave the session idle
/// WHY: Playback errors are local and non-fatal
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_bad_index_or_player_failure_when_starting_playback_then_idle() {
    // Given: One recorded entry and a backend that cannot build players
    let mut harness = Harness::new().unwrap();
    harness.record_entry().unwrap();
    harness.audio.borrow_mut().fail_player_setup = true;

    // When: Playing an unknown index, then the real one
    let unknown = harness.controller.start_playback(3);
    let broken = harness.controller.start_playback(0);

    // Then: Specific errors, still idle
    assert!(matches!(
        unknown,
        Err(SessionError::EntryNotFound { index: 3, .. })
    ));
    assert!(matches!(broken, Err(SessionError::PlayerSetupFailed { .. })));
    assert!(harness.controller.state().is_idle());
}

/// WHAT: Unsuccessful playback completion reports PlaybackFailed and resets
/// WHY: The controller must be reusable after any failure
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_playback_when_player_reports_failure_then_playback_failed_and_idle() {
    // Given: Playback in progress
    let mut harness = Harness::new().unwrap();
    harness.record_entry().unwrap();
    harness.controller.start_playback(0).unwrap();

    // When: The player reports an unsuccessful end
    let result = harness.controller.handle_event(SessionEvent::PlaybackFinished {
        cycle: CycleId(2),
        success: false,
    });

    // Then: Failure surfaced, idle, and a new recording can start
    assert!(matches!(result, Err(SessionError::PlaybackFailed { .. })));
    assert!(harness.controller.state().is_idle());
    harness.controller.start_recording().unwrap();
}

/// WHAT: Deleting the middle entry removes only it and its file
/// WHY: Remaining entries must keep their relative order
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_three_entries_when_deleting_middle_then_others_keep_order() {
    // Given: Three recordings
    let mut harness = Harness::new().unwrap();
    let first = harness.record_entry().unwrap();
    let second = harness.record_entry().unwrap();
    let third = harness.record_entry().unwrap();

    // When: Deleting index 1
    let removed = harness.controller.delete_entry(1).unwrap();

    // Then: Exactly the middle entry and its file are gone
    assert_eq!(removed, second);
    assert!(!harness.entry_path(&second).exists());
    assert!(harness.entry_path(&first).is_file());
    assert!(harness.entry_path(&third).is_file());
    assert_eq!(harness.controller.entries(), [first.clone(), third.clone()]);
    assert_eq!(persisted_names(&harness), vec![first, third]);
}

/// WHAT: A failed file removal reports DeleteFailed and keeps the entry
/// WHY: The list must never lose a name whose file still exists
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_undeletable_file_when_deleting_then_delete_failed_and_entry_kept() {
    // Given: An entry whose path is now a directory
    let mut harness = Harness::new().unwrap();
    let name = harness.record_entry().unwrap();
    let path = harness.entry_path(&name);
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    // When: Deleting it
    let result = harness.controller.delete_entry(0);

    // Then: DeleteFailed, entry still listed and persisted
    assert!(matches!(result, Err(SessionError::DeleteFailed { .. })));
    assert_eq!(harness.controller.entries(), [name.clone()]);
    assert_eq!(persisted_names(&harness), vec![name]);
}

/// WHAT: Deleting while a cycle is active is refused
/// WHY: The active file must not disappear under the recorder
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_active_recording_when_deleting_then_invalid_transition() {
    // Given: One saved entry and a recording in progress
    let mut harness = Harness::new().unwrap();
    harness.record_entry().unwrap();
    harness.controller.start_recording().unwrap();

    // When: Deleting the saved entry
    let result = harness.controller.delete_entry(0);

    // Then: Refused and both entries remain
    assert!(matches!(
        result,
        Err(SessionError::InvalidTransition { operation: "delete a recording", .. })
    ));
    assert_eq!(harness.controller.entries().len(), 2);
}

/// WHAT: Losing the audio device stops the recording and keeps a produced file
/// WHY: Capture must not continue on a route that no longer exists
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_device_unavailable_then_stopped_and_entry_kept() {
    // Given: A recording that has produced a file
    let mut harness = Harness::new().unwrap();
    harness.controller.start_recording().unwrap();

    // When: The route monitor reports a lost device
    harness
        .controller
        .handle_event(SessionEvent::RouteChanged(
            RouteChangeReason::OldDeviceUnavailable,
        ))
        .unwrap();
    let results = harness.pump();

    // Then: Stop was requested, finalize completed, entry kept
    assert!(harness.audio.borrow().calls.contains(&"recorder_stop"));
    assert!(results.iter().all(Result::is_ok));
    assert!(harness.controller.state().is_idle());
    assert_eq!(harness.controller.entries().len(), 1);
}

/// WHAT: Losing the device before any file was produced discards the entry
/// WHY: An entry without a file would violate the library invariant
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_without_file_when_device_unavailable_then_entry_discarded() {
    // Given: A recorder that has not produced a file
    let mut harness = Harness::new().unwrap();
    harness.audio.borrow_mut().skip_file = true;
    harness.controller.start_recording().unwrap();
    assert_eq!(harness.controller.entries().len(), 1);

    // When: The device goes away
    harness
        .controller
        .on_route_change(RouteChangeReason::OldDeviceUnavailable)
        .unwrap();
    let results = harness.pump();

    // Then: Entry dropped and reported
    assert!(matches!(results.as_slice(), [Err(SessionError::RecordingFailed { .. })]));
    assert!(harness.controller.entries().is_empty());
    assert!(harness.controller.state().is_idle());
}

/// WHAT: Losing the device pauses playback; gaining one leaves it alone
/// WHY: Rendering must not jump to a different output silently
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_playback_when_route_changes_then_paused_only_on_device_loss() {
    // Given: Playback in progress
    let mut harness = Harness::new().unwrap();
    harness.record_entry().unwrap();
    harness.controller.start_playback(0).unwrap();

    // When: A new device appears
    harness
        .controller
        .on_route_change(RouteChangeReason::NewDeviceAvailable)
        .unwrap();

    // Then: Still playing
    assert_eq!(
        harness.controller.state(),
        SessionState::Playing { paused: false }
    );

    // When: The output device goes away
    harness
        .controller
        .on_route_change(RouteChangeReason::OldDeviceUnavailable)
        .unwrap();

    // Then: Paused, and a toggle resumes it
    assert_eq!(
        harness.controller.state(),
        SessionState::Playing { paused: true }
    );
    assert!(harness.audio.borrow().calls.contains(&"player_pause"));
    assert!(!harness.controller.pause_toggle().unwrap());
}

/// WHAT: Completions and ticks from another cycle are ignored
/// WHY: A late event must not end or advance a newer cycle
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_stale_events_arrive_then_ignored() {
    // Given: The first recording cycle is active
    let mut harness = Harness::new().unwrap();
    harness.controller.start_recording().unwrap();

    // When: Events for an unrelated cycle arrive
    harness
        .controller
        .handle_event(SessionEvent::RecordingFinished {
            cycle: CycleId(99),
            success: false,
        })
        .unwrap();
    harness
        .controller
        .handle_event(SessionEvent::Tick { cycle: CycleId(0) })
        .unwrap();

    // Then: Still recording with an untouched readout
    assert!(harness.controller.state().is_recording());
    assert_eq!(harness.controller.elapsed_display(), ZERO_DISPLAY);

    // When: A tick for the current cycle arrives
    harness
        .controller
        .handle_event(SessionEvent::Tick { cycle: CycleId(1) })
        .unwrap();

    // Then: The readout advances
    assert_eq!(harness.controller.elapsed_display(), "00:00:01");
}

/// WHAT: A second start is refused and a second stop is a no-op
/// WHY: A new cycle may only begin after the completion callback
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_finalizing_recording_when_start_or_stop_repeated_then_guarded() {
    // Given: A recording whose finalize never completes
    let mut harness = Harness::new().unwrap();
    harness.audio.borrow_mut().stop_outcome = None;
    harness.controller.start_recording().unwrap();
    harness.controller.stop_recording().unwrap();

    // When: Stopping again and trying to start
    harness.controller.stop_recording().unwrap();
    let restart = harness.controller.start_recording();

    // Then: One stop forwarded, restart refused as stopping
    let stops = harness
        .audio
        .borrow()
        .calls
        .iter()
        .filter(|call| **call == "recorder_stop")
        .count();
    assert_eq!(stops, 1);
    assert!(matches!(
        restart,
        Err(SessionError::InvalidTransition { state: "stopping", .. })
    ));
}

/// WHAT: Single mode reuses one fixed file name
/// WHY: The single-recording variant keeps exactly one entry
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_single_mode_when_recording_twice_then_one_fixed_entry() {
    // Given: A single-file library
    let mut harness = Harness::with(
        Permission::Granted,
        StorageMode::Single,
        SessionOptions::default(),
    )
    .unwrap();

    // When: Recording two cycles
    harness.record_entry().unwrap();
    harness.record_entry().unwrap();

    // Then: One entry with the fixed name
    assert_eq!(harness.controller.entries(), ["recording.wav".to_string()]);
}

/// WHAT: The record button starts, then stops, a recording
/// WHY: One control drives both directions
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_when_record_toggled_twice_then_full_cycle() {
    // Given: Idle
    let mut harness = Harness::new().unwrap();

    // When: Toggling twice and processing completion
    harness.controller.toggle_record().unwrap();
    assert!(harness.controller.state().is_recording());
    harness.controller.toggle_record().unwrap();
    harness.pump();

    // Then: Back to idle with one entry
    assert!(harness.controller.state().is_idle());
    assert_eq!(harness.controller.entries().len(), 1);
}

/// WHAT: The live ticker delivers tick events that advance the readout
/// WHY: The readout must update without user input
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_short_tick_period_when_waiting_then_tick_event_advances_readout() {
    // Given: A controller with a fast recording tick
    let options = SessionOptions {
        recording_tick: Duration::from_millis(10),
        ..SessionOptions::default()
    };
    let mut harness =
        Harness::with(Permission::Granted, StorageMode::Multiple, options).unwrap();
    harness.controller.start_recording().unwrap();

    // When: Waiting for the first event
    let event = tokio::time::timeout(Duration::from_secs(2), harness.events.recv())
        .await
        .unwrap()
        .unwrap();
    harness.controller.handle_event(event).unwrap();

    // Then: One second counted
    assert_eq!(harness.controller.elapsed_display(), "00:00:01");
}
