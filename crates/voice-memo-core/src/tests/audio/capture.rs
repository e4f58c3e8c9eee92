use crate::{
    Completion, CompletionKind, CycleId, SessionEvent,
    audio::capture::{WavFileWriter, finish_capture},
    event_channel,
};

use std::sync::Mutex;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tempfile::TempDir;

const CYCLE: CycleId = CycleId(7);

fn mono_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// WHAT: A stream failure finalizes the file and reports failure exactly once
/// WHY: A later stop must not emit a second completion for the same cycle
#[test]
#[allow(clippy::unwrap_used)]
fn given_stream_failure_when_finishing_twice_then_single_failed_completion() {
    // Given: An open writer with some samples and a pending completion
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("take.wav");
    let mut wav: WavFileWriter = WavWriter::create(&path, mono_spec()).unwrap();
    for _ in 0..80 {
        wav.write_sample(1000_i16).unwrap();
    }
    let writer = Mutex::new(Some(wav));
    let (events_tx, mut events) = event_channel();
    let completion = Mutex::new(Some(Completion::new(
        CYCLE,
        CompletionKind::Recording,
        events_tx,
    )));

    // When: The error path finishes first, then the stop path runs
    finish_capture(&writer, &completion, false);
    finish_capture(&writer, &completion, true);

    // Then: One failed completion, and the file was still finalized
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::RecordingFinished {
            cycle: CYCLE,
            success: false,
        }
    );
    assert!(events.try_recv().is_err());
    assert!(writer.lock().unwrap().is_none());
    assert_eq!(WavReader::open(&path).unwrap().len(), 80);
}

/// WHAT: A healthy stop finalizes and reports success
/// WHY: The normal stop path shares the same finishing routine
#[test]
#[allow(clippy::unwrap_used)]
fn given_healthy_stream_when_finishing_then_successful_completion() {
    // Given: An open writer and a pending completion
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("take.wav");
    let wav: WavFileWriter = WavWriter::create(&path, mono_spec()).unwrap();
    let writer = Mutex::new(Some(wav));
    let (events_tx, mut events) = event_channel();
    let completion = Mutex::new(Some(Completion::new(
        CYCLE,
        CompletionKind::Recording,
        events_tx,
    )));

    // When: Finishing without a prior failure
    finish_capture(&writer, &completion, true);

    // Then: Success is reported for the cycle
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::RecordingFinished {
            cycle: CYCLE,
            success: true,
        }
    );
    assert!(completion.lock().unwrap().is_none());
}
