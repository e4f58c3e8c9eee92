use crate::{
    audio::{CaptureQuality, CaptureSettings, Recorder},
    session::Completion,
};

use std::{
    fs::File,
    io::{self, BufWriter},
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use cpal::{
    Device, SampleFormat, Stream, StreamConfig,
    traits::{DeviceTrait, StreamTrait},
};
use hound::{WavSpec, WavWriter};
use tracing::{debug, error, info, instrument, warn};

pub(crate) type WavFileWriter = WavWriter<BufWriter<File>>;

/// Captures the input device into a WAV file.
///
/// The file is created when the recorder is built. Samples are written from
/// the audio callback; [`Recorder::stop`] finalizes on a blocking task and
/// reports through the [`Completion`]. A stream error finalizes right away
/// and reports failure without waiting for a stop.
pub struct CpalRecorder {
    device: Device,
    config: StreamConfig,
    quality: CaptureQuality,
    stream: Option<Stream>,
    writer: Arc<Mutex<Option<WavFileWriter>>>,
    /// Set before the stream is dropped so a late callback writes nothing.
    shutdown: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
    completion: Arc<Mutex<Option<Completion>>>,
}

impl CpalRecorder {
    /// Binds a recorder for `device` to a new file at `path`.
    #[instrument(skip(device, completion))]
    pub fn new(
        device: Device,
        settings: &CaptureSettings,
        path: &Path,
        completion: Completion,
    ) -> io::Result<Self> {
        let config = capture_config(&device, settings)?;
        let writer = WavWriter::create(path, wav_spec(&config, settings.quality))
            .map_err(hound_to_io)?;

        info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            quality = ?settings.quality,
            "Recorder prepared"
        );

        Ok(Self {
            device,
            config,
            quality: settings.quality,
            stream: None,
            writer: Arc::new(Mutex::new(Some(writer))),
            shutdown: Arc::new(AtomicBool::new(false)),
            failed: Arc::new(AtomicBool::new(false)),
            completion: Arc::new(Mutex::new(Some(completion))),
        })
    }

    fn build_stream(&self) -> io::Result<Stream> {
        let writer = Arc::clone(&self.writer);
        let shutdown = Arc::clone(&self.shutdown);
        let write_failed = Arc::clone(&self.failed);
        let stream_failed = Arc::clone(&self.failed);
        let stream_shutdown = Arc::clone(&self.shutdown);
        let stream_writer = Arc::clone(&self.writer);
        let stream_completion = Arc::clone(&self.completion);
        let quality = self.quality;

        self.device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    let mut guard = writer.lock().unwrap_or_else(|e| {
                        error!("WAV writer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    let Some(wav) = guard.as_mut() else {
                        return;
                    };
                    let written = match quality {
                        CaptureQuality::Standard => data
                            .iter()
                            .try_for_each(|&sample| wav.write_sample(f32_to_i16(sample))),
                        CaptureQuality::High => {
                            data.iter().try_for_each(|&sample| wav.write_sample(sample))
                        }
                    };
                    if let Err(e) = written
                        && !write_failed.swap(true, Ordering::AcqRel)
                    {
                        error!("Failed to write samples: {}", e);
                    }
                },
                move |err| {
                    error!("Audio input stream error: {}", err);
                    stream_failed.store(true, Ordering::Release);
                    stream_shutdown.store(true, Ordering::Release);
                    finish_capture(&stream_writer, &stream_completion, false);
                },
                None,
            )
            .map_err(|e| io::Error::other(format!("Failed to build input stream: {}", e)))
    }
}

impl Recorder for CpalRecorder {
    #[instrument(skip(self))]
    fn record(&mut self) -> io::Result<()> {
        if let Some(stream) = &self.stream {
            stream
                .play()
                .map_err(|e| io::Error::other(format!("Failed to resume capture: {}", e)))?;
            debug!("Capture resumed");
            return Ok(());
        }

        let stream = self.build_stream()?;
        stream
            .play()
            .map_err(|e| io::Error::other(format!("Failed to start capture: {}", e)))?;
        self.stream = Some(stream);

        info!("Capture started");

        Ok(())
    }

    #[instrument(skip(self))]
    fn pause(&mut self) -> io::Result<()> {
        if let Some(stream) = &self.stream {
            stream
                .pause()
                .map_err(|e| io::Error::other(format!("Failed to pause capture: {}", e)))?;
            debug!("Capture paused");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        drop(self.stream.take());

        let writer = Arc::clone(&self.writer);
        let failed = Arc::clone(&self.failed);
        let completion = Arc::clone(&self.completion);

        let _finalizer = tokio::task::spawn_blocking(move || {
            finish_capture(&writer, &completion, !failed.load(Ordering::Acquire));
        });
    }
}

impl Drop for CpalRecorder {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        drop(self.stream.take());
    }
}

/// Finalizes the file and reports the outcome, at most once per recorder.
///
/// `healthy` is false when the stream already failed; the report is then a
/// failure even if the header is written.
pub(crate) fn finish_capture(
    writer: &Mutex<Option<WavFileWriter>>,
    slot: &Mutex<Option<Completion>>,
    healthy: bool,
) {
    let Some(completion) = slot.lock().unwrap_or_else(|e| e.into_inner()).take() else {
        return;
    };

    let taken = writer.lock().unwrap_or_else(|e| e.into_inner()).take();
    let finalized = match taken {
        Some(wav) => wav.finalize(),
        None => Ok(()),
    };
    if let Err(e) = &finalized {
        error!("Failed to finalize recording: {}", e);
    }

    let success = healthy && finalized.is_ok();
    info!(success, "Recording finalized");
    completion.finish(success);
}

/// Converts a float sample to 16-bit PCM, clamping out-of-range input.
pub(crate) fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

pub(crate) fn hound_to_io(error: hound::Error) -> io::Error {
    match error {
        hound::Error::IoError(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

fn wav_spec(config: &StreamConfig, quality: CaptureQuality) -> WavSpec {
    let (bits_per_sample, sample_format) = match quality {
        CaptureQuality::Standard => (16, hound::SampleFormat::Int),
        CaptureQuality::High => (32, hound::SampleFormat::Float),
    };

    WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample,
        sample_format,
    }
}

/// Picks an f32 input configuration matching `settings`, or the device default.
fn capture_config(device: &Device, settings: &CaptureSettings) -> io::Result<StreamConfig> {
    let ranges = device
        .supported_input_configs()
        .map_err(|e| io::Error::other(format!("Failed to query input configs: {}", e)))?;

    for range in ranges {
        if range.sample_format() == SampleFormat::F32
            && range.channels() == settings.channels
            && range.min_sample_rate() <= settings.sample_rate
            && settings.sample_rate <= range.max_sample_rate()
        {
            return Ok(range.with_sample_rate(settings.sample_rate).config());
        }
    }

    let fallback = device
        .default_input_config()
        .map_err(|e| io::Error::other(format!("Failed to get input config: {}", e)))?;

    warn!(
        requested_rate = settings.sample_rate,
        requested_channels = settings.channels,
        sample_rate = fallback.sample_rate(),
        channels = fallback.channels(),
        "Requested capture format unsupported, using device default"
    );

    Ok(fallback.config())
}
