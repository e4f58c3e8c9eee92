use crate::{
    audio::{Player, Resampler, capture::hound_to_io, resampler::remix},
    session::Completion,
};

use std::{
    io,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use cpal::{
    Device, SampleFormat, Stream, StreamConfig,
    traits::{DeviceTrait, StreamTrait},
};
use hound::WavReader;
use tracing::{debug, error, info, instrument, warn};

/// A WAV file decoded to interleaved f32 samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClip {
    /// Interleaved samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl DecodedClip {
    /// Reads and decodes the whole file.
    #[instrument]
    pub fn open(path: &Path) -> io::Result<Self> {
        let reader = WavReader::open(path).map_err(hound_to_io)?;
        let spec = reader.spec();

        let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Float, _) => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(hound_to_io)?,
            (hound::SampleFormat::Int, bits) if bits <= 16 => reader
                .into_samples::<i16>()
                .map(|sample| sample.map(i16_to_f32))
                .collect::<Result<_, _>>()
                .map_err(hound_to_io)?,
            (hound::SampleFormat::Int, bits) => {
                let scale = (1u64 << (bits - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(hound_to_io)?
            }
        };

        debug!(
            samples = samples.len(),
            channels = spec.channels,
            sample_rate = spec.sample_rate,
            "Clip decoded"
        );

        Ok(Self {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }

    /// Length of the clip.
    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / usize::from(self.channels.max(1));
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate.max(1)))
    }
}

/// Plays a decoded WAV file on an output device.
///
/// Completion fires when the buffer drains, on [`Player::stop`], or with
/// `success = false` on a stream error, whichever comes first.
pub struct CpalPlayer {
    stream: Stream,
    frames_played: Arc<AtomicUsize>,
    sample_rate: u32,
    completion: Arc<Mutex<Option<Completion>>>,
}

impl CpalPlayer {
    /// Decodes `path` and prepares a paused output stream on `device`.
    #[instrument(skip(device, completion))]
    pub fn new(device: Device, path: &Path, completion: Completion) -> io::Result<Self> {
        let clip = DecodedClip::open(path)?;
        let duration = clip.duration();
        let (config, samples) = fit_to_device(&device, clip)?;

        let channels = usize::from(config.channels.max(1));
        let total_frames = samples.len() / channels;
        let samples = Arc::new(samples);
        let frames_played = Arc::new(AtomicUsize::new(0));
        let completion = Arc::new(Mutex::new(Some(completion)));

        let position = Arc::clone(&frames_played);
        let drained = Arc::clone(&completion);
        let errored = Arc::clone(&completion);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let start = position.load(Ordering::Acquire);
                    let wanted = data.len() / channels;
                    let count = wanted.min(total_frames.saturating_sub(start));
                    let from = start * channels;
                    let len = count * channels;

                    data[..len].copy_from_slice(&samples[from..from + len]);
                    data[len..].fill(0.0);
                    position.store(start + count, Ordering::Release);

                    if count < wanted {
                        fire(&drained, true);
                    }
                },
                move |err| {
                    error!("Audio output stream error: {}", err);
                    fire(&errored, false);
                },
                None,
            )
            .map_err(|e| io::Error::other(format!("Failed to build output stream: {}", e)))?;

        // Some hosts start a stream as soon as it is built.
        if let Err(e) = stream.pause() {
            debug!("Could not pause new output stream: {}", e);
        }

        info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            duration_ms = duration.as_millis(),
            "Player prepared"
        );

        Ok(Self {
            stream,
            frames_played,
            sample_rate: config.sample_rate,
            completion,
        })
    }
}

impl Player for CpalPlayer {
    fn play(&mut self) -> io::Result<()> {
        self.stream
            .play()
            .map_err(|e| io::Error::other(format!("Failed to start playback: {}", e)))
    }

    fn pause(&mut self) -> io::Result<()> {
        self.stream
            .pause()
            .map_err(|e| io::Error::other(format!("Failed to pause playback: {}", e)))
    }

    fn stop(&mut self) {
        if let Err(e) = self.stream.pause() {
            warn!("Failed to halt output stream: {}", e);
        }
        fire(&self.completion, true);
    }

    fn position(&self) -> Duration {
        let frames = self.frames_played.load(Ordering::Acquire);
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate.max(1)))
    }
}

fn fire(slot: &Mutex<Option<Completion>>, success: bool) {
    let completion = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    if let Some(completion) = completion {
        completion.finish(success);
    }
}

/// 16-bit PCM to float, the inverse of the capture conversion.
pub(crate) fn i16_to_f32(sample: i16) -> f32 {
    f32::from(sample) / f32::from(i16::MAX)
}

/// Chooses an output configuration for `clip` and converts the samples to it.
fn fit_to_device(device: &Device, clip: DecodedClip) -> io::Result<(StreamConfig, Vec<f32>)> {
    let ranges = device
        .supported_output_configs()
        .map_err(|e| io::Error::other(format!("Failed to query output configs: {}", e)))?;

    for range in ranges {
        if range.sample_format() == SampleFormat::F32
            && range.channels() == clip.channels
            && range.min_sample_rate() <= clip.sample_rate
            && clip.sample_rate <= range.max_sample_rate()
        {
            return Ok((
                range.with_sample_rate(clip.sample_rate).config(),
                clip.samples,
            ));
        }
    }

    let config = device
        .default_output_config()
        .map_err(|e| io::Error::other(format!("Failed to get output config: {}", e)))?
        .config();

    let remixed = remix(&clip.samples, clip.channels, config.channels);
    let samples = if clip.sample_rate == config.sample_rate {
        remixed
    } else {
        Resampler::new(clip.sample_rate, config.sample_rate, config.channels)?
            .resample(&remixed)?
    };

    debug!(
        from_rate = clip.sample_rate,
        to_rate = config.sample_rate,
        from_channels = clip.channels,
        to_channels = config.channels,
        "Clip converted for output device"
    );

    Ok((config, samples))
}
