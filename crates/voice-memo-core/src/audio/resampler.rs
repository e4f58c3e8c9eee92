use std::io;

use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

/// Upper bound on silent chunks fed after the input to drain the filter.
const MAX_FLUSH_CHUNKS: usize = 4;

/// Interleaved multi-channel sample rate converter used for playback.
pub struct Resampler {
    resampler: Fft<f32>,
    input_rate: u32,
    output_rate: u32,
    channels: usize,
    chunk_frames: usize,
}

impl Resampler {
    #[instrument]
    pub fn new(input_rate: u32, output_rate: u32, channels: u16) -> io::Result<Self> {
        let chunk_frames = 1024;
        let sub_chunks = 2;
        let channels = usize::from(channels.max(1));

        let resampler = Fft::<f32>::new(
            input_rate as usize,
            output_rate as usize,
            chunk_frames,
            sub_chunks,
            channels,
            FixedSync::Input,
        )
        .map_err(|e| io::Error::other(format!("Failed to create resampler: {}", e)))?;

        debug!(input_rate, output_rate, channels, "Resampler initialized");

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
            channels,
            chunk_frames,
        })
    }

    /// Converts a whole interleaved buffer.
    ///
    /// The filter delay is trimmed from the front and the tail is flushed, so
    /// output frame `n` lines up with input time `n / output_rate`.
    #[instrument(skip(self, samples))]
    pub fn resample(&mut self, samples: &[f32]) -> io::Result<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }
        self.resampler.reset();

        let input_frames = samples.len() / self.channels;
        let estimated_frames =
            (input_frames as f64 * self.output_rate as f64 / self.input_rate as f64) as usize;
        let delay = self.resampler.output_delay();
        let wanted_frames = delay + estimated_frames;
        let mut output = Vec::with_capacity(wanted_frames * self.channels);

        for chunk in samples.chunks(self.chunk_frames * self.channels) {
            self.process_chunk(chunk, &mut output)?;
        }

        let mut flushes = 0;
        loop {
            self.process_chunk(&[], &mut output)?;
            flushes += 1;
            if output.len() / self.channels >= wanted_frames || flushes == MAX_FLUSH_CHUNKS {
                break;
            }
        }

        let end = (wanted_frames * self.channels).min(output.len());
        let start = (delay * self.channels).min(end);
        output.truncate(end);
        output.drain(..start);

        debug!(
            input_frames,
            output_frames = output.len() / self.channels,
            delay,
            flushes,
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Resampled clip"
        );

        Ok(output)
    }

    /// Runs one zero-padded input chunk and appends what it produced.
    fn process_chunk(&mut self, chunk: &[f32], output: &mut Vec<f32>) -> io::Result<()> {
        let chunk_len = self.chunk_frames * self.channels;
        let mut input_chunk = chunk.to_vec();
        input_chunk.resize(chunk_len, 0.0);

        let input_adapter = InterleavedSlice::new(&input_chunk, self.channels, self.chunk_frames)
            .map_err(|e| io::Error::other(format!("Failed to create input adapter: {}", e)))?;

        let output_frames = self.resampler.output_frames_max();
        let mut output_chunk = vec![0.0f32; output_frames * self.channels];

        let mut output_adapter =
            InterleavedSlice::new_mut(&mut output_chunk, self.channels, output_frames)
                .map_err(|e| io::Error::other(format!("Failed to create output adapter: {}", e)))?;

        let (_consumed, written) = self
            .resampler
            .process_into_buffer(&input_adapter, &mut output_adapter, None)
            .map_err(|e| io::Error::other(format!("Resampling failed: {}", e)))?;

        output.extend_from_slice(&output_chunk[..written * self.channels]);
        Ok(())
    }
}

/// Maps interleaved frames from `from` channels to `to` channels.
///
/// Down to mono averages, otherwise channels are copied round-robin.
pub(crate) fn remix(samples: &[f32], from: u16, to: u16) -> Vec<f32> {
    let from = usize::from(from.max(1));
    let to = usize::from(to.max(1));
    if from == to {
        return samples.to_vec();
    }

    let mut output = Vec::with_capacity(samples.len() / from * to);
    for frame in samples.chunks_exact(from) {
        if to == 1 {
            output.push(frame.iter().sum::<f32>() / from as f32);
        } else {
            output.extend((0..to).map(|channel| frame[channel % from]));
        }
    }
    output
}
