mod backend;
mod boundary;
pub(crate) mod capture;
mod device;
pub(crate) mod playback;
pub(crate) mod resampler;

pub(crate) use resampler::Resampler;

pub use {
    backend::CpalBackend,
    boundary::{AudioBackend, CaptureQuality, CaptureSettings, Player, Recorder},
    capture::CpalRecorder,
    device::{DeviceSnapshot, RouteMonitor},
    playback::{CpalPlayer, DecodedClip},
};
