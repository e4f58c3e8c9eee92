mod audio_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod library_config;

pub(crate) use {
    audio_config::AudioConfig, behaviour_config::BehaviourConfig, config::Config,
    library_config::LibraryConfig,
};

pub(crate) const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub(crate) const DEFAULT_CHANNELS: u16 = 2;
pub(crate) const DEFAULT_PAUSE_ENABLED: bool = true;
pub(crate) const DEFAULT_RECORDING_TICK_MS: u64 = 1_000;
pub(crate) const DEFAULT_PLAYBACK_TICK_MS: u64 = 100;
pub(crate) const DEFAULT_ROUTE_POLL_MS: u64 = 1_000;

pub(crate) fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

pub(crate) fn default_channels() -> u16 {
    DEFAULT_CHANNELS
}

pub(crate) fn default_pause_enabled() -> bool {
    DEFAULT_PAUSE_ENABLED
}

pub(crate) fn default_recording_tick_ms() -> u64 {
    DEFAULT_RECORDING_TICK_MS
}

pub(crate) fn default_playback_tick_ms() -> u64 {
    DEFAULT_PLAYBACK_TICK_MS
}

pub(crate) fn default_route_poll_ms() -> u64 {
    DEFAULT_ROUTE_POLL_MS
}
