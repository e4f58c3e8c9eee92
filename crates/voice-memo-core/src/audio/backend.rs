use crate::{
    audio::{
        AudioBackend, CaptureSettings, CpalPlayer, CpalRecorder, Player, Recorder,
        device::device_name,
    },
    session::Completion,
};

use std::{io, path::Path};

use cpal::{Device, traits::HostTrait};
use tracing::{debug, instrument};

/// [`AudioBackend`] for the default `cpal` host.
///
/// Devices are looked up by name on every request so a reconnected device
/// is picked up again; `None` means the host default.
#[derive(Debug, Clone, Default)]
pub struct CpalBackend {
    input_device: Option<String>,
    output_device: Option<String>,
}

impl CpalBackend {
    /// Backend using the named devices, or the defaults.
    pub fn new(input_device: Option<String>, output_device: Option<String>) -> Self {
        Self {
            input_device,
            output_device,
        }
    }

    fn input(&self) -> io::Result<Device> {
        let host = cpal::default_host();
        match &self.input_device {
            Some(name) => host
                .input_devices()
                .map_err(|e| io::Error::other(format!("Failed to list input devices: {}", e)))?
                .find(|d| device_name(d).as_deref() == Some(name.as_str()))
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Input device not found: {}", name),
                    )
                }),
            None => host
                .default_input_device()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No microphone found")),
        }
    }

    fn output(&self) -> io::Result<Device> {
        let host = cpal::default_host();
        match &self.output_device {
            Some(name) => host
                .output_devices()
                .map_err(|e| io::Error::other(format!("Failed to list output devices: {}", e)))?
                .find(|d| device_name(d).as_deref() == Some(name.as_str()))
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Output device not found: {}", name),
                    )
                }),
            None => host
                .default_output_device()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No output device found")),
        }
    }
}

impl AudioBackend for CpalBackend {
    #[instrument(skip(self, completion))]
    fn create_recorder(
        &mut self,
        path: &Path,
        settings: &CaptureSettings,
        completion: Completion,
    ) -> io::Result<Box<dyn Recorder>> {
        let device = self.input()?;
        debug!(device = ?device_name(&device), "Using input device");
        Ok(Box::new(CpalRecorder::new(device, settings, path, completion)?))
    }

    #[instrument(skip(self, completion))]
    fn create_player(
        &mut self,
        path: &Path,
        completion: Completion,
    ) -> io::Result<Box<dyn Player>> {
        let device = self.output()?;
        debug!(device = ?device_name(&device), "Using output device");
        Ok(Box::new(CpalPlayer::new(device, path, completion)?))
    }
}
