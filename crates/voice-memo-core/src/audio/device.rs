use crate::session::{EventSender, RouteChangeReason, SessionEvent};

use std::{collections::BTreeSet, time::Duration};

use cpal::{
    Device,
    traits::{DeviceTrait, HostTrait},
};
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

/// Names of the audio devices present at one moment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSnapshot {
    inputs: BTreeSet<String>,
    outputs: BTreeSet<String>,
}

impl DeviceSnapshot {
    /// Snapshot from explicit device names.
    pub fn new<I, O>(inputs: I, outputs: O) -> Self
    where
        I: IntoIterator<Item = String>,
        O: IntoIterator<Item = String>,
    {
        Self {
            inputs: inputs.into_iter().collect(),
            outputs: outputs.into_iter().collect(),
        }
    }

    /// Enumerates the default host's devices. Blocking.
    pub fn capture() -> Self {
        let host = cpal::default_host();

        let inputs = match host.input_devices() {
            Ok(devices) => devices.filter_map(|d| device_name(&d)).collect(),
            Err(e) => {
                warn!("Failed to list input devices: {}", e);
                BTreeSet::new()
            }
        };
        let outputs = match host.output_devices() {
            Ok(devices) => devices.filter_map(|d| device_name(&d)).collect(),
            Err(e) => {
                warn!("Failed to list output devices: {}", e);
                BTreeSet::new()
            }
        };

        Self { inputs, outputs }
    }

    /// How the route changed going from `previous` to `self`.
    ///
    /// A lost device wins over a new one when both happened.
    pub fn route_change_since(&self, previous: &DeviceSnapshot) -> Option<RouteChangeReason> {
        let lost = previous.inputs.difference(&self.inputs).next().is_some()
            || previous.outputs.difference(&self.outputs).next().is_some();
        if lost {
            return Some(RouteChangeReason::OldDeviceUnavailable);
        }

        let gained = self.inputs.difference(&previous.inputs).next().is_some()
            || self.outputs.difference(&previous.outputs).next().is_some();
        gained.then_some(RouteChangeReason::NewDeviceAvailable)
    }
}

/// Polls the device list and reports route changes into the session channel.
#[derive(Debug)]
pub struct RouteMonitor {
    task: JoinHandle<()>,
}

impl RouteMonitor {
    /// Starts polling every `period`. Must be called within a tokio runtime.
    pub fn spawn(period: Duration, events: EventSender) -> Self {
        let task = tokio::spawn(async move {
            let mut previous = match tokio::task::spawn_blocking(DeviceSnapshot::capture).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(error = ?e, "Initial device scan failed");
                    DeviceSnapshot::default()
                }
            };

            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                let current = match tokio::task::spawn_blocking(DeviceSnapshot::capture).await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        warn!(error = ?e, "Device scan failed");
                        continue;
                    }
                };

                if let Some(reason) = current.route_change_since(&previous) {
                    info!(reason = ?reason, "Audio route changed");
                    if events.send(SessionEvent::RouteChanged(reason)).is_err() {
                        break;
                    }
                }
                previous = current;
            }

            debug!("Route monitor stopped");
        });

        info!(period_ms = period.as_millis(), "Route monitor started");

        Self { task }
    }

    /// Stops polling.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for RouteMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[allow(deprecated)]
pub(crate) fn device_name(device: &Device) -> Option<String> {
    device.name().ok()
}
