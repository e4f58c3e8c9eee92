use crate::session::{EventSender, SessionEvent};

use tracing::debug;

/// Microphone access as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Access allowed.
    Granted,
    /// Access refused.
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

/// Delivers the answer to a permission prompt back to the controller.
#[derive(Debug)]
pub struct PermissionReply {
    events: EventSender,
}

impl PermissionReply {
    pub(crate) fn new(events: EventSender) -> Self {
        Self { events }
    }

    /// Sends the answer. Consumes the reply so it is answered at most once.
    pub fn resolve(self, granted: bool) {
        if self
            .events
            .send(SessionEvent::PermissionResolved { granted })
            .is_err()
        {
            debug!("Session channel closed, permission answer dropped");
        }
    }
}

/// Platform capability for querying and requesting microphone access.
pub trait MicrophonePermission {
    /// Current cached status.
    fn status(&self) -> Permission;

    /// Asks the user. The answer arrives later through `reply`.
    fn request(&mut self, reply: PermissionReply);
}
