use tokio::sync::mpsc::{UnboundedSender, error::SendError};
use tracing::{info, warn};
use voice_memo_core::{MicrophonePermission, Permission, PermissionReply};

/// Microphone consent asked on the terminal and remembered in the config.
///
/// Requests are forwarded to the app loop, which prints the question and
/// reads the answer from the next input line.
pub struct ConsentPermission {
    status: Permission,
    prompt_tx: UnboundedSender<PermissionReply>,
}

impl ConsentPermission {
    /// Provider starting from the remembered answer, if any.
    pub fn new(remembered: Option<bool>, prompt_tx: UnboundedSender<PermissionReply>) -> Self {
        Self {
            status: permission_from_answer(remembered),
            prompt_tx,
        }
    }
}

impl MicrophonePermission for ConsentPermission {
    fn status(&self) -> Permission {
        self.status
    }

    fn request(&mut self, reply: PermissionReply) {
        info!("Asking for microphone consent");
        if let Err(SendError(reply)) = self.prompt_tx.send(reply) {
            warn!("Prompt channel closed, treating consent as refused");
            reply.resolve(false);
        }
    }
}

/// Maps a remembered yes/no answer to a permission status.
pub(crate) fn permission_from_answer(answer: Option<bool>) -> Permission {
    match answer {
        Some(true) => Permission::Granted,
        Some(false) => Permission::Denied,
        None => Permission::Undetermined,
    }
}

/// Parses a y/n answer. Anything else is `None`.
pub(crate) fn parse_consent(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
