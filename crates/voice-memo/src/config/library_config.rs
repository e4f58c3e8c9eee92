use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use voice_memo_core::StorageMode;

/// Where and how recordings are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// `single` keeps one fixed file, `multiple` one file per recording.
    #[serde(default)]
    pub mode: StorageMode,
    /// Recordings directory (None = `recordings` under the data directory).
    #[serde(default)]
    pub directory: Option<PathBuf>,
}
