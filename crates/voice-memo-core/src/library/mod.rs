#[allow(clippy::module_inception)]
mod library;
mod store;

pub use {
    library::{Library, RECORDING_EXTENSION, SINGLE_RECORDING_NAME, STORED_NAMES_KEY, StorageMode},
    store::SettingsStore,
};
