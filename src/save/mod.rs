//! Save slots and preferences
//!
//! Handles the save-slot store, the engine blob text codec, and user
//! preferences.

mod atomic;
pub mod payload;
pub mod preferences;
pub mod store;

pub use payload::PayloadError;

pub use preferences::{
    Preferences, PreferencesError,
    load_preferences, save_preferences, preferences_path,
};

pub use store::{
    SaveEntry, SaveError, SaveSlot, SaveStore, SaveStoreData, SlotIdentity, SlotRef,
    FileBackend, MemoryBackend, StoreBackend,
    export_save, import_save, save_store_path,
    QUICKSAVE_NAME, SLOT_COUNT,
};
