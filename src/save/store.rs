//! Save-slot store
//!
//! Five fixed slots plus one quicksave, persisted as a single JSON document
//! that is read, modified and written back whole on every mutation.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::atomic::write_text_atomic;
use super::payload::{self, PayloadError};
use crate::items::Listable;

/// Number of regular save slots
pub const SLOT_COUNT: usize = 5;

/// Name given to the quicksave slot
pub const QUICKSAVE_NAME: &str = "QuickSave";

/// Name shown for a cleared slot
pub const EMPTY_NAME: &str = "Empty";

/// Save store errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("slot {index} is out of range (0..{count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid save data: {0}")]
    Payload(#[from] PayloadError),

    #[error("No save named {0:?}")]
    NoSuchSave(String),
}

/// One save position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSlot {
    pub name: String,
    #[serde(rename = "time")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Engine blob in its stored text form, kept verbatim until a load
    /// decodes it. Empty means the slot holds no save.
    #[serde(rename = "data")]
    pub payload: String,
}

impl SaveSlot {
    pub fn new(name: impl Into<String>, timestamp: DateTime<Utc>, payload: &[u8]) -> Self {
        Self {
            name: name.into(),
            timestamp: Some(timestamp),
            payload: payload::encode(payload),
        }
    }

    /// The cleared-slot sentinel
    pub fn empty() -> Self {
        Self {
            name: EMPTY_NAME.to_string(),
            timestamp: None,
            payload: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Decode the stored blob. Only this slot is affected when it is corrupt.
    pub fn bytes(&self) -> Result<Vec<u8>, PayloadError> {
        payload::decode(&self.payload)
    }

    /// What delete matches on
    pub fn identity(&self) -> SlotIdentity {
        SlotIdentity {
            name: self.name.clone(),
            timestamp: self.timestamp,
        }
    }

    /// "<name> <local time>", time omitted when unset
    pub fn label(&self) -> String {
        match self.timestamp {
            Some(time) => format!(
                "{} {}",
                self.name,
                time.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
            ),
            None => self.name.clone(),
        }
    }
}

impl Default for SaveSlot {
    fn default() -> Self {
        Self::empty()
    }
}

/// `(name, timestamp)` pair used to find a save for deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotIdentity {
    pub name: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Where a save lives in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRef {
    Quicksave,
    /// Storage index into the regular slots
    Regular(usize),
}

/// A save together with its position, as listed in the menus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    pub slot: SlotRef,
    pub save: SaveSlot,
}

impl Listable for SaveEntry {
    fn display_name(&self) -> String {
        self.save.label()
    }
}

/// Persisted document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStoreData {
    pub quicksave: Option<SaveSlot>,
    #[serde(rename = "saves")]
    slots: Vec<SaveSlot>,
}

impl Default for SaveStoreData {
    fn default() -> Self {
        Self {
            quicksave: None,
            slots: vec![SaveSlot::empty(); SLOT_COUNT],
        }
    }
}

impl SaveStoreData {
    /// Regular slots in storage order; always `SLOT_COUNT` long
    pub fn slots(&self) -> &[SaveSlot] {
        &self.slots
    }

    /// Force the slot vector back to its fixed length
    fn normalize(&mut self) {
        if self.slots.len() != SLOT_COUNT {
            log::warn!(
                "Save store has {} slots, expected {}; normalizing",
                self.slots.len(),
                SLOT_COUNT
            );
            self.slots.resize(SLOT_COUNT, SaveSlot::empty());
        }
    }

    /// Overwrite a regular slot
    pub fn put(&mut self, index: usize, save: SaveSlot) -> Result<(), SaveError> {
        let slot = self.slots.get_mut(index).ok_or(SaveError::IndexOutOfRange {
            index,
            count: SLOT_COUNT,
        })?;
        *slot = save;
        Ok(())
    }

    /// Quicksave first, then non-empty regular slots in storage order.
    /// This is what load, delete and export pick from.
    pub fn candidates(&self) -> Vec<SaveEntry> {
        let quick = self.quicksave.iter().map(|save| SaveEntry {
            slot: SlotRef::Quicksave,
            save: save.clone(),
        });
        let regular = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, save)| !save.is_empty())
            .map(|(i, save)| SaveEntry {
                slot: SlotRef::Regular(i),
                save: save.clone(),
            });
        quick.chain(regular).collect()
    }

    /// All regular slots, newest first, unset timestamps last.
    /// Ties keep storage order.
    pub fn display_order(&self) -> Vec<SaveEntry> {
        let mut entries: Vec<SaveEntry> = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, save)| SaveEntry {
                slot: SlotRef::Regular(i),
                save: save.clone(),
            })
            .collect();
        // Option orders None first, so reverse the comparison for newest-first
        // with None at the end
        entries.sort_by(|a, b| b.save.timestamp.cmp(&a.save.timestamp));
        entries
    }

    /// Clear the first candidate matching `identity`.
    ///
    /// A matched quicksave becomes absent; a matched regular slot becomes the
    /// empty sentinel. Returns where the match was.
    pub fn delete(&mut self, identity: &SlotIdentity) -> Option<SlotRef> {
        let found = self
            .candidates()
            .into_iter()
            .find(|entry| entry.save.identity() == *identity)?
            .slot;
        match found {
            SlotRef::Quicksave => self.quicksave = None,
            SlotRef::Regular(i) => self.slots[i] = SaveSlot::empty(),
        }
        Some(found)
    }

    pub fn get(&self, slot: SlotRef) -> Option<&SaveSlot> {
        match slot {
            SlotRef::Quicksave => self.quicksave.as_ref(),
            SlotRef::Regular(i) => self.slots.get(i),
        }
    }
}

/// Raw persistence for the store document
pub trait StoreBackend {
    /// `Ok(None)` when nothing has been stored yet
    fn read(&self) -> Result<Option<String>, SaveError>;
    /// Replace the stored document
    fn write(&mut self, contents: &str) -> Result<(), SaveError>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreBackend for FileBackend {
    fn read(&self) -> Result<Option<String>, SaveError> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&mut self, contents: &str) -> Result<(), SaveError> {
        write_text_atomic(&self.path, contents)?;
        Ok(())
    }
}

/// In-memory backend for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    contents: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl StoreBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, SaveError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), SaveError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }
}

/// Default location of the store file
pub fn save_store_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "aldon", "AldonsCrossing") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves.json");
        path
    } else {
        PathBuf::from("./saves.json")
    }
}

/// The save store over some backend
#[derive(Debug)]
pub struct SaveStore<B> {
    backend: B,
}

impl<B: StoreBackend> SaveStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read the current document. Missing or unreadable storage yields a
    /// fresh store.
    pub fn load(&self) -> SaveStoreData {
        let raw = match self.backend.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return SaveStoreData::default(),
            Err(e) => {
                log::warn!("Failed to read save store: {}, starting fresh", e);
                return SaveStoreData::default();
            }
        };
        match serde_json::from_str::<SaveStoreData>(&raw) {
            Ok(mut data) => {
                data.normalize();
                data
            }
            Err(e) => {
                log::warn!("Failed to parse save store: {}, starting fresh", e);
                SaveStoreData::default()
            }
        }
    }

    fn persist(&mut self, data: &SaveStoreData) -> Result<(), SaveError> {
        let json = serde_json::to_string(data)?;
        self.backend.write(&json)?;
        log::info!("Save store written ({} bytes)", json.len());
        Ok(())
    }

    /// Overwrite regular slot `index`
    pub fn save(
        &mut self,
        index: usize,
        name: &str,
        timestamp: DateTime<Utc>,
        payload: &[u8],
    ) -> Result<(), SaveError> {
        let mut data = self.load();
        data.put(index, SaveSlot::new(name, timestamp, payload))?;
        self.persist(&data)?;
        log::info!("Game saved to slot {}", index);
        Ok(())
    }

    /// Overwrite the quicksave
    pub fn quicksave(
        &mut self,
        name: &str,
        timestamp: DateTime<Utc>,
        payload: &[u8],
    ) -> Result<(), SaveError> {
        let mut data = self.load();
        data.quicksave = Some(SaveSlot::new(name, timestamp, payload));
        self.persist(&data)?;
        log::info!("Quicksave written");
        Ok(())
    }

    /// Delete the first candidate with this identity. `Ok(None)` if nothing
    /// matched, in which case nothing is written.
    pub fn delete(&mut self, identity: &SlotIdentity) -> Result<Option<SlotRef>, SaveError> {
        let mut data = self.load();
        let Some(found) = data.delete(identity) else {
            log::debug!("No save matches {:?}", identity);
            return Ok(None);
        };
        self.persist(&data)?;
        log::info!("Deleted save {:?}", found);
        Ok(Some(found))
    }

    pub fn candidates(&self) -> Vec<SaveEntry> {
        self.load().candidates()
    }

    pub fn display_order(&self) -> Vec<SaveEntry> {
        self.load().display_order()
    }
}

/// Write a save's blob to a plain text file exactly as stored
pub fn export_save(save: &SaveSlot, path: &Path) -> Result<(), SaveError> {
    fs::write(path, &save.payload)?;
    log::info!("Exported {} to {:?}", save.name, path);
    Ok(())
}

/// Read a blob previously written by `export_save`
pub fn import_save(path: &Path) -> Result<Vec<u8>, SaveError> {
    let text = fs::read_to_string(path)?;
    Ok(payload::decode(&text)?)
}
