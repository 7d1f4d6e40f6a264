//! Session state shared by the dialogs
//!
//! Bundles the engine handle, the save store and the user's preferences so
//! the host can pass one value around instead of reaching for globals.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::engine::EngineHandle;
use crate::save::{
    self, Preferences, PreferencesError, SaveEntry, SaveError, SaveSlot, SaveStore, SlotRef,
    StoreBackend, QUICKSAVE_NAME,
};

pub struct Session<B> {
    engine: EngineHandle,
    store: SaveStore<B>,
    preferences: Preferences,
    preferences_path: Option<PathBuf>,
}

impl<B: StoreBackend> Session<B> {
    pub fn new(engine: EngineHandle, store: SaveStore<B>) -> Self {
        Self {
            engine,
            store,
            preferences: Preferences::default(),
            preferences_path: None,
        }
    }

    /// Attach preferences and the file they are persisted to
    pub fn with_preferences(mut self, preferences: Preferences, path: Option<PathBuf>) -> Self {
        self.preferences = preferences;
        self.preferences_path = path;
        self
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn store(&self) -> &SaveStore<B> {
        &self.store
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    /// Write preferences back if they came from a file
    pub fn persist_preferences(&self) -> Result<(), PreferencesError> {
        match &self.preferences_path {
            Some(path) => save::save_preferences(&self.preferences, path),
            None => Ok(()),
        }
    }

    pub fn quicksave(&mut self) -> Result<(), SaveError> {
        self.quicksave_at(Utc::now())
    }

    pub fn quicksave_at(&mut self, now: DateTime<Utc>) -> Result<(), SaveError> {
        let payload = self.engine.borrow().save();
        self.store.quicksave(QUICKSAVE_NAME, now, &payload)?;
        self.announce(&SaveSlot::new(QUICKSAVE_NAME, now, &payload));
        Ok(())
    }

    /// Save the running game into regular slot `index` under the player's name
    pub fn save_to_slot(&mut self, index: usize) -> Result<(), SaveError> {
        self.save_to_slot_at(index, Utc::now())
    }

    pub fn save_to_slot_at(&mut self, index: usize, now: DateTime<Utc>) -> Result<(), SaveError> {
        let (name, payload) = {
            let engine = self.engine.borrow();
            (engine.player_name(), engine.save())
        };
        self.store.save(index, &name, now, &payload)?;
        self.announce(&SaveSlot::new(name, now, &payload));
        Ok(())
    }

    fn announce(&self, slot: &SaveSlot) {
        log::info!("Saved {:?}", slot.name);
        self.engine
            .borrow_mut()
            .log(&format!("*Done Saving {}*", slot.label()));
    }

    /// Hand a stored blob to the engine. Returns the engine's verdict.
    pub fn load(&self, entry: &SaveEntry) -> Result<bool, SaveError> {
        if entry.save.is_empty() {
            return Err(SaveError::NoSuchSave(entry.save.name.clone()));
        }
        let blob = entry.save.bytes()?;
        let accepted = self.engine.borrow_mut().load_save(&blob);
        if accepted {
            log::info!("Loaded {:?}", entry.save.label());
        } else {
            log::warn!("Engine rejected save {:?}", entry.save.label());
        }
        Ok(accepted)
    }

    pub fn delete(&mut self, entry: &SaveEntry) -> Result<Option<SlotRef>, SaveError> {
        self.store.delete(&entry.save.identity())
    }

    /// Write the blob as text to `dir/<name>.txt`. Returns the file written.
    pub fn export(&self, entry: &SaveEntry, dir: &Path) -> Result<PathBuf, SaveError> {
        let path = dir.join(format!("{}.txt", export_file_stem(&entry.save.name)));
        save::export_save(&entry.save, &path)?;
        Ok(path)
    }

    /// Load a previously exported text file into the engine
    pub fn import(&self, path: &Path) -> Result<bool, SaveError> {
        let payload = save::import_save(path)?;
        if payload.is_empty() {
            return Err(SaveError::NoSuchSave(path.display().to_string()));
        }
        Ok(self.engine.borrow_mut().load_save(&payload))
    }
}

/// Character names are free text; keep the export inside its directory
fn export_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "save".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use crate::save::MemoryBackend;
    use chrono::TimeZone;

    fn session(mock: MockEngine) -> (std::rc::Rc<std::cell::RefCell<MockEngine>>, Session<MemoryBackend>) {
        let (typed, handle) = mock.shared();
        (typed, Session::new(handle, SaveStore::new(MemoryBackend::new())))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_save_uses_player_name_and_logs() {
        let (mock, mut session) = session(MockEngine::accepting());

        session.save_to_slot_at(3, at(60)).unwrap();

        let data = session.store().load();
        let slot = &data.slots()[3];
        assert_eq!(slot.name, "Hero");
        assert_eq!(slot.bytes().unwrap(), vec![1, 2, 3]);
        let engine = mock.borrow();
        assert_eq!(engine.logs.len(), 1);
        assert!(engine.logs[0].starts_with("*Done Saving Hero "));
        assert!(engine.logs[0].ends_with('*'));
    }

    #[test]
    fn test_quicksave_is_named() {
        let (mock, mut session) = session(MockEngine::accepting());
        session.quicksave_at(at(1)).unwrap();

        let quick = session.store().load().quicksave.unwrap();
        assert_eq!(quick.name, QUICKSAVE_NAME);
        assert!(mock.borrow().logs[0].starts_with("*Done Saving QuickSave "));
    }

    #[test]
    fn test_bad_slot_does_not_log() {
        let (mock, mut session) = session(MockEngine::accepting());
        assert!(session.save_to_slot_at(9, at(1)).is_err());
        assert!(mock.borrow().logs.is_empty());
    }

    #[test]
    fn test_load_passes_blob_through() {
        let (mock, mut session) = session(MockEngine::accepting());
        session.quicksave_at(at(1)).unwrap();
        let entry = session.store().candidates().remove(0);

        assert!(session.load(&entry).unwrap());
        assert_eq!(mock.borrow().loaded, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_load_empty_slot_is_error() {
        let (mock, session) = session(MockEngine::accepting());
        let entry = SaveEntry {
            slot: SlotRef::Regular(0),
            save: SaveSlot::empty(),
        };
        assert!(matches!(session.load(&entry), Err(SaveError::NoSuchSave(_))));
        assert!(mock.borrow().loaded.is_empty());
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let (mock, mut session) = session(MockEngine::accepting());
        session.save_to_slot_at(0, at(1)).unwrap();
        let entry = session.store().candidates().remove(0);

        let path = session.export(&entry, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Hero.txt"));
        assert!(session.import(&path).unwrap());
        assert_eq!(mock.borrow().loaded, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_delete_by_identity() {
        let (_mock, mut session) = session(MockEngine::accepting());
        session.save_to_slot_at(2, at(5)).unwrap();
        let entry = session.store().candidates().remove(0);

        assert_eq!(session.delete(&entry).unwrap(), Some(SlotRef::Regular(2)));
        assert!(session.store().candidates().is_empty());
    }

    #[test]
    fn test_export_name_stays_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut mock = MockEngine::accepting();
        mock.name = "Ayla/Bo".to_string();
        let (_mock, mut session) = session(mock);
        session.save_to_slot_at(0, at(1)).unwrap();
        let entry = session.store().candidates().remove(0);

        let path = session.export(&entry, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Ayla_Bo.txt"));
        assert!(path.exists());
    }

    #[test]
    fn test_export_file_stem() {
        assert_eq!(export_file_stem("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(export_file_stem(".."), "save");
        assert_eq!(export_file_stem("  "), "save");
        assert_eq!(export_file_stem("C:\\x"), "C__x");
        assert_eq!(export_file_stem("Hero"), "Hero");
    }

    #[test]
    fn test_corrupt_slot_load_is_error() {
        let (mock, session) = session(MockEngine::accepting());
        let mut save = SaveSlot::new("Hero", at(1), &[1]);
        save.payload = "1,x".to_string();
        let entry = SaveEntry { slot: SlotRef::Regular(0), save };

        assert!(matches!(session.load(&entry), Err(SaveError::Payload(_))));
        assert!(mock.borrow().loaded.is_empty());
    }
}
