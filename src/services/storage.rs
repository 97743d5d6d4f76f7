//! Client-side key/value storage shared between pages.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// One-shot flag set by the template editor after a save.
pub const TEMPLATE_SAVE_KEY: &str = "template-save";
/// Autosaved newsletter draft body.
pub const NEWSLETTER_AUTOSAVE_KEY: &str = "newsletter.autosave";
/// Whether campaigns are shown as cards rather than a table.
pub const CAMPAIGN_IS_CARD_KEY: &str = "campaign_is_card";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key/value store with `localStorage` semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store persisted as one JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// Marks that a template was just saved.
pub fn signal_template_saved<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<()> {
    store.set(TEMPLATE_SAVE_KEY, "true")
}

/// Reads and clears the template-saved flag.
pub fn take_template_save_signal<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<bool> {
    let signalled = store.get(TEMPLATE_SAVE_KEY)?.is_some();
    if signalled {
        store.remove(TEMPLATE_SAVE_KEY)?;
    }
    Ok(signalled)
}

/// Campaign view preference; defaults to the table view.
pub fn campaign_view_is_card<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<bool> {
    Ok(store
        .get(CAMPAIGN_IS_CARD_KEY)?
        .is_some_and(|v| v == "true"))
}

pub fn set_campaign_view_is_card<S: KeyValueStore + ?Sized>(store: &S, is_card: bool) -> StorageResult<()> {
    store.set(CAMPAIGN_IS_CARD_KEY, if is_card { "true" } else { "false" })
}

pub fn save_newsletter_draft<S: KeyValueStore + ?Sized>(store: &S, body: &str) -> StorageResult<()> {
    store.set(NEWSLETTER_AUTOSAVE_KEY, body)
}

pub fn load_newsletter_draft<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<Option<String>> {
    store.get(NEWSLETTER_AUTOSAVE_KEY)
}

pub fn clear_newsletter_draft<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<()> {
    store.remove(NEWSLETTER_AUTOSAVE_KEY)
}
