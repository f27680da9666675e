//! Flat-file JSON store: the reference storage backend behind the
//! repository trait.
//!
//! One file under `~/.tally` holds every quantity type and entry. Reads
//! take a shared lock, writes land via temp file + rename under an
//! exclusive lock so concurrent CLI invocations never see a torn file.
//! A corrupt file degrades to an empty store with a warning, never an
//! error.

use chrono::{DateTime, Utc};
use directories::BaseDirs;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::services::repository::QuantityRepository;
use crate::types::{Entry, QuantityType, Result, TallyError, ValueFormat};

const STORE_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    quantity_types: Vec<QuantityType>,
    entries: Vec<Entry>,
}

/// JSON-file-backed store.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Open the default store at `~/.tally/tally.json`, creating the
    /// directory if needed.
    pub fn open_default() -> Result<Self> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| TallyError::Store("Cannot determine home directory".into()))?;
        let dir = base_dirs.home_dir().join(".tally");
        fs::create_dir_all(&dir)?;
        Ok(Self {
            path: dir.join("tally.json"),
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed the four starter quantity types into an empty store.
    /// Returns whether seeding happened.
    pub fn seed_defaults(&self) -> Result<bool> {
        let mut data = self.load();
        if !data.quantity_types.is_empty() {
            return Ok(false);
        }

        let defaults: [(&str, ValueFormat, &str); 4] = [
            ("Minutes Read", ValueFormat::Duration, "book.fill"),
            ("Steps", ValueFormat::Integer, "figure.walk"),
            ("Calories", ValueFormat::Integer, "flame.fill"),
            ("Water (oz)", ValueFormat::Decimal, "drop.fill"),
        ];
        for (index, (name, format, icon)) in defaults.into_iter().enumerate() {
            let mut qt = QuantityType::new(name, format);
            qt.icon = icon.to_string();
            qt.sort_order = index as i32;
            data.quantity_types.push(qt);
        }

        self.save(&data)?;
        Ok(true)
    }

    pub fn insert_quantity_type(&self, quantity_type: QuantityType) -> Result<()> {
        let mut data = self.load();
        data.quantity_types.push(quantity_type);
        self.save(&data)
    }

    /// Delete a quantity type by id, cascading to its entries.
    pub fn delete_quantity_type(&self, quantity_type_id: Uuid) -> Result<()> {
        let mut data = self.load();
        let before = data.quantity_types.len();
        data.quantity_types.retain(|qt| qt.id != quantity_type_id);
        if data.quantity_types.len() == before {
            return Err(TallyError::Store(format!(
                "no quantity type with id {}",
                quantity_type_id
            )));
        }
        data.entries
            .retain(|entry| entry.quantity_type_id != quantity_type_id);
        self.save(&data)
    }

    /// Append an entry and bump the owning type's `last_used_at`.
    pub fn insert_entry(&self, entry: Entry) -> Result<()> {
        let mut data = self.load();
        let owner = data
            .quantity_types
            .iter_mut()
            .find(|qt| qt.id == entry.quantity_type_id)
            .ok_or_else(|| {
                TallyError::Store(format!(
                    "entry references missing quantity type {}",
                    entry.quantity_type_id
                ))
            })?;
        owner.touch();
        data.entries.push(entry);
        self.save(&data)
    }

    /// Case-insensitive lookup by display name.
    pub fn quantity_type_by_name(&self, name: &str) -> Option<QuantityType> {
        let wanted = name.trim().to_lowercase();
        self.load()
            .quantity_types
            .into_iter()
            .find(|qt| qt.name.to_lowercase() == wanted)
    }

    /// Like [`quantity_type_by_name`], erroring when absent.
    ///
    /// [`quantity_type_by_name`]: JsonStore::quantity_type_by_name
    pub fn require_by_name(&self, name: &str) -> Result<QuantityType> {
        self.quantity_type_by_name(name)
            .ok_or_else(|| TallyError::UnknownQuantityType(name.to_string()))
    }

    /// The quantity type logged to most recently.
    pub fn most_recently_used(&self) -> Option<QuantityType> {
        self.load()
            .quantity_types
            .into_iter()
            .max_by_key(|qt| qt.last_used_at)
    }

    pub fn all_entries(&self) -> Vec<Entry> {
        self.load().entries
    }

    /// Load the store, degrading to empty on a missing or corrupt file.
    fn load(&self) -> StoreFile {
        if !self.path.exists() {
            return StoreFile {
                version: STORE_VERSION,
                ..StoreFile::default()
            };
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[tally] Warning: failed to open store: {}", e);
                return StoreFile::default();
            }
        };

        if let Err(e) = file.lock_shared() {
            eprintln!("[tally] Warning: failed to acquire read lock: {}", e);
            return StoreFile::default();
        }

        let mut content = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut content);
        let _ = file.unlock();

        if let Err(e) = read_result {
            eprintln!("[tally] Warning: failed to read store: {}", e);
            return StoreFile::default();
        }

        match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("[tally] Warning: store file is corrupt, starting empty: {}", e);
                StoreFile::default()
            }
        }
    }

    /// Save using atomic write (temp file + rename) with exclusive lock.
    fn save(&self, data: &StoreFile) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let payload = StoreFile {
            version: STORE_VERSION,
            quantity_types: data.quantity_types.clone(),
            entries: data.entries.clone(),
        };
        let content = serde_json::to_string_pretty(&payload)
            .map_err(|e| TallyError::Store(format!("serialization failed: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = File::create(&temp_path)
                .map_err(|e| TallyError::Store(format!("failed to create temp file: {}", e)))?;
            file.write_all(content.as_bytes())
                .map_err(|e| TallyError::Store(format!("failed to write temp file: {}", e)))?;
            file.sync_all()
                .map_err(|e| TallyError::Store(format!("failed to sync temp file: {}", e)))?;
        }

        let target = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        target
            .lock_exclusive()
            .map_err(|e| TallyError::Store(format!("failed to acquire write lock: {}", e)))?;

        let rename_result = fs::rename(&temp_path, &self.path);
        let _ = target.unlock();
        rename_result.map_err(|e| TallyError::Store(format!("failed to rename temp file: {}", e)))
    }
}

impl QuantityRepository for JsonStore {
    fn quantity_types(&self) -> Vec<QuantityType> {
        let mut types = self.load().quantity_types;
        types.sort_by_key(|qt| qt.sort_order);
        types
    }

    fn entries(&self, quantity_type_id: Uuid, since: Option<DateTime<Utc>>) -> Vec<Entry> {
        self.load()
            .entries
            .into_iter()
            .filter(|entry| entry.quantity_type_id == quantity_type_id)
            .filter(|entry| match since {
                Some(bound) => entry.timestamp >= bound,
                None => true,
            })
            .collect()
    }
}
