//! Coordinate → country cache with a pluggable persistence backend.
//!
//! The persisted form is a JSON object keyed by `"lat,lon"`. Every `store`
//! rewrites the whole snapshot. Loading is all-or-nothing: one bad key or a
//! malformed document yields an empty cache rather than a partial one.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid cache key: '{0}'")]
    InvalidKey(String),
}

// ──────────────────────────────────────────────
// Persistence backends
// ──────────────────────────────────────────────

/// Raw snapshot persistence. `load` returns `None` when nothing was saved yet.
pub trait CacheStore: Send {
    fn load(&self) -> Result<Option<String>, CacheError>;
    fn save(&self, snapshot: &str) -> Result<(), CacheError>;
}

/// Snapshot kept in a flat file, overwritten in full on every save.
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
}

impl CacheStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>, CacheError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, snapshot: &str) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, snapshot)?;
        Ok(())
    }
}

/// Memory-only backend. Clones share the same snapshot slot, so a test can
/// keep one handle to inspect what the cache wrote.
#[derive(Clone, Default)]
pub struct MemoryStore {
    snapshot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store as if a previous run had saved `snapshot`.
    pub fn with_snapshot(snapshot: &str) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(Some(snapshot.to_string()))),
        }
    }

    pub fn snapshot(&self) -> Option<String> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, CacheError> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &str) -> Result<(), CacheError> {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.to_string());
        Ok(())
    }
}

// ──────────────────────────────────────────────
// GeocodeCache
// ──────────────────────────────────────────────

/// Exact-bits coordinate key. No rounding: two coordinates that differ in
/// any bit are different entries, except that `-0.0` and `0.0` share a key
/// since they compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CoordKey {
    lat: u64,
    lon: u64,
}

impl CoordKey {
    fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: canonical_bits(lat),
            lon: canonical_bits(lon),
        }
    }

    fn lat(&self) -> f64 {
        f64::from_bits(self.lat)
    }

    fn lon(&self) -> f64 {
        f64::from_bits(self.lon)
    }
}

pub struct GeocodeCache {
    entries: HashMap<CoordKey, String>,
    store: Box<dyn CacheStore>,
}

impl GeocodeCache {
    /// Build a cache from whatever `store` holds. Load problems are logged
    /// and produce an empty cache.
    pub fn load(store: Box<dyn CacheStore>) -> Self {
        let entries = match store.load() {
            Ok(None) => HashMap::new(),
            Ok(Some(contents)) if contents.trim().is_empty() => {
                tracing::warn!("Geocode cache is empty, starting with an empty cache");
                HashMap::new()
            }
            Ok(Some(contents)) => match parse_snapshot(&contents) {
                Ok(entries) => {
                    tracing::info!(entries = entries.len(), "Geocode cache loaded");
                    entries
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Geocode cache unreadable, starting with an empty cache");
                    HashMap::new()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Geocode cache could not be read, starting with an empty cache");
                HashMap::new()
            }
        };

        Self { entries, store }
    }

    /// Cache backed by nothing; never persists.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    pub fn lookup(&self, lat: f64, lon: f64) -> Option<&str> {
        self.entries.get(&CoordKey::new(lat, lon)).map(String::as_str)
    }

    /// Insert or overwrite an entry, then persist the whole snapshot.
    ///
    /// The in-memory entry is kept even when persisting fails.
    pub fn store(&mut self, lat: f64, lon: f64, country: &str) -> Result<(), CacheError> {
        self.entries
            .insert(CoordKey::new(lat, lon), country.to_string());
        let snapshot = render_snapshot(&self.entries)?;
        self.store.save(&snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

fn format_key(key: &CoordKey) -> String {
    // `{:?}` keeps the trailing ".0" and round-trips exactly.
    format!("{:?},{:?}", key.lat(), key.lon())
}

fn parse_key(raw: &str) -> Result<CoordKey, CacheError> {
    let invalid = || CacheError::InvalidKey(raw.to_string());
    let (lat, lon) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    Ok(CoordKey::new(lat, lon))
}

fn parse_snapshot(contents: &str) -> Result<HashMap<CoordKey, String>, CacheError> {
    let raw: HashMap<String, String> = serde_json::from_str(contents)?;
    raw.into_iter()
        .map(|(key, country)| Ok((parse_key(&key)?, country)))
        .collect()
}

fn render_snapshot(entries: &HashMap<CoordKey, String>) -> Result<String, CacheError> {
    // BTreeMap for a stable on-disk order.
    let ordered: BTreeMap<String, &String> = entries
        .iter()
        .map(|(key, country)| (format_key(key), country))
        .collect();
    Ok(serde_json::to_string(&ordered)?)
}
