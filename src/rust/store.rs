use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, error, info, warn};

use crate::config::{StoreConfig, PREFERENCES_KEY};
use crate::error::StoreError;
use crate::thumbnails::ThumbnailCache;

/// Key-value preference file: a flat JSON object of string keys to string
/// values. The cache lives in it as a JSON string under [`PREFERENCES_KEY`].
type Preferences = BTreeMap<String, String>;

/// Outcome of [`CacheStore::save`]. Failures are already logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub preferences_written: bool,
    pub mirror_written: bool,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.preferences_written && self.mirror_written
    }
}

/// Durable home of the thumbnail cache.
///
/// Loading never fails: anything unreadable degrades to an empty cache.
/// Saving is best-effort and writes both the preference entry and a mirror
/// file holding the same JSON.
#[derive(Debug, Clone)]
pub struct CacheStore {
    config: StoreConfig,
}

impl CacheStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Store in the default cache directory
    pub fn new_default() -> Self {
        Self::new(StoreConfig::default())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Reads the cache from the preference entry, or from the seed asset when
    /// no entry has been written yet.
    pub fn load(&self) -> ThumbnailCache {
        let json = match self.read_preference() {
            Ok(Some(json)) => {
                debug!("Loading cache from preferences {:?}", self.config.preferences_path);
                Some(json)
            }
            Ok(None) => self.read_seed(),
            Err(e) => {
                warn!("Could not read preferences: {}", e);
                None
            }
        };

        let Some(json) = json.filter(|json| !json.trim().is_empty()) else {
            info!("No cached thumbnails found, starting empty");
            return ThumbnailCache::new();
        };

        match ThumbnailCache::from_json(&json) {
            Ok(cache) => {
                info!("Loaded {} cached terms", cache.len());
                cache
            }
            Err(e) => {
                warn!("Discarding unreadable cache: {}", e);
                ThumbnailCache::new()
            }
        }
    }

    /// Writes `cache` to the preference store and to the mirror file.
    pub fn save(&self, cache: &ThumbnailCache) -> SaveReport {
        let json = match cache.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize cache: {}", e);
                return SaveReport {
                    preferences_written: false,
                    mirror_written: false,
                };
            }
        };

        let preferences_written = match self.write_preference(&json) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save cache to preferences: {}", e);
                false
            }
        };

        let mirror_written = match write_file(&self.config.mirror_path, &json) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to write cache mirror: {}", e);
                false
            }
        };

        info!(
            "Saved {} cached terms (preferences: {}, mirror: {})",
            cache.len(),
            preferences_written,
            mirror_written
        );
        SaveReport {
            preferences_written,
            mirror_written,
        }
    }

    /// Removes the preference entry so the next load falls back to the seed.
    /// An unreadable preference file is reset to empty.
    pub fn clear(&self) -> Result<(), StoreError> {
        match self.read_preferences() {
            Ok(mut preferences) => {
                if preferences.remove(PREFERENCES_KEY).is_some() {
                    self.write_preferences(&preferences)?;
                }
            }
            Err(e) => {
                warn!("Resetting unreadable preferences: {}", e);
                self.write_preferences(&Preferences::new())?;
            }
        }
        Ok(())
    }

    fn read_preference(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_preferences()?.remove(PREFERENCES_KEY))
    }

    fn write_preference(&self, json: &str) -> Result<(), StoreError> {
        // Keep unrelated keys; an unreadable file is replaced outright.
        let mut preferences = self.read_preferences().unwrap_or_else(|e| {
            warn!("Overwriting unreadable preferences: {}", e);
            Preferences::new()
        });
        preferences.insert(PREFERENCES_KEY.to_string(), json.to_string());
        self.write_preferences(&preferences)
    }

    fn read_preferences(&self) -> Result<Preferences, StoreError> {
        match fs::read_to_string(&self.config.preferences_path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StoreError::Load(format!("{:?}: {}", self.config.preferences_path, e))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Preferences::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_preferences(&self, preferences: &Preferences) -> Result<(), StoreError> {
        let contents = serde_json::to_string(preferences)?;
        write_file(&self.config.preferences_path, &contents)
    }

    fn read_seed(&self) -> Option<String> {
        let path = self.config.seed_path.as_ref()?;
        match read_first_line(path) {
            Ok(line) => {
                info!("Loading cache from seed {:?}", path);
                Some(line)
            }
            Err(e) => {
                warn!("Could not read seed {:?}: {}", path, e);
                None
            }
        }
    }
}

/// The seed asset is a single line of JSON.
fn read_first_line(path: &Path) -> io::Result<String> {
    let mut line = String::new();
    BufReader::new(fs::File::open(path)?).read_line(&mut line)?;
    Ok(line)
}

fn write_file(path: &Path, contents: &str) -> Result<(), StoreError> {
    let save_error = |source: io::Error| StoreError::Save {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(save_error)?;
    }
    fs::write(path, contents.as_bytes()).map_err(save_error)
}
