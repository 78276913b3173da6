use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed key of the cache entry inside the preference store
pub const PREFERENCES_KEY: &str = "searcher_cache";
/// Fixed name of the mirror file and of the bundled seed asset
pub const CACHE_FILE_NAME: &str = "tf-cached-search-data.txt";
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

pub const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsoft.com/bing/v5.0/images/search";
pub const DEFAULT_MARKET: &str = "en-us";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub const ENV_API_KEY: &str = "THUMBSCOUT_API_KEY";
pub const ENV_ENDPOINT: &str = "THUMBSCOUT_ENDPOINT";
pub const ENV_CACHE_DIR: &str = "THUMBSCOUT_CACHE";
pub const ENV_SEED: &str = "THUMBSCOUT_SEED";

/// Where the cache store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Fast local key-value file holding the cache under [`PREFERENCES_KEY`]
    pub preferences_path: PathBuf,
    /// Durable duplicate written on every save
    pub mirror_path: PathBuf,
    /// Read-only seed consulted only while no preference entry exists
    pub seed_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Lays out both writable files under `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            preferences_path: dir.join(PREFERENCES_FILE_NAME),
            mirror_path: dir.join(CACHE_FILE_NAME),
            seed_path: None,
        }
    }

    pub fn with_seed<P: AsRef<Path>>(mut self, seed_path: P) -> Self {
        self.seed_path = Some(seed_path.as_ref().to_path_buf());
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir(get_default_cache_dir())
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_key: String,
    pub market: String,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            market: DEFAULT_MARKET.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearcherConfig {
    pub store: StoreConfig,
    pub provider: ProviderConfig,
}

impl SearcherConfig {
    /// Defaults overridden by the `THUMBSCOUT_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(api_key) = env::var(ENV_API_KEY) {
            config.provider.api_key = api_key;
        }
        if let Ok(endpoint) = env::var(ENV_ENDPOINT) {
            config.provider.endpoint = endpoint;
        }
        if let Ok(seed) = env::var(ENV_SEED) {
            config.store.seed_path = Some(PathBuf::from(seed));
        }
        config
    }
}

/// Returns the default directory for the preference and mirror files
pub fn get_default_cache_dir() -> PathBuf {
    // 1. Check environment variable
    if let Ok(path) = env::var(ENV_CACHE_DIR) {
        return PathBuf::from(path);
    }

    // 2. Use platform-specific cache directory
    if let Some(cache_dir) = dirs::cache_dir() {
        return cache_dir.join("thumbscout");
    }

    // 3. Fallback to user's home directory
    if let Some(home_dir) = dirs::home_dir() {
        return home_dir.join(".cache").join("thumbscout");
    }

    // 4. If all else fails, use system temp directory
    env::temp_dir().join("thumbscout")
}
