use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use thumbscout::config::{ENV_API_KEY, ENV_CACHE_DIR, ENV_ENDPOINT, ENV_SEED};
use thumbscout::{
    BingImageSearch, CacheStore, Dispatch, SearchEvent, Searcher, SearcherConfig, StoreConfig,
    ThumbnailListener,
};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Labels to find thumbnails for; each is answered under its position
    #[arg(required = true)]
    terms: Vec<String>,

    /// Forget the saved cache and start again from the seed
    #[arg(short, long)]
    fresh: bool,

    /// Read-only seed used while no cache has been saved
    #[arg(long, env = ENV_SEED)]
    seed: Option<PathBuf>,

    /// Directory for the preference and mirror files
    #[arg(long, env = ENV_CACHE_DIR)]
    cache_dir: Option<PathBuf>,

    /// Image search subscription key
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    api_key: Option<String>,

    /// Image search endpoint
    #[arg(long, env = ENV_ENDPOINT)]
    endpoint: Option<String>,
}

impl Args {
    fn config(&self) -> SearcherConfig {
        let mut config = SearcherConfig::default();
        if let Some(dir) = &self.cache_dir {
            config.store = StoreConfig::in_dir(dir);
        }
        config.store.seed_path = self.seed.clone();
        if let Some(api_key) = &self.api_key {
            config.provider.api_key = api_key.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.provider.endpoint = endpoint.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config();

    let store = CacheStore::new(config.store.clone());
    if args.fresh {
        info!("Fresh start requested - removing saved cache...");
        store.clear().context("Failed to clear saved cache")?;
    }

    let provider = BingImageSearch::new(config.provider.clone())?;
    let searcher = Searcher::builder()
        .with_store(store)
        .with_provider(Arc::new(provider))
        .build()?;
    info!("Starting with {} cached terms", searcher.cache_len());

    let (tx, mut rx) = mpsc::unbounded_channel::<SearchEvent>();
    let listener: Arc<dyn ThumbnailListener> = Arc::new(tx);

    let start_time = Instant::now();
    let mut pending = 0;
    for (index, term) in args.terms.iter().enumerate() {
        let dispatch = searcher.find_thumbnails_for(term, index, &listener);
        info!("[{}] '{}': {:?}", index, term, dispatch);
        if dispatch == Dispatch::Rejected {
            eprintln!("[{}] skipping blank term", index);
        }
        pending += 1;
    }

    let mut failures = 0;
    while pending > 0 {
        let Some(event) = rx.recv().await else {
            bail!("Search results channel closed with {} requests pending", pending);
        };
        pending -= 1;
        match event {
            SearchEvent::Found {
                term,
                index,
                thumbnails,
            } => {
                println!("\n[{}] {}", index, term);
                for url in thumbnails.urls() {
                    println!("    {}", url);
                }
            }
            SearchEvent::Error {
                term,
                index,
                message,
            } => {
                failures += 1;
                eprintln!("\n[{}] {}: search failed: {}", index, term, message);
            }
        }
    }

    info!("All searches finished in {:.2?}", start_time.elapsed());
    let report = searcher.save_cache_to_disk();
    if !report.is_complete() {
        eprintln!("Warning: cache was only partially saved (see log)");
    }

    if failures > 0 {
        info!("{} of {} searches failed", failures, args.terms.len());
    }
    Ok(())
}
