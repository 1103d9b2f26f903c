//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use procure_cache::{cache_key, Cache, FileStore, MemoryStore, SessionId};
use procure_commerce::cart::{CartHandle, CartStore};
use procure_commerce::catalog::InMemoryCatalog;

use crate::config::{CliConfig, StorageBackend, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Key remembering the session id between invocations.
const SESSION_KEY_PREFIX: &str = "session";

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Config file the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Directory relative paths in the config resolve against.
    pub base_dir: PathBuf,
}

impl Context {
    /// Load context from an explicit config file or the nearest one found
    /// walking up from the working directory.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some(found) => (CliConfig::load(&found)?, Some(found)),
                None => (CliConfig::default(), None),
            },
        };

        let base_dir = config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or(cwd);

        Ok(Self {
            config,
            config_path,
            output,
            base_dir,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve a path relative to the config file's directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.base_dir.join(path)
        }
    }

    /// Load the product catalog. A missing catalog file yields an empty catalog.
    pub fn catalog(&self) -> Result<InMemoryCatalog> {
        let path = self.resolve_path(&self.config.catalog.path);
        if !path.exists() {
            self.output
                .warn(&format!("Catalog not found at {}; using an empty catalog", path.display()));
            return Ok(InMemoryCatalog::default());
        }

        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        let catalog = InMemoryCatalog::from_json(&json)
            .with_context(|| format!("Invalid catalog: {}", path.display()))?;

        self.output
            .debug(&format!("Loaded {} products from {}", catalog.len(), path.display()));
        Ok(catalog)
    }

    /// Open the configured key-value store.
    pub fn cache(&self) -> Result<Cache> {
        let storage = &self.config.storage;
        match storage.backend {
            StorageBackend::File => {
                let root = self.resolve_path(&storage.path);
                let store = FileStore::open(&root)
                    .with_context(|| format!("Failed to open store at {}", root.display()))?;
                self.output.debug(&format!("Using file store at {}", root.display()));
                Ok(Cache::new(store))
            }
            StorageBackend::Memory => {
                let store = match storage.quota_bytes {
                    Some(quota) => MemoryStore::with_quota(quota),
                    None => MemoryStore::new(),
                };
                self.output.debug("Using in-memory store");
                Ok(Cache::new(store))
            }
        }
    }

    /// Session whose cart the commands operate on.
    ///
    /// A configured id wins. Otherwise the id remembered in the store is
    /// reused, and a fresh one is generated and remembered on first use.
    pub fn session(&self, cache: &Cache) -> Result<SessionId> {
        if let Some(id) = &self.config.session.id {
            return Ok(SessionId::new(id.clone()));
        }

        let key = cache_key!(SESSION_KEY_PREFIX, "current");
        match cache.get::<SessionId>(&key) {
            Ok(Some(session)) => return Ok(session),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "remembered session unreadable, starting a new one");
            }
        }

        let session = SessionId::generate();
        if let Err(error) = cache.set(&key, &session) {
            self.output
                .warn(&format!("Could not remember session {}: {}", session, error));
        }
        tracing::info!(session = %session, "started new session");
        Ok(session)
    }

    /// Open the cart for the current session.
    pub fn cart(&self) -> Result<CartHandle> {
        let catalog = self.catalog()?;
        let cache = self.cache()?;
        let session = self.session(&cache)?;
        self.output.debug(&format!("Session {}", session));

        let store = CartStore::open_session(Arc::new(catalog), cache, &session, &self.config.cart);
        Ok(CartHandle::new(store))
    }
}
