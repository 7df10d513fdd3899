use std::collections::{HashMap, VecDeque};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use simmer_recipe::models::{Recipe, RecipeId};
use tracing::instrument;

use crate::clock::{Clock, SystemClock};

/// How long a cached recipe stays valid.
pub const TTL: Duration = Duration::from_secs(5 * 60);
/// How many recipes the cache holds before it starts evicting.
pub const MAX_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    pub ttl: Duration,
    /// Clamped to at least one.
    pub max_entries: usize,
}
impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: TTL,
            max_entries: MAX_SIZE,
        }
    }
}

/// Counters collected over the lifetime of a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    /// Lookups that found nothing, including those that found an expired entry.
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
}
impl CacheStats {
    /// Fraction of lookups that were hits, or zero before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }
}

struct CacheEntry {
    data: Recipe,
    timestamp: Instant,
}

#[derive(Default)]
struct Store {
    entries: HashMap<RecipeId, CacheEntry>,
    /// Keys in insertion order, oldest first. Always holds exactly the keys of
    /// `entries`.
    order: VecDeque<RecipeId>,
    stats: CacheStats,
}
impl Store {
    fn remove(&mut self, id: &RecipeId) -> Option<CacheEntry> {
        let entry = self.entries.remove(id)?;
        self.order.retain(|key| key != id);
        Some(entry)
    }
}

/// Time-limited, size-limited cache of recipes keyed by [`RecipeId`].
///
/// Create one per process with [`init`](Self::init), hand it to whatever needs
/// it, and [`dispose`](Self::dispose) of it on shutdown. Tests build their own
/// independent instances.
///
/// No operation on the cache can fail. All methods take `&self`: the entries
/// live behind a mutex that is never held across an `.await`, which means two
/// concurrent misses for the same recipe will both fetch it (the last `put`
/// wins).
///
/// # Examples
///
/// ```rust
/// use simmer_cache::{CacheOptions, RecipeCache};
/// use simmer_recipe::models::{Recipe, RecipeId};
/// let cache = RecipeCache::init(CacheOptions::default());
/// cache.put(RecipeId::new("stew"), Recipe::new("stew", "chef", "Beef Stew", 6));
/// assert_eq!(cache.get(&RecipeId::new("stew")).map(|r| r.servings), Some(6));
/// cache.invalidate(&RecipeId::new("stew"));
/// assert!(cache.get(&RecipeId::new("stew")).is_none());
/// ```
pub struct RecipeCache {
    options: CacheOptions,
    clock: Arc<dyn Clock>,
    store: Mutex<Store>,
}

impl RecipeCache {
    /// Create an empty cache that reads the system clock.
    pub fn init(options: CacheOptions) -> Self {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    /// Create an empty cache that reads time from `clock`.
    pub fn with_clock(options: CacheOptions, clock: Arc<dyn Clock>) -> Self {
        let options = CacheOptions {
            max_entries: options.max_entries.max(1),
            ..options
        };
        tracing::info!(ttl_secs = options.ttl.as_secs(), max_entries = options.max_entries, "Recipe cache initialised");
        Self {
            options,
            clock,
            store: Mutex::new(Store::default()),
        }
    }

    pub fn options(&self) -> CacheOptions {
        self.options
    }

    // Poisoning is ignored; every update leaves the store consistent.
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a recipe.
    ///
    /// An entry older than the TTL is removed and reported as a miss.
    pub fn get(&self, id: &RecipeId) -> Option<Recipe> {
        let now = self.clock.now();
        let mut store = self.lock();
        let Some(stored_at) = store.entries.get(id).map(|entry| entry.timestamp) else {
            store.stats.misses += 1;
            tracing::debug!(recipe = %id, "Recipe cache miss");
            return None;
        };
        let expired = now.saturating_duration_since(stored_at) >= self.options.ttl;
        if expired {
            store.remove(id);
            store.stats.expirations += 1;
            store.stats.misses += 1;
            tracing::debug!(recipe = %id, "Recipe cache entry expired");
            return None;
        }
        store.stats.hits += 1;
        tracing::debug!(recipe = %id, "Recipe cache hit");
        store.entries.get(id).map(|entry| entry.data.clone())
    }

    /// Store a recipe, replacing (and refreshing) any existing entry.
    ///
    /// When the cache is full and `id` is new, the oldest-inserted entry is
    /// evicted first.
    pub fn put(&self, id: RecipeId, recipe: Recipe) {
        let entry = CacheEntry {
            data: recipe,
            timestamp: self.clock.now(),
        };
        let mut store = self.lock();
        if store.remove(&id).is_none()
            && store.entries.len() >= self.options.max_entries
            && let Some(oldest) = store.order.pop_front()
        {
            store.entries.remove(&oldest);
            store.stats.evictions += 1;
            tracing::debug!(recipe = %oldest, "Evicted oldest recipe cache entry");
        }
        store.order.push_back(id.clone());
        store.entries.insert(id, entry);
    }

    /// Look up a recipe, fetching and storing it on a miss.
    ///
    /// `fetch` is only called on a miss. If it fails, nothing is cached and
    /// its error is returned as-is.
    #[instrument(level = "trace", skip_all, fields(recipe = %id))]
    pub async fn get_or_fetch<F, Fut, E>(&self, id: &RecipeId, fetch: F) -> Result<Recipe, E>
    where
        F: FnOnce(RecipeId) -> Fut,
        Fut: Future<Output = Result<Recipe, E>>,
    {
        if let Some(recipe) = self.get(id) {
            return Ok(recipe);
        }
        let recipe = fetch(id.clone()).await?;
        self.put(id.clone(), recipe.clone());
        Ok(recipe)
    }

    /// Remove a recipe. Unknown ids are ignored.
    pub fn invalidate(&self, id: &RecipeId) {
        if self.lock().remove(id).is_some() {
            tracing::debug!(recipe = %id, "Invalidated recipe cache entry");
        }
    }

    /// Remove every recipe. Statistics are kept.
    pub fn clear(&self) {
        let mut store = self.lock();
        store.entries.clear();
        store.order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Empty the cache and report its final statistics.
    pub fn dispose(&self) -> CacheStats {
        let stats = {
            let mut store = self.lock();
            store.entries.clear();
            store.order.clear();
            store.stats
        };
        tracing::info!(
            hits = stats.hits,
            misses = stats.misses,
            expirations = stats.expirations,
            evictions = stats.evictions,
            "Recipe cache disposed"
        );
        stats
    }
}

impl Debug for RecipeCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RecipeCache")
            .field("options", &self.options)
            .field("len", &self.len())
            .field("clock", &"<Clock>")
            .finish()
    }
}
