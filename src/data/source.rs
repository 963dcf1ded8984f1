//! The data-source boundary: anything that can hand over the two raw tables.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::debug;

use super::loader::{read_raw, RawRows};

/// Default lifetime of cached tables.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Supplier of the travel and restaurant tables.
///
/// An empty [`RawRows`] means "no data" and is not an error.
pub trait TableSource {
    fn load_travel(&mut self) -> Result<RawRows>;
    fn load_restaurants(&mut self) -> Result<RawRows>;
}

/// Tables read from local `.csv` / `.json` files.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub travel: PathBuf,
    pub restaurants: Option<PathBuf>,
}

impl FileSource {
    pub fn new(travel: impl Into<PathBuf>) -> Self {
        FileSource {
            travel: travel.into(),
            restaurants: None,
        }
    }

    pub fn with_restaurants(mut self, path: impl Into<PathBuf>) -> Self {
        self.restaurants = Some(path.into());
        self
    }
}

impl TableSource for FileSource {
    fn load_travel(&mut self) -> Result<RawRows> {
        read_raw(&self.travel)
    }

    fn load_restaurants(&mut self) -> Result<RawRows> {
        match &self.restaurants {
            Some(path) => read_raw(path),
            None => Ok(RawRows::default()),
        }
    }
}

#[derive(Debug, Clone)]
struct Cached {
    loaded_at: Instant,
    rows: RawRows,
}

impl Cached {
    fn fresh(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() < ttl
    }
}

/// Keeps the last successful load of each table for `ttl`.
/// Failed loads are not cached.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    travel: Option<Cached>,
    restaurants: Option<Cached>,
}

impl<S: TableSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        CachedSource {
            inner,
            ttl,
            travel: None,
            restaurants: None,
        }
    }

    /// Drop both cached tables; the next load goes to the inner source.
    pub fn invalidate(&mut self) {
        debug!("table cache invalidated");
        self.travel = None;
        self.restaurants = None;
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn cached_or_load(
        slot: &mut Option<Cached>,
        ttl: Duration,
        load: impl FnOnce() -> Result<RawRows>,
    ) -> Result<RawRows> {
        if let Some(cached) = slot.as_ref().filter(|c| c.fresh(ttl)) {
            return Ok(cached.rows.clone());
        }
        let rows = load()?;
        *slot = Some(Cached {
            loaded_at: Instant::now(),
            rows: rows.clone(),
        });
        Ok(rows)
    }
}

impl<S: TableSource> TableSource for CachedSource<S> {
    fn load_travel(&mut self) -> Result<RawRows> {
        let inner = &mut self.inner;
        Self::cached_or_load(&mut self.travel, self.ttl, || inner.load_travel())
    }

    fn load_restaurants(&mut self) -> Result<RawRows> {
        let inner = &mut self.inner;
        Self::cached_or_load(&mut self.restaurants, self.ttl, || inner.load_restaurants())
    }
}
