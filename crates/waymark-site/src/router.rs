//! Published site map and rebuild coordination.
//!
//! [`SiteRouter`] owns the spec source and the currently published
//! [`SiteMap`]. Requests take an `Arc` snapshot and never observe a
//! half-built table: rebuilds construct a complete map off to the side and
//! swap it in atomically.
//!
//! # Thread Safety
//!
//! - `current` sits behind an `RwLock`: concurrent snapshot reads,
//!   exclusive swap on publish.
//! - `map_valid` lets [`SiteRouter::reload_if_needed`] skip the lock
//!   entirely on the hot path.
//! - `rebuild_lock` serializes builders, so a burst of invalidations
//!   produces one rebuild rather than a stampede.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;

use crate::route::{RouteError, RouteOptions, RouteTable};
use crate::sidebar::SidebarError;
use crate::source::SpecSource;
use crate::tree::{NavTree, ValidationError};

/// Errors raised while rebuilding the site map from its source.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0}")]
    Sidebar(#[from] SidebarError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Route(#[from] RouteError),
}

/// An immutable navigation tree plus route table snapshot.
///
/// Handlers hold an `Arc<SiteMap>` for the duration of a request, so a
/// concurrent rebuild never changes what one request observes.
#[derive(Clone, Debug)]
pub struct SiteMap {
    pub nav: NavTree,
    pub table: RouteTable,
}

/// Owns the spec source and publishes validated [`SiteMap`] snapshots.
pub struct SiteRouter {
    source: Arc<dyn SpecSource>,
    options: RouteOptions,
    /// Mutex for serializing rebuilds.
    rebuild_lock: Mutex<()>,
    /// Currently published snapshot. `None` until the first successful build.
    current: RwLock<Option<Arc<SiteMap>>>,
    /// Cleared by [`SiteRouter::invalidate`], set on publish.
    map_valid: AtomicBool,
}

impl SiteRouter {
    /// Create a router with no published map.
    ///
    /// Nothing is resolvable until [`SiteRouter::rebuild`] or
    /// [`SiteRouter::reload_if_needed`] succeeds once.
    #[must_use]
    pub fn new(source: Arc<dyn SpecSource>, options: RouteOptions) -> Self {
        Self {
            source,
            options,
            rebuild_lock: Mutex::new(()),
            current: RwLock::new(None),
            map_valid: AtomicBool::new(false),
        }
    }

    /// Currently published snapshot, if any build has succeeded.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    #[must_use]
    pub fn site_map(&self) -> Option<Arc<SiteMap>> {
        self.current.read().unwrap().clone()
    }

    /// Rebuild from the source and publish the result.
    ///
    /// On failure the previously published map is left untouched and keeps
    /// serving; the error is returned to the caller.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn rebuild(&self) -> Result<Arc<SiteMap>, BuildError> {
        let _guard = self.rebuild_lock.lock().unwrap();
        let map = self.build_map()?;
        Ok(self.publish(map))
    }

    /// Mark the published map stale.
    ///
    /// Lock-free; the next [`SiteRouter::reload_if_needed`] call rebuilds.
    pub fn invalidate(&self) {
        self.map_valid.store(false, Ordering::Release);
    }

    /// Return the published map, rebuilding first when it is stale or
    /// missing.
    ///
    /// Uses double-checked locking: the fast path is a single atomic load.
    /// When a rebuild fails and an older map exists, the failure is logged
    /// and the old map keeps serving. The error only surfaces when there is
    /// no map at all to fall back to.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn reload_if_needed(&self) -> Result<Arc<SiteMap>, BuildError> {
        if self.map_valid.load(Ordering::Acquire)
            && let Some(map) = self.site_map()
        {
            return Ok(map);
        }

        let _guard = self.rebuild_lock.lock().unwrap();

        // Another thread may have rebuilt while we waited for the lock.
        if self.map_valid.load(Ordering::Acquire)
            && let Some(map) = self.site_map()
        {
            return Ok(map);
        }

        match self.build_map() {
            Ok(map) => Ok(self.publish(map)),
            Err(err) => match self.site_map() {
                Some(previous) => {
                    tracing::warn!(error = %err, "Rebuild failed, serving previous route table");
                    Ok(previous)
                }
                None => Err(err),
            },
        }
    }

    fn build_map(&self) -> Result<SiteMap, BuildError> {
        let spec = self.source.load()?;
        let nav = NavTree::build(&spec.sidebar)?;
        let table = RouteTable::build(&nav, &spec.sidebar.name, &spec.pages, &self.options)?;
        Ok(SiteMap { nav, table })
    }

    fn publish(&self, map: SiteMap) -> Arc<SiteMap> {
        let map = Arc::new(map);
        *self.current.write().unwrap() = Some(Arc::clone(&map));
        self.map_valid.store(true, Ordering::Release);
        map
    }
}
