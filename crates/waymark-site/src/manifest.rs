//! Serialized site map manifest.
//!
//! The manifest is the portable flat form of a built site map: route
//! entries in table order plus the navigation tables. Loading goes through
//! the same validation doors as a live build, so a hand-edited or corrupted
//! manifest can never produce a tree or table that violates the structural
//! invariants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::route::{RouteEntry, RouteError, RouteTable};
use crate::router::SiteMap;
use crate::tree::{NavNode, NavTree, ValidationError};

/// Errors raised while decoding a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest is not valid JSON.
    #[error("Invalid manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Route(#[from] RouteError),
}

/// Flat, serializable form of a [`SiteMap`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Route entries in table order, wildcard last.
    pub routes: Vec<RouteEntry>,
    /// Navigation nodes in arena order.
    pub nav_nodes: Vec<NavNode>,
    /// Child indices per node.
    pub nav_children: Vec<Vec<usize>>,
    /// Root indices in authored order.
    pub nav_roots: Vec<usize>,
}

impl Manifest {
    /// Capture the flat form of a built site map.
    #[must_use]
    pub fn from_map(map: &SiteMap) -> Self {
        Self {
            routes: map.table.entries().to_vec(),
            nav_nodes: map.nav.nodes().to_vec(),
            nav_children: map.nav.children_indices().to_vec(),
            nav_roots: map.nav.root_indices().to_vec(),
        }
    }

    /// Parse a manifest from JSON text.
    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(content)?;
        Ok(manifest)
    }

    /// Rebuild a live site map, re-validating every invariant.
    ///
    /// # Errors
    ///
    /// Returns the underlying tree or table error when the flat data does
    /// not describe a valid site map.
    pub fn into_map(self) -> Result<SiteMap, ManifestError> {
        let nav = NavTree::from_parts(self.nav_nodes, self.nav_children, self.nav_roots)?;
        let table = RouteTable::from_parts(self.routes)?;
        Ok(SiteMap { nav, table })
    }
}
