//! Route table construction and resolution.
//!
//! The route table is the single authority mapping URL paths to render
//! targets. It is rebuilt wholesale from a navigation tree plus the
//! standalone pages, and always terminates with exactly one wildcard entry,
//! so resolution is total: any path that misses every exact route lands on
//! the wildcard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::{NavKind, NavTree};

/// Display path recorded on the wildcard entry.
const WILDCARD_PATH: &str = "*";

/// Errors raised while assembling a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Two entries normalize to the same lookup path.
    #[error("Duplicate route path: {0}")]
    DuplicatePath(String),

    /// A standalone page path does not start with `/`.
    #[error("Route path must start with '/': {0}")]
    RelativePath(String),

    /// No wildcard entry present.
    #[error("Route table must contain exactly one wildcard entry")]
    MissingWildcard,

    /// More than one wildcard entry present.
    #[error("Route table contains more than one wildcard entry")]
    DuplicateWildcard,

    /// The wildcard entry is not the final route.
    #[error("Wildcard entry must be the final route")]
    MisplacedWildcard,
}

/// How a route entry matches requested paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Matches one normalized path.
    Exact,
    /// Matches everything; terminal catch-all.
    Wildcard,
}

/// One row of the route table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    /// Display path. Index pages keep their trailing slash here even though
    /// lookup is slash-insensitive.
    pub path: String,
    /// Render target: a document key or a standalone page target.
    pub target: String,
    pub match_mode: MatchMode,
    /// Sidebar the entry was derived from; `None` for standalone pages and
    /// the wildcard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_ref: Option<String>,
}

/// A page registered directly, outside any sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandalonePage {
    /// Absolute URL path, e.g. `/` or `/about`.
    pub path: String,
    /// Render target for the page.
    pub target: String,
}

impl StandalonePage {
    #[must_use]
    pub fn new(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target: target.into(),
        }
    }
}

/// Knobs for route derivation.
#[derive(Clone, Debug)]
pub struct RouteOptions {
    /// Base path prefixed to every route derived from the navigation tree.
    pub route_base: String,
    /// Render target recorded on the wildcard entry.
    pub not_found_target: String,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            route_base: "/docs".to_owned(),
            not_found_target: "not-found".to_owned(),
        }
    }
}

/// An immutable, fully validated route table.
#[derive(Clone, Debug)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    /// Normalized path to entry index, exact entries only.
    exact_index: HashMap<String, usize>,
    /// Index of the wildcard entry.
    wildcard: usize,
}

impl RouteTable {
    /// Derive a route table from a navigation tree and standalone pages.
    ///
    /// Document leaves are emitted in tree pre-order, each tagged with
    /// `sidebar_name`, followed by the standalone pages and a single
    /// wildcard entry targeting `options.not_found_target`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::RelativePath`] for a standalone page path
    /// without a leading `/`, and [`RouteError::DuplicatePath`] when two
    /// entries normalize to the same path.
    pub fn build(
        tree: &NavTree,
        sidebar_name: &str,
        pages: &[StandalonePage],
        options: &RouteOptions,
    ) -> Result<Self, RouteError> {
        let mut entries = Vec::new();
        for node in tree.flatten() {
            if node.kind != NavKind::Doc {
                continue;
            }
            entries.push(RouteEntry {
                path: doc_route_path(&node.key, &options.route_base),
                target: node.key.clone(),
                match_mode: MatchMode::Exact,
                sidebar_ref: Some(sidebar_name.to_owned()),
            });
        }
        for page in pages {
            if !page.path.starts_with('/') {
                return Err(RouteError::RelativePath(page.path.clone()));
            }
            entries.push(RouteEntry {
                path: page.path.clone(),
                target: page.target.clone(),
                match_mode: MatchMode::Exact,
                sidebar_ref: None,
            });
        }
        entries.push(RouteEntry {
            path: WILDCARD_PATH.to_owned(),
            target: options.not_found_target.clone(),
            match_mode: MatchMode::Wildcard,
            sidebar_ref: None,
        });
        Self::from_parts(entries)
    }

    /// Assemble a table from explicit entries, validating the wildcard and
    /// duplicate-path invariants.
    ///
    /// This is the single validation door: [`RouteTable::build`] and
    /// manifest loading both go through it.
    pub fn from_parts(entries: Vec<RouteEntry>) -> Result<Self, RouteError> {
        let mut exact_index = HashMap::with_capacity(entries.len());
        let mut wildcard = None;
        for (idx, entry) in entries.iter().enumerate() {
            match entry.match_mode {
                MatchMode::Exact => {
                    if wildcard.is_some() {
                        return Err(RouteError::MisplacedWildcard);
                    }
                    let normalized = normalize_path(&entry.path);
                    if exact_index.insert(normalized.clone(), idx).is_some() {
                        return Err(RouteError::DuplicatePath(normalized));
                    }
                }
                MatchMode::Wildcard => {
                    if wildcard.is_some() {
                        return Err(RouteError::DuplicateWildcard);
                    }
                    wildcard = Some(idx);
                }
            }
        }
        let wildcard = wildcard.ok_or(RouteError::MissingWildcard)?;
        Ok(Self {
            entries,
            exact_index,
            wildcard,
        })
    }

    /// Resolve a requested path to a route entry.
    ///
    /// Resolution is total: paths that miss every exact entry resolve to
    /// the wildcard. The input is normalized first, so `/docs/guide` and
    /// `/docs/guide/` resolve identically.
    #[must_use]
    pub fn resolve(&self, requested: &str) -> &RouteEntry {
        let normalized = normalize_path(requested);
        match self.exact_index.get(&normalized) {
            Some(&idx) => &self.entries[idx],
            None => &self.entries[self.wildcard],
        }
    }

    /// All entries in table order, wildcard last.
    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// The terminal catch-all entry.
    #[must_use]
    pub fn wildcard(&self) -> &RouteEntry {
        &self.entries[self.wildcard]
    }

    /// Number of entries, wildcard included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a valid table contains at least the wildcard.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive the URL path for a document key.
///
/// Most keys map to `{base}/{key}`. A key whose last segment is `index` or
/// `readme` (any ASCII case), or repeats its parent segment, addresses the
/// enclosing directory instead and keeps a trailing slash:
///
/// - `index` becomes `{base}/`
/// - `guide/intro` becomes `{base}/guide/intro`
/// - `security/security` becomes `{base}/security/`
fn doc_route_path(key: &str, route_base: &str) -> String {
    let base = route_base.trim_end_matches('/');
    let (dir, last) = match key.rsplit_once('/') {
        Some((dir, last)) => (Some(dir), last),
        None => (None, key),
    };
    let parent_segment = dir.map(|d| d.rsplit_once('/').map_or(d, |(_, seg)| seg));
    let collapses = last.eq_ignore_ascii_case("index")
        || last.eq_ignore_ascii_case("readme")
        || parent_segment == Some(last);
    match (dir, collapses) {
        (Some(dir), true) => format!("{base}/{dir}/"),
        (None, true) => format!("{base}/"),
        (_, false) => format!("{base}/{key}"),
    }
}

/// Normalize a requested path for lookup.
///
/// Ensures a leading slash and strips trailing slashes. The root path `/`
/// is the one path that keeps its slash.
fn normalize_path(raw: &str) -> String {
    let mut path = if raw.starts_with('/') {
        raw.to_owned()
    } else {
        format!("/{raw}")
    };
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}
