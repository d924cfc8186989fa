//! Site structure for Waymark: navigation trees and route tables.
//!
//! This crate owns the read path of a Waymark site. A YAML sidebar
//! specification is parsed into an immutable [`NavTree`], a [`RouteTable`]
//! is derived from the tree plus the standalone pages, and a [`SiteRouter`]
//! publishes the pair as atomic [`SiteMap`] snapshots that can be rebuilt
//! wholesale at runtime without disturbing in-flight readers.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use waymark_site::{
//!     RouteOptions, SidebarSpec, SiteRouter, SiteSpec, StandalonePage, StaticSpecSource,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sidebar = SidebarSpec::from_yaml("name: docs\nentries:\n  - guide/intro\n")?;
//! let spec = SiteSpec {
//!     sidebar,
//!     pages: vec![StandalonePage::new("/", "home")],
//! };
//! let router = SiteRouter::new(
//!     Arc::new(StaticSpecSource::new(spec)),
//!     RouteOptions::default(),
//! );
//!
//! let map = router.rebuild()?;
//! assert_eq!(map.table.resolve("/docs/guide/intro").target, "guide/intro");
//! assert_eq!(map.table.resolve("/missing").target, "not-found");
//! # Ok(())
//! # }
//! ```

mod manifest;
mod route;
mod router;
mod sidebar;
mod source;
mod tree;

pub use manifest::{Manifest, ManifestError};
pub use route::{MatchMode, RouteEntry, RouteError, RouteOptions, RouteTable, StandalonePage};
pub use router::{BuildError, SiteMap, SiteRouter};
pub use sidebar::{SidebarEntry, SidebarError, SidebarSpec};
pub use source::{FsSpecSource, SiteSpec, SpecSource, StaticSpecSource};
pub use tree::{Flatten, NavKind, NavNode, NavTree, ValidationError};
