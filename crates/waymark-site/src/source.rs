//! Specification sources.
//!
//! A [`SpecSource`] produces the authored input for one build: the sidebar
//! document plus the standalone pages registered outside it. The filesystem
//! source backs normal operation; the static source serves fixtures and
//! embedded sites.

use std::fs;
use std::path::PathBuf;

use crate::route::StandalonePage;
use crate::sidebar::{SidebarError, SidebarSpec};

/// Combined authored input for one route table build.
#[derive(Clone, Debug)]
pub struct SiteSpec {
    pub sidebar: SidebarSpec,
    pub pages: Vec<StandalonePage>,
}

/// Source of authored site structure.
///
/// Implementations must tolerate being called repeatedly: the router loads
/// through this trait on every rebuild.
pub trait SpecSource: Send + Sync {
    /// Load the current specification.
    fn load(&self) -> Result<SiteSpec, SidebarError>;
}

/// Loads the sidebar document from a YAML file on disk.
#[derive(Debug)]
pub struct FsSpecSource {
    sidebar_path: PathBuf,
    pages: Vec<StandalonePage>,
}

impl FsSpecSource {
    #[must_use]
    pub fn new(sidebar_path: impl Into<PathBuf>, pages: Vec<StandalonePage>) -> Self {
        Self {
            sidebar_path: sidebar_path.into(),
            pages,
        }
    }
}

impl SpecSource for FsSpecSource {
    fn load(&self) -> Result<SiteSpec, SidebarError> {
        if !self.sidebar_path.exists() {
            return Err(SidebarError::NotFound(self.sidebar_path.clone()));
        }
        let content = fs::read_to_string(&self.sidebar_path)?;
        let sidebar = SidebarSpec::from_yaml(&content)?;
        Ok(SiteSpec {
            sidebar,
            pages: self.pages.clone(),
        })
    }
}

/// Serves a fixed specification from memory.
#[derive(Clone, Debug)]
pub struct StaticSpecSource {
    spec: SiteSpec,
}

impl StaticSpecSource {
    #[must_use]
    pub fn new(spec: SiteSpec) -> Self {
        Self { spec }
    }
}

impl SpecSource for StaticSpecSource {
    fn load(&self) -> Result<SiteSpec, SidebarError> {
        Ok(self.spec.clone())
    }
}
