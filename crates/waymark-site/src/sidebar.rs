//! Sidebar specification parsing.
//!
//! A sidebar document is the authored description of a site's navigation:
//! an ordered list of document slugs and nested categories. It is the sole
//! tree-shaped input from which the navigation tree and route table are
//! built.
//!
//! # Format
//!
//! ```yaml
//! name: docs
//! entries:
//!   - index
//!   - doc: pricing
//!     label: Pricing Guide
//!   - label: Foundation
//!     items:
//!       - foundation/model_strategy
//!       - foundation/token_budgets
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while reading or parsing a sidebar document.
#[derive(Debug, Error)]
pub enum SidebarError {
    /// The sidebar file does not exist at the configured path.
    #[error("Sidebar file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O failure while reading the sidebar file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid YAML or does not match the sidebar schema.
    #[error("Invalid sidebar YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A parsed sidebar document: a named, ordered collection of entries.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SidebarSpec {
    /// Sidebar identifier, recorded on every route derived from it.
    pub name: String,
    /// Top-level entries in authored order.
    #[serde(default)]
    pub entries: Vec<SidebarEntry>,
}

impl SidebarSpec {
    /// Parse a sidebar document from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`SidebarError::Parse`] if the text is not valid YAML or does
    /// not match the sidebar schema.
    pub fn from_yaml(content: &str) -> Result<Self, SidebarError> {
        let spec: Self = serde_yaml::from_str(content)?;
        Ok(spec)
    }
}

/// One entry in a sidebar: a document reference or a nested category.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SidebarEntry {
    /// Bare document slug; the display label is derived from the slug.
    Doc(String),

    /// Document slug with an explicit display label.
    DocRef { doc: String, label: String },

    /// Category grouping nested entries under a heading.
    Category {
        label: String,
        /// Explicit navigation key; derived from the label when omitted.
        #[serde(default)]
        key: Option<String>,
        items: Vec<SidebarEntry>,
    },
}

impl SidebarEntry {
    /// Navigation key for this entry.
    ///
    /// Document entries use their slug. Categories use the explicit `key`
    /// when present, and a slug derived from the label otherwise.
    #[must_use]
    pub fn navigation_key(&self) -> String {
        match self {
            Self::Doc(slug) | Self::DocRef { doc: slug, .. } => slug.trim().to_owned(),
            Self::Category { key: Some(key), .. } => key.trim().to_owned(),
            Self::Category { label, key: None, .. } => key_from_label(label),
        }
    }

    /// Display label for this entry, deriving one from the slug when absent.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self {
            Self::Doc(slug) => label_from_slug(slug),
            Self::DocRef { label, .. } | Self::Category { label, .. } => label.clone(),
        }
    }
}

/// Derive a display label from a document slug.
///
/// Uses the last path segment as the title source, replaces `-` and `_`
/// with spaces, and capitalizes the first letter of each word.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(label_from_slug("guide/setup-guide"), "Setup Guide");
/// assert_eq!(label_from_slug("token_budgets"), "Token Budgets");
/// ```
pub(crate) fn label_from_slug(slug: &str) -> String {
    let last = slug.rsplit_once('/').map_or(slug, |(_, last)| last);
    let mut result = String::with_capacity(last.len());
    for word in last.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_first_into(word, &mut result);
    }
    result
}

/// Capitalize the first character of a word, appending to `buf`.
fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}

/// Derive a navigation key from a category label.
///
/// Lowercases the label and collapses runs of non-alphanumeric characters
/// into a single `-`.
pub(crate) fn key_from_label(label: &str) -> String {
    let mut result = String::with_capacity(label.len());
    for ch in label.chars() {
        if ch.is_alphanumeric() {
            result.extend(ch.to_lowercase());
        } else if !result.is_empty() && !result.ends_with('-') {
            result.push('-');
        }
    }
    if result.ends_with('-') {
        result.pop();
    }
    result
}
