//! Configuration management for Waymark.
//!
//! Loads `waymark.toml`, expands environment references, resolves relative
//! paths against the directory containing the config file, applies command
//! line overrides, and validates the result. Every section is optional;
//! a missing file yields a fully usable default configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

mod expand;

/// Name of the configuration file searched for during discovery.
pub const CONFIG_FILENAME: &str = "waymark.toml";

const DEFAULT_SIDEBAR_FILE: &str = "sidebar.yaml";
const DEFAULT_ROUTE_BASE: &str = "/docs";
const DEFAULT_NOT_FOUND_TARGET: &str = "not-found";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O failure while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the schema.
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value failed validation.
    #[error("Configuration error: {0}")]
    Validation(String),

    /// An environment reference could not be expanded.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

/// Command line overrides applied on top of the loaded file.
#[derive(Clone, Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Overrides the sidebar file location, relative to the working
    /// directory rather than the config directory.
    pub sidebar_file: Option<PathBuf>,
}

/// Site identity shown in the shell and page metadata.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    /// Canonical site URL. Supports `${VAR}` environment references.
    pub url: String,
    /// Public base path; must start and end with `/`.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            tagline: String::new(),
            url: "http://localhost".to_owned(),
            base_url: "/".to_owned(),
        }
    }
}

/// Raw `[docs]` section as written in the file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
struct DocsSection {
    sidebar_file: Option<String>,
    route_base: Option<String>,
    not_found_target: Option<String>,
}

/// Resolved docs settings with defaults applied and paths made absolute
/// relative to the config directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocsConfig {
    pub sidebar_file: PathBuf,
    pub route_base: String,
    pub not_found_target: String,
}

/// HTTP server binding.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// A navigation or footer link.
///
/// Internal links use `to`, external links use `href`; exactly one is
/// required.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub label: String,
    pub to: Option<String>,
    pub href: Option<String>,
    pub position: Option<String>,
}

/// Top navigation bar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    pub items: Vec<LinkConfig>,
}

/// Footer link groups.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub style: String,
    pub groups: Vec<FooterGroup>,
    pub copyright: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            style: "dark".to_owned(),
            groups: Vec::new(),
            copyright: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FooterGroup {
    pub title: String,
    pub items: Vec<LinkConfig>,
}

/// A page registered outside the sidebar, e.g. the landing page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PageConfig {
    /// Absolute URL path.
    pub path: String,
    /// Render target for the page.
    pub target: String,
}

fn default_pages() -> Vec<PageConfig> {
    vec![PageConfig {
        path: "/".to_owned(),
        target: "home".to_owned(),
    }]
}

/// Complete Waymark configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub server: ServerConfig,
    docs: DocsSection,
    pub navbar: NavbarConfig,
    pub footer: FooterConfig,
    pub pages: Vec<PageConfig>,

    /// Resolved `[docs]` settings.
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path of the loaded config file, `None` for defaults.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

impl Config {
    /// Load configuration, preferring an explicit path, falling back to
    /// discovery, and finally to defaults when no file exists anywhere.
    ///
    /// CLI settings are applied after the file and the combined result is
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] only for an explicit path that
    /// does not exist; discovery failures fall back to defaults instead.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => match discover_config() {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a specific configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars()?;
        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_docs(config_dir);
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides on top of the loaded file.
    pub fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(sidebar_file) = &settings.sidebar_file {
            self.docs_resolved.sidebar_file.clone_from(sidebar_file);
        }
    }

    /// Check every invariant the rest of the system relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_http_url(&self.site.url, "site.url")?;
        if !self.site.base_url.starts_with('/') || !self.site.base_url.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "site.base_url must start and end with '/', got '{}'",
                self.site.base_url
            )));
        }

        require_non_empty(&self.server.host, "server.host")?;
        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file.
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be non-zero".to_owned(),
            ));
        }

        let route_base = &self.docs_resolved.route_base;
        if !route_base.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "docs.route_base must start with '/', got '{route_base}'"
            )));
        }
        if route_base.len() > 1 && route_base.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "docs.route_base must not end with '/', got '{route_base}'"
            )));
        }
        require_non_empty(&self.docs_resolved.not_found_target, "docs.not_found_target")?;

        for page in &self.pages {
            if !page.path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "pages path must start with '/', got '{}'",
                    page.path
                )));
            }
            require_non_empty(&page.target, "pages target")?;
        }

        for link in self.links() {
            require_non_empty(&link.label, "link label")?;
            if link.to.is_none() && link.href.is_none() {
                return Err(ConfigError::Validation(format!(
                    "link '{}' needs either 'to' or 'href'",
                    link.label
                )));
            }
        }
        Ok(())
    }

    /// All navbar and footer links.
    pub fn links(&self) -> impl Iterator<Item = &LinkConfig> {
        self.navbar.items.iter().chain(
            self.footer
                .groups
                .iter()
                .flat_map(|group| group.items.iter()),
        )
    }

    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteConfig::default(),
            server: ServerConfig::default(),
            docs: DocsSection::default(),
            navbar: NavbarConfig::default(),
            footer: FooterConfig::default(),
            pages: default_pages(),
            docs_resolved: DocsConfig::default(),
            config_path: None,
        };
        config.resolve_docs(base);
        config
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.url = expand::expand_value(&self.site.url, "site.url")?;
        self.server.host = expand::expand_value(&self.server.host, "server.host")?;
        Ok(())
    }

    /// Fill `docs_resolved` from the raw section, joining relative paths
    /// onto `base`.
    fn resolve_docs(&mut self, base: &Path) {
        let sidebar_file = self
            .docs
            .sidebar_file
            .as_deref()
            .unwrap_or(DEFAULT_SIDEBAR_FILE);
        self.docs_resolved = DocsConfig {
            sidebar_file: resolve_path(base, Path::new(sidebar_file)),
            route_base: self
                .docs
                .route_base
                .clone()
                .unwrap_or_else(|| DEFAULT_ROUTE_BASE.to_owned()),
            not_found_target: self
                .docs
                .not_found_target
                .clone()
                .unwrap_or_else(|| DEFAULT_NOT_FOUND_TARGET.to_owned()),
        };
    }
}

/// Search for `waymark.toml` in the current directory and its ancestors.
#[must_use]
pub fn discover_config() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_http_url(value: &str, field: &str) -> Result<(), ConfigError> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must be an http(s) URL, got '{value}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml_str: &str) -> Config {
        let mut config: Config = toml::from_str(toml_str).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_docs(Path::new("/project"));
        config
    }

    fn assert_validation_error(config: &Config, expected_parts: &[&str]) {
        let err = config.validate().unwrap_err();
        let message = err.to_string();
        for part in expected_parts {
            assert!(
                message.contains(part),
                "error message '{message}' should contain '{part}'"
            );
        }
    }

    // ===== Default tests =====

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.site.base_url, "/");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.docs_resolved.route_base, "/docs");
        assert_eq!(config.docs_resolved.not_found_target, "not-found");
        assert_eq!(
            config.docs_resolved.sidebar_file,
            Path::new(".").join("sidebar.yaml")
        );
        assert_eq!(config.pages, default_pages());
        assert_eq!(config.config_path, None);
    }

    // ===== Parse tests =====

    #[test]
    fn test_parse_empty_toml_uses_defaults() {
        let config = parse("");

        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.pages.len(), 1);
        assert_eq!(config.pages[0].path, "/");
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
[site]
title = "CodeCraft AI"
tagline = "Practical LLM engineering"
url = "https://docs.codecraft.example"
base_url = "/"

[docs]
sidebar_file = "nav/sidebar.yaml"
route_base = "/docs"
not_found_target = "missing"

[server]
host = "0.0.0.0"
port = 8080

[[pages]]
path = "/"
target = "home"

[[pages]]
path = "/playground"
target = "playground"

[[navbar.items]]
label = "Docs"
to = "/docs/"
position = "left"

[footer]
style = "dark"
copyright = "Copyright CodeCraft"

[[footer.groups]]
title = "Community"

[[footer.groups.items]]
label = "GitHub"
href = "https://github.com/codecraft"
"#,
        );

        assert_eq!(config.site.title, "CodeCraft AI");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.docs_resolved.not_found_target, "missing");
        assert_eq!(
            config.docs_resolved.sidebar_file,
            Path::new("/project/nav/sidebar.yaml")
        );
        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.navbar.items[0].to.as_deref(), Some("/docs/"));
        assert_eq!(config.footer.groups[0].title, "Community");
        assert_eq!(
            config.footer.groups[0].items[0].href.as_deref(),
            Some("https://github.com/codecraft")
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_partial_site_section() {
        let config = parse("[site]\ntitle = \"Partial\"\n");

        assert_eq!(config.site.title, "Partial");
        assert_eq!(config.site.url, "http://localhost");
        assert_eq!(config.site.base_url, "/");
    }

    #[test]
    fn test_parse_explicit_empty_pages() {
        let config = parse("pages = []\n");

        assert!(config.pages.is_empty());
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let result: Result<Config, _> = toml::from_str("[server]\nport = \"seventy\"\n");

        assert!(result.is_err());
    }

    // ===== Path resolution tests =====

    #[test]
    fn test_resolve_relative_sidebar_path() {
        let config = parse("[docs]\nsidebar_file = \"structure/sidebar.yaml\"\n");

        assert_eq!(
            config.docs_resolved.sidebar_file,
            Path::new("/project/structure/sidebar.yaml")
        );
    }

    #[test]
    fn test_resolve_absolute_sidebar_path_kept() {
        let config = parse("[docs]\nsidebar_file = \"/etc/waymark/sidebar.yaml\"\n");

        assert_eq!(
            config.docs_resolved.sidebar_file,
            Path::new("/etc/waymark/sidebar.yaml")
        );
    }

    // ===== File loading tests =====

    #[test]
    fn test_load_from_file_resolves_against_file_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[docs]\nsidebar_file = \"sidebar.yaml\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.docs_resolved.sidebar_file,
            dir.path().join("sidebar.yaml")
        );
    }

    #[test]
    fn test_load_from_file_missing() {
        let err = Config::load_from_file(Path::new("/nonexistent/waymark.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "site = not toml").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_explicit_path_beats_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[site]\ntitle = \"Explicit\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.title, "Explicit");
    }

    // ===== Validation tests =====

    #[test]
    fn test_validate_empty_title() {
        let config = parse("[site]\ntitle = \"  \"\n");

        assert_validation_error(&config, &["site.title", "empty"]);
    }

    #[test]
    fn test_validate_bad_url_scheme() {
        let config = parse("[site]\nurl = \"ftp://docs.example\"\n");

        assert_validation_error(&config, &["site.url", "http(s)"]);
    }

    #[test]
    fn test_validate_base_url_slashes() {
        let config = parse("[site]\nbase_url = \"docs/\"\n");
        assert_validation_error(&config, &["site.base_url"]);

        let config = parse("[site]\nbase_url = \"/docs\"\n");
        assert_validation_error(&config, &["site.base_url"]);
    }

    #[test]
    fn test_validate_port_zero() {
        let config = parse("[server]\nport = 0\n");

        assert_validation_error(&config, &["server.port", "non-zero"]);
    }

    #[test]
    fn test_validate_route_base_missing_slash() {
        let config = parse("[docs]\nroute_base = \"docs\"\n");

        assert_validation_error(&config, &["docs.route_base", "start with '/'"]);
    }

    #[test]
    fn test_validate_route_base_trailing_slash() {
        let config = parse("[docs]\nroute_base = \"/docs/\"\n");

        assert_validation_error(&config, &["docs.route_base", "must not end"]);
    }

    #[test]
    fn test_validate_route_base_root_allowed() {
        let config = parse("[docs]\nroute_base = \"/\"\n");

        config.validate().unwrap();
    }

    #[test]
    fn test_validate_relative_page_path() {
        let config = parse("[[pages]]\npath = \"about\"\ntarget = \"about\"\n");

        assert_validation_error(&config, &["pages path", "start with '/'"]);
    }

    #[test]
    fn test_validate_empty_page_target() {
        let config = parse("[[pages]]\npath = \"/about\"\ntarget = \"\"\n");

        assert_validation_error(&config, &["pages target", "empty"]);
    }

    #[test]
    fn test_validate_link_without_destination() {
        let config = parse("[[navbar.items]]\nlabel = \"Broken\"\n");

        assert_validation_error(&config, &["Broken", "'to' or 'href'"]);
    }

    #[test]
    fn test_validate_footer_link_empty_label() {
        let config = parse(
            "[[footer.groups]]\ntitle = \"Docs\"\n[[footer.groups.items]]\nlabel = \"\"\nto = \"/docs/\"\n",
        );

        assert_validation_error(&config, &["link label", "empty"]);
    }

    // ===== CLI settings tests =====

    #[test]
    fn test_apply_cli_settings_overrides() {
        let mut config = Config::default();
        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            sidebar_file: Some(PathBuf::from("custom/sidebar.yaml")),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.docs_resolved.sidebar_file,
            Path::new("custom/sidebar.yaml")
        );
    }

    #[test]
    fn test_apply_cli_settings_none_leaves_config_untouched() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
    }

    // ===== Environment expansion tests =====

    #[test]
    fn test_expand_env_in_site_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe { std::env::set_var("WAYMARK_TEST_SITE_HOST", "docs.example.com") };

        let config = parse("[site]\nurl = \"https://${WAYMARK_TEST_SITE_HOST}\"\n");

        assert_eq!(config.site.url, "https://docs.example.com");
    }

    #[test]
    fn test_expand_missing_env_var_errors() {
        let mut config: Config =
            toml::from_str("[site]\nurl = \"https://${WAYMARK_TEST_UNSET_HOST}\"\n").unwrap();

        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { field, .. } if field == "site.url"));
    }
}
