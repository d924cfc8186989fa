//! `waymark routes` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use waymark_config::Config;
use waymark_site::Manifest;

use crate::commands::build_site_map;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    /// Path to configuration file (default: auto-discover waymark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the manifest to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// Builds the route table from the sidebar spec and emits it as a
    /// manifest consumable by [`Manifest::from_json`].
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let map = build_site_map(&config)?;
        let manifest = Manifest::from_map(&map);

        let json = if self.compact {
            serde_json::to_string(&manifest)?
        } else {
            serde_json::to_string_pretty(&manifest)?
        };

        match self.output {
            Some(path) => {
                std::fs::write(&path, &json)?;
                output.success(&format!(
                    "Route manifest written to {} ({} routes)",
                    path.display(),
                    map.table.len()
                ));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}")?;
            }
        }

        Ok(())
    }
}
