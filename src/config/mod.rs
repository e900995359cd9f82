use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::splitter::PrefixMatch;

/// Name of the configuration file picked up from the project root.
pub const CONFIG_FILE_NAME: &str = "projsplit.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Project root; always supplied at launch, never read from the file.
    #[serde(skip)]
    pub root: PathBuf,
    pub marker_file: String,
    pub exclude_dirs: BTreeSet<String>,
    pub backend_prefix: String,
    pub frontend_prefix: String,
    pub backend_output: PathBuf,
    pub frontend_output: PathBuf,
    pub prefix_match: PrefixMatch,
    pub follow_links: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            marker_file: "package.json".to_string(),
            exclude_dirs: [".git", "node_modules", "__pycache__"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            backend_prefix: "packages/backend".to_string(),
            frontend_prefix: "packages/frontend".to_string(),
            backend_output: PathBuf::from("backend_all.txt"),
            frontend_output: PathBuf::from("frontend_all.txt"),
            prefix_match: PrefixMatch::Segment,
            follow_links: false,
        }
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub exclude_dirs: Option<Vec<String>>,
    pub backend_prefix: Option<String>,
    pub frontend_prefix: Option<String>,
    pub backend_output: Option<PathBuf>,
    pub frontend_output: Option<PathBuf>,
    pub prefix_match: Option<PrefixMatch>,
    pub follow_links: bool,
}

impl SplitConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SplitConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the configuration for `root`: an explicit file wins, then
    /// `projsplit.toml` in the root, then built-in defaults.
    pub fn resolve(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let candidate = root.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    log::debug!("Using config file {}", candidate.display());
                    Self::load(&candidate)?
                } else {
                    Self::default()
                }
            }
        };
        config.root = root.to_path_buf();
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(dirs) = overrides.exclude_dirs {
            self.exclude_dirs = dirs.into_iter().collect();
        }
        if let Some(prefix) = overrides.backend_prefix {
            self.backend_prefix = prefix;
        }
        if let Some(prefix) = overrides.frontend_prefix {
            self.frontend_prefix = prefix;
        }
        if let Some(path) = overrides.backend_output {
            self.backend_output = path;
        }
        if let Some(path) = overrides.frontend_output {
            self.frontend_output = path;
        }
        if let Some(mode) = overrides.prefix_match {
            self.prefix_match = mode;
        }
        if overrides.follow_links {
            self.follow_links = true;
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.exclude_dirs.contains(dir_name)
    }
}
