use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Backend,
    Frontend,
    Skipped,
}

/// Output a routed file is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Backend,
    Frontend,
}

impl Classification {
    pub fn target(self) -> Option<Target> {
        match self {
            Classification::Backend => Some(Target::Backend),
            Classification::Frontend => Some(Target::Frontend),
            Classification::Skipped => None,
        }
    }
}

/// How a routing prefix is compared against a relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PrefixMatch {
    /// Prefix must end on a path-segment boundary.
    #[default]
    Segment,
    /// Plain string prefix; `packages/backend` also matches `packages/backend-legacy`.
    Raw,
}

#[derive(Debug, Clone)]
pub struct PathClassifier {
    backend_prefix: String,
    frontend_prefix: String,
    mode: PrefixMatch,
}

impl PathClassifier {
    pub fn new(backend_prefix: &str, frontend_prefix: &str, mode: PrefixMatch) -> Self {
        Self {
            backend_prefix: normalize_prefix(backend_prefix),
            frontend_prefix: normalize_prefix(frontend_prefix),
            mode,
        }
    }

    /// Classify a root-relative path that uses `/` separators.
    pub fn classify(&self, rel_path: &str) -> Classification {
        if self.matches(rel_path, &self.backend_prefix) {
            Classification::Backend
        } else if self.matches(rel_path, &self.frontend_prefix) {
            Classification::Frontend
        } else {
            Classification::Skipped
        }
    }

    fn matches(&self, rel_path: &str, prefix: &str) -> bool {
        match self.mode {
            PrefixMatch::Raw => rel_path.starts_with(prefix),
            PrefixMatch::Segment => {
                if prefix.is_empty() {
                    return true;
                }
                match rel_path.strip_prefix(prefix) {
                    Some(rest) => rest.is_empty() || rest.starts_with('/'),
                    None => false,
                }
            }
        }
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let prefix = prefix.replace('\\', "/");
    let prefix = prefix.trim_start_matches("./");
    prefix.trim_end_matches('/').to_string()
}

/// Join the components of `rel` with `/` regardless of platform.
pub fn relative_display(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
