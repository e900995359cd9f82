pub mod classifier;
pub mod error;
pub mod record;

pub use classifier::{Classification, PathClassifier, PrefixMatch, Target};
pub use error::{SplitError, SplitResult};
pub use record::FileContent;

use indicatif::ProgressBar;
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::SplitConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetStats {
    pub files: usize,
    pub bytes: u64,
}

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub backend: TargetStats,
    pub frontend: TargetStats,
    pub skipped: usize,
    pub binary: usize,
    pub unreadable: usize,
    pub pruned_dirs: usize,
    pub walk_errors: usize,
}

impl Stats {
    pub fn routed(&self) -> usize {
        self.backend.files + self.frontend.files
    }
}

/// Check that `root` is a directory holding `marker` and return its canonical form.
pub fn validate_root(root: &Path, marker: &str) -> SplitResult<PathBuf> {
    let invalid = || SplitError::RootInvalid {
        root: root.to_path_buf(),
        marker: marker.to_string(),
    };

    let canonical = fs::canonicalize(root).map_err(|_| invalid())?;
    if !canonical.join(marker).is_file() {
        return Err(invalid());
    }
    Ok(canonical)
}

/// Truncate (or create) every output file, writing nothing.
pub fn reset_outputs(paths: &[&Path]) -> SplitResult<()> {
    for path in paths {
        File::create(path).map_err(|e| SplitError::io(*path, e))?;
        debug!("Reset output {}", path.display());
    }
    Ok(())
}

/// Walk `config.root` and append every routed file to its output.
///
/// Outputs are opened in append mode; call [`reset_outputs`] first for a clean run.
pub fn traverse_and_split(config: &SplitConfig) -> SplitResult<Stats> {
    Splitter::new(config).traverse()
}

pub struct Splitter<'a> {
    config: &'a SplitConfig,
    classifier: PathClassifier,
    progress: Option<ProgressBar>,
}

impl<'a> Splitter<'a> {
    pub fn new(config: &'a SplitConfig) -> Self {
        Self {
            classifier: PathClassifier::new(
                &config.backend_prefix,
                &config.frontend_prefix,
                config.prefix_match,
            ),
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// validate, reset both outputs, then traverse.
    pub fn run(&self) -> SplitResult<Stats> {
        validate_root(&self.config.root, &self.config.marker_file)?;
        reset_outputs(&[
            self.config.backend_output.as_path(),
            self.config.frontend_output.as_path(),
        ])?;
        self.traverse()
    }

    pub fn traverse(&self) -> SplitResult<Stats> {
        let mut outputs = Outputs::open(&self.config.backend_output, &self.config.frontend_output)?;

        let stats = self.walk(|entry, rel, target, stats| {
            let content = FileContent::read(entry.path());
            match &content {
                FileContent::Text(_) => {}
                FileContent::Binary => stats.binary += 1,
                FileContent::Unreadable(e) => {
                    warn!("Could not read {}: {}", entry.path().display(), e);
                    stats.unreadable += 1;
                }
            }

            let written = outputs.append(target, &record::header(rel), content.as_str())?;
            let target = stats.target_mut(target);
            target.files += 1;
            target.bytes += written;
            Ok(())
        })?;

        outputs.flush()?;
        Ok(stats)
    }

    /// Classify every file without touching the outputs.
    pub fn dry_run(&self) -> SplitResult<Stats> {
        validate_root(&self.config.root, &self.config.marker_file)?;
        self.walk(|_, rel, target, stats| {
            info!("{:?}: {}", target, rel);
            stats.target_mut(target).files += 1;
            Ok(())
        })
    }

    /// Canonical paths of the output files that currently exist.
    fn existing_outputs(&self) -> Vec<PathBuf> {
        [&self.config.backend_output, &self.config.frontend_output]
            .iter()
            .filter_map(|p| fs::canonicalize(p).ok())
            .collect()
    }

    fn walk<F>(&self, mut visit: F) -> SplitResult<Stats>
    where
        F: FnMut(&DirEntry, &str, Target, &mut Stats) -> SplitResult<()>,
    {
        let root = self.config.root.as_path();
        let own_outputs = self.existing_outputs();
        let mut stats = Stats::default();
        let mut pruned = 0;

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let keep = entry.depth() == 0 || !self.is_excluded_dir(entry);
                if !keep {
                    trace!("Pruned {}", entry.path().display());
                    pruned += 1;
                }
                keep
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Walk error: {}", e);
                    stats.walk_errors += 1;
                    continue;
                }
            };

            if !is_file_candidate(&entry) {
                continue;
            }

            let rel = match entry.path().strip_prefix(root) {
                Ok(rel) => classifier::relative_display(rel),
                Err(_) => continue,
            };

            let Some(target) = self.classifier.classify(&rel).target() else {
                trace!("Skipped {}", rel);
                stats.skipped += 1;
                continue;
            };

            if is_own_output(entry.path(), &own_outputs) {
                debug!("Skipping output file {}", rel);
                stats.skipped += 1;
                continue;
            }

            debug!("{:?} <- {}", target, rel);
            if let Some(progress) = &self.progress {
                progress.set_message(rel.clone());
            }
            visit(&entry, &rel, target, &mut stats)?;
        }

        stats.pruned_dirs = pruned;
        Ok(stats)
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map_or(false, |name| self.config.is_excluded(name))
    }
}

impl Stats {
    fn target_mut(&mut self, target: Target) -> &mut TargetStats {
        match target {
            Target::Backend => &mut self.backend,
            Target::Frontend => &mut self.frontend,
        }
    }
}

/// Regular files and any symlink not pointing at a directory. Dangling links
/// are kept so the read fails and gets recorded as unreadable.
fn is_file_candidate(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}

fn is_own_output(path: &Path, outputs: &[PathBuf]) -> bool {
    if outputs.is_empty() {
        return false;
    }
    fs::canonicalize(path).map_or(false, |p| outputs.contains(&p))
}

struct Output {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Output {
    fn open(path: &Path) -> SplitResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SplitError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    fn write(&mut self, text: &str) -> SplitResult<u64> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|e| SplitError::io(&self.path, e))?;
        Ok(text.len() as u64)
    }
}

struct Outputs {
    backend: Output,
    frontend: Output,
}

impl Outputs {
    fn open(backend: &Path, frontend: &Path) -> SplitResult<Self> {
        Ok(Self {
            backend: Output::open(backend)?,
            frontend: Output::open(frontend)?,
        })
    }

    fn append(&mut self, target: Target, header: &str, body: &str) -> SplitResult<u64> {
        let output = match target {
            Target::Backend => &mut self.backend,
            Target::Frontend => &mut self.frontend,
        };
        Ok(output.write(header)? + output.write(body)?)
    }

    fn flush(&mut self) -> SplitResult<()> {
        for output in [&mut self.backend, &mut self.frontend] {
            output
                .writer
                .flush()
                .map_err(|e| SplitError::io(&output.path, e))?;
        }
        Ok(())
    }
}
