//! Resolution of source unit and import paths.
//!
//! Classes are matched to association targets by comparing a target's
//! absolute path with the paths its referencing unit imports, so unit paths
//! and import paths must be produced by the same resolver.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use log::{debug, warn};

/// How import strings are turned into paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Sources were parsed from a local checkout; imports resolve against the
    /// filesystem.
    #[default]
    Filesystem,
    /// Sources came from a flattened bundle with no filesystem behind it;
    /// imports are joined textually with the importing unit's folder.
    Flattened,
}

/// Search root tried for package-style imports when none are configured.
pub const DEFAULT_INCLUDE_DIR: &str = "node_modules";

/// Resolves unit paths and import strings.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    mode: ImportMode,
    include_dirs: Vec<PathBuf>,
}

impl Default for ImportResolver {
    fn default() -> Self {
        Self::new(ImportMode::default())
    }
}

impl ImportResolver {
    pub fn new(mode: ImportMode) -> Self {
        Self {
            mode,
            include_dirs: vec![PathBuf::from(DEFAULT_INCLUDE_DIR)],
        }
    }

    /// Replaces the search roots used for package-style imports such as
    /// `@openzeppelin/contracts/token/ERC20/ERC20.sol`.
    ///
    /// Relative roots are looked up in the importing unit's folder and each
    /// of its ancestors. Absolute roots are used as they are.
    pub fn with_include_dirs(mut self, include_dirs: Vec<PathBuf>) -> Self {
        if !include_dirs.is_empty() {
            self.include_dirs = include_dirs;
        }
        self
    }

    pub fn mode(&self) -> ImportMode {
        self.mode
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    /// Returns the absolute path recorded for the unit at `relative_path`.
    pub fn unit_path(&self, relative_path: &str) -> String {
        let path = Path::new(relative_path);
        let resolved = match self.mode {
            ImportMode::Filesystem => fs::canonicalize(path).unwrap_or_else(|_| {
                std::path::absolute(path)
                    .map(|absolute| normalize(&absolute))
                    .unwrap_or_else(|_| normalize(path))
            }),
            ImportMode::Flattened => normalize(path),
        };
        path_string(&resolved)
    }

    /// Resolves an import string seen in the unit at `relative_path`.
    ///
    /// Returns `None` when a filesystem import cannot be found. Failures are
    /// logged and never fatal.
    pub fn resolve(&self, relative_path: &str, import: &str) -> Option<String> {
        let folder = Path::new(relative_path).parent().unwrap_or(Path::new(""));
        let resolved = match self.mode {
            ImportMode::Flattened => Some(normalize(&folder.join(import))),
            ImportMode::Filesystem => self.resolve_on_disk(folder, import),
        };

        match resolved {
            Some(path) => {
                let path = path_string(&path);
                debug!(import, resolved = path.as_str(); "Resolved import");
                Some(path)
            }
            None => {
                warn!(import, unit = relative_path; "Failed to resolve import");
                None
            }
        }
    }

    fn resolve_on_disk(&self, folder: &Path, import: &str) -> Option<PathBuf> {
        if import.starts_with('.') {
            return existing_file(&folder.join(import));
        }

        let ancestors: Vec<&Path> = folder.ancestors().collect();
        self.include_dirs
            .iter()
            .flat_map(|include| -> Vec<PathBuf> {
                if include.is_absolute() {
                    vec![include.join(import)]
                } else {
                    ancestors
                        .iter()
                        .map(|ancestor| ancestor.join(include).join(import))
                        .collect()
                }
            })
            .find_map(|candidate| existing_file(&candidate))
    }
}

fn existing_file(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        fs::canonicalize(candidate).ok()
    } else {
        None
    }
}

/// Removes `.` segments and folds `..` segments into their parent.
///
/// A leading `..` that has no parent to fold into is kept.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
