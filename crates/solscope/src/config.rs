//! Configuration types for Solscope.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! configuration file. Every section and field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ClassDiagramConfig`] - What the class diagram shows.
//! - [`FilterConfig`] - Default reachability depth of the connectivity filter.
//! - [`ImportConfig`] - Search roots for package-style imports.
//!
//! # Example
//!
//! ```
//! # use solscope::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.filter().depth(), None);
//! assert!(!config.class().hide_variables());
//! ```

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Class diagram section.
    #[serde(default)]
    class: ClassDiagramConfig,

    /// Connectivity filter section.
    #[serde(default)]
    filter: FilterConfig,

    /// Import resolution section.
    #[serde(default)]
    imports: ImportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(class: ClassDiagramConfig, filter: FilterConfig, imports: ImportConfig) -> Self {
        Self {
            class,
            filter,
            imports,
        }
    }

    pub fn class(&self) -> &ClassDiagramConfig {
        &self.class
    }

    pub fn class_mut(&mut self) -> &mut ClassDiagramConfig {
        &mut self.class
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterConfig {
        &mut self.filter
    }

    pub fn imports(&self) -> &ImportConfig {
        &self.imports
    }

    pub fn imports_mut(&mut self) -> &mut ImportConfig {
        &mut self.imports
    }
}

/// Visibility toggles for the class diagram.
///
/// Everything is shown by default. Hidden classes are dropped together with
/// the edges that point at them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassDiagramConfig {
    hide_variables: bool,
    hide_functions: bool,
    hide_structs: bool,
    hide_enums: bool,
    hide_libraries: bool,
    hide_interfaces: bool,
    hide_abstracts: bool,
    hide_privates: bool,
    hide_filename: bool,
    /// Draw each source folder as a Graphviz cluster.
    cluster_folders: bool,
}

impl ClassDiagramConfig {
    pub fn hide_variables(&self) -> bool {
        self.hide_variables
    }

    pub fn hide_functions(&self) -> bool {
        self.hide_functions
    }

    pub fn hide_structs(&self) -> bool {
        self.hide_structs
    }

    pub fn hide_enums(&self) -> bool {
        self.hide_enums
    }

    pub fn hide_libraries(&self) -> bool {
        self.hide_libraries
    }

    pub fn hide_interfaces(&self) -> bool {
        self.hide_interfaces
    }

    pub fn hide_abstracts(&self) -> bool {
        self.hide_abstracts
    }

    /// Hides private and internal members.
    pub fn hide_privates(&self) -> bool {
        self.hide_privates
    }

    pub fn hide_filename(&self) -> bool {
        self.hide_filename
    }

    pub fn cluster_folders(&self) -> bool {
        self.cluster_folders
    }

    pub fn with_hide_variables(mut self, hide: bool) -> Self {
        self.hide_variables = hide;
        self
    }

    pub fn with_hide_functions(mut self, hide: bool) -> Self {
        self.hide_functions = hide;
        self
    }

    pub fn with_hide_structs(mut self, hide: bool) -> Self {
        self.hide_structs = hide;
        self
    }

    pub fn with_hide_enums(mut self, hide: bool) -> Self {
        self.hide_enums = hide;
        self
    }

    pub fn with_hide_libraries(mut self, hide: bool) -> Self {
        self.hide_libraries = hide;
        self
    }

    pub fn with_hide_interfaces(mut self, hide: bool) -> Self {
        self.hide_interfaces = hide;
        self
    }

    pub fn with_hide_abstracts(mut self, hide: bool) -> Self {
        self.hide_abstracts = hide;
        self
    }

    pub fn with_hide_privates(mut self, hide: bool) -> Self {
        self.hide_privates = hide;
        self
    }

    pub fn with_hide_filename(mut self, hide: bool) -> Self {
        self.hide_filename = hide;
        self
    }

    pub fn with_cluster_folders(mut self, cluster: bool) -> Self {
        self.cluster_folders = cluster;
        self
    }
}

/// Connectivity filter defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterConfig {
    /// Maximum edge count from a root; `None` is unbounded.
    #[serde(default)]
    depth: Option<usize>,
}

impl FilterConfig {
    pub fn new(depth: Option<usize>) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    pub fn set_depth(&mut self, depth: Option<usize>) {
        self.depth = depth;
    }
}

/// Import resolution settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportConfig {
    /// Search roots for imports such as `@openzeppelin/...`. Empty means the
    /// builder default.
    #[serde(default)]
    include_dirs: Vec<PathBuf>,
}

impl ImportConfig {
    pub fn new(include_dirs: Vec<PathBuf>) -> Self {
        Self { include_dirs }
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn push_include_dir(&mut self, dir: PathBuf) {
        self.include_dirs.push(dir);
    }
}
