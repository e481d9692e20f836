//! Solscope - class diagrams and storage slot layouts for Solidity contracts.
//!
//! Builds a structural model from pre-parsed Solidity syntax trees, narrows
//! it to the classes connected to chosen roots, computes how a contract's
//! state variables are packed into storage slots, and serializes class models
//! and storage layouts as Graphviz `dot`.

pub mod config;
pub mod export;
pub mod filter;
pub mod storage;

mod error;

pub use solscope_core::{catalog, identifier, model};

pub use error::{FilterError, LayoutError, SolscopeError};

use std::{fs, path::Path};

use log::{debug, info, trace};

use solscope_builder::{Builder, ImportMode, ImportResolver, ast::SourceEntry};
use solscope_core::{catalog::Catalog, identifier::IdGenerator, model::Class};

use config::AppConfig;

/// Entry point for building models, layouts and diagrams.
///
/// # Examples
///
/// ```rust
/// use solscope::{Solscope, config::AppConfig};
/// use solscope_builder::{ImportMode, ast::SourceEntry};
///
/// let bundle: Vec<SourceEntry> = serde_json::from_str(r#"[{
///     "path": "src/Counter.sol",
///     "ast": { "type": "SourceUnit", "children": [{
///         "type": "ContractDefinition", "name": "Counter", "kind": "contract",
///         "baseContracts": [],
///         "subNodes": [{ "type": "StateVariableDeclaration", "variables": [{
///             "type": "VariableDeclaration", "name": "count",
///             "typeName": { "type": "ElementaryTypeName", "name": "uint64" },
///             "visibility": "public", "isStateVar": true,
///             "isDeclaredConst": false, "isImmutable": false
///         }] }]
///     }] }
/// }]"#).unwrap();
///
/// let solscope = Solscope::new(AppConfig::default());
/// let classes = solscope.build_sources(&bundle, ImportMode::Flattened).unwrap();
///
/// let layout = solscope.storage_layout(&classes, "Counter", None).unwrap();
/// assert_eq!(layout.root().storage("count").unwrap().byte_size, 8);
///
/// let dot = solscope.storage_dot(&layout);
/// assert!(dot.starts_with("digraph StorageDiagram"));
/// ```
#[derive(Debug, Default)]
pub struct Solscope {
    config: AppConfig,
}

impl Solscope {
    /// Create a new instance with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Reads a JSON source bundle: a list of `{ "path", "ast" }` entries.
    ///
    /// # Errors
    ///
    /// Returns `SolscopeError` if the file cannot be read or is not a valid
    /// bundle.
    pub fn read_bundle(&self, path: impl AsRef<Path>) -> Result<Vec<SourceEntry>, SolscopeError> {
        let path = path.as_ref();
        info!(path:% = path.display(); "Reading source bundle");

        let content = fs::read_to_string(path)?;
        let bundle: Vec<SourceEntry> = serde_json::from_str(&content)?;

        debug!(units = bundle.len(); "Source bundle read");
        Ok(bundle)
    }

    /// Builds the classes of every source unit in a bundle.
    ///
    /// All units share one id generator, so class ids are unique across the
    /// returned list. Classes are returned in input order.
    ///
    /// # Errors
    ///
    /// Returns `SolscopeError::Build` for the first unit that fails to build.
    pub fn build_sources(
        &self,
        sources: &[SourceEntry],
        mode: ImportMode,
    ) -> Result<Vec<Class>, SolscopeError> {
        info!(units = sources.len(), mode:?; "Building model");

        let ids = IdGenerator::new();
        let imports = ImportResolver::new(mode)
            .with_include_dirs(self.config.imports().include_dirs().to_vec());
        let builder = Builder::new(&ids, &imports);

        let mut classes = Vec::new();
        for source in sources {
            let built = builder
                .build(&source.ast, &source.path)
                .map_err(|err| SolscopeError::new_build_error(err, &source.path))?;
            debug!(path = source.path, classes = built.len(); "Source unit built");
            classes.extend(built);
        }

        info!(classes = classes.len(); "Model built");
        trace!(classes:?; "Built classes");
        Ok(classes)
    }

    /// Narrows classes to those connected to `roots`.
    ///
    /// Uses `depth` when given, else the configured default depth.
    ///
    /// # Errors
    ///
    /// Returns `SolscopeError::Filter` if a root is not found.
    pub fn filter<'a, S: AsRef<str>>(
        &self,
        classes: &'a [Class],
        roots: &[S],
        depth: Option<usize>,
    ) -> Result<Vec<&'a Class>, SolscopeError> {
        let depth = depth.or(self.config.filter().depth());
        let catalog = Catalog::new(classes);
        Ok(filter::reachable_from(&catalog, roots, depth)?)
    }

    /// Computes the storage layout of a contract.
    ///
    /// `address` labels the root layout when the contract was fetched for a
    /// deployed address.
    ///
    /// # Errors
    ///
    /// Returns `SolscopeError::Layout` if the contract or a type it uses
    /// cannot be resolved.
    pub fn storage_layout(
        &self,
        classes: &[Class],
        contract: &str,
        address: Option<&str>,
    ) -> Result<solscope_core::storage::StorageLayout, SolscopeError> {
        let catalog = Catalog::new(classes);
        let mut layout = storage::layout(&catalog, contract)?;
        layout.root_mut().address = address.map(str::to_string);
        Ok(layout)
    }

    /// Serializes classes as a class diagram using the configured toggles.
    pub fn class_dot(&self, classes: &[&Class]) -> String {
        info!(classes = classes.len(); "Writing class diagram");
        export::dot::class_diagram(classes, self.config.class())
    }

    /// Serializes a storage layout as a storage diagram.
    pub fn storage_dot(&self, layout: &solscope_core::storage::StorageLayout) -> String {
        info!(layouts = layout.layouts().len(); "Writing storage diagram");
        export::dot::storage_diagram(layout)
    }
}
