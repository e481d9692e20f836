//! Class entities.

use std::fmt;

use indexmap::IndexMap;
use log::trace;
use serde::Serialize;

use crate::identifier::ClassId;

use super::{Association, AssociationKey, Attribute, Operator};

/// The kind of declaration a [`Class`] was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ClassStereotype {
    #[default]
    Contract,
    Interface,
    Library,
    Abstract,
    Struct,
    Enum,
}

impl ClassStereotype {
    /// Returns `true` for contracts, abstract contracts, interfaces and
    /// libraries. A variable of such a type stores an address.
    pub fn is_contract_like(self) -> bool {
        matches!(
            self,
            ClassStereotype::Contract
                | ClassStereotype::Interface
                | ClassStereotype::Library
                | ClassStereotype::Abstract
        )
    }
}

impl fmt::Display for ClassStereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClassStereotype::Contract => "Contract",
            ClassStereotype::Interface => "Interface",
            ClassStereotype::Library => "Library",
            ClassStereotype::Abstract => "Abstract",
            ClassStereotype::Struct => "Struct",
            ClassStereotype::Enum => "Enum",
        };
        f.write_str(name)
    }
}

/// A contract, interface, library, abstract contract, struct or enum.
///
/// Contract-level structs and enums are independent classes; the owning class
/// only records their ids in [`Class::structs`] and [`Class::enums`].
#[derive(Debug, Clone, Serialize)]
pub struct Class {
    id: ClassId,
    name: String,
    stereotype: ClassStereotype,
    absolute_path: String,
    relative_path: String,
    imported_paths: Vec<String>,
    attributes: Vec<Attribute>,
    operators: Vec<Operator>,
    structs: Vec<ClassId>,
    enums: Vec<ClassId>,
    associations: IndexMap<AssociationKey, Association>,
}

impl Class {
    /// Creates an empty class.
    ///
    /// # Arguments
    ///
    /// * `id` - A fresh id from the run's [`IdGenerator`](crate::identifier::IdGenerator).
    /// * `name` - The declared identifier.
    /// * `stereotype` - The declaration kind.
    /// * `absolute_path` - Resolved path of the declaring source unit.
    /// * `relative_path` - Logical path of the declaring source unit.
    pub fn new(
        id: ClassId,
        name: impl Into<String>,
        stereotype: ClassStereotype,
        absolute_path: impl Into<String>,
        relative_path: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            stereotype,
            absolute_path: absolute_path.into(),
            relative_path: relative_path.into(),
            imported_paths: Vec::new(),
            attributes: Vec::new(),
            operators: Vec::new(),
            structs: Vec::new(),
            enums: Vec::new(),
            associations: IndexMap::new(),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stereotype(&self) -> ClassStereotype {
        self.stereotype
    }

    pub fn absolute_path(&self) -> &str {
        &self.absolute_path
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Absolute paths imported by the declaring source unit.
    pub fn imported_paths(&self) -> &[String] {
        &self.imported_paths
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Ids of structs declared inside this class.
    pub fn structs(&self) -> &[ClassId] {
        &self.structs
    }

    /// Ids of enums declared inside this class.
    pub fn enums(&self) -> &[ClassId] {
        &self.enums
    }

    /// Associations in insertion order.
    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.associations.values()
    }

    pub fn association(&self, key: &AssociationKey) -> Option<&Association> {
        self.associations.get(key)
    }

    pub fn associations_count(&self) -> usize {
        self.associations.len()
    }

    /// Returns the immediate inheritance associations in declaration order.
    ///
    /// Grandparents are not included; callers walk them recursively.
    pub fn parent_associations(&self) -> impl Iterator<Item = &Association> {
        self.associations().filter(|assoc| assoc.is_realization())
    }

    /// Returns `true` if the given id is one of this class's structs or enums.
    pub fn owns(&self, id: ClassId) -> bool {
        self.structs.contains(&id) || self.enums.contains(&id)
    }

    /// Re-classifies the class, e.g. a contract with an unimplemented function
    /// becomes abstract.
    pub fn set_stereotype(&mut self, stereotype: ClassStereotype) {
        self.stereotype = stereotype;
    }

    pub fn set_imported_paths(&mut self, imported_paths: Vec<String>) {
        self.imported_paths = imported_paths;
    }

    pub fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn push_operator(&mut self, operator: Operator) {
        self.operators.push(operator);
    }

    pub fn push_struct(&mut self, id: ClassId) {
        self.structs.push(id);
    }

    pub fn push_enum(&mut self, id: ClassId) {
        self.enums.push(id);
    }

    /// Adds an association.
    ///
    /// A class holds at most one entry per target name and reference kind.
    /// Adding an existing pair merges into the existing entry. Empty target
    /// names are ignored.
    ///
    /// Returns `true` if a new entry was created.
    pub fn add_association(&mut self, association: Association) -> bool {
        if association.target_name().is_empty() {
            return false;
        }

        let key = association.key();
        if let Some(existing) = self.associations.get_mut(&key) {
            existing.merge(association);
            return false;
        }

        trace!(class = self.name, key = key.as_str(); "Adding association");
        self.associations.insert(key, association);
        true
    }
}
