//! Associations between classes.
//!
//! An association is recorded by target *name* only. Resolving the name to a
//! concrete [`Class`](super::Class) is deferred to consumers, which use
//! [`Catalog::resolve_target`](crate::catalog::Catalog::resolve_target).

use std::fmt;

use serde::Serialize;

use super::ClassStereotype;

/// Whether the referencing variable lives in contract storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReferenceKind {
    Memory,
    Storage,
}

impl ReferenceKind {
    /// Returns [`ReferenceKind::Storage`] for state variables and
    /// [`ReferenceKind::Memory`] otherwise.
    pub fn from_state(is_state_variable: bool) -> Self {
        if is_state_variable {
            ReferenceKind::Storage
        } else {
            ReferenceKind::Memory
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Memory => f.write_str("memory"),
            ReferenceKind::Storage => f.write_str("storage"),
        }
    }
}

/// Key of an association within its source class.
///
/// Derived from the target name and reference kind, so adding the same pair
/// twice addresses the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssociationKey(String);

impl AssociationKey {
    pub fn new(target_name: &str, reference_kind: ReferenceKind) -> Self {
        Self(format!("{target_name}:{reference_kind}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A reference from one class to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Association {
    reference_kind: ReferenceKind,
    target_name: String,
    target_stereotype: Option<ClassStereotype>,
    is_realization: bool,
}

impl Association {
    /// Creates a usage association.
    pub fn usage(target_name: impl Into<String>, reference_kind: ReferenceKind) -> Self {
        Self {
            reference_kind,
            target_name: target_name.into(),
            target_stereotype: None,
            is_realization: false,
        }
    }

    /// Creates an inheritance or interface-implementation association.
    ///
    /// Realizations are always storage references.
    pub fn realization(target_name: impl Into<String>) -> Self {
        Self {
            reference_kind: ReferenceKind::Storage,
            target_name: target_name.into(),
            target_stereotype: None,
            is_realization: true,
        }
    }

    /// Records the stereotype of the target when it is known at build time.
    pub fn with_target_stereotype(mut self, stereotype: ClassStereotype) -> Self {
        self.target_stereotype = Some(stereotype);
        self
    }

    pub fn key(&self) -> AssociationKey {
        AssociationKey::new(&self.target_name, self.reference_kind)
    }

    pub fn reference_kind(&self) -> ReferenceKind {
        self.reference_kind
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn target_stereotype(&self) -> Option<ClassStereotype> {
        self.target_stereotype
    }

    pub fn is_realization(&self) -> bool {
        self.is_realization
    }

    /// Folds another association with the same key into this one.
    pub(crate) fn merge(&mut self, other: Association) {
        debug_assert_eq!(self.key(), other.key());
        self.is_realization |= other.is_realization;
        if self.target_stereotype.is_none() {
            self.target_stereotype = other.target_stereotype;
        }
    }
}
