//! Lookups over a set of classes.
//!
//! Class names are not unique across a code base, only per source path. A
//! [`Catalog`] resolves an association's target name the same way for every
//! consumer: the target must carry the name and must either live in the same
//! source unit as the referencing class or in a unit it imports.

use std::collections::HashMap;

use log::trace;

use crate::{
    identifier::ClassId,
    model::{Class, ClassStereotype},
};

/// A borrowed, ordered view over classes.
///
/// The catalog never copies classes, so the identity of every class returned
/// from it is the identity of the class it was built from.
#[derive(Debug, Clone, Default)]
pub struct Catalog<'a> {
    classes: Vec<&'a Class>,
    index: HashMap<ClassId, usize>,
}

impl<'a> Catalog<'a> {
    /// Creates a catalog over the given classes, preserving their order.
    pub fn new(classes: impl IntoIterator<Item = &'a Class>) -> Self {
        let classes: Vec<&'a Class> = classes.into_iter().collect();
        let index = classes
            .iter()
            .enumerate()
            .map(|(position, class)| (class.id(), position))
            .collect();
        Self { classes, index }
    }

    /// Returns an iterator over the classes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Class> + '_ {
        self.classes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns the class with the given id.
    pub fn get(&self, id: ClassId) -> Option<&'a Class> {
        self.index.get(&id).map(|&position| self.classes[position])
    }

    /// Returns the first class with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&'a Class> {
        self.iter().find(|class| class.name() == name)
    }

    /// Resolves an association target name as seen from `source`.
    ///
    /// Returns the first class named `target_name` whose absolute path is
    /// either `source`'s own path or one of `source`'s imported paths.
    pub fn resolve_target(&self, source: &Class, target_name: &str) -> Option<&'a Class> {
        let target = self
            .iter()
            .find(|target| target.name() == target_name && is_visible(source, target));

        if target.is_none() {
            trace!(source = source.name(), target = target_name; "Association target not resolved");
        }
        target
    }

    /// Returns the class that declares `child` as a struct or enum.
    pub fn owner_of(&self, child: ClassId) -> Option<&'a Class> {
        self.iter().find(|class| class.owns(child))
    }

    /// Returns the struct or enum named `name` declared inside `owner`.
    pub fn child_named(&self, owner: &Class, name: &str) -> Option<&'a Class> {
        owner
            .structs()
            .iter()
            .chain(owner.enums())
            .filter_map(|&id| self.get(id))
            .find(|child| child.name() == name)
    }

    /// Returns all classes with the given stereotype.
    pub fn with_stereotype(
        &self,
        stereotype: ClassStereotype,
    ) -> impl Iterator<Item = &'a Class> + '_ {
        self.iter().filter(move |class| class.stereotype() == stereotype)
    }
}

/// Returns `true` when `source` can refer to `target` by name: both live in
/// the same source unit, or `source`'s unit imports `target`'s.
pub fn is_visible(source: &Class, target: &Class) -> bool {
    source.absolute_path() == target.absolute_path()
        || source
            .imported_paths()
            .iter()
            .any(|path| path == target.absolute_path())
}

impl<'a> FromIterator<&'a Class> for Catalog<'a> {
    fn from_iter<T: IntoIterator<Item = &'a Class>>(iter: T) -> Self {
        Self::new(iter)
    }
}
