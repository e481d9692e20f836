//! Name resolution for the layout engine.

use log::trace;

use solscope_core::{
    catalog::Catalog,
    identifier::ClassId,
    model::{Class, ClassStereotype},
};

use crate::error::LayoutError;

/// Resolves parent contracts and user-defined type names against a catalog.
#[derive(Debug, Clone, Copy)]
pub(super) struct TypeResolver<'c, 'a> {
    catalog: &'c Catalog<'a>,
}

impl<'c, 'a> TypeResolver<'c, 'a> {
    pub(super) fn new(catalog: &'c Catalog<'a>) -> Self {
        Self { catalog }
    }

    /// Returns the immediate non-interface parents of `class` in declaration
    /// order.
    pub(super) fn parents(&self, class: &'a Class) -> Result<Vec<&'a Class>, LayoutError> {
        let mut parents = Vec::new();
        for association in class.parent_associations() {
            if association.target_stereotype() == Some(ClassStereotype::Interface) {
                continue;
            }

            let parent = self
                .find_parent(class, association.target_name())
                .ok_or_else(|| LayoutError::ParentNotFound {
                    parent: association.target_name().to_string(),
                    child: class.name().to_string(),
                })?;

            if parent.stereotype() == ClassStereotype::Interface {
                trace!(child = class.name(), parent = parent.name(); "Skipping interface parent");
                continue;
            }
            parents.push(parent);
        }
        Ok(parents)
    }

    /// Resolves a user-defined type name used inside `context`.
    ///
    /// `Outer.Inner` resolves `Inner` among the children of `Outer`. A plain
    /// name is looked up among the children of `context` and its ancestors,
    /// then among the classes visible from `context`, then by name alone.
    pub(super) fn resolve_type(
        &self,
        context: &'a Class,
        type_name: &str,
    ) -> Result<&'a Class, LayoutError> {
        let found = match type_name.split_once('.') {
            Some((outer, inner)) => self
                .resolve_plain(context, outer)
                .and_then(|outer| self.catalog.child_named(outer, inner)),
            None => self.resolve_plain(context, type_name),
        };

        found.ok_or_else(|| LayoutError::UnknownType {
            type_name: type_name.to_string(),
            context: context.name().to_string(),
        })
    }

    /// Returns the class whose scope a struct's member types are looked up in:
    /// its owning contract, or the struct itself at file level.
    pub(super) fn member_context(&self, structure: &'a Class) -> &'a Class {
        self.catalog.owner_of(structure.id()).unwrap_or(structure)
    }

    fn resolve_plain(&self, context: &'a Class, name: &str) -> Option<&'a Class> {
        self.find_in_hierarchy(context, name, &mut Vec::new())
            .or_else(|| self.catalog.resolve_target(context, name))
            .or_else(|| self.catalog.find_by_name(name))
    }

    fn find_in_hierarchy(
        &self,
        class: &'a Class,
        name: &str,
        visited: &mut Vec<ClassId>,
    ) -> Option<&'a Class> {
        if visited.contains(&class.id()) {
            return None;
        }
        visited.push(class.id());

        if let Some(child) = self.catalog.child_named(class, name) {
            return Some(child);
        }

        class
            .parent_associations()
            .filter_map(|association| self.find_parent(class, association.target_name()))
            .find_map(|parent| self.find_in_hierarchy(parent, name, visited))
    }

    fn find_parent(&self, child: &Class, name: &str) -> Option<&'a Class> {
        self.catalog
            .resolve_target(child, name)
            .or_else(|| self.catalog.find_by_name(name))
    }
}
