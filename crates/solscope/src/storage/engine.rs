//! Slot placement.

use std::collections::HashMap;

use log::{debug, trace};

use solscope_builder::type_name::FUNCTION_TYPE;
use solscope_core::{
    catalog::Catalog,
    identifier::ClassId,
    model::{Attribute, AttributeKind, Class, ClassStereotype},
    storage::{Layout, LayoutId, LayoutKind, SLOT_SIZE, Storage, StorageLayout},
};

use crate::error::LayoutError;

use super::{
    resolve::TypeResolver,
    size::{Sizer, element_kind, mapping_value, split_array},
};

/// Lays out one contract or struct and every struct type it reaches.
pub(super) struct LayoutEngine<'c, 'a> {
    types: TypeResolver<'c, 'a>,
    sizer: Sizer<'c, 'a>,
    layouts: Vec<Layout>,
    struct_layouts: HashMap<ClassId, LayoutId>,
}

impl<'c, 'a> LayoutEngine<'c, 'a> {
    pub(super) fn new(catalog: &'c Catalog<'a>) -> Self {
        let types = TypeResolver::new(catalog);
        Self {
            types,
            sizer: Sizer::new(types),
            layouts: Vec::new(),
            struct_layouts: HashMap::new(),
        }
    }

    pub(super) fn run(mut self, root: &'a Class) -> Result<StorageLayout, LayoutError> {
        match root.stereotype() {
            ClassStereotype::Struct => {
                self.struct_layout(root)?;
            }
            stereotype if stereotype.is_contract_like() => {
                let id = self.push_layout(root, LayoutKind::Contract);
                let mut storages = Vec::new();
                self.extend_contract(root, &mut storages, &mut Vec::new())?;
                self.layouts[id.get()].storages = storages;
            }
            stereotype => {
                return Err(LayoutError::NotLayoutable {
                    name: root.name().to_string(),
                    stereotype,
                });
            }
        }

        Ok(StorageLayout::new(self.layouts))
    }

    /// Appends the variables of `contract` after those of its ancestors.
    ///
    /// Parents are laid out depth-first in declaration order. A contract
    /// reached twice through diamond inheritance contributes its variables
    /// once.
    fn extend_contract(
        &mut self,
        contract: &'a Class,
        storages: &mut Vec<Storage>,
        visited: &mut Vec<ClassId>,
    ) -> Result<(), LayoutError> {
        if visited.contains(&contract.id()) {
            return Ok(());
        }
        visited.push(contract.id());

        for parent in self.types.parents(contract)? {
            self.extend_contract(parent, storages, visited)?;
        }

        debug!(contract = contract.name(), from = storages.len(); "Placing contract variables");
        for attribute in contract.attributes() {
            if attribute.is_compiled_constant() {
                trace!(variable = attribute.name(); "Skipping constant");
                continue;
            }
            self.place(contract, contract.name(), attribute, storages)?;
        }
        Ok(())
    }

    /// Returns the layout of a struct type, creating it on first use.
    fn struct_layout(&mut self, structure: &'a Class) -> Result<LayoutId, LayoutError> {
        if let Some(&id) = self.struct_layouts.get(&structure.id()) {
            return Ok(id);
        }

        let id = self.push_layout(structure, LayoutKind::Struct);
        // Registered before recursing so a self-referencing struct links back.
        self.struct_layouts.insert(structure.id(), id);

        let context = self.types.member_context(structure);
        let mut storages = Vec::new();
        for member in structure.attributes() {
            self.place(context, structure.name(), member, &mut storages)?;
        }
        self.layouts[id.get()].storages = storages;

        debug!(
            name = structure.name(),
            layout:% = id,
            slots = self.layouts[id.get()].slots_used();
            "Struct layout computed"
        );
        Ok(id)
    }

    fn push_layout(&mut self, class: &Class, kind: LayoutKind) -> LayoutId {
        let id = LayoutId::new(self.layouts.len());
        self.layouts.push(Layout::new(id, class.name(), kind));
        id
    }

    fn place(
        &mut self,
        context: &'a Class,
        contract_name: &str,
        attribute: &Attribute,
        storages: &mut Vec<Storage>,
    ) -> Result<(), LayoutError> {
        let byte_size = self.sizer.attribute_size(context, attribute)?;
        let nested_layout = match self.struct_type(context, attribute)? {
            Some(structure) => Some(self.struct_layout(structure)?),
            None => None,
        };

        let storage = push_storage(
            storages,
            byte_size,
            attribute.type_name(),
            attribute.name(),
            contract_name,
        );
        storage.nested_layout = nested_layout;
        trace!(storage:?; "Placed variable");
        Ok(())
    }

    /// Returns the struct an attribute holds directly, as array elements or
    /// as the innermost mapping value.
    fn struct_type(
        &self,
        context: &'a Class,
        attribute: &Attribute,
    ) -> Result<Option<&'a Class>, LayoutError> {
        if matches!(
            attribute.kind(),
            AttributeKind::Elementary | AttributeKind::Function
        ) {
            return Ok(None);
        }

        let mut base = attribute.type_name();
        loop {
            base = split_array(base).0;
            match mapping_value(base) {
                Some(value) => base = value,
                None => break,
            }
        }

        if base == FUNCTION_TYPE || element_kind(base) != AttributeKind::UserDefined {
            return Ok(None);
        }

        let target = self.types.resolve_type(context, base)?;
        Ok((target.stereotype() == ClassStereotype::Struct).then_some(target))
    }
}

/// Appends a record of `byte_size` bytes after the last one.
///
/// A value shares the last record's slot when it fits in the bytes left;
/// otherwise it starts at offset 0 of the next slot.
pub(super) fn push_storage<'s>(
    storages: &'s mut Vec<Storage>,
    byte_size: u64,
    type_name: &str,
    variable: &str,
    contract_name: &str,
) -> &'s mut Storage {
    let (from_slot, byte_offset) = match storages.last() {
        None => (0, 0),
        Some(last) if last.end_offset().saturating_add(byte_size) <= SLOT_SIZE => {
            (last.to_slot, last.end_offset())
        }
        Some(last) => (last.to_slot.saturating_add(1), 0),
    };
    let extra_slots = byte_size.div_ceil(SLOT_SIZE).saturating_sub(1);

    let id = storages.len();
    storages.push(Storage {
        id,
        from_slot,
        to_slot: from_slot.saturating_add(extra_slots),
        byte_size,
        byte_offset,
        type_name: type_name.to_string(),
        variable: variable.to_string(),
        contract_name: contract_name.to_string(),
        nested_layout: None,
    });
    &mut storages[id]
}
