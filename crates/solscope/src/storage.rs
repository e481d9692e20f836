//! Storage layout engine.
//!
//! Computes how a contract's state variables are packed into 32-byte slots:
//!
//! - Variables of all non-interface ancestors come first, parents in
//!   declaration order, depth-first.
//! - Constants and immutables take no storage.
//! - A variable shares the current slot when it fits in the bytes left, and
//!   starts a new slot otherwise.
//! - Every struct type reached from a variable, directly, through arrays or
//!   as a mapping value, gets its own [`Layout`](solscope_core::storage::Layout)
//!   starting at slot 0, which the variable's record links to.
//!
//! # Example
//!
//! ```
//! use solscope::storage;
//! use solscope_core::{
//!     catalog::Catalog,
//!     identifier::IdGenerator,
//!     model::{Attribute, AttributeKind, Class, ClassStereotype},
//! };
//!
//! let ids = IdGenerator::new();
//! let mut vault =
//!     Class::new(ids.next_id(), "Vault", ClassStereotype::Contract, "/v.sol", "v.sol");
//! vault.push_attribute(Attribute::new("owner", "address", AttributeKind::Elementary));
//! vault.push_attribute(Attribute::new("paused", "bool", AttributeKind::Elementary));
//! let classes = [vault];
//!
//! let layout = storage::layout(&Catalog::new(&classes), "Vault").unwrap();
//! let paused = layout.root().storage("paused").unwrap();
//! assert_eq!((paused.from_slot, paused.byte_offset), (0, 20));
//! ```

mod engine;
mod resolve;
mod size;

pub use size::{ADDRESS_SIZE, elementary_size};

use log::{debug, info};

use solscope_core::{catalog::Catalog, model::Class, storage::StorageLayout};

use crate::error::LayoutError;

use engine::LayoutEngine;

/// Computes the storage layout of the contract or struct named `name`.
///
/// Contracts are preferred over structs of the same name. The returned
/// [`StorageLayout`] holds the root layout followed by one layout per struct
/// type it reaches.
///
/// # Errors
///
/// Returns [`LayoutError`] if the class, a parent contract or a user-defined
/// type cannot be found, if an elementary type is not recognised, or if a
/// struct contains itself by value.
pub fn layout(catalog: &Catalog<'_>, name: &str) -> Result<StorageLayout, LayoutError> {
    let root = find_root(catalog, name)?;
    info!(name, stereotype:% = root.stereotype(); "Computing storage layout");

    let storage_layout = LayoutEngine::new(catalog).run(root)?;

    debug!(
        variables = storage_layout.root().storages.len(),
        slots = storage_layout.root().slots_used(),
        nested = storage_layout.nested().len();
        "Storage layout computed"
    );
    Ok(storage_layout)
}

fn find_root<'a>(catalog: &Catalog<'a>, name: &str) -> Result<&'a Class, LayoutError> {
    catalog
        .iter()
        .find(|class| class.name() == name && class.stereotype().is_contract_like())
        .or_else(|| catalog.find_by_name(name))
        .ok_or_else(|| LayoutError::ContractNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use solscope_core::{
        identifier::IdGenerator,
        model::{Association, Attribute, AttributeKind, ClassStereotype},
        storage::SLOT_SIZE,
    };

    use super::*;

    fn class(ids: &IdGenerator, name: &str, stereotype: ClassStereotype) -> Class {
        Class::new(ids.next_id(), name, stereotype, "/t.sol", "t.sol")
    }

    fn variable(name: &str, type_name: &str, kind: AttributeKind) -> Attribute {
        Attribute::new(name, type_name, kind)
    }

    fn positions(layout: &solscope_core::storage::Layout) -> Vec<(&str, u64, u64, u64)> {
        layout
            .storages
            .iter()
            .map(|s| (s.variable.as_str(), s.from_slot, s.to_slot, s.byte_offset))
            .collect()
    }

    #[test]
    fn test_parent_variables_come_first() {
        let ids = IdGenerator::new();
        let mut a = class(&ids, "A", ClassStereotype::Contract);
        a.push_attribute(variable("total", "uint256", AttributeKind::Elementary));
        let mut b = class(&ids, "B", ClassStereotype::Contract);
        b.add_association(Association::realization("A"));
        b.push_attribute(variable("open", "bool", AttributeKind::Elementary));
        let classes = [a, b];

        let layout = layout(&Catalog::new(&classes), "B").unwrap();

        let root = layout.root();
        assert_eq!(positions(root), vec![("total", 0, 0, 0), ("open", 1, 1, 0)]);
        assert_eq!(root.storages[0].contract_name, "A");
        assert_eq!(root.storages[1].contract_name, "B");
    }

    #[test]
    fn test_small_parent_variable_shares_slot() {
        let ids = IdGenerator::new();
        let mut a = class(&ids, "A", ClassStereotype::Contract);
        a.push_attribute(variable("owner", "address", AttributeKind::Elementary));
        let mut b = class(&ids, "B", ClassStereotype::Contract);
        b.add_association(Association::realization("A"));
        b.push_attribute(variable("open", "bool", AttributeKind::Elementary));
        let classes = [a, b];

        let layout = layout(&Catalog::new(&classes), "B").unwrap();

        assert_eq!(positions(layout.root()), vec![("owner", 0, 0, 0), ("open", 0, 0, 20)]);
    }

    #[test]
    fn test_multiple_and_diamond_inheritance() {
        let ids = IdGenerator::new();
        let mut base = class(&ids, "Base", ClassStereotype::Contract);
        base.push_attribute(variable("base", "uint256", AttributeKind::Elementary));
        let mut left = class(&ids, "Left", ClassStereotype::Abstract);
        left.add_association(Association::realization("Base"));
        left.push_attribute(variable("left", "uint256", AttributeKind::Elementary));
        let mut right = class(&ids, "Right", ClassStereotype::Contract);
        right.add_association(Association::realization("Base"));
        right.push_attribute(variable("right", "uint256", AttributeKind::Elementary));
        let mut child = class(&ids, "Child", ClassStereotype::Contract);
        child.add_association(Association::realization("Left"));
        child.add_association(Association::realization("Right"));
        child.push_attribute(variable("child", "uint256", AttributeKind::Elementary));
        let classes = [base, left, right, child];

        let layout = layout(&Catalog::new(&classes), "Child").unwrap();

        let order: Vec<_> = positions(layout.root()).into_iter().map(|p| p.0).collect();
        assert_eq!(order, vec!["base", "left", "right", "child"]);
    }

    #[test]
    fn test_constants_are_skipped() {
        let ids = IdGenerator::new();
        let mut vault = class(&ids, "Vault", ClassStereotype::Contract);
        vault.push_attribute(
            variable("MAX", "uint256", AttributeKind::Elementary).with_compiled_constant(true),
        );
        vault.push_attribute(variable("count", "uint8", AttributeKind::Elementary));
        let classes = [vault];

        let layout = layout(&Catalog::new(&classes), "Vault").unwrap();

        assert_eq!(positions(layout.root()), vec![("count", 0, 0, 0)]);
    }

    #[test]
    fn test_struct_variables_link_nested_layouts() {
        let ids = IdGenerator::new();
        let mut vault = class(&ids, "Vault", ClassStereotype::Contract);
        let mut position = class(&ids, "Position", ClassStereotype::Struct);
        position.push_attribute(variable("amount", "uint128", AttributeKind::Elementary));
        position.push_attribute(variable("debt", "uint128", AttributeKind::Elementary));
        let next = variable("next", "mapping(uint256=>Position)", AttributeKind::Mapping);
        position.push_attribute(next);
        vault.push_struct(position.id());
        vault.push_attribute(variable("flag", "bool", AttributeKind::Elementary));
        vault.push_attribute(variable("current", "Position", AttributeKind::UserDefined));
        vault.push_attribute(variable("history", "Position[]", AttributeKind::Array));
        vault.push_attribute(variable(
            "byOwner",
            "mapping(address=>Position[2])",
            AttributeKind::Mapping,
        ));
        let classes = [vault, position];

        let layout = layout(&Catalog::new(&classes), "Vault").unwrap();

        let root = layout.root();
        assert_eq!(
            positions(root),
            vec![
                ("flag", 0, 0, 0),
                ("current", 1, 2, 0),
                ("history", 3, 3, 0),
                ("byOwner", 4, 4, 0)
            ]
        );
        assert_eq!(layout.nested().len(), 1);
        let nested = &layout.nested()[0];
        assert_eq!(nested.name, "Position");
        assert!(root.storages[1..].iter().all(|s| s.nested_layout == Some(nested.id)));
        assert!(root.storages[0].nested_layout.is_none());

        assert_eq!(
            positions(nested),
            vec![("amount", 0, 0, 0), ("debt", 0, 0, 16), ("next", 1, 1, 0)]
        );
        // Self reference links back to the same layout.
        assert_eq!(nested.storages[2].nested_layout, Some(nested.id));
        assert_eq!(nested.storages[0].contract_name, "Position");
    }

    #[test]
    fn test_long_array_reserves_every_slot() {
        let ids = IdGenerator::new();
        let mut vault = class(&ids, "Vault", ClassStereotype::Contract);
        vault.push_attribute(variable("arr", "address[33]", AttributeKind::Array));
        vault.push_attribute(variable("next", "uint256", AttributeKind::Elementary));
        let classes = [vault];

        let layout = layout(&Catalog::new(&classes), "Vault").unwrap();

        assert_eq!(positions(layout.root()), vec![("arr", 0, 32, 0), ("next", 33, 33, 0)]);
    }

    #[test]
    fn test_oversized_array_does_not_overflow() {
        let ids = IdGenerator::new();
        let mut vault = class(&ids, "Vault", ClassStereotype::Contract);
        vault.push_attribute(variable(
            "big",
            "uint256[1000000000000000000][1000]",
            AttributeKind::Array,
        ));
        vault.push_attribute(variable("flag", "bool", AttributeKind::Elementary));
        let classes = [vault];

        let layout = layout(&Catalog::new(&classes), "Vault").unwrap();

        let span = u64::MAX.div_ceil(SLOT_SIZE);
        let root = layout.root();
        assert_eq!(root.storages[0].byte_size, u64::MAX);
        assert_eq!(positions(root), vec![("big", 0, span - 1, 0), ("flag", span, span, 0)]);
        assert_eq!(root.slots_used(), span + 1);
    }

    #[test]
    fn test_struct_root() {
        let ids = IdGenerator::new();
        let mut pair = class(&ids, "Pair", ClassStereotype::Struct);
        pair.push_attribute(variable("a", "uint256", AttributeKind::Elementary));
        pair.push_attribute(variable("b", "bool", AttributeKind::Elementary));
        let classes = [pair];

        let layout = layout(&Catalog::new(&classes), "Pair").unwrap();

        assert_eq!(layout.layouts().len(), 1);
        assert_eq!(layout.root().kind, solscope_core::storage::LayoutKind::Struct);
        assert_eq!(layout.root().slots_used(), 2);
    }

    #[test]
    fn test_errors() {
        let ids = IdGenerator::new();
        let mut vault = class(&ids, "Vault", ClassStereotype::Contract);
        vault.push_attribute(variable("p", "Missing", AttributeKind::UserDefined));
        let status = class(&ids, "Status", ClassStereotype::Enum);
        let classes = [vault, status];
        let catalog = Catalog::new(&classes);

        assert_eq!(
            layout(&catalog, "Nope"),
            Err(LayoutError::ContractNotFound("Nope".to_string()))
        );
        assert!(matches!(
            layout(&catalog, "Vault"),
            Err(LayoutError::UnknownType { ref type_name, .. }) if type_name == "Missing"
        ));
        assert!(matches!(
            layout(&catalog, "Status"),
            Err(LayoutError::NotLayoutable { .. })
        ));
    }
}
