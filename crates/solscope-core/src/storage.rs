//! Storage layout records.
//!
//! A [`StorageLayout`] is what the layout engine returns: the root
//! [`Layout`] of a contract followed by one [`Layout`] per struct type that
//! appears in its variables. [`Storage`] records link to nested struct layouts
//! by [`LayoutId`] instead of inlining their members.

use std::fmt;

use serde::Serialize;

/// Width of a storage slot in bytes.
pub const SLOT_SIZE: u64 = 32;

/// Identifier of a [`Layout`] within one [`StorageLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LayoutId(usize);

impl LayoutId {
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a [`Layout`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LayoutKind {
    Contract,
    Struct,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Contract => f.write_str("Contract"),
            LayoutKind::Struct => f.write_str("Struct"),
        }
    }
}

/// Placement of one variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Storage {
    /// Position of the record within its layout.
    pub id: usize,
    pub from_slot: u64,
    /// Inclusive last slot.
    pub to_slot: u64,
    pub byte_size: u64,
    /// Offset within `from_slot`; always below [`SLOT_SIZE`].
    pub byte_offset: u64,
    #[serde(rename = "type")]
    pub type_name: String,
    pub variable: String,
    /// The contract (or struct) that declared the variable.
    pub contract_name: String,
    /// Layout of the variable's struct type, if it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_layout: Option<LayoutId>,
}

impl Storage {
    /// Returns the number of slots this record spans.
    pub fn slot_count(&self) -> u64 {
        self.to_slot.saturating_sub(self.from_slot).saturating_add(1)
    }

    /// Returns the offset one past the last byte used in `from_slot`.
    pub fn end_offset(&self) -> u64 {
        self.byte_offset.saturating_add(self.byte_size)
    }
}

/// The ordered storage records of one contract or struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub id: LayoutId,
    pub name: String,
    /// Deployed address, when the layout was requested for one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub kind: LayoutKind,
    pub storages: Vec<Storage>,
}

impl Layout {
    pub fn new(id: LayoutId, name: impl Into<String>, kind: LayoutKind) -> Self {
        Self {
            id,
            name: name.into(),
            address: None,
            kind,
            storages: Vec::new(),
        }
    }

    /// Returns the number of slots used, which is one past the highest
    /// `to_slot`.
    pub fn slots_used(&self) -> u64 {
        self.storages
            .last()
            .map_or(0, |storage| storage.to_slot.saturating_add(1))
    }

    /// Returns the record for the named variable.
    pub fn storage(&self, variable: &str) -> Option<&Storage> {
        self.storages
            .iter()
            .find(|storage| storage.variable == variable)
    }
}

/// A root layout together with the struct layouts it links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageLayout {
    layouts: Vec<Layout>,
}

impl StorageLayout {
    /// Creates a storage layout from a root followed by nested layouts.
    ///
    /// Every layout's id must equal its position.
    pub fn new(layouts: Vec<Layout>) -> Self {
        debug_assert!(
            layouts
                .iter()
                .enumerate()
                .all(|(position, layout)| layout.id.get() == position),
            "layout ids must match their positions"
        );
        Self { layouts }
    }

    /// Returns the root layout.
    ///
    /// # Panics
    ///
    /// Panics if the storage layout is empty, which the engine never produces.
    pub fn root(&self) -> &Layout {
        &self.layouts[0]
    }

    pub fn root_mut(&mut self) -> &mut Layout {
        &mut self.layouts[0]
    }

    /// Returns the struct layouts in discovery order.
    pub fn nested(&self) -> &[Layout] {
        &self.layouts[1..]
    }

    pub fn get(&self, id: LayoutId) -> Option<&Layout> {
        self.layouts.get(id.get())
    }

    /// Returns the nested layout a storage record links to.
    pub fn nested_of(&self, storage: &Storage) -> Option<&Layout> {
        storage.nested_layout.and_then(|id| self.get(id))
    }

    /// Returns all layouts, root first.
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// Finds a layout by name.
    pub fn find(&self, name: &str) -> Option<&Layout> {
        self.layouts.iter().find(|layout| layout.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(id: usize, from_slot: u64, to_slot: u64, size: u64, offset: u64) -> Storage {
        Storage {
            id,
            from_slot,
            to_slot,
            byte_size: size,
            byte_offset: offset,
            type_name: "uint256".to_string(),
            variable: format!("v{id}"),
            contract_name: "C".to_string(),
            nested_layout: None,
        }
    }

    #[test]
    fn test_slots_used() {
        let mut layout = Layout::new(LayoutId::new(0), "C", LayoutKind::Contract);
        assert_eq!(layout.slots_used(), 0);

        layout.storages.push(storage(0, 0, 0, 32, 0));
        layout.storages.push(storage(1, 1, 2, 64, 0));
        assert_eq!(layout.slots_used(), 3);
        assert_eq!(layout.storages[1].slot_count(), 2);
    }

    #[test]
    fn test_huge_records_saturate() {
        let mut layout = Layout::new(LayoutId::new(0), "C", LayoutKind::Contract);
        let huge = storage(0, 0, u64::MAX, u64::MAX, 8);
        assert_eq!(huge.end_offset(), u64::MAX);
        assert_eq!(huge.slot_count(), u64::MAX);

        layout.storages.push(huge);
        assert_eq!(layout.slots_used(), u64::MAX);
    }

    #[test]
    fn test_nested_lookup() {
        let mut root = Layout::new(LayoutId::new(0), "C", LayoutKind::Contract);
        let mut linked = storage(0, 0, 1, 64, 0);
        linked.nested_layout = Some(LayoutId::new(1));
        root.storages.push(linked);
        let nested = Layout::new(LayoutId::new(1), "Position", LayoutKind::Struct);

        let layout = StorageLayout::new(vec![root, nested]);

        assert_eq!(layout.nested().len(), 1);
        let target = layout.nested_of(&layout.root().storages[0]);
        assert_eq!(target.map(|l| l.name.as_str()), Some("Position"));
        assert!(layout.find("Position").is_some());
    }

    #[test]
    fn test_serialize_renames_type() {
        let record = storage(0, 0, 0, 32, 0);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], "uint256");
        assert!(value.get("type_name").is_none());
        assert!(value.get("nested_layout").is_none());
    }
}
