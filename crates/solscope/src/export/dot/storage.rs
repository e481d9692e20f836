//! Storage slot diagram.

use std::fmt;

use solscope_core::storage::{Layout, LayoutKind, Storage, StorageLayout};

use super::{escape_label, write_header};

/// A storage diagram with one node per layout.
///
/// Each node has a slot column and a variable column. Variables packed into
/// the same slot share one row.
#[derive(Debug, Clone, Copy)]
pub struct StorageDiagram<'l> {
    layout: &'l StorageLayout,
}

impl<'l> StorageDiagram<'l> {
    pub fn new(layout: &'l StorageLayout) -> Self {
        Self { layout }
    }
}

impl fmt::Display for StorageDiagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, "StorageDiagram", "LR")?;

        for layout in self.layout.layouts() {
            write_layout(f, layout)?;
        }

        for layout in self.layout.layouts() {
            for storage in &layout.storages {
                if let Some(nested) = storage.nested_layout {
                    writeln!(f, "{}:{} -> {}", layout.id, storage.id, nested)?;
                }
            }
        }

        writeln!(f, "}}")
    }
}

/// Serializes a storage layout as a `digraph StorageDiagram`.
pub fn storage_diagram(layout: &StorageLayout) -> String {
    StorageDiagram::new(layout).to_string()
}

fn write_layout(f: &mut fmt::Formatter<'_>, layout: &Layout) -> fmt::Result {
    write!(
        f,
        "{} [label=\"{{\\<\\<{}\\>\\>\\n{}",
        layout.id,
        layout.kind,
        escape_label(&layout.name)
    )?;
    if let Some(address) = &layout.address {
        write!(f, "\\n{}", escape_label(address))?;
    }

    let rows = slot_rows(&layout.storages);

    write!(f, " | {{slot")?;
    for row in &rows {
        write!(f, " | {}", slot_label(row))?;
    }

    let prefix = match layout.kind {
        LayoutKind::Contract => "\\<inherited contract\\>.",
        LayoutKind::Struct => "",
    };
    write!(f, "}} | {{type: {prefix}variable (bytes)")?;
    for row in &rows {
        match row {
            [single] => write!(f, " | {}", variable_cell(single, &layout.name))?,
            packed => {
                let cells: Vec<String> = packed
                    .iter()
                    .map(|storage| variable_cell(storage, &layout.name))
                    .collect();
                write!(f, " | {{ {} }}", cells.join(" | "))?;
            }
        }
    }

    writeln!(f, "}}}}\"]")
}

/// Groups consecutive records that start in the same slot.
fn slot_rows(storages: &[Storage]) -> Vec<&[Storage]> {
    storages
        .chunk_by(|previous, next| previous.from_slot == next.from_slot)
        .collect()
}

fn slot_label(row: &[Storage]) -> String {
    let first = &row[0];
    let to_slot = row.iter().map(|storage| storage.to_slot).max().unwrap_or(first.to_slot);
    if first.from_slot == to_slot {
        first.from_slot.to_string()
    } else {
        format!("{}-{}", first.from_slot, to_slot)
    }
}

/// Formats `type: [Contract.]variable (bytes)`, with a port when the record
/// links to a nested layout.
fn variable_cell(storage: &Storage, layout_name: &str) -> String {
    let port = match storage.nested_layout {
        Some(_) => format!("<{}> ", storage.id),
        None => String::new(),
    };
    let owner = if storage.contract_name != layout_name {
        format!("{}.", escape_label(&storage.contract_name))
    } else {
        String::new()
    };
    format!(
        "{port}{}: {owner}{} ({})",
        escape_label(&storage.type_name),
        escape_label(&storage.variable),
        storage.byte_size
    )
}
