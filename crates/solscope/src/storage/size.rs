//! Byte sizes of storage variables.

use solscope_builder::type_name::FUNCTION_TYPE;
use solscope_core::{
    identifier::ClassId,
    model::{Attribute, AttributeKind, Class, ClassStereotype},
    storage::SLOT_SIZE,
};

use crate::error::LayoutError;

use super::resolve::TypeResolver;

/// Size of an address, and of any contract-typed variable.
pub const ADDRESS_SIZE: u64 = 20;

/// Elements at least this large are never packed together in an array.
const UNPACKED_ELEMENT_SIZE: u64 = 17;

/// Returns the byte size of an elementary type, or `None` if `name` is not an
/// elementary type.
///
/// # Examples
///
/// ```
/// use solscope::storage::elementary_size;
///
/// assert_eq!(elementary_size("bool"), Some(1));
/// assert_eq!(elementary_size("uint48"), Some(6));
/// assert_eq!(elementary_size("bytes32"), Some(32));
/// assert_eq!(elementary_size("uint7"), None);
/// ```
pub fn elementary_size(name: &str) -> Option<u64> {
    match name {
        "bool" => Some(1),
        "address" => Some(ADDRESS_SIZE),
        "string" | "bytes" | "uint" | "int" | "ufixed" | "fixed" => Some(SLOT_SIZE),
        _ => {
            if let Some(bits) = name.strip_prefix("uint").or_else(|| name.strip_prefix("int")) {
                integer_bytes(bits)
            } else if let Some(fixed) = name
                .strip_prefix("ufixed")
                .or_else(|| name.strip_prefix("fixed"))
            {
                let (bits, decimals) = fixed.split_once('x')?;
                decimals.parse::<u8>().ok().filter(|&decimals| decimals <= 80)?;
                integer_bytes(bits)
            } else if let Some(bytes) = name.strip_prefix("bytes") {
                bytes
                    .parse::<u64>()
                    .ok()
                    .filter(|bytes| (1..=SLOT_SIZE).contains(bytes))
            } else {
                None
            }
        }
    }
}

/// Converts a bit width in `8..=256`, in steps of 8, to bytes.
fn integer_bytes(bits: &str) -> Option<u64> {
    let bits: u64 = bits.parse().ok()?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits / 8)
}

/// Rounds `size` up to a whole number of slots.
pub(super) fn round_to_slot(size: u64) -> u64 {
    size.div_ceil(SLOT_SIZE).saturating_mul(SLOT_SIZE)
}

/// Splits trailing `[..]` groups off a type string.
///
/// Returns the element type and the dimensions, left-most first. A dynamic
/// dimension is an empty string.
pub(super) fn split_array(type_name: &str) -> (&str, Vec<&str>) {
    let mut element = type_name;
    let mut dimensions = Vec::new();
    while element.ends_with(']') {
        let Some(open) = element.rfind('[') else {
            break;
        };
        dimensions.push(&element[open + 1..element.len() - 1]);
        element = &element[..open];
    }
    dimensions.reverse();
    (element, dimensions)
}

/// Returns the value type of a `mapping(K=>V)` string.
pub(super) fn mapping_value(type_name: &str) -> Option<&str> {
    type_name
        .strip_prefix("mapping(")?
        .strip_suffix(')')?
        .split_once("=>")
        .map(|(_, value)| value)
}

/// Classifies a type string that has no trailing array dimensions.
pub(super) fn element_kind(element: &str) -> AttributeKind {
    if element.starts_with("mapping(") {
        AttributeKind::Mapping
    } else if element == FUNCTION_TYPE {
        AttributeKind::Function
    } else if elementary_size(element).is_some() {
        AttributeKind::Elementary
    } else {
        AttributeKind::UserDefined
    }
}

/// Parses dimensions that are all fixed and positive; `None` if any is not.
fn fixed_dimensions(dimensions: &[&str]) -> Option<Vec<u64>> {
    dimensions
        .iter()
        .map(|dimension| array_length(dimension).filter(|&length| length > 0))
        .collect()
}

/// Parses a decimal or `0x` hexadecimal array length.
fn array_length(dimension: &str) -> Option<u64> {
    match dimension
        .strip_prefix("0x")
        .or_else(|| dimension.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => dimension.parse().ok(),
    }
}

/// Computes byte sizes of variables, resolving user-defined types on demand.
#[derive(Debug, Clone, Copy)]
pub(super) struct Sizer<'c, 'a> {
    types: TypeResolver<'c, 'a>,
}

impl<'c, 'a> Sizer<'c, 'a> {
    pub(super) fn new(types: TypeResolver<'c, 'a>) -> Self {
        Self { types }
    }

    /// Returns the size of an attribute declared in `context`.
    pub(super) fn attribute_size(
        &self,
        context: &'a Class,
        attribute: &Attribute,
    ) -> Result<u64, LayoutError> {
        self.type_size(context, attribute.type_name(), attribute.kind(), &mut Vec::new())
    }

    /// Returns the size of a struct, a whole number of slots and at least one.
    pub(super) fn struct_size(&self, structure: &'a Class) -> Result<u64, LayoutError> {
        self.struct_size_within(structure, &mut Vec::new())
    }

    fn type_size(
        &self,
        context: &'a Class,
        type_name: &str,
        kind: AttributeKind,
        open_structs: &mut Vec<ClassId>,
    ) -> Result<u64, LayoutError> {
        match kind {
            AttributeKind::Mapping | AttributeKind::Function => Ok(SLOT_SIZE),
            AttributeKind::Array => self.array_size(context, type_name, open_structs),
            AttributeKind::UserDefined => {
                let target = self.types.resolve_type(context, type_name)?;
                match target.stereotype() {
                    ClassStereotype::Enum => Ok(1),
                    ClassStereotype::Struct => self.struct_size_within(target, open_structs),
                    _ => Ok(ADDRESS_SIZE),
                }
            }
            AttributeKind::Elementary => elementary_size(type_name)
                .ok_or_else(|| LayoutError::UnknownElementary(type_name.to_string())),
        }
    }

    /// Only the left-most dimension is packed into slots; every other
    /// dimension multiplies the slot-rounded size.
    fn array_size(
        &self,
        context: &'a Class,
        type_name: &str,
        open_structs: &mut Vec<ClassId>,
    ) -> Result<u64, LayoutError> {
        let (element, dimensions) = split_array(type_name);
        let Some(dimensions) = fixed_dimensions(&dimensions) else {
            return Ok(SLOT_SIZE);
        };
        let Some((&first, rest)) = dimensions.split_first() else {
            return Ok(SLOT_SIZE);
        };

        let mut element_size =
            self.type_size(context, element, element_kind(element), open_structs)?;
        if (UNPACKED_ELEMENT_SIZE..SLOT_SIZE).contains(&element_size) {
            element_size = SLOT_SIZE;
        }

        let packed = round_to_slot(element_size.saturating_mul(first));
        Ok(rest
            .iter()
            .fold(packed, |size, &length| size.saturating_mul(length)))
    }

    fn struct_size_within(
        &self,
        structure: &'a Class,
        open_structs: &mut Vec<ClassId>,
    ) -> Result<u64, LayoutError> {
        if open_structs.contains(&structure.id()) {
            return Err(LayoutError::RecursiveStruct(structure.name().to_string()));
        }
        open_structs.push(structure.id());

        let context = self.types.member_context(structure);
        let mut total = 0u64;
        for member in structure.attributes() {
            // Arrays and structs always start a new slot.
            if self.starts_slot(context, member)? {
                total = round_to_slot(total);
            }
            let size = self.type_size(context, member.type_name(), member.kind(), open_structs)?;
            total = total.saturating_add(size);
        }

        open_structs.pop();
        Ok(round_to_slot(total).max(SLOT_SIZE))
    }

    fn starts_slot(&self, context: &'a Class, member: &Attribute) -> Result<bool, LayoutError> {
        Ok(match member.kind() {
            AttributeKind::Array => true,
            AttributeKind::UserDefined => {
                self.types.resolve_type(context, member.type_name())?.stereotype()
                    == ClassStereotype::Struct
            }
            _ => false,
        })
    }
}
