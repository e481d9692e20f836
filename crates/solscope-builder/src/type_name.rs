//! Rendering of type names into the strings used throughout the model.
//!
//! The rendered string is also the lookup key for sizing and nested layouts,
//! so the same type always renders to the same text:
//!
//! - elementary types render as their keyword, e.g. `uint256`
//! - user-defined types render as their dotted path, e.g. `Set.Data`
//! - function types render as [`FUNCTION_TYPE`]
//! - arrays append one bracket group per dimension, innermost first, e.g.
//!   `uint8[33][2]` or `bool[]`
//! - mappings render as `mapping(K=>V)`

use solscope_core::model::AttributeKind;

use crate::{
    ast::{Expression, TypeName},
    error::{Diagnostic, ErrorCode, Result},
};

/// Placeholder rendered for every function type.
pub const FUNCTION_TYPE: &str = "function";

/// A rendered type string and the kind of type it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub name: String,
    pub kind: AttributeKind,
}

impl ResolvedType {
    fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Renders a type name.
///
/// # Errors
///
/// Returns an [`ErrorCode::E200`] diagnostic when the type name, or any type
/// nested inside it, is of an unknown kind.
pub fn resolve(type_name: &TypeName) -> Result<ResolvedType> {
    match type_name {
        TypeName::ElementaryTypeName { name } => {
            Ok(ResolvedType::new(name.as_str(), AttributeKind::Elementary))
        }
        TypeName::UserDefinedTypeName { name_path } => {
            Ok(ResolvedType::new(name_path.as_str(), AttributeKind::UserDefined))
        }
        TypeName::FunctionTypeName => Ok(ResolvedType::new(FUNCTION_TYPE, AttributeKind::Function)),
        TypeName::ArrayTypeName {
            base_type_name,
            length,
        } => {
            let element = resolve(base_type_name)?;
            let name = format!("{}[{}]", element.name, array_length(length.as_deref()));
            Ok(ResolvedType::new(name, AttributeKind::Array))
        }
        TypeName::Mapping {
            key_type,
            value_type,
        } => {
            let key = resolve(key_type)?;
            let value = resolve(value_type)?;
            let name = format!("mapping({}=>{})", key.name, value.name);
            Ok(ResolvedType::new(name, AttributeKind::Mapping))
        }
        TypeName::Unknown => Err(Diagnostic::error("unsupported type name kind")
            .with_code(ErrorCode::E200)
            .with_help(
                "expected an elementary, user-defined, function, array or mapping type name",
            )),
    }
}

/// Renders the length of one array dimension.
///
/// Only literal lengths are kept. Dynamic arrays and lengths given by an
/// expression render as an empty bracket group.
fn array_length(length: Option<&Expression>) -> &str {
    match length {
        Some(Expression::NumberLiteral { number }) => number,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elementary(name: &str) -> TypeName {
        TypeName::ElementaryTypeName {
            name: name.to_string(),
        }
    }

    fn array(base: TypeName, length: Option<&str>) -> TypeName {
        TypeName::ArrayTypeName {
            base_type_name: Box::new(base),
            length: length.map(|number| {
                Box::new(Expression::NumberLiteral {
                    number: number.to_string(),
                })
            }),
        }
    }

    fn mapping(key: TypeName, value: TypeName) -> TypeName {
        TypeName::Mapping {
            key_type: Box::new(key),
            value_type: Box::new(value),
        }
    }

    #[test]
    fn test_elementary_and_user_defined() {
        let resolved = resolve(&elementary("address")).unwrap();
        assert_eq!(resolved, ResolvedType::new("address", AttributeKind::Elementary));

        let user = TypeName::UserDefinedTypeName {
            name_path: "Set.Data".to_string(),
        };
        let resolved = resolve(&user).unwrap();
        assert_eq!(resolved, ResolvedType::new("Set.Data", AttributeKind::UserDefined));
    }

    #[test]
    fn test_function_placeholder() {
        let resolved = resolve(&TypeName::FunctionTypeName).unwrap();
        assert_eq!(resolved.name, FUNCTION_TYPE);
        assert_eq!(resolved.kind, AttributeKind::Function);
    }

    #[test]
    fn test_array_dimensions_innermost_first() {
        let type_name = array(array(array(elementary("uint8"), Some("33")), Some("2")), None);

        let resolved = resolve(&type_name).unwrap();
        assert_eq!(resolved.name, "uint8[33][2][]");
        assert_eq!(resolved.kind, AttributeKind::Array);
    }

    #[test]
    fn test_array_with_expression_length_is_dynamic() {
        let type_name = TypeName::ArrayTypeName {
            base_type_name: Box::new(elementary("bool")),
            length: Some(Box::new(Expression::Identifier {
                name: "SIZE".to_string(),
            })),
        };

        assert_eq!(resolve(&type_name).unwrap().name, "bool[]");
    }

    #[test]
    fn test_mapping_rendering() {
        let type_name = mapping(elementary("address"), elementary("uint256"));

        let resolved = resolve(&type_name).unwrap();
        assert_eq!(resolved.name, "mapping(address=>uint256)");
        assert_eq!(resolved.kind, AttributeKind::Mapping);
    }

    #[test]
    fn test_nested_mapping_rendering() {
        let value = mapping(
            TypeName::UserDefinedTypeName {
                name_path: "IERC20".to_string(),
            },
            array(elementary("uint256"), None),
        );
        let type_name = mapping(elementary("address"), value);

        assert_eq!(
            resolve(&type_name).unwrap().name,
            "mapping(address=>mapping(IERC20=>uint256[]))"
        );
    }

    #[test]
    fn test_mapping_rendering_is_stable() {
        let type_name = mapping(elementary("address"), elementary("uint256"));

        let first = resolve(&type_name).unwrap();
        let second = resolve(&type_name).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.name, "mapping(address=>uint256)");
    }

    #[test]
    fn test_unknown_kind_is_error() {
        let err = resolve(&array(TypeName::Unknown, Some("2"))).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E200));
    }
}
