//! Class members: attributes, operators and their parameters.

use std::fmt;

use serde::Serialize;

/// Visibility of an attribute or operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Visibility {
    /// No visibility applies, e.g. struct members, modifiers and events.
    #[default]
    None,
    Public,
    External,
    Internal,
    Private,
}

impl Visibility {
    /// Returns the UML marker for this visibility.
    pub fn symbol(self) -> &'static str {
        match self {
            Visibility::None => "",
            Visibility::Public | Visibility::External => "+",
            Visibility::Internal => "#",
            Visibility::Private => "-",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Visibility::None => "none",
            Visibility::Public => "public",
            Visibility::External => "external",
            Visibility::Internal => "internal",
            Visibility::Private => "private",
        };
        f.write_str(name)
    }
}

/// The syntactic category of an attribute's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeKind {
    Elementary,
    UserDefined,
    Function,
    Array,
    Mapping,
}

/// A state variable, struct member or enum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    kind: AttributeKind,
    visibility: Visibility,
    is_compiled_constant: bool,
}

impl Attribute {
    /// Creates an attribute with no visibility that occupies storage.
    ///
    /// # Arguments
    ///
    /// * `name` - The declared identifier.
    /// * `type_name` - The rendered type string, e.g. `mapping(address=>uint256)`.
    /// * `kind` - The category of the type.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind,
            visibility: Visibility::None,
            is_compiled_constant: false,
        }
    }

    /// Sets the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Marks the attribute as `constant` or `immutable`.
    pub fn with_compiled_constant(mut self, is_compiled_constant: bool) -> Self {
        self.is_compiled_constant = is_compiled_constant;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns `true` for `constant` and `immutable` variables, which never
    /// occupy a storage slot.
    pub fn is_compiled_constant(&self) -> bool {
        self.is_compiled_constant
    }
}

/// Stereotype of an operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorStereotype {
    #[default]
    None,
    Constructor,
    Modifier,
    Event,
    Fallback,
    Abstract,
    Payable,
}

/// A function parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Absent for unnamed return values.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: Option<String>, type_name: impl Into<String>) -> Self {
        Self {
            name,
            type_name: type_name.into(),
        }
    }
}

/// A function, constructor, fallback, modifier or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operator {
    name: String,
    stereotype: OperatorStereotype,
    visibility: Visibility,
    parameters: Vec<Parameter>,
    return_parameters: Vec<Parameter>,
    is_payable: bool,
}

impl Operator {
    /// Creates an operator without parameters.
    pub fn new(name: impl Into<String>, stereotype: OperatorStereotype) -> Self {
        Self {
            name: name.into(),
            stereotype,
            visibility: Visibility::None,
            parameters: Vec::new(),
            return_parameters: Vec::new(),
            is_payable: false,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_return_parameters(mut self, return_parameters: Vec<Parameter>) -> Self {
        self.return_parameters = return_parameters;
        self
    }

    pub fn with_payable(mut self, is_payable: bool) -> Self {
        self.is_payable = is_payable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stereotype(&self) -> OperatorStereotype {
        self.stereotype
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn return_parameters(&self) -> &[Parameter] {
        &self.return_parameters
    }

    /// Returns `true` when the operator accepts ether.
    pub fn is_payable(&self) -> bool {
        self.is_payable || self.stereotype == OperatorStereotype::Payable
    }
}
