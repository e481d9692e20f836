//! Syntax tree consumed by the builder.
//!
//! The shapes follow the JSON emitted by the common Solidity parser
//! front-ends: every node is an object tagged by a `"type"` field and fields
//! are camelCase. Only the fields the builder reads are modelled; everything
//! else is ignored during deserialization.
//!
//! Statement, expression and top-level kinds the builder has no use for
//! deserialize into an `Other` variant and are skipped. Type names are
//! different: an unknown kind deserializes into [`TypeName::Unknown`], which
//! the type-name resolver rejects.

use serde::Deserialize;

/// A parsed source unit together with the path it was read from.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    pub path: String,
    pub ast: Node,
}

/// A root or top-level node.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    SourceUnit {
        #[serde(default)]
        children: Vec<Node>,
    },
    ContractDefinition(ContractDefinition),
    StructDefinition(StructDefinition),
    EnumDefinition(EnumDefinition),
    ImportDirective {
        path: String,
    },
    #[serde(other)]
    Other,
}

impl Node {
    /// Returns the node's tag for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::SourceUnit { .. } => "SourceUnit",
            Node::ContractDefinition(_) => "ContractDefinition",
            Node::StructDefinition(_) => "StructDefinition",
            Node::EnumDefinition(_) => "EnumDefinition",
            Node::ImportDirective { .. } => "ImportDirective",
            Node::Other => "unknown",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinition {
    pub name: String,
    /// One of `contract`, `interface`, `library` or `abstract`.
    pub kind: String,
    #[serde(default)]
    pub base_contracts: Vec<InheritanceSpecifier>,
    #[serde(default)]
    pub sub_nodes: Vec<ContractPart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritanceSpecifier {
    pub base_name: UserDefinedTypeName,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedTypeName {
    pub name_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructDefinition {
    pub name: String,
    #[serde(default)]
    pub members: Vec<VariableDeclaration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumDefinition {
    pub name: String,
    #[serde(default)]
    pub members: Vec<EnumValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumValue {
    pub name: String,
}

/// A declaration inside a contract body.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContractPart {
    #[serde(rename_all = "camelCase")]
    StateVariableDeclaration {
        #[serde(default)]
        variables: Vec<VariableDeclaration>,
        #[serde(default)]
        initial_value: Option<Expression>,
    },
    #[serde(rename_all = "camelCase")]
    UsingForDeclaration {
        #[serde(default)]
        library_name: Option<String>,
    },
    FunctionDefinition(FunctionDefinition),
    ModifierDefinition(ModifierDefinition),
    EventDefinition(EventDefinition),
    StructDefinition(StructDefinition),
    EnumDefinition(EnumDefinition),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<VariableDeclaration>,
    #[serde(default)]
    pub return_parameters: Option<Vec<VariableDeclaration>>,
    /// Absent for unimplemented functions.
    #[serde(default)]
    pub body: Option<Block>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub is_constructor: bool,
    #[serde(default)]
    pub is_fallback: bool,
    #[serde(default)]
    pub is_receive_ether: bool,
}

impl FunctionDefinition {
    pub fn is_payable(&self) -> bool {
        self.state_mutability.as_deref() == Some("payable")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModifierDefinition {
    pub name: String,
    #[serde(default)]
    pub parameters: Option<Vec<VariableDeclaration>>,
    #[serde(default)]
    pub body: Option<Block>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDefinition {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<VariableDeclaration>,
}

/// A state variable, struct member, parameter or local variable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    #[serde(default)]
    pub name: Option<String>,
    /// Absent for legacy `var` declarations.
    #[serde(default)]
    pub type_name: Option<TypeName>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub is_state_var: bool,
    #[serde(default)]
    pub is_declared_const: bool,
    #[serde(default)]
    pub is_immutable: bool,
    #[serde(default)]
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TypeName {
    ElementaryTypeName {
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    UserDefinedTypeName {
        name_path: String,
    },
    FunctionTypeName,
    #[serde(rename_all = "camelCase")]
    ArrayTypeName {
        base_type_name: Box<TypeName>,
        #[serde(default)]
        length: Option<Box<Expression>>,
    },
    #[serde(rename_all = "camelCase")]
    Mapping {
        key_type: Box<TypeName>,
        value_type: Box<TypeName>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    Block(Block),
    UncheckedStatement {
        block: Block,
    },
    #[serde(rename_all = "camelCase")]
    VariableDeclarationStatement {
        /// Skipped tuple slots are `null`.
        #[serde(default)]
        variables: Vec<Option<VariableDeclaration>>,
        #[serde(default)]
        initial_value: Option<Expression>,
    },
    ExpressionStatement {
        #[serde(default)]
        expression: Option<Expression>,
    },
    ReturnStatement {
        #[serde(default)]
        expression: Option<Expression>,
    },
    #[serde(rename_all = "camelCase")]
    EmitStatement {
        event_call: Expression,
    },
    #[serde(rename_all = "camelCase")]
    IfStatement {
        condition: Expression,
        true_body: Box<Statement>,
        #[serde(default)]
        false_body: Option<Box<Statement>>,
    },
    #[serde(rename_all = "camelCase")]
    ForStatement {
        #[serde(default)]
        init_expression: Option<Box<Statement>>,
        #[serde(default)]
        condition_expression: Option<Expression>,
        #[serde(default)]
        loop_expression: Option<Box<Statement>>,
        body: Box<Statement>,
    },
    WhileStatement {
        condition: Expression,
        body: Box<Statement>,
    },
    DoWhileStatement {
        condition: Expression,
        body: Box<Statement>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    BinaryOperation {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename_all = "camelCase")]
    UnaryOperation {
        sub_expression: Box<Expression>,
    },
    FunctionCall {
        expression: Box<Expression>,
        #[serde(default)]
        arguments: Vec<Expression>,
    },
    IndexAccess {
        base: Box<Expression>,
        #[serde(default)]
        index: Option<Box<Expression>>,
    },
    TupleExpression {
        /// Skipped tuple slots are `null`.
        #[serde(default)]
        components: Vec<Option<Expression>>,
    },
    MemberAccess {
        expression: Box<Expression>,
    },
    #[serde(rename_all = "camelCase")]
    Conditional {
        condition: Box<Expression>,
        true_expression: Box<Expression>,
        false_expression: Box<Expression>,
    },
    Identifier {
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    NewExpression {
        type_name: Box<TypeName>,
    },
    NumberLiteral {
        number: String,
    },
    #[serde(other)]
    Other,
}
