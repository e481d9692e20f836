//! Discovery of associations in declarations, statements and expressions.
//!
//! Every function here walks one node kind and records the type names it
//! references on the class being built. Targets are recorded by name only;
//! resolving them to classes is left to consumers of the finished model.
//!
//! Node kinds that cannot reference a type are skipped, so the walk only has
//! to cover the reference-producing constructs.

use solscope_core::model::{Association, Class, ReferenceKind};

use crate::ast::{Block, Expression, Statement, TypeName, VariableDeclaration};

/// Records the associations of variable declarations.
///
/// State variables produce storage references, all others memory references.
pub(crate) fn add_variables<'a>(
    class: &mut Class,
    variables: impl IntoIterator<Item = &'a VariableDeclaration>,
) {
    for variable in variables {
        if let Some(type_name) = &variable.type_name {
            add_type(class, type_name, ReferenceKind::from_state(variable.is_state_var));
        }
    }
}

/// Records the associations of a type name.
///
/// A dotted `Outer.Inner` name records both parts. Mapping keys are never
/// references, so the key type is always recorded as memory while the value
/// type keeps `kind`. Array elements keep `kind`.
pub(crate) fn add_type(class: &mut Class, type_name: &TypeName, kind: ReferenceKind) {
    match type_name {
        TypeName::UserDefinedTypeName { name_path } => add_type_path(class, name_path, kind),
        TypeName::Mapping {
            key_type,
            value_type,
        } => {
            add_type(class, key_type, ReferenceKind::Memory);
            add_type(class, value_type, kind);
        }
        TypeName::ArrayTypeName { base_type_name, .. } => add_type(class, base_type_name, kind),
        TypeName::ElementaryTypeName { .. } | TypeName::FunctionTypeName | TypeName::Unknown => {}
    }
}

/// Records a possibly dotted type path as one or two associations.
pub(crate) fn add_type_path(class: &mut Class, name_path: &str, kind: ReferenceKind) {
    let (outer, inner) = split_type_path(name_path);
    class.add_association(Association::usage(outer, kind));
    if let Some(inner) = inner {
        class.add_association(Association::usage(inner, kind));
    }
}

/// Splits `Outer.Inner` into its parts.
pub(crate) fn split_type_path(name_path: &str) -> (&str, Option<&str>) {
    match name_path.split_once('.') {
        Some((outer, inner)) => (outer, Some(inner)),
        None => (name_path, None),
    }
}

pub(crate) fn add_block(class: &mut Class, block: &Block) {
    for statement in &block.statements {
        add_statement(class, statement);
    }
}

pub(crate) fn add_statement(class: &mut Class, statement: &Statement) {
    match statement {
        Statement::Block(block) | Statement::UncheckedStatement { block } => {
            add_block(class, block)
        }
        Statement::VariableDeclarationStatement {
            variables,
            initial_value,
        } => {
            // Skipped tuple slots are null.
            add_variables(class, variables.iter().flatten());
            add_optional_expression(class, initial_value.as_ref());
        }
        Statement::ExpressionStatement { expression }
        | Statement::ReturnStatement { expression } => {
            add_optional_expression(class, expression.as_ref());
        }
        Statement::EmitStatement { event_call } => add_expression(class, event_call),
        Statement::IfStatement {
            condition,
            true_body,
            false_body,
        } => {
            add_expression(class, condition);
            add_statement(class, true_body);
            if let Some(false_body) = false_body {
                add_statement(class, false_body);
            }
        }
        Statement::ForStatement {
            init_expression,
            condition_expression,
            loop_expression,
            body,
        } => {
            if let Some(init) = init_expression {
                add_statement(class, init);
            }
            add_optional_expression(class, condition_expression.as_ref());
            if let Some(step) = loop_expression {
                add_statement(class, step);
            }
            add_statement(class, body);
        }
        Statement::WhileStatement { condition, body }
        | Statement::DoWhileStatement { condition, body } => {
            add_expression(class, condition);
            add_statement(class, body);
        }
        Statement::Other => {}
    }
}

fn add_optional_expression(class: &mut Class, expression: Option<&Expression>) {
    if let Some(expression) = expression {
        add_expression(class, expression);
    }
}

pub(crate) fn add_expression(class: &mut Class, expression: &Expression) {
    match expression {
        Expression::BinaryOperation { left, right } => {
            add_expression(class, left);
            add_expression(class, right);
        }
        Expression::UnaryOperation { sub_expression } => add_expression(class, sub_expression),
        Expression::FunctionCall {
            expression,
            arguments,
        } => {
            add_expression(class, expression);
            for argument in arguments {
                add_expression(class, argument);
            }
        }
        Expression::IndexAccess { base, index } => {
            add_expression(class, base);
            if let Some(index) = index {
                add_expression(class, index);
            }
        }
        Expression::TupleExpression { components } => {
            for component in components.iter().flatten() {
                add_expression(class, component);
            }
        }
        // The member name is not a type reference.
        Expression::MemberAccess { expression } => add_expression(class, expression),
        Expression::Conditional {
            condition,
            true_expression,
            false_expression,
        } => {
            add_expression(class, condition);
            add_expression(class, true_expression);
            add_expression(class, false_expression);
        }
        Expression::Identifier { name } => {
            class.add_association(Association::usage(name.as_str(), ReferenceKind::Memory));
        }
        Expression::NewExpression { type_name } => {
            add_type(class, type_name, ReferenceKind::Memory)
        }
        Expression::NumberLiteral { .. } | Expression::Other => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use solscope_core::{identifier::ClassId, model::ClassStereotype};

    use super::*;

    fn class() -> Class {
        Class::new(ClassId::new(1), "Vault", ClassStereotype::Contract, "/v.sol", "v.sol")
    }

    fn targets(class: &Class) -> Vec<String> {
        class.associations().map(|a| a.key().as_str().to_string()).collect()
    }

    fn statement(value: serde_json::Value) -> Statement {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_dotted_path_records_both_parts() {
        let mut class = class();
        add_type_path(&mut class, "Set.Data", ReferenceKind::Storage);

        assert_eq!(targets(&class), vec!["Set:storage", "Data:storage"]);
    }

    #[test]
    fn test_mapping_key_is_memory_and_value_keeps_kind() {
        let mut class = class();
        let variable: VariableDeclaration = serde_json::from_value(json!({
            "type": "VariableDeclaration",
            "name": "balances",
            "isStateVar": true,
            "typeName": {
                "type": "Mapping",
                "keyType": { "type": "UserDefinedTypeName", "namePath": "IERC20" },
                "valueType": {
                    "type": "ArrayTypeName",
                    "baseTypeName": { "type": "UserDefinedTypeName", "namePath": "Deposit" },
                    "length": null
                }
            }
        }))
        .unwrap();

        add_variables(&mut class, [&variable]);

        assert_eq!(targets(&class), vec!["IERC20:memory", "Deposit:storage"]);
    }

    #[test]
    fn test_statement_descent() {
        let mut class = class();
        let body = statement(json!({
            "type": "Block",
            "statements": [
                {
                    "type": "VariableDeclarationStatement",
                    "variables": [
                        null,
                        {
                            "type": "VariableDeclaration",
                            "name": "t",
                            "typeName": { "type": "UserDefinedTypeName", "namePath": "Token" }
                        }
                    ],
                    "initialValue": {
                        "type": "FunctionCall",
                        "expression": {
                            "type": "MemberAccess",
                            "expression": { "type": "Identifier", "name": "Factory" },
                            "memberName": "create"
                        },
                        "arguments": [{ "type": "NumberLiteral", "number": "1" }]
                    }
                },
                {
                    "type": "IfStatement",
                    "condition": { "type": "Identifier", "name": "Guard" },
                    "trueBody": {
                        "type": "ExpressionStatement",
                        "expression": {
                            "type": "NewExpression",
                            "typeName": { "type": "UserDefinedTypeName", "namePath": "Proxy" }
                        }
                    },
                    "falseBody": null
                },
                { "type": "InlineAssemblyStatement", "body": {} }
            ]
        }));

        add_statement(&mut class, &body);

        assert_eq!(
            targets(&class),
            vec!["Token:memory", "Factory:memory", "Guard:memory", "Proxy:memory"]
        );
    }

    #[test]
    fn test_loops_and_tuples() {
        let mut class = class();
        let body = statement(json!({
            "type": "ForStatement",
            "initExpression": null,
            "conditionExpression": {
                "type": "BinaryOperation",
                "left": { "type": "Identifier", "name": "i" },
                "right": { "type": "Identifier", "name": "Limits" }
            },
            "loopExpression": {
                "type": "ExpressionStatement",
                "expression": {
                    "type": "UnaryOperation",
                    "subExpression": { "type": "Identifier", "name": "i" }
                }
            },
            "body": {
                "type": "WhileStatement",
                "condition": {
                    "type": "Conditional",
                    "condition": { "type": "Identifier", "name": "Flag" },
                    "trueExpression": { "type": "Identifier", "name": "Left" },
                    "falseExpression": { "type": "Identifier", "name": "Right" }
                },
                "body": {
                    "type": "ReturnStatement",
                    "expression": {
                        "type": "TupleExpression",
                        "components": [null, { "type": "Identifier", "name": "Pair" }]
                    }
                }
            }
        }));

        add_statement(&mut class, &body);

        assert_eq!(
            targets(&class),
            vec![
                "i:memory",
                "Limits:memory",
                "Flag:memory",
                "Left:memory",
                "Right:memory",
                "Pair:memory"
            ]
        );
    }

    #[test]
    fn test_repeated_references_are_idempotent() {
        let mut class = class();
        let expression: Expression = serde_json::from_value(json!({
            "type": "IndexAccess",
            "base": { "type": "Identifier", "name": "Registry" },
            "index": { "type": "Identifier", "name": "Registry" }
        }))
        .unwrap();

        add_expression(&mut class, &expression);

        assert_eq!(class.associations_count(), 1);
    }
}
