use serde_json::{Value, json};

use solscope::{
    LayoutError, Solscope, SolscopeError,
    config::{AppConfig, ClassDiagramConfig, FilterConfig, ImportConfig},
    model::Class,
};
use solscope_builder::{ImportMode, ast::SourceEntry};

fn elementary(name: &str) -> Value {
    json!({ "type": "ElementaryTypeName", "name": name })
}

fn user_defined(name: &str) -> Value {
    json!({ "type": "UserDefinedTypeName", "namePath": name })
}

fn variable(name: &str, type_name: Value) -> Value {
    json!({
        "type": "VariableDeclaration",
        "name": name,
        "typeName": type_name,
        "visibility": "internal",
        "isStateVar": true,
        "isDeclaredConst": false,
        "isImmutable": false
    })
}

fn state_var(name: &str, type_name: Value) -> Value {
    json!({ "type": "StateVariableDeclaration", "variables": [variable(name, type_name)] })
}

fn contract(name: &str, bases: &[&str], sub_nodes: Value) -> Value {
    let bases: Vec<Value> = bases
        .iter()
        .map(|base| json!({ "type": "InheritanceSpecifier", "baseName": user_defined(base) }))
        .collect();
    json!({
        "type": "ContractDefinition",
        "name": name,
        "kind": "contract",
        "baseContracts": bases,
        "subNodes": sub_nodes
    })
}

fn unit(path: &str, children: Value) -> Value {
    json!({ "path": path, "ast": { "type": "SourceUnit", "children": children } })
}

/// `Vault is Ownable` with a struct, a mapping of that struct, and an
/// unrelated `Token` in its own unit.
fn bundle() -> Vec<SourceEntry> {
    let position = json!({
        "type": "StructDefinition",
        "name": "Position",
        "members": [
            variable("amount", elementary("uint256")),
            variable("since", elementary("uint64"))
        ]
    });
    let positions = json!({
        "type": "Mapping",
        "keyType": elementary("address"),
        "valueType": user_defined("Position")
    });

    serde_json::from_value(json!([
        unit(
            "src/Ownable.sol",
            json!([contract("Ownable", &[], json!([state_var("owner", elementary("address"))]))])
        ),
        unit(
            "src/Token.sol",
            json!([contract("Token", &[], json!([state_var("supply", elementary("uint256"))]))])
        ),
        unit(
            "src/Vault.sol",
            json!([
                { "type": "PragmaDirective" },
                { "type": "ImportDirective", "path": "./Ownable.sol" },
                contract("Vault", &["Ownable"], json!([
                    position,
                    state_var("paused", elementary("bool")),
                    state_var("position", user_defined("Position")),
                    state_var("positions", positions)
                ]))
            ])
        )
    ]))
    .unwrap()
}

fn build(solscope: &Solscope) -> Vec<Class> {
    solscope.build_sources(&bundle(), ImportMode::Flattened).unwrap()
}

fn sorted_names(classes: &[&Class]) -> Vec<String> {
    let mut names: Vec<String> = classes.iter().map(|class| class.name().to_string()).collect();
    names.sort();
    names
}

#[test]
fn test_storage_layout_with_inheritance_and_structs() {
    let solscope = Solscope::default();
    let classes = build(&solscope);

    let layout = solscope.storage_layout(&classes, "Vault", Some("0xabc")).unwrap();

    let root = layout.root();
    assert_eq!(root.address.as_deref(), Some("0xabc"));

    let placements: Vec<_> = root
        .storages
        .iter()
        .map(|s| {
            let owner = s.contract_name.as_str();
            (s.variable.as_str(), owner, s.from_slot, s.to_slot, s.byte_offset)
        })
        .collect();
    assert_eq!(
        placements,
        [
            ("owner", "Ownable", 0, 0, 0),
            ("paused", "Vault", 0, 0, 20),
            ("position", "Vault", 1, 2, 0),
            ("positions", "Vault", 3, 3, 0),
        ]
    );

    let nested = layout.nested_of(root.storage("position").unwrap()).unwrap();
    assert_eq!(nested.name, "Position");
    assert_eq!(root.storage("positions").unwrap().nested_layout, Some(nested.id));
    assert_eq!(layout.layouts().len(), 2);

    let since = nested.storage("since").unwrap();
    assert_eq!((since.from_slot, since.byte_offset, since.byte_size), (1, 0, 8));
}

#[test]
fn test_filter_keeps_connected_classes() {
    let solscope = Solscope::default();
    let classes = build(&solscope);

    let connected = solscope.filter(&classes, &["Vault"], None).unwrap();
    assert_eq!(sorted_names(&connected), ["Ownable", "Position", "Vault"]);

    let only_token = solscope.filter(&classes, &["Token"], Some(3)).unwrap();
    assert_eq!(sorted_names(&only_token), ["Token"]);
}

#[test]
fn test_configured_depth_is_default() {
    let config = AppConfig::new(
        ClassDiagramConfig::default(),
        FilterConfig::new(Some(0)),
        ImportConfig::default(),
    );
    let solscope = Solscope::new(config);
    let classes = build(&solscope);

    let roots_only = solscope.filter(&classes, &["Vault"], None).unwrap();
    assert_eq!(sorted_names(&roots_only), ["Vault"]);

    let widened = solscope.filter(&classes, &["Vault"], Some(1)).unwrap();
    assert_eq!(widened.len(), 3);
}

#[test]
fn test_dot_output() {
    let solscope = Solscope::default();
    let classes = build(&solscope);

    let connected = solscope.filter(&classes, &["Vault"], None).unwrap();
    let class_dot = solscope.class_dot(&connected);
    assert!(class_dot.starts_with("digraph UmlClassDiagram {"));
    assert!(class_dot.contains("arrowhead=diamond"));
    assert!(class_dot.contains("arrowhead=empty"));
    assert!(!class_dot.contains("Token"));

    let layout = solscope.storage_layout(&classes, "Vault", None).unwrap();
    let storage_dot = solscope.storage_dot(&layout);
    assert!(storage_dot.contains("address: Ownable.owner (20)"));
    assert!(storage_dot.contains("0:2 -> 1\n"));
    assert!(storage_dot.contains("0:3 -> 1\n"));
    assert!(storage_dot.ends_with("}\n"));
}

#[test]
fn test_errors_carry_context() {
    let solscope = Solscope::default();
    let classes = build(&solscope);

    let err = solscope.storage_layout(&classes, "Missing", None).unwrap_err();
    assert!(matches!(
        err,
        SolscopeError::Layout(LayoutError::ContractNotFound(ref name)) if name == "Missing"
    ));

    let err = solscope.filter(&classes, &["Nowhere"], None).unwrap_err();
    assert_eq!(err.to_string(), "Filter error: root class `Nowhere` not found");

    let bad: Vec<SourceEntry> = serde_json::from_value(json!([unit(
        "src/Bad.sol",
        json!([{ "type": "ContractDefinition", "name": "Bad", "kind": "module",
                 "baseContracts": [], "subNodes": [] }])
    )]))
    .unwrap();
    let err = solscope.build_sources(&bad, ImportMode::Flattened).unwrap_err();
    assert!(err.to_string().starts_with("src/Bad.sol: "), "{err}");
}
