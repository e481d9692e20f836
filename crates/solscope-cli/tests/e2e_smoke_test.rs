use std::{fs, path::Path};

use log::LevelFilter;
use serde_json::{Value, json};
use tempfile::tempdir;

use solscope_cli::{Args, ClassArgs, Command, StorageArgs, run};

fn state_var(name: &str, type_name: &str) -> Value {
    json!({
        "type": "StateVariableDeclaration",
        "variables": [{
            "type": "VariableDeclaration",
            "name": name,
            "typeName": { "type": "ElementaryTypeName", "name": type_name },
            "visibility": "private",
            "isStateVar": true,
            "isDeclaredConst": false,
            "isImmutable": false
        }]
    })
}

fn contract(name: &str, bases: &[&str], sub_nodes: Value) -> Value {
    let bases: Vec<Value> = bases
        .iter()
        .map(|base| {
            json!({
                "type": "InheritanceSpecifier",
                "baseName": { "type": "UserDefinedTypeName", "namePath": base }
            })
        })
        .collect();
    json!({
        "type": "ContractDefinition",
        "name": name,
        "kind": "contract",
        "baseContracts": bases,
        "subNodes": sub_nodes
    })
}

/// Writes a bundle with `Base`, `Child is Base` and an unrelated `Other`.
fn write_bundle(dir: &Path) -> String {
    let bundle = json!([{
        "path": "contracts/Child.sol",
        "ast": {
            "type": "SourceUnit",
            "children": [
                contract("Base", &[], json!([state_var("total", "uint128")])),
                contract("Child", &["Base"], json!([state_var("limit", "uint128")])),
                contract("Other", &[], json!([]))
            ]
        }
    }]);
    let path = dir.join("bundle.json");
    fs::write(&path, bundle.to_string()).unwrap();
    path.to_string_lossy().to_string()
}

fn args(command: Command) -> Args {
    Args {
        command,
        config: None,
        log_level: LevelFilter::Off,
    }
}

#[test]
fn e2e_class_diagram() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = write_bundle(temp_dir.path());
    let output = temp_dir.path().join("classes.dot");

    let class = ClassArgs {
        inputs: vec![input],
        output: output.to_string_lossy().to_string(),
        roots: vec!["Child".to_string()],
        flattened: true,
        hide_privates: true,
        ..ClassArgs::default()
    };
    run(&args(Command::Class(class))).unwrap();

    let dot = fs::read_to_string(&output).unwrap();
    assert!(dot.starts_with("digraph UmlClassDiagram {"));
    assert!(dot.contains("Child"));
    assert!(dot.contains("Base"));
    assert!(!dot.contains("Other"));
    assert!(!dot.contains("limit"));
}

#[test]
fn e2e_storage_json() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = write_bundle(temp_dir.path());
    let output = temp_dir.path().join("layout.json");

    let storage = StorageArgs {
        inputs: vec![input],
        contract: "Child".to_string(),
        output: output.to_string_lossy().to_string(),
        address: Some("0x1234".to_string()),
        json: true,
        flattened: true,
    };
    run(&args(Command::Storage(storage))).unwrap();

    let layout: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let root = &layout["layouts"][0];
    assert_eq!(root["name"], "Child");
    assert_eq!(root["address"], "0x1234");
    assert_eq!(root["storages"][0]["variable"], "total");
    assert_eq!(root["storages"][0]["contract_name"], "Base");
    assert_eq!(root["storages"][1]["from_slot"], 0);
    assert_eq!(root["storages"][1]["byte_offset"], 16);
}

#[test]
fn e2e_storage_dot() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = write_bundle(temp_dir.path());
    let output = temp_dir.path().join("storage.dot");

    let storage = StorageArgs {
        inputs: vec![input],
        contract: "Child".to_string(),
        output: output.to_string_lossy().to_string(),
        flattened: true,
        ..StorageArgs::default()
    };
    run(&args(Command::Storage(storage))).unwrap();

    let dot = fs::read_to_string(&output).unwrap();
    assert!(dot.starts_with("digraph StorageDiagram {"));
    assert!(dot.contains("{ uint128: Base.total (16) | uint128: limit (16) }"));
}

#[test]
fn e2e_errors() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = write_bundle(temp_dir.path());

    let missing_contract = StorageArgs {
        inputs: vec![input.clone()],
        contract: "Nope".to_string(),
        output: temp_dir.path().join("x.dot").to_string_lossy().to_string(),
        flattened: true,
        ..StorageArgs::default()
    };
    assert!(run(&args(Command::Storage(missing_contract))).is_err());

    let missing_input = ClassArgs {
        inputs: vec![temp_dir.path().join("absent.json").to_string_lossy().to_string()],
        output: temp_dir.path().join("y.dot").to_string_lossy().to_string(),
        ..ClassArgs::default()
    };
    assert!(run(&args(Command::Class(missing_input))).is_err());

    let mut with_config = args(Command::Class(ClassArgs {
        inputs: vec![input],
        output: temp_dir.path().join("z.dot").to_string_lossy().to_string(),
        ..ClassArgs::default()
    }));
    with_config.config = Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string());
    assert!(run(&with_config).is_err());
}
