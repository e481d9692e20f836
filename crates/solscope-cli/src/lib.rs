//! Solscope CLI library
//!
//! This module contains the core CLI logic for the Solscope diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, ClassArgs, Command, StorageArgs};

use std::fs;

use log::info;

use solscope::{Solscope, SolscopeError, config::AppConfig, model::Class};
use solscope_builder::ImportMode;

/// Run the Solscope CLI application
///
/// Builds the model from the input bundles and writes the diagram selected
/// by the subcommand.
///
/// # Errors
///
/// Returns `SolscopeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed source bundles and build errors
/// - Filter and layout errors
pub fn run(args: &Args) -> Result<(), SolscopeError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Class(class_args) => run_class(class_args, app_config),
        Command::Storage(storage_args) => run_storage(storage_args, app_config),
    }
}

fn run_class(args: &ClassArgs, mut app_config: AppConfig) -> Result<(), SolscopeError> {
    info!(
        inputs:? = args.inputs,
        output_path = args.output;
        "Processing class diagram"
    );

    apply_class_overrides(args, &mut app_config);

    let solscope = Solscope::new(app_config);
    let classes = read_classes(&solscope, &args.inputs, args.flattened)?;

    let dot = if args.roots.is_empty() {
        let all: Vec<&Class> = classes.iter().collect();
        solscope.class_dot(&all)
    } else {
        let connected = solscope.filter(&classes, &args.roots, args.depth)?;
        info!(roots:? = args.roots, classes = connected.len(); "Filtered classes");
        solscope.class_dot(&connected)
    };

    fs::write(&args.output, dot)?;

    info!(output_file = args.output; "Class diagram exported successfully");

    Ok(())
}

fn run_storage(args: &StorageArgs, app_config: AppConfig) -> Result<(), SolscopeError> {
    info!(
        inputs:? = args.inputs,
        contract = args.contract,
        output_path = args.output;
        "Processing storage layout"
    );

    let solscope = Solscope::new(app_config);
    let classes = read_classes(&solscope, &args.inputs, args.flattened)?;

    let layout = solscope.storage_layout(&classes, &args.contract, args.address.as_deref())?;
    let output = if args.json {
        serde_json::to_string_pretty(&layout)?
    } else {
        solscope.storage_dot(&layout)
    };

    fs::write(&args.output, output)?;

    info!(output_file = args.output; "Storage layout exported successfully");

    Ok(())
}

/// Reads every bundle and builds one model with shared class ids.
fn read_classes(
    solscope: &Solscope,
    inputs: &[String],
    flattened: bool,
) -> Result<Vec<Class>, SolscopeError> {
    let mode = if flattened {
        ImportMode::Flattened
    } else {
        ImportMode::Filesystem
    };

    let mut sources = Vec::new();
    for input in inputs {
        sources.extend(solscope.read_bundle(input)?);
    }

    solscope.build_sources(&sources, mode)
}

/// Command-line flags can only turn toggles on.
fn apply_class_overrides(args: &ClassArgs, app_config: &mut AppConfig) {
    let class = app_config.class().clone();
    *app_config.class_mut() = class
        .clone()
        .with_hide_variables(class.hide_variables() || args.hide_variables)
        .with_hide_functions(class.hide_functions() || args.hide_functions)
        .with_hide_structs(class.hide_structs() || args.hide_structs)
        .with_hide_enums(class.hide_enums() || args.hide_enums)
        .with_hide_libraries(class.hide_libraries() || args.hide_libraries)
        .with_hide_interfaces(class.hide_interfaces() || args.hide_interfaces)
        .with_hide_abstracts(class.hide_abstracts() || args.hide_abstracts)
        .with_hide_privates(class.hide_privates() || args.hide_privates)
        .with_hide_filename(class.hide_filename() || args.hide_filename)
        .with_cluster_folders(class.cluster_folders() || args.cluster_folders);
}
