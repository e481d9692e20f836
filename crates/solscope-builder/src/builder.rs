//! Conversion of a source unit into classes.

use log::{debug, info, trace};

use solscope_core::{
    identifier::IdGenerator,
    model::{
        Association, Attribute, AttributeKind, Class, ClassStereotype, Operator,
        OperatorStereotype, Parameter, ReferenceKind, Visibility,
    },
};

use crate::{
    associations,
    ast::{
        ContractDefinition, ContractPart, EnumDefinition, EventDefinition, FunctionDefinition,
        ModifierDefinition, Node, StructDefinition, TypeName, VariableDeclaration,
    },
    error::{
        BuildError, Diagnostic, DiagnosticCollector, ErrorCode, Result as DiagnosticResult,
    },
    imports::ImportResolver,
    type_name,
};

/// Builds the classes declared in one source unit.
///
/// Class ids come from the shared [`IdGenerator`], so any number of units can
/// be built into one model without id clashes.
#[derive(Debug, Clone, Copy)]
pub struct Builder<'a> {
    ids: &'a IdGenerator,
    imports: &'a ImportResolver,
}

/// Classes produced so far for one source unit.
struct Unit<'u> {
    absolute_path: String,
    relative_path: &'u str,
    classes: Vec<Class>,
}

impl Unit<'_> {
    fn new_class(&self, ids: &IdGenerator, name: &str, stereotype: ClassStereotype) -> Class {
        Class::new(
            ids.next_id(),
            name,
            stereotype,
            self.absolute_path.as_str(),
            self.relative_path,
        )
    }
}

impl<'a> Builder<'a> {
    pub fn new(ids: &'a IdGenerator, imports: &'a ImportResolver) -> Self {
        Self { ids, imports }
    }

    /// Builds the classes of the source unit `root`, read from `relative_path`.
    ///
    /// Contract-level structs and enums are returned as classes of their own,
    /// ahead of the contract that declares them. Every class carries the
    /// paths imported anywhere in the unit.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if `root` is not a source unit, or with one
    /// diagnostic per top-level declaration that could not be built. Imports
    /// that cannot be resolved are logged and skipped.
    pub fn build(&self, root: &Node, relative_path: &str) -> Result<Vec<Class>, BuildError> {
        let Node::SourceUnit { children } = root else {
            return Err(Diagnostic::error(format!(
                "expected a `SourceUnit` root node, found `{}`",
                root.kind()
            ))
            .with_code(ErrorCode::E100)
            .with_help("pass the root node produced by the parser")
            .into());
        };

        info!(path = relative_path, children = children.len(); "Building source unit");

        let mut unit = Unit {
            absolute_path: self.imports.unit_path(relative_path),
            relative_path,
            classes: Vec::new(),
        };
        let mut imported_paths = Vec::new();
        let mut collector = DiagnosticCollector::new();

        for child in children {
            match child {
                Node::ContractDefinition(definition) => {
                    collector.collect(self.build_contract(&mut unit, definition));
                }
                Node::StructDefinition(definition) => {
                    debug!(name = definition.name; "Adding struct");
                    if let Some(class) = collector.collect(self.build_struct(&unit, definition)) {
                        unit.classes.push(class);
                    }
                }
                Node::EnumDefinition(definition) => {
                    debug!(name = definition.name; "Adding enum");
                    let class = self.build_enum(&unit, definition);
                    unit.classes.push(class);
                }
                Node::ImportDirective { path } => {
                    if let Some(imported) = self.imports.resolve(relative_path, path) {
                        imported_paths.push(imported);
                    }
                }
                Node::SourceUnit { .. } | Node::Other => {}
            }
        }

        let mut classes = collector.finish(unit.classes)?;
        for class in &mut classes {
            class.set_imported_paths(imported_paths.clone());
        }

        debug!(path = relative_path, classes = classes.len(); "Source unit built");
        trace!(classes:?; "Built classes");

        Ok(classes)
    }

    fn build_contract(
        &self,
        unit: &mut Unit<'_>,
        definition: &ContractDefinition,
    ) -> DiagnosticResult<()> {
        let stereotype = contract_stereotype(&definition.kind)?;
        debug!(name = definition.name, kind = definition.kind; "Adding contract");

        let mut class = unit.new_class(self.ids, &definition.name, stereotype);

        for base in &definition.base_contracts {
            // `Alias.Base` names a contract behind an import alias.
            let (outer, inner) = associations::split_type_path(&base.base_name.name_path);
            class.add_association(Association::realization(inner.unwrap_or(outer)));
        }

        for part in &definition.sub_nodes {
            match part {
                ContractPart::StateVariableDeclaration {
                    variables,
                    initial_value,
                } => {
                    for variable in variables {
                        class.push_attribute(state_variable(variable)?);
                        if let Some(expression) = &variable.expression {
                            associations::add_expression(&mut class, expression);
                        }
                    }
                    associations::add_variables(&mut class, variables);
                    if let Some(expression) = initial_value {
                        associations::add_expression(&mut class, expression);
                    }
                }
                ContractPart::UsingForDeclaration { library_name } => {
                    if let Some(library) = library_name {
                        class.add_association(
                            Association::usage(library.as_str(), ReferenceKind::Memory)
                                .with_target_stereotype(ClassStereotype::Library),
                        );
                    }
                }
                ContractPart::FunctionDefinition(function) => add_function(&mut class, function)?,
                ContractPart::ModifierDefinition(modifier) => add_modifier(&mut class, modifier)?,
                ContractPart::EventDefinition(event) => add_event(&mut class, event)?,
                ContractPart::StructDefinition(child) => {
                    let child = self.build_struct(unit, child)?;
                    class.push_struct(child.id());
                    unit.classes.push(child);
                }
                ContractPart::EnumDefinition(child) => {
                    let child = self.build_enum(unit, child);
                    class.push_enum(child.id());
                    unit.classes.push(child);
                }
                ContractPart::Other => {}
            }
        }

        if class.stereotype() != stereotype {
            debug!(name = class.name(), stereotype:% = class.stereotype(); "Contract reclassified");
        }
        unit.classes.push(class);
        Ok(())
    }

    fn build_struct(
        &self,
        unit: &Unit<'_>,
        definition: &StructDefinition,
    ) -> DiagnosticResult<Class> {
        let mut class = unit.new_class(self.ids, &definition.name, ClassStereotype::Struct);
        for member in &definition.members {
            let resolved = type_name::resolve(required_type(member, &definition.name)?)?;
            class.push_attribute(Attribute::new(
                member.name.clone().unwrap_or_default(),
                resolved.name,
                resolved.kind,
            ));
        }
        associations::add_variables(&mut class, &definition.members);
        Ok(class)
    }

    fn build_enum(&self, unit: &Unit<'_>, definition: &EnumDefinition) -> Class {
        let mut class = unit.new_class(self.ids, &definition.name, ClassStereotype::Enum);
        for (ordinal, member) in definition.members.iter().enumerate() {
            class.push_attribute(Attribute::new(
                member.name.as_str(),
                ordinal.to_string(),
                AttributeKind::Elementary,
            ));
        }
        class
    }
}

fn state_variable(variable: &VariableDeclaration) -> DiagnosticResult<Attribute> {
    let name = variable.name.clone().unwrap_or_default();
    let resolved = type_name::resolve(required_type(variable, &name)?)?;
    let visibility = parse_visibility(variable.visibility.as_deref())?;
    Ok(Attribute::new(name, resolved.name, resolved.kind)
        .with_visibility(visibility)
        .with_compiled_constant(variable.is_declared_const || variable.is_immutable))
}

fn add_function(class: &mut Class, function: &FunctionDefinition) -> DiagnosticResult<()> {
    let name = function.name.as_deref().unwrap_or_default();
    let return_parameters = function.return_parameters.as_deref().unwrap_or_default();

    let operator = if function.is_constructor {
        Operator::new("constructor", OperatorStereotype::Constructor)
    } else if function.is_fallback || function.is_receive_ether || name.is_empty() {
        let name = if function.is_receive_ether {
            "receive"
        } else if function.is_fallback {
            "fallback"
        } else {
            ""
        };
        Operator::new(name, OperatorStereotype::Fallback).with_payable(function.is_payable())
    } else if function.body.is_none() {
        Operator::new(name, OperatorStereotype::Abstract)
    } else if function.is_payable() {
        Operator::new(name, OperatorStereotype::Payable)
    } else {
        Operator::new(name, OperatorStereotype::None)
    };

    class.push_operator(
        operator
            .with_visibility(parse_visibility(function.visibility.as_deref())?)
            .with_parameters(parameters(&function.parameters)?)
            .with_return_parameters(parameters(return_parameters)?),
    );

    associations::add_variables(class, &function.parameters);
    associations::add_variables(class, return_parameters);

    match &function.body {
        Some(body) => associations::add_block(class, body),
        None if class.stereotype() != ClassStereotype::Interface => {
            class.set_stereotype(ClassStereotype::Abstract);
        }
        None => {}
    }
    Ok(())
}

fn add_modifier(class: &mut Class, modifier: &ModifierDefinition) -> DiagnosticResult<()> {
    let modifier_parameters = modifier.parameters.as_deref().unwrap_or_default();
    class.push_operator(
        Operator::new(modifier.name.as_str(), OperatorStereotype::Modifier)
            .with_parameters(parameters(modifier_parameters)?),
    );
    associations::add_variables(class, modifier_parameters);
    if let Some(body) = &modifier.body {
        associations::add_block(class, body);
    }
    Ok(())
}

fn add_event(class: &mut Class, event: &EventDefinition) -> DiagnosticResult<()> {
    class.push_operator(
        Operator::new(event.name.as_str(), OperatorStereotype::Event)
            .with_parameters(parameters(&event.parameters)?),
    );
    associations::add_variables(class, &event.parameters);
    Ok(())
}

fn parameters(declarations: &[VariableDeclaration]) -> DiagnosticResult<Vec<Parameter>> {
    declarations
        .iter()
        .map(|declaration| {
            let name = declaration.name.clone().filter(|name| !name.is_empty());
            let context = name.as_deref().unwrap_or("parameter");
            let resolved = type_name::resolve(required_type(declaration, context)?)?;
            Ok(Parameter::new(name, resolved.name))
        })
        .collect()
}

fn required_type<'v>(
    variable: &'v VariableDeclaration,
    context: &str,
) -> DiagnosticResult<&'v TypeName> {
    variable.type_name.as_ref().ok_or_else(|| {
        Diagnostic::error(format!("`{context}` has no type name"))
            .with_code(ErrorCode::E301)
            .with_help("declare the variable with an explicit type")
    })
}

fn contract_stereotype(kind: &str) -> DiagnosticResult<ClassStereotype> {
    match kind {
        "contract" => Ok(ClassStereotype::Contract),
        "interface" => Ok(ClassStereotype::Interface),
        "library" => Ok(ClassStereotype::Library),
        "abstract" => Ok(ClassStereotype::Abstract),
        other => Err(Diagnostic::error(format!("unknown contract kind `{other}`"))
            .with_code(ErrorCode::E101)
            .with_help("expected contract, interface, library or abstract")),
    }
}

/// Maps a visibility keyword to a [`Visibility`].
///
/// A missing keyword and `default` both mean public.
///
/// # Errors
///
/// Returns an [`ErrorCode::E300`] diagnostic for any other keyword.
pub fn parse_visibility(visibility: Option<&str>) -> DiagnosticResult<Visibility> {
    match visibility {
        None | Some("default") | Some("public") => Ok(Visibility::Public),
        Some("external") => Ok(Visibility::External),
        Some("internal") => Ok(Visibility::Internal),
        Some("private") => Ok(Visibility::Private),
        Some(other) => Err(Diagnostic::error(format!("invalid visibility `{other}`"))
            .with_code(ErrorCode::E300)
            .with_help("use public, external, internal or private")),
    }
}
