//! UML class diagram.

use std::{cmp::Reverse, fmt, path::Path};

use solscope_core::{
    catalog::Catalog,
    model::{
        Association, Attribute, Class, ClassStereotype, Operator, OperatorStereotype, Parameter,
        ReferenceKind, Visibility,
    },
};

use crate::config::ClassDiagramConfig;

use super::{escape_label, write_header};

/// Indentation of members inside a visibility group.
const ATTRIBUTE_INDENT: &str = "\\ \\ \\ ";
const OPERATOR_INDENT: &str = "\\ \\ \\ \\ ";

/// Member compartments are split into these groups, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisibilityGroup {
    Private,
    Internal,
    External,
    Public,
}

impl VisibilityGroup {
    const ALL: [VisibilityGroup; 4] = [
        VisibilityGroup::Private,
        VisibilityGroup::Internal,
        VisibilityGroup::External,
        VisibilityGroup::Public,
    ];

    fn of(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Private => VisibilityGroup::Private,
            Visibility::Internal => VisibilityGroup::Internal,
            Visibility::External => VisibilityGroup::External,
            Visibility::Public | Visibility::None => VisibilityGroup::Public,
        }
    }

    fn is_private(self) -> bool {
        matches!(self, VisibilityGroup::Private | VisibilityGroup::Internal)
    }

    fn label(self) -> &'static str {
        match self {
            VisibilityGroup::Private => "Private",
            VisibilityGroup::Internal => "Internal",
            VisibilityGroup::External => "External",
            VisibilityGroup::Public => "Public",
        }
    }
}

/// A class diagram over a set of classes.
///
/// Edges are drawn for associations whose target is among the same classes
/// and visible from the source.
#[derive(Debug, Clone, Copy)]
pub struct ClassDiagram<'c, 'a> {
    classes: &'c [&'a Class],
    config: &'c ClassDiagramConfig,
}

impl<'c, 'a> ClassDiagram<'c, 'a> {
    pub fn new(classes: &'c [&'a Class], config: &'c ClassDiagramConfig) -> Self {
        Self { classes, config }
    }

    fn is_shown(&self, class: &Class) -> bool {
        match class.stereotype() {
            ClassStereotype::Contract => true,
            ClassStereotype::Interface => !self.config.hide_interfaces(),
            ClassStereotype::Library => !self.config.hide_libraries(),
            ClassStereotype::Abstract => !self.config.hide_abstracts(),
            ClassStereotype::Struct => !self.config.hide_structs(),
            ClassStereotype::Enum => !self.config.hide_enums(),
        }
    }

    fn title(&self, class: &Class) -> String {
        let name = escape_label(class.name());
        let path = if self.config.hide_filename() || is_address(class.relative_path()) {
            String::new()
        } else {
            format!("\\n{}", escape_label(class.relative_path()))
        };

        match class.stereotype() {
            ClassStereotype::Contract => format!("{name}{path}"),
            stereotype => format!("\\<\\<{stereotype}\\>\\>\\n{name}{path}"),
        }
    }

    fn write_class(&self, f: &mut fmt::Formatter<'_>, class: &Class) -> fmt::Result {
        write!(f, "{} [label=\"{{{}", class.id(), self.title(class))?;
        if !self.config.hide_variables() {
            self.write_attributes(f, class)?;
        }
        if !self.config.hide_functions() {
            self.write_operators(f, class)?;
        }
        writeln!(f, "}}\"]")
    }

    fn write_attributes(&self, f: &mut fmt::Formatter<'_>, class: &Class) -> fmt::Result {
        if class.attributes().is_empty() {
            return Ok(());
        }
        write!(f, " | ")?;

        // Struct and enum members have no visibility.
        if matches!(class.stereotype(), ClassStereotype::Struct | ClassStereotype::Enum) {
            for attribute in class.attributes() {
                write_attribute(f, "", attribute)?;
            }
            return Ok(());
        }

        for group in self.groups() {
            let members: Vec<&Attribute> = class
                .attributes()
                .iter()
                .filter(|attribute| VisibilityGroup::of(attribute.visibility()) == group)
                .collect();
            if members.is_empty() {
                continue;
            }

            write!(f, "{}:\\l", group.label())?;
            for attribute in members {
                write_attribute(f, ATTRIBUTE_INDENT, attribute)?;
            }
        }
        Ok(())
    }

    fn write_operators(&self, f: &mut fmt::Formatter<'_>, class: &Class) -> fmt::Result {
        if class.operators().is_empty() {
            return Ok(());
        }
        write!(f, " | ")?;

        for group in self.groups() {
            let mut members: Vec<&Operator> = class
                .operators()
                .iter()
                .filter(|operator| VisibilityGroup::of(operator.visibility()) == group)
                .collect();
            if members.is_empty() {
                continue;
            }
            members.sort_by_key(|operator| Reverse(stereotype_rank(operator.stereotype())));

            write!(f, "{}:\\l", group.label())?;
            for operator in members {
                write!(f, "{OPERATOR_INDENT}{}", stereotype_marker(class, operator))?;
                write!(f, "{}", escape_label(operator.name()))?;
                write!(f, "{}", format_parameters(operator.parameters(), false))?;
                if !operator.return_parameters().is_empty() {
                    write!(f, ": {}", format_parameters(operator.return_parameters(), true))?;
                }
                write!(f, "\\l")?;
            }
        }
        Ok(())
    }

    fn groups(&self) -> impl Iterator<Item = VisibilityGroup> {
        let hide_privates = self.config.hide_privates();
        VisibilityGroup::ALL
            .into_iter()
            .filter(move |group| !(hide_privates && group.is_private()))
    }

    fn write_edges(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = Catalog::new(self.classes.iter().copied());

        for &source in self.classes {
            if !self.is_shown(source) {
                continue;
            }

            // Contract-level structs and enums aggregate into their owner.
            let children = source.enums().iter().chain(source.structs());
            for child in children.filter_map(|&id| catalog.get(id)) {
                if self.is_shown(child) {
                    writeln!(f, "{} -> {} [arrowhead=diamond, weight=2]", child.id(), source.id())?;
                }
            }

            for association in source.associations() {
                let Some(target) = catalog.resolve_target(source, association.target_name())
                else {
                    continue;
                };
                if self.is_shown(target) {
                    write_association(f, source, target, association)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ClassDiagram<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, "UmlClassDiagram", "BT")?;

        let mut classes: Vec<&Class> = self
            .classes
            .iter()
            .copied()
            .filter(|class| self.is_shown(class))
            .collect();
        classes.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));

        let subgraph_kind = if self.config.cluster_folders() {
            "cluster"
        } else {
            "graph"
        };
        let mut current_folder: Option<String> = None;
        let mut subgraphs = 0usize;
        for class in classes {
            let folder = folder_of(class.relative_path());
            if current_folder.as_deref() != Some(folder.as_str()) {
                if current_folder.is_some() {
                    writeln!(f, "}}")?;
                }
                writeln!(f, "subgraph {subgraph_kind}_{subgraphs} {{")?;
                writeln!(f, "label=\"{}\"", escape_label(&folder))?;
                subgraphs += 1;
                current_folder = Some(folder);
            }
            self.write_class(f, class)?;
        }
        if current_folder.is_some() {
            writeln!(f, "}}")?;
        }

        self.write_edges(f)?;
        writeln!(f, "}}")
    }
}

/// Serializes classes as a `digraph UmlClassDiagram`.
pub fn class_diagram(classes: &[&Class], config: &ClassDiagramConfig) -> String {
    ClassDiagram::new(classes, config).to_string()
}

fn write_attribute(f: &mut fmt::Formatter<'_>, indent: &str, attribute: &Attribute) -> fmt::Result {
    write!(
        f,
        "{indent}{}: {}\\l",
        escape_label(attribute.name()),
        escape_label(attribute.type_name())
    )
}

fn write_association(
    f: &mut fmt::Formatter<'_>,
    source: &Class,
    target: &Class,
    association: &Association,
) -> fmt::Result {
    let mut attributes = Vec::new();
    let interface_realization =
        association.is_realization() && target.stereotype() == ClassStereotype::Interface;
    if association.reference_kind() == ReferenceKind::Memory || interface_realization {
        attributes.push("style=dashed");
    }
    if association.is_realization() {
        attributes.push("arrowhead=empty");
        attributes.push("arrowsize=3");
        attributes.push(if target.stereotype() == ClassStereotype::Contract {
            "weight=4"
        } else {
            "weight=3"
        });
    }

    writeln!(
        f,
        "{} -> {} [{}]",
        source.id(),
        target.id(),
        attributes.join(", ")
    )
}

/// Operators are listed with higher ranks first.
fn stereotype_rank(stereotype: OperatorStereotype) -> u8 {
    match stereotype {
        OperatorStereotype::None => 0,
        OperatorStereotype::Constructor => 1,
        OperatorStereotype::Modifier => 2,
        OperatorStereotype::Event => 3,
        OperatorStereotype::Payable => 4,
        OperatorStereotype::Fallback => 5,
        OperatorStereotype::Abstract => 6,
    }
}

fn stereotype_marker(class: &Class, operator: &Operator) -> &'static str {
    match operator.stereotype() {
        OperatorStereotype::Event => "\\<\\<event\\>\\> ",
        OperatorStereotype::Fallback => "\\<\\<fallback\\>\\> ",
        OperatorStereotype::Modifier => "\\<\\<modifier\\>\\> ",
        OperatorStereotype::Payable => "\\<\\<payable\\>\\> ",
        OperatorStereotype::Abstract if class.stereotype() == ClassStereotype::Abstract => {
            "\\<\\<abstract\\>\\> "
        }
        _ => "",
    }
}

/// Formats a parameter list. A single unnamed return value is written bare.
fn format_parameters(parameters: &[Parameter], returns: bool) -> String {
    if let [
        Parameter {
            name: None,
            type_name,
        },
    ] = parameters
    {
        let type_name = escape_label(type_name);
        return if returns {
            type_name
        } else {
            format!("({type_name})")
        };
    }

    let list: Vec<String> = parameters
        .iter()
        .map(|parameter| match &parameter.name {
            Some(name) => format!(
                "{}: {}",
                escape_label(name),
                escape_label(&parameter.type_name)
            ),
            None => escape_label(&parameter.type_name),
        })
        .collect();
    format!("({})", list.join(", "))
}

fn folder_of(relative_path: &str) -> String {
    Path::new(relative_path)
        .parent()
        .map(|parent| parent.to_string_lossy().into_owned())
        .filter(|folder| !folder.is_empty())
        .unwrap_or_else(|| ".".to_string())
}

/// Classes fetched for a deployed address carry the address as their path.
fn is_address(path: &str) -> bool {
    path.strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
