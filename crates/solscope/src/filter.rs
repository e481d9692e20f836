//! Connectivity filter.
//!
//! Narrows a model to the classes reachable from chosen root classes. The
//! reference graph has one node per class and one unit-weight edge per
//! association whose target resolves in the catalog: the target must carry
//! the association's name and live either in the referencing class's source
//! unit or in a unit it imports.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info, trace};
use petgraph::{
    algo::dijkstra,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use solscope_core::{
    catalog::{Catalog, is_visible},
    identifier::ClassId,
    model::Class,
};

use crate::error::FilterError;

/// Directed reference graph over the classes of a catalog.
#[derive(Debug)]
pub struct ReferenceGraph<'a> {
    graph: DiGraph<&'a Class, u32>,
    nodes: HashMap<ClassId, NodeIndex>,
}

impl<'a> ReferenceGraph<'a> {
    /// Builds the graph, adding one edge per association and matching
    /// target.
    pub fn new(catalog: &Catalog<'a>) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        let mut by_name: HashMap<&str, Vec<&'a Class>> = HashMap::new();
        for class in catalog.iter() {
            nodes.insert(class.id(), graph.add_node(class));
            by_name.entry(class.name()).or_default().push(class);
        }

        for source in catalog.iter() {
            let source_idx = nodes[&source.id()];
            for association in source.associations() {
                let Some(candidates) = by_name.get(association.target_name()) else {
                    trace!(
                        source = source.name(),
                        target = association.target_name();
                        "Dangling association"
                    );
                    continue;
                };
                for target in candidates.iter().filter(|target| is_visible(source, target)) {
                    graph.add_edge(source_idx, nodes[&target.id()], 1);
                }
            }
        }

        debug!(nodes = graph.node_count(), edges = graph.edge_count(); "Reference graph built");
        Self { graph, nodes }
    }

    /// Returns the shortest edge count from `root` to every reachable class.
    pub fn distances(&self, root: ClassId) -> Vec<(&'a Class, u32)> {
        let Some(&start) = self.nodes.get(&root) else {
            return Vec::new();
        };
        let mut distances: Vec<_> = dijkstra(&self.graph, start, None, |edge| *edge.weight())
            .into_iter()
            .map(|(node, distance)| (self.graph[node], distance))
            .collect();
        distances.sort_by_key(|(class, _)| self.nodes[&class.id()]);
        distances
    }
}

/// Returns the classes within `max_depth` edges of any of `roots`.
///
/// `None` means unbounded depth. Results of several roots are unioned by class
/// name: classes keep the order in which their name was first reached, and a
/// later class with an already seen name replaces the earlier one in place.
/// The returned references are the catalog's own classes.
///
/// # Errors
///
/// Returns [`FilterError::RootNotFound`] if a root name matches no class.
pub fn reachable_from<'a, S: AsRef<str>>(
    catalog: &Catalog<'a>,
    roots: &[S],
    max_depth: Option<usize>,
) -> Result<Vec<&'a Class>, FilterError> {
    let graph = ReferenceGraph::new(catalog);
    let mut reached: IndexMap<&'a str, &'a Class> = IndexMap::new();

    for root in roots {
        let root = root.as_ref();
        let class = catalog
            .find_by_name(root)
            .ok_or_else(|| FilterError::RootNotFound(root.to_string()))?;

        let within_depth = graph
            .distances(class.id())
            .into_iter()
            .filter(|&(_, distance)| max_depth.is_none_or(|depth| distance as usize <= depth));
        for (class, distance) in within_depth {
            trace!(root, class = class.name(), distance; "Reached class");
            reached.insert(class.name(), class);
        }
    }

    info!(roots = roots.len(), kept = reached.len(), total = catalog.len(); "Filtered classes");
    Ok(reached.into_values().collect())
}
