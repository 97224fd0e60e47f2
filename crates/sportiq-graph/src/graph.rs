//! Arena-based dependency graph with three-color topological sort.

use serde::{Deserialize, Serialize};
use sportiq_layer::LayerDescriptor;
use sportiq_types::{ErrorCode, LayerId};
use std::collections::HashMap;
use thiserror::Error;

/// Graph error.
#[derive(Debug, Clone, Error)]
pub enum GraphError {
    /// The referenced layer id is not a node of this graph.
    #[error("unknown graph node: '{0}'")]
    UnknownNode(LayerId),
}

impl ErrorCode for GraphError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownNode(_) => "GRAPH_UNKNOWN_NODE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// One detected dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// The id at which the cycle was detected (the node re-encountered
    /// while still in progress).
    pub id: LayerId,
    /// All ids participating in the cycle, in path order.
    pub members: Vec<LayerId>,
}

/// Result of a topological sort.
///
/// `order` lists every acyclic node, dependencies before dependents.
/// Nodes caught in a cycle appear in `cycles` instead of `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortResult {
    /// Dependency-respecting activation order.
    pub order: Vec<LayerId>,
    /// Every detected cycle.
    pub cycles: Vec<CycleReport>,
}

#[derive(Clone, Copy, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Directed dependency graph over layer ids.
///
/// Edges point `layer → dependency`. Nodes are kept in insertion order so
/// ties between independent nodes resolve deterministically (manifest
/// declaration order when built from a manifest).
#[derive(Default)]
pub struct DependencyGraph {
    nodes: Vec<LayerId>,
    index: HashMap<LayerId, usize>,
    deps: Vec<Vec<usize>>,
    missing: Vec<(LayerId, LayerId)>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from layer descriptors.
    ///
    /// All ids are added first, then dependency edges; a dependency naming
    /// an id outside the descriptor set is flagged missing, not an error.
    #[must_use]
    pub fn from_descriptors<'a, I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'a LayerDescriptor>,
    {
        let descriptors: Vec<&LayerDescriptor> = descriptors.into_iter().collect();
        let mut graph = Self::new();
        for desc in &descriptors {
            graph.add_node(desc.id.clone());
        }
        for desc in &descriptors {
            for dep in &desc.dependencies {
                // `from` is always known here; unknown deps are flagged
                let _ = graph.add_dependency(&desc.id, dep);
            }
        }
        graph
    }

    /// Adds a node, returning its arena index. Adding an existing id is a
    /// no-op returning the existing index.
    pub fn add_node(&mut self, id: LayerId) -> usize {
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(id.clone(), i);
        self.nodes.push(id);
        self.deps.push(Vec::new());
        i
    }

    /// Adds a `from → to` dependency edge.
    ///
    /// An unknown `to` id is recorded as a missing dependency (the
    /// manifest invariant: dependency ids must resolve or be flagged).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `from` is not a node.
    pub fn add_dependency(&mut self, from: &LayerId, to: &LayerId) -> Result<(), GraphError> {
        let fi = *self
            .index
            .get(from)
            .ok_or_else(|| GraphError::UnknownNode(from.clone()))?;

        match self.index.get(to) {
            Some(&ti) => {
                if !self.deps[fi].contains(&ti) {
                    self.deps[fi].push(ti);
                }
            }
            None => {
                tracing::warn!(layer = %from, dependency = %to, "dependency not in graph");
                self.missing.push((from.clone(), to.clone()));
            }
        }
        Ok(())
    }

    /// Returns `true` if `id` is a node.
    #[must_use]
    pub fn contains(&self, id: &LayerId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dependency edges that named ids outside the graph, as
    /// `(dependent, unknown dependency)` pairs.
    #[must_use]
    pub fn missing(&self) -> &[(LayerId, LayerId)] {
        &self.missing
    }

    /// Declared dependencies of `id`, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `id` is not a node.
    pub fn dependencies(&self, id: &LayerId) -> Result<Vec<LayerId>, GraphError> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
        Ok(self.deps[i].iter().map(|&d| self.nodes[d].clone()).collect())
    }

    /// Layers that depend on `id` (reverse edges, derived on demand).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `id` is not a node.
    pub fn dependents(&self, id: &LayerId) -> Result<Vec<LayerId>, GraphError> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
        Ok(self
            .deps
            .iter()
            .enumerate()
            .filter(|(_, d)| d.contains(&i))
            .map(|(n, _)| self.nodes[n].clone())
            .collect())
    }

    /// Computes a dependency-respecting order via three-color DFS.
    ///
    /// Cyclic nodes are reported and excluded; every acyclic node still
    /// appears in the order, dependencies first.
    #[must_use]
    pub fn resolve_order(&self) -> SortResult {
        let n = self.nodes.len();
        let mut colors = vec![Color::White; n];
        let mut cyclic = vec![false; n];
        let mut order_idx = Vec::with_capacity(n);
        let mut cycles = Vec::new();
        let mut stack = Vec::new();

        for i in 0..n {
            if colors[i] == Color::White {
                self.visit(i, &mut colors, &mut cyclic, &mut order_idx, &mut cycles, &mut stack);
            }
        }

        SortResult {
            order: order_idx.into_iter().map(|i| self.nodes[i].clone()).collect(),
            cycles,
        }
    }

    fn visit(
        &self,
        i: usize,
        colors: &mut [Color],
        cyclic: &mut [bool],
        order_idx: &mut Vec<usize>,
        cycles: &mut Vec<CycleReport>,
        stack: &mut Vec<usize>,
    ) {
        colors[i] = Color::Gray;
        stack.push(i);

        for &d in &self.deps[i] {
            match colors[d] {
                Color::White => {
                    self.visit(d, colors, cyclic, order_idx, cycles, stack);
                }
                Color::Gray => {
                    // Back edge: everything from the first occurrence of
                    // `d` on the stack is part of the cycle.
                    let pos = stack
                        .iter()
                        .position(|&s| s == d)
                        .unwrap_or(stack.len() - 1);
                    let members: Vec<LayerId> =
                        stack[pos..].iter().map(|&m| self.nodes[m].clone()).collect();
                    for &m in &stack[pos..] {
                        cyclic[m] = true;
                    }
                    tracing::warn!(
                        id = %self.nodes[d],
                        members = ?members.iter().map(LayerId::as_str).collect::<Vec<_>>(),
                        "dependency cycle detected, excluding from load order"
                    );
                    cycles.push(CycleReport {
                        id: self.nodes[d].clone(),
                        members,
                    });
                }
                Color::Black => {}
            }
        }

        stack.pop();
        colors[i] = Color::Black;
        if !cyclic[i] {
            order_idx.push(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportiq_types::assert_error_codes;

    fn id(s: &str) -> LayerId {
        LayerId::new(s)
    }

    #[test]
    fn simple_order_dependency_first() {
        let mut g = DependencyGraph::new();
        g.add_node(id("a"));
        g.add_node(id("b"));
        g.add_dependency(&id("b"), &id("a")).unwrap();

        let sorted = g.resolve_order();
        assert_eq!(sorted.order, vec![id("a"), id("b")]);
        assert!(sorted.cycles.is_empty());
    }

    #[test]
    fn manifest_scenario_a_before_b() {
        // {active: [{id:"a",...}, {id:"b", dependencies:["a"]}]}
        let descs = vec![
            LayerDescriptor::new("a", "A", "a"),
            LayerDescriptor::new("b", "B", "b").with_dependency("a"),
        ];
        let g = DependencyGraph::from_descriptors(&descs);
        let sorted = g.resolve_order();
        assert_eq!(sorted.order, vec![id("a"), id("b")]);
    }

    #[test]
    fn cycle_reported_and_remainder_sorted() {
        let mut g = DependencyGraph::new();
        g.add_node(id("a"));
        g.add_node(id("b"));
        g.add_node(id("c"));
        g.add_dependency(&id("a"), &id("b")).unwrap();
        g.add_dependency(&id("b"), &id("a")).unwrap();

        let sorted = g.resolve_order();
        assert_eq!(sorted.order, vec![id("c")]);
        assert_eq!(sorted.cycles.len(), 1);
        let cycle = &sorted.cycles[0];
        assert!(cycle.members.contains(&id("a")));
        assert!(cycle.members.contains(&id("b")));
    }

    #[test]
    fn cycle_does_not_poison_dependents_outside_it() {
        let mut g = DependencyGraph::new();
        g.add_node(id("a"));
        g.add_node(id("b"));
        g.add_node(id("c"));
        g.add_dependency(&id("a"), &id("b")).unwrap();
        g.add_dependency(&id("b"), &id("a")).unwrap();
        // c depends on the cyclic a, but is not itself cyclic
        g.add_dependency(&id("c"), &id("a")).unwrap();

        let sorted = g.resolve_order();
        assert_eq!(sorted.order, vec![id("c")]);
        assert_eq!(sorted.cycles.len(), 1);
    }

    #[test]
    fn diamond_orders_dependencies_first() {
        let descs = vec![
            LayerDescriptor::new("d", "D", "d")
                .with_dependency("b")
                .with_dependency("c"),
            LayerDescriptor::new("b", "B", "b").with_dependency("a"),
            LayerDescriptor::new("c", "C", "c").with_dependency("a"),
            LayerDescriptor::new("a", "A", "a"),
        ];
        let g = DependencyGraph::from_descriptors(&descs);
        let sorted = g.resolve_order();

        let pos = |l: &str| sorted.order.iter().position(|x| x.as_str() == l).unwrap();
        assert!(pos("a") < pos("b"));
        assert!(pos("a") < pos("c"));
        assert!(pos("b") < pos("d"));
        assert!(pos("c") < pos("d"));
        assert_eq!(sorted.order.len(), 4);
    }

    #[test]
    fn independent_nodes_keep_insertion_order() {
        let mut g = DependencyGraph::new();
        g.add_node(id("z"));
        g.add_node(id("m"));
        g.add_node(id("a"));

        let sorted = g.resolve_order();
        assert_eq!(sorted.order, vec![id("z"), id("m"), id("a")]);
    }

    #[test]
    fn duplicate_add_node_is_noop() {
        let mut g = DependencyGraph::new();
        let first = g.add_node(id("a"));
        let second = g.add_node(id("a"));
        assert_eq!(first, second);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn unknown_dependency_flagged_missing() {
        let descs = vec![LayerDescriptor::new("a", "A", "a").with_dependency("ghost")];
        let g = DependencyGraph::from_descriptors(&descs);
        assert_eq!(g.missing().len(), 1);
        assert_eq!(g.missing()[0].1, id("ghost"));
        // Sort still works
        assert_eq!(g.resolve_order().order, vec![id("a")]);
    }

    #[test]
    fn dependents_derived_on_demand() {
        let descs = vec![
            LayerDescriptor::new("a", "A", "a"),
            LayerDescriptor::new("b", "B", "b").with_dependency("a"),
            LayerDescriptor::new("c", "C", "c").with_dependency("a"),
        ];
        let g = DependencyGraph::from_descriptors(&descs);
        let deps = g.dependents(&id("a")).unwrap();
        assert_eq!(deps, vec![id("b"), id("c")]);
        assert!(g.dependents(&id("b")).unwrap().is_empty());
    }

    #[test]
    fn unknown_node_errors() {
        let g = DependencyGraph::new();
        let err = g.dependents(&id("ghost")).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn add_dependency_unknown_from_errors() {
        let mut g = DependencyGraph::new();
        g.add_node(id("a"));
        assert!(g.add_dependency(&id("ghost"), &id("a")).is_err());
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&[GraphError::UnknownNode(id("x"))], "GRAPH_");
    }

    #[test]
    fn self_cycle_detected() {
        let mut g = DependencyGraph::new();
        g.add_node(id("a"));
        g.add_node(id("b"));
        g.add_dependency(&id("a"), &id("a")).unwrap();

        let sorted = g.resolve_order();
        assert_eq!(sorted.order, vec![id("b")]);
        assert_eq!(sorted.cycles.len(), 1);
        assert_eq!(sorted.cycles[0].members, vec![id("a")]);
    }
}
