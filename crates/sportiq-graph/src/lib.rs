//! Dependency graph for SPORTIQ layers.
//!
//! This is the single source of truth for "layers + dependencies" in the
//! workspace: the orchestrator and the layer manager both derive their
//! graph views from this one module, so they can never disagree about
//! which edges exist.
//!
//! # Structure
//!
//! Nodes live in an arena (`Vec`) in insertion order; edges are adjacency
//! lists by index. Reverse edges (dependents) are derived on demand, not
//! stored redundantly.
//!
//! # Topological sort
//!
//! [`DependencyGraph::resolve_order`] runs a three-color DFS:
//!
//! ```text
//! White (unvisited) → Gray (in progress) → Black (done)
//! ```
//!
//! A gray node re-encountered along the current path is a cycle. The cycle
//! is reported with its member ids and those nodes are excluded from the
//! order, but sorting proceeds for the unrelated remainder — one cycle
//! never aborts the whole sort.
//!
//! # Example
//!
//! ```
//! use sportiq_graph::DependencyGraph;
//! use sportiq_types::LayerId;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_node(LayerId::new("a"));
//! graph.add_node(LayerId::new("b"));
//! graph.add_dependency(&LayerId::new("b"), &LayerId::new("a")).unwrap();
//!
//! let sorted = graph.resolve_order();
//! assert_eq!(sorted.order, vec![LayerId::new("a"), LayerId::new("b")]);
//! assert!(sorted.cycles.is_empty());
//! ```

mod graph;

pub use graph::{CycleReport, DependencyGraph, GraphError, SortResult};
