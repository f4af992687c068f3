//! Dependency graph management using `petgraph`.
//!
//! Each edge points from a dependent service to one of its dependencies and
//! carries the set of modes under which it participates. Startup order is a
//! depth-first post-order over the edges matching the active mode, so every
//! dependency is emitted before the services that need it.

use std::collections::{BTreeMap, HashMap};

use elc_common::error::{ElcError, Result};
use elc_common::types::Mode;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// Traversal state of a node during a closure query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// A dependency graph of services with mode-tagged edges.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Internal petgraph representation; edge weights are mode tags.
    graph: DiGraph<String, Vec<String>>,
    /// Canonical service name to node.
    nodes: BTreeMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service node, returning the existing node if already present.
    pub fn add_service(&mut self, name: impl Into<String>) -> NodeIndex {
        let name = name.into();
        if let Some(&idx) = self.nodes.get(&name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        let _ = self.nodes.insert(name, idx);
        idx
    }

    /// Adds an edge: `dependent` depends on `dependency` under `modes`.
    pub fn add_dependency(
        &mut self,
        dependent: NodeIndex,
        dependency: NodeIndex,
        modes: Vec<String>,
    ) {
        let _ = self.graph.add_edge(dependent, dependency, modes);
    }

    /// Returns `true` if `name` is a node of the graph.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of services in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if the graph has no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns the services to start for `target` under `mode`, dependencies
    /// first and `target` last.
    ///
    /// With the unset mode only `target` is returned. Otherwise edges whose
    /// tag set contains the mode are followed transitively in declaration
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::UnknownService`] if `target` is not in the graph
    /// and [`ElcError::DependencyCycle`] if a cycle is reachable under `mode`.
    pub fn startup_order(&self, target: &str, mode: &Mode) -> Result<Vec<String>> {
        let &start = self
            .nodes
            .get(target)
            .ok_or_else(|| ElcError::UnknownService {
                name: target.to_string(),
            })?;

        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        let mut order = Vec::new();
        self.visit(start, mode, &mut marks, &mut stack, &mut order)?;
        tracing::debug!(target, mode = %mode, ?order, "resolved startup order");
        Ok(order)
    }

    /// Resolves each target independently and concatenates the results in
    /// the order given. Services shared by several targets are repeated.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Self::startup_order`].
    pub fn startup_plan<S: AsRef<str>>(&self, targets: &[S], mode: &Mode) -> Result<Vec<String>> {
        let mut plan = Vec::new();
        for target in targets {
            plan.extend(self.startup_order(target.as_ref(), mode)?);
        }
        Ok(plan)
    }

    fn visit(
        &self,
        node: NodeIndex,
        mode: &Mode,
        marks: &mut HashMap<NodeIndex, Mark>,
        stack: &mut Vec<NodeIndex>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        match marks.get(&node) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(self.cycle_error(node, stack)),
            None => {}
        }

        let _ = marks.insert(node, Mark::Visiting);
        stack.push(node);
        if mode.is_set() {
            for dependency in self.matching_dependencies(node, mode) {
                self.visit(dependency, mode, marks, stack, order)?;
            }
        }
        let _ = stack.pop();
        let _ = marks.insert(node, Mark::Done);
        order.push(self.graph[node].clone());
        Ok(())
    }

    /// Outgoing edges of `node` matching `mode`, in insertion order.
    fn matching_dependencies(&self, node: NodeIndex, mode: &Mode) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|edge| mode.matches(edge.weight().as_slice()))
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    fn cycle_error(&self, node: NodeIndex, stack: &[NodeIndex]) -> ElcError {
        let from = stack.iter().position(|&n| n == node).unwrap_or(0);
        let mut cycle: Vec<String> = stack[from..]
            .iter()
            .map(|&n| self.graph[n].clone())
            .collect();
        cycle.push(self.graph[node].clone());
        ElcError::DependencyCycle { cycle }
    }
}
