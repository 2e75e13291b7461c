//! Depth computation over a code parent/child hierarchy.
//!
//! The hierarchy arrives from generated output, so it is materialized as a petgraph
//! `DiGraph` and walked with an on-path set: a cycle reachable from a root is reported as
//! [`AnalysisError::MalformedHierarchy`] instead of recursing forever.

use crate::error::{AnalysisError, Result};
use crate::types::CodeHierarchy;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};

/// Parent -> child graph over code identifiers
pub struct HierarchyGraph {
    /// Directed graph (parent -> child)
    pub graph: DiGraph<String, ()>,

    /// Code id -> NodeIndex mapping for fast lookup
    pub code_index: HashMap<String, NodeIndex>,

    /// Root nodes in declaration order
    pub roots: Vec<NodeIndex>,
}

impl HierarchyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            code_index: HashMap::new(),
            roots: Vec::new(),
        }
    }

    pub fn from_hierarchy(hierarchy: &CodeHierarchy) -> Self {
        let mut graph = Self::new();

        for root in &hierarchy.root_codes {
            let idx = graph.add_code(root);
            if !graph.roots.contains(&idx) {
                graph.roots.push(idx);
            }
        }

        // Sort parents so node indices do not depend on HashMap iteration order
        let mut parents: Vec<&String> = hierarchy.relationships.keys().collect();
        parents.sort();
        for parent in parents {
            let from = graph.add_code(parent);
            for child in &hierarchy.relationships[parent] {
                let to = graph.add_code(child);
                graph.graph.add_edge(from, to, ());
            }
        }

        graph
    }

    /// Add a code node, returning the existing node when already present
    pub fn add_code(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.code_index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.code_index.insert(id.to_string(), idx);
        idx
    }

    /// Children in declaration order
    fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        // petgraph yields the most recently added edge first
        let mut out: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        out.reverse();
        out
    }

    fn code_id(&self, node: NodeIndex) -> String {
        self.graph
            .node_weight(node)
            .cloned()
            .unwrap_or_default()
    }

    /// Maximum depth over all roots; a root alone is depth 1, no roots is 0
    pub fn max_depth(&self) -> Result<usize> {
        let mut heights: HashMap<NodeIndex, usize> = HashMap::new();
        let mut on_path: HashSet<NodeIndex> = HashSet::new();
        let mut max = 0;
        for &root in &self.roots {
            max = max.max(self.height(root, &mut on_path, &mut heights)?);
        }
        Ok(max)
    }

    /// Levels from `node` down to its deepest leaf, counting `node` itself
    fn height(
        &self,
        node: NodeIndex,
        on_path: &mut HashSet<NodeIndex>,
        heights: &mut HashMap<NodeIndex, usize>,
    ) -> Result<usize> {
        if let Some(&h) = heights.get(&node) {
            return Ok(h);
        }

        on_path.insert(node);
        let mut deepest_child = 0;
        for child in self.children(node) {
            if on_path.contains(&child) {
                return Err(AnalysisError::MalformedHierarchy {
                    parent: self.code_id(node),
                    child: self.code_id(child),
                });
            }
            deepest_child = deepest_child.max(self.height(child, on_path, heights)?);
        }
        on_path.remove(&node);

        let h = deepest_child + 1;
        heights.insert(node, h);
        Ok(h)
    }

    /// Codes mentioned in the hierarchy that no root reaches, sorted
    pub fn unreachable_codes(&self) -> Vec<String> {
        let mut reached: HashSet<NodeIndex> = HashSet::new();
        for &root in &self.roots {
            let mut dfs = Dfs::new(&self.graph, root);
            while let Some(node) = dfs.next(&self.graph) {
                reached.insert(node);
            }
        }

        let mut out: Vec<String> = self
            .graph
            .node_indices()
            .filter(|idx| !reached.contains(idx))
            .map(|idx| self.code_id(idx))
            .collect();
        out.sort();
        out
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for HierarchyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Maximum depth of a code hierarchy (0 when there are no roots)
pub fn hierarchy_depth(hierarchy: &CodeHierarchy) -> Result<usize> {
    let graph = HierarchyGraph::from_hierarchy(hierarchy);
    let depth = graph.max_depth()?;
    log::debug!(
        "Hierarchy depth {depth} over {} codes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(depth)
}
