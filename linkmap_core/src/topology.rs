// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use linkmap_types::base_types::*;
use std::collections::HashMap;
use tracing::debug;

#[cfg(test)]
#[path = "unit_tests/topology_tests.rs"]
mod topology_tests;

/// One directed edge of the topology: the target node and the link it
/// crosses. The source node is the adjacency-map key.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Edge {
    pub to: NodeAddress,
    pub link: LinkId,
}

/// A directed multigraph over node addresses. Edges reference registry ids,
/// never attribute copies. Paths may be asymmetric: the two directions
/// between a node pair are independent edges with independent links, and
/// parallel edges between the same pair are permitted.
///
/// Outgoing edges are kept in insertion order. That order is a contract:
/// the resolver enumerates neighbors through it, which is what makes
/// equal-length route tie-breaks deterministic and repeatable for a fixed
/// graph state.
pub struct TopologyGraph {
    edges: HashMap<NodeAddress, Vec<Edge>>,
}

impl TopologyGraph {
    pub fn new() -> Self {
        TopologyGraph {
            edges: HashMap::new(),
        }
    }

    /// Insert a directed edge. Nodes are created implicitly: inserting also
    /// materializes the target so it is a known vertex with an empty
    /// outgoing set. Duplicate (from, to, link) triples are allowed and
    /// kept; the resolver only ever needs the first usable one.
    pub fn add_edge(&mut self, from: NodeAddress, to: NodeAddress, link: LinkId) {
        self.edges.entry(to.clone()).or_default();
        self.edges.entry(from).or_default().push(Edge { to, link });
    }

    /// Delete one specific directed edge. Removing an edge that is not
    /// present is a no-op; the mutation feed may replay removals.
    pub fn remove_edge(&mut self, from: &NodeAddress, to: &NodeAddress, link: LinkId) {
        if let Some(outgoing) = self.edges.get_mut(from) {
            if let Some(position) = outgoing
                .iter()
                .position(|edge| edge.to == *to && edge.link == link)
            {
                outgoing.remove(position);
            }
        }
    }

    /// Drop every edge labeled with a retired link, in both directions and
    /// across all node pairs.
    pub fn purge_link(&mut self, link: LinkId) {
        let mut purged = 0usize;
        for outgoing in self.edges.values_mut() {
            let before = outgoing.len();
            outgoing.retain(|edge| edge.link != link);
            purged += before - outgoing.len();
        }
        if purged > 0 {
            debug!("Purged {} edge(s) labeled with link {}", purged, link);
        }
    }

    /// Outgoing edges of a node, in insertion order. Unknown nodes and
    /// nodes without outgoing edges both yield an empty slice.
    pub fn neighbors(&self, node: &NodeAddress) -> &[Edge] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the node appears anywhere in the topology, as a source or a
    /// target of at least one past edge insertion.
    pub fn contains(&self, node: &NodeAddress) -> bool {
        self.edges.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

impl Default for TopologyGraph {
    fn default() -> Self {
        Self::new()
    }
}
