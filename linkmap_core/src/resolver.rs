// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::topology::TopologyGraph;
use linkmap_types::base_types::*;
use linkmap_types::error::{LinkMapError, LinkMapResult};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

#[cfg(test)]
#[path = "unit_tests/resolver_tests.rs"]
mod resolver_tests;

/// Compute the ordered chain of links a transfer from `from` to `to` must
/// cross, as an unweighted breadth-first search over the directed graph.
///
/// The planner only needs *a* valid sequence of bandwidth-bounded links to
/// reason about congestion, not the bandwidth-optimal one, so the first
/// discovered route wins. Equal-length candidates are tie-broken by the
/// graph's insertion-order neighbor enumeration, which keeps results
/// repeatable for a fixed graph state.
///
/// `from == to` is a degenerate success: zero links to traverse, distinct
/// from "no route". An address missing from the graph resolves to
/// `UnknownNodeAddress` naming it; a known pair with no directed route
/// resolves to `PathNotFound`. Both are expected outcomes the consumer
/// reads as "assume unlimited bandwidth", not server faults.
///
/// `deadline` is a soft guard against oversized topologies stalling a
/// caller; the walk itself does no blocking I/O.
pub fn find_route(
    graph: &TopologyGraph,
    from: &NodeAddress,
    to: &NodeAddress,
    deadline: Option<Instant>,
) -> LinkMapResult<Vec<LinkId>> {
    if from == to {
        return Ok(Vec::new());
    }
    if !graph.contains(from) {
        return Err(LinkMapError::UnknownNodeAddress {
            address: from.clone(),
        });
    }
    if !graph.contains(to) {
        return Err(LinkMapError::UnknownNodeAddress {
            address: to.clone(),
        });
    }

    // Predecessor per visited node, for route reconstruction.
    let mut parents: HashMap<NodeAddress, (NodeAddress, LinkId)> = HashMap::new();
    let mut visited: HashSet<NodeAddress> = HashSet::new();
    let mut queue: VecDeque<NodeAddress> = VecDeque::new();

    visited.insert(from.clone());
    queue.push_back(from.clone());

    while let Some(node) = queue.pop_front() {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(LinkMapError::ResolutionTimeout {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }
        for edge in graph.neighbors(&node) {
            if !visited.insert(edge.to.clone()) {
                continue;
            }
            parents.insert(edge.to.clone(), (node.clone(), edge.link));
            if edge.to == *to {
                return Ok(reconstruct(&parents, from, to));
            }
            queue.push_back(edge.to.clone());
        }
    }

    Err(LinkMapError::PathNotFound {
        from: from.clone(),
        to: to.clone(),
    })
}

/// Walk the predecessor chain back from `to` and reverse it into the
/// from-to link order. The visited set guarantees each node appears at
/// most once on the chain, so no link id can repeat in the result.
fn reconstruct(
    parents: &HashMap<NodeAddress, (NodeAddress, LinkId)>,
    from: &NodeAddress,
    to: &NodeAddress,
) -> Vec<LinkId> {
    let mut links = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let (previous, link) = &parents[cursor];
        links.push(*link);
        cursor = previous;
    }
    links.reverse();
    links
}
