// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::registry::{check_rate, LinkRegistry};
use crate::resolver::find_route;
use crate::topology::TopologyGraph;
use linkmap_types::base_types::*;
use linkmap_types::error::LinkMapResult;
use linkmap_types::messages::*;
use parking_lot::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

#[cfg(test)]
#[path = "unit_tests/mapper_tests.rs"]
mod mapper_tests;

/// The path mapping façade: sole owner of the topology graph and the link
/// registry, injected once at startup and shared by reference with every
/// query handler.
///
/// Reads and writes follow a single-writer/many-reader lock discipline.
/// A query takes both read guards together (graph first, then registry,
/// the same order every writer uses), so one resolution observes one
/// consistent snapshot: it can never see a half-applied edge mutation or
/// a half-written attribute pair.
pub struct PathMapperState {
    graph: RwLock<TopologyGraph>,
    registry: RwLock<LinkRegistry>,
    /// Soft per-query ceiling on resolution time; `None` disables the guard.
    resolve_deadline: Option<Duration>,
}

impl PathMapperState {
    pub fn new(resolve_deadline: Option<Duration>) -> Self {
        PathMapperState {
            graph: RwLock::new(TopologyGraph::new()),
            registry: RwLock::new(LinkRegistry::new()),
            resolve_deadline,
        }
    }

    /// Resolve the ordered link chain from `from` to `to`, then fetch the
    /// *current* attributes for every traversed link. Attributes are read
    /// through the registry at query time, never captured at graph-edit
    /// time, so a query always reflects the latest known max_rate/desc.
    pub fn find_path(&self, from: &NodeAddress, to: &NodeAddress) -> LinkMapResult<Vec<LinkRecord>> {
        let deadline = self.resolve_deadline.map(|limit| Instant::now() + limit);
        let graph = self.graph.read();
        let route = find_route(&graph, from, to, deadline)?;
        // Still under the graph read guard: link retirement takes both
        // write locks, so every id on the route is present in the registry.
        let registry = self.registry.read();
        route.into_iter().map(|id| registry.record(id)).collect()
    }

    /// Insert a directed edge, minting or reusing the stable id for the
    /// link key. The given attributes overwrite the registry record.
    /// All-or-nothing: a malformed rate is rejected before any state moves.
    pub fn add_edge(
        &self,
        from: NodeAddress,
        to: NodeAddress,
        key: &LinkKey,
        max_rate: Option<f64>,
        desc: Option<String>,
    ) -> LinkMapResult<LinkRecord> {
        check_rate(max_rate)?;
        let mut graph = self.graph.write();
        let mut registry = self.registry.write();
        let id = registry.resolve_or_create(key);
        registry.set_attributes(id, max_rate, desc)?;
        debug!("Adding edge {} -> {} via link {}", from, to, id);
        graph.add_edge(from, to, id);
        registry.record(id)
    }

    /// Overwrite the attributes of an issued link id.
    pub fn update_link(
        &self,
        id: LinkId,
        max_rate: Option<f64>,
        desc: Option<String>,
    ) -> LinkMapResult<LinkRecord> {
        let mut registry = self.registry.write();
        registry.set_attributes(id, max_rate, desc)?;
        registry.record(id)
    }

    /// Delete one specific directed edge. The link itself stays issued and
    /// may still label other edges.
    pub fn remove_edge(&self, from: &NodeAddress, to: &NodeAddress, id: LinkId) -> LinkMapResult {
        let mut graph = self.graph.write();
        graph.remove_edge(from, to, id);
        Ok(())
    }

    /// Retire a link entirely: purge every edge labeled with it, then drop
    /// the registry entry. In-flight queries that already copied the link
    /// out are unaffected.
    pub fn remove_link(&self, id: LinkId) -> LinkMapResult {
        let mut graph = self.graph.write();
        let mut registry = self.registry.write();
        registry.remove(id)?;
        graph.purge_link(id);
        Ok(())
    }

    /// Message-level entry point for planner queries.
    pub fn handle_path_query(&self, request: PathRequest) -> LinkMapResult<PathResponse> {
        let links = self.find_path(&request.from, &request.to)?;
        Ok(PathResponse { links })
    }

    /// Message-level entry point for the external topology feed.
    pub fn handle_topology_command(
        &self,
        command: TopologyCommand,
    ) -> LinkMapResult<TopologyInfoResponse> {
        match command {
            TopologyCommand::AddEdge {
                from,
                to,
                key,
                max_rate,
                desc,
            } => {
                let record = self.add_edge(from, to, &key, max_rate, desc)?;
                Ok(TopologyInfoResponse { link: Some(record) })
            }
            TopologyCommand::UpdateLink { id, max_rate, desc } => {
                let record = self.update_link(id, max_rate, desc)?;
                Ok(TopologyInfoResponse { link: Some(record) })
            }
            TopologyCommand::RemoveEdge { from, to, id } => {
                self.remove_edge(&from, &to, id)?;
                Ok(TopologyInfoResponse { link: None })
            }
            TopologyCommand::RemoveLink { id } => {
                self.remove_link(id)?;
                Ok(TopologyInfoResponse { link: None })
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.read().node_count()
    }

    pub fn link_count(&self) -> usize {
        self.registry.read().len()
    }
}

impl Default for PathMapperState {
    fn default() -> Self {
        Self::new(None)
    }
}
