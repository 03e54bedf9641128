// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use super::base_types::*;
use serde::{Deserialize, Serialize};

/// A path query from the planner: which links must a transfer from `from`
/// to `to` cross? Both addresses are opaque strings; the only validation
/// expected of callers is that they are non-empty.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
pub struct PathRequest {
    pub from: NodeAddress,
    pub to: NodeAddress,
}

/// A successful resolution: the ordered chain of links from `from` to `to`.
/// The first link leaves `from`, the last enters `to`. Empty when the query
/// was degenerate (`from == to`).
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct PathResponse {
    pub links: Vec<LinkRecord>,
}

/// Mutations fed by the external topology source (static config, SNMP
/// poller, SDN controller). The core only exposes the interface; it never
/// discovers topology on its own.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum TopologyCommand {
    /// Insert a directed edge. The link key is resolved to a stable id,
    /// minting one on first sight; the given attributes overwrite whatever
    /// the registry currently holds for that id.
    AddEdge {
        from: NodeAddress,
        to: NodeAddress,
        key: LinkKey,
        max_rate: Option<f64>,
        desc: Option<String>,
    },
    /// Overwrite the attributes of an already-issued link id.
    UpdateLink {
        id: LinkId,
        max_rate: Option<f64>,
        desc: Option<String>,
    },
    /// Delete one specific directed edge.
    RemoveEdge {
        from: NodeAddress,
        to: NodeAddress,
        id: LinkId,
    },
    /// Retire a link entirely: drop every edge labeled with it and forget
    /// its registry entry.
    RemoveLink { id: LinkId },
}

/// Acknowledgement of a topology mutation. `link` carries the current
/// record for AddEdge/UpdateLink (so the caller learns the minted id);
/// removals ack with `None`.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct TopologyInfoResponse {
    pub link: Option<LinkRecord>,
}
