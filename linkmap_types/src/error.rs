// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::base_types::{LinkId, NodeAddress};
use serde::{Deserialize, Serialize};

#[macro_export]
macro_rules! lm_bail {
    ($e:expr) => {
        return Err($e)
    };
}

#[macro_export(local_inner_macros)]
macro_rules! lm_ensure {
    ($cond:expr, $e:expr) => {
        if !($cond) {
            lm_bail!($e);
        }
    };
}

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize, Error)]
/// Custom error type for the link mapping service.
pub enum LinkMapError {
    // Path resolution outcomes. Not-found is an expected answer the
    // planner relies on (it reads it as "unlimited bandwidth"), not a fault.
    #[error("No route from {from} to {to}")]
    PathNotFound { from: NodeAddress, to: NodeAddress },
    #[error("Address {address} is not present in the topology")]
    UnknownNodeAddress { address: NodeAddress },
    #[error("Path resolution from {from} to {to} exceeded its deadline")]
    ResolutionTimeout { from: NodeAddress, to: NodeAddress },

    // Topology mutation faults
    #[error("Unknown link id: {id}")]
    UnknownLink { id: LinkId },
    #[error("Invalid max_rate {value}: must be a finite, non-negative number")]
    InvalidRate { value: f64 },
    #[error("Cannot parse link id: {value}")]
    InvalidLinkId { value: String },

    // Network interaction
    #[error("Network error while querying service: {:?}.", error)]
    ClientIoError { error: String },
    #[error("Cannot deserialize.")]
    InvalidDecoding,
    #[error("Unexpected message.")]
    UnexpectedMessage,
}

pub type LinkMapResult<T = ()> = Result<T, LinkMapError>;

impl LinkMapError {
    /// True for the "no known path" outcomes. Consumers are documented to
    /// treat these as "assume unlimited bandwidth between the endpoints"
    /// rather than as a server failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LinkMapError::PathNotFound { .. } | LinkMapError::UnknownNodeAddress { .. }
        )
    }
}
