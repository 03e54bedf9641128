// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0
use crate::error::LinkMapError;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
#[path = "unit_tests/base_types_tests.rs"]
mod base_types_tests;

/// An addressable endpoint in the network, identified by an opaque string
/// (typically an IP address). Nodes exist implicitly as topology vertices
/// and carry no attributes beyond identity.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct NodeAddress(String);

impl NodeAddress {
    pub fn new<S: Into<String>>(address: S) -> Self {
        NodeAddress(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NodeAddress {
    fn from(address: &str) -> Self {
        NodeAddress(address.to_string())
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The topology source's internal identifier for a physical link, e.g. a
/// (switch, port) pair flattened to a string. Opaque to the mapping core;
/// only ever used as a lookup key into the link registry.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct LinkKey(String);

impl LinkKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        LinkKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LinkKey {
    fn from(key: &str) -> Self {
        LinkKey(key.to_string())
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The stable public identity of a link. Once issued for a physical link it
/// never changes while that link exists in the topology, even as attributes
/// are edited. Rendered as a hex string on the wire and in client output.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Debug)]
pub struct LinkId([u8; LinkId::LENGTH]);

impl LinkId {
    pub const LENGTH: usize = 16;

    /// Mint a fresh identity. Uniqueness rests on the 128-bit random draw;
    /// stability rests on the registry that records the result.
    pub fn random() -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        OsRng.fill_bytes(&mut bytes);
        LinkId(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for LinkId {
    type Err = LinkMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| LinkMapError::InvalidLinkId {
            value: s.to_string(),
        })?;
        let arr: [u8; Self::LENGTH] = bytes.try_into().map_err(|_| LinkMapError::InvalidLinkId {
            value: s.to_string(),
        })?;
        Ok(LinkId(arr))
    }
}

impl Serialize for LinkId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for LinkId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LinkId::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// The mutable per-link record kept by the registry. `max_rate` is the
/// maximum sustainable throughput in megabits/second; `None` means the
/// link is unbounded. Stored rates are always finite and non-negative.
#[derive(PartialEq, Clone, Debug, Default, Serialize, Deserialize)]
pub struct LinkAttributes {
    pub max_rate: Option<f64>,
    pub desc: Option<String>,
}

/// The copy-out form of a link returned by path queries and mutation acks.
/// Attribute values reflect the registry state at query time, not the state
/// when the id was first issued.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: LinkId,
    pub max_rate: Option<f64>,
    pub desc: Option<String>,
}

impl LinkRecord {
    pub fn new(id: LinkId, attributes: &LinkAttributes) -> Self {
        LinkRecord {
            id,
            max_rate: attributes.max_rate,
            desc: attributes.desc.clone(),
        }
    }
}
