// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use linkmap_types::base_types::*;
use linkmap_types::error::{LinkMapError, LinkMapResult};
use linkmap_types::{lm_bail, lm_ensure};
use std::collections::HashMap;
use tracing::debug;

#[cfg(test)]
#[path = "unit_tests/registry_tests.rs"]
mod registry_tests;

/// Owns the set of known links. Identity is an indirection: the public
/// `LinkId` is a key into a mutable attribute record, so edges never carry
/// attribute copies and queries always see the current values.
///
/// Ids are minted once per link key and never change afterwards; retired
/// ids are never reissued.
pub struct LinkRegistry {
    /// Stable id issued per topology-source link key.
    ids: HashMap<LinkKey, LinkId>,
    /// Current attributes per issued id.
    attributes: HashMap<LinkId, LinkAttributes>,
}

/// Reject a malformed rate before it can enter the registry. Stored rates
/// are always finite and non-negative, or absent (meaning unbounded).
pub fn check_rate(max_rate: Option<f64>) -> LinkMapResult<()> {
    if let Some(value) = max_rate {
        lm_ensure!(
            value.is_finite() && value >= 0.0,
            LinkMapError::InvalidRate { value }
        );
    }
    Ok(())
}

impl LinkRegistry {
    pub fn new() -> Self {
        LinkRegistry {
            ids: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    /// Return the stable id for `key`, minting a fresh one on first sight.
    /// Idempotent: repeated calls with the same key always return the same
    /// id. A newly minted link starts with empty (unbounded) attributes.
    pub fn resolve_or_create(&mut self, key: &LinkKey) -> LinkId {
        if let Some(id) = self.ids.get(key) {
            return *id;
        }
        let id = LinkId::random();
        debug!("Issued link id {} for key {}", id, key);
        self.ids.insert(key.clone(), id);
        self.attributes.insert(id, LinkAttributes::default());
        id
    }

    /// Overwrite both attributes of an issued link. All-or-nothing: the
    /// rate is validated before any state is touched.
    pub fn set_attributes(
        &mut self,
        id: LinkId,
        max_rate: Option<f64>,
        desc: Option<String>,
    ) -> LinkMapResult<()> {
        check_rate(max_rate)?;
        match self.attributes.get_mut(&id) {
            Some(attributes) => {
                *attributes = LinkAttributes { max_rate, desc };
                Ok(())
            }
            None => Err(LinkMapError::UnknownLink { id }),
        }
    }

    pub fn get(&self, id: LinkId) -> LinkMapResult<&LinkAttributes> {
        self.attributes
            .get(&id)
            .ok_or(LinkMapError::UnknownLink { id })
    }

    /// Copy-out form of a link: callers that already hold a record are
    /// unaffected by later edits or retirement.
    pub fn record(&self, id: LinkId) -> LinkMapResult<LinkRecord> {
        Ok(LinkRecord::new(id, self.get(id)?))
    }

    /// Retire a link. Subsequent `get`/`record` calls fail, and the key
    /// binding is dropped so the key would mint a fresh id if re-added.
    pub fn remove(&mut self, id: LinkId) -> LinkMapResult<()> {
        if self.attributes.remove(&id).is_none() {
            lm_bail!(LinkMapError::UnknownLink { id });
        }
        self.ids.retain(|_, issued| *issued != id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}
