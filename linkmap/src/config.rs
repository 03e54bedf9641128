// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::utils::Config;
use linkmap_network::transport;
use linkmap_types::base_types::*;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(test)]
#[path = "unit_tests/config_tests.rs"]
mod config_tests;

/// Runtime settings of the path mapping service.
#[derive(Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub buffer_size: usize,
    pub send_timeout: Duration,
    pub recv_timeout: Duration,
    /// Soft ceiling on a single path resolution, in milliseconds. Absent
    /// means no deadline guard.
    pub resolve_deadline_ms: Option<u64>,

    #[serde(skip)]
    config_path: PathBuf,
}

impl ServiceConfig {
    pub fn resolve_deadline(&self) -> Option<Duration> {
        self.resolve_deadline_ms.map(Duration::from_millis)
    }
}

impl Config for ServiceConfig {
    fn create(path: &Path) -> Result<Self, anyhow::Error> {
        Ok(ServiceConfig {
            host: "0.0.0.0".to_string(),
            port: 9500,
            buffer_size: transport::DEFAULT_MAX_DATAGRAM_SIZE.to_string().parse()?,
            send_timeout: Duration::from_micros(4000000),
            recv_timeout: Duration::from_micros(4000000),
            resolve_deadline_ms: None,
            config_path: path.to_path_buf(),
        })
    }

    fn set_config_path(&mut self, path: &Path) {
        self.config_path = path.to_path_buf();
    }

    fn config_path(&self) -> &Path {
        &self.config_path
    }
}

impl Display for ServiceConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Config path : {:?}\nListen address : {}:{}",
            self.config_path, self.host, self.port
        )
    }
}

/// One edge of a topology preload file: the external topology source's
/// view of a directed link between two endpoints.
#[derive(Serialize, Deserialize)]
pub struct TopologyEntry {
    pub from: NodeAddress,
    pub to: NodeAddress,
    pub key: LinkKey,
    pub max_rate: Option<f64>,
    pub desc: Option<String>,
}

/// An optional set of edges applied through the façade at server start.
/// This is an operator convenience, not a persistence layer: the service
/// itself never writes topology state back.
#[derive(Serialize, Deserialize)]
pub struct TopologyConfig {
    pub edges: Vec<TopologyEntry>,

    #[serde(skip)]
    config_path: PathBuf,
}

impl Config for TopologyConfig {
    fn create(path: &Path) -> Result<Self, anyhow::Error> {
        Ok(TopologyConfig {
            edges: Vec::new(),
            config_path: path.to_path_buf(),
        })
    }

    fn set_config_path(&mut self, path: &Path) {
        self.config_path = path.to_path_buf();
    }

    fn config_path(&self) -> &Path {
        &self.config_path
    }
}
