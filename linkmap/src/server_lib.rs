// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::config::TopologyConfig;
use linkmap_core::mapper::PathMapperState;
use linkmap_network::transport::*;
use linkmap_types::error::*;
use linkmap_types::serialize::*;

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::*;

pub struct Server {
    base_address: String,
    base_port: u16,
    state: PathMapperState,
    buffer_size: usize,
    // Stats
    packets_processed: AtomicUsize,
    user_errors: AtomicUsize,
}

impl Server {
    pub fn new(
        base_address: String,
        base_port: u16,
        state: PathMapperState,
        buffer_size: usize,
    ) -> Self {
        Self {
            base_address,
            base_port,
            state,
            buffer_size,
            packets_processed: AtomicUsize::new(0),
            user_errors: AtomicUsize::new(0),
        }
    }

    pub fn packets_processed(&self) -> usize {
        self.packets_processed.load(Ordering::Relaxed)
    }

    pub fn user_errors(&self) -> usize {
        self.user_errors.load(Ordering::Relaxed)
    }

    /// Feed a topology preload file through the façade, edge by edge.
    pub fn preload_topology(&self, topology: &TopologyConfig) -> LinkMapResult {
        for entry in &topology.edges {
            let record = self.state.add_edge(
                entry.from.clone(),
                entry.to.clone(),
                &entry.key,
                entry.max_rate,
                entry.desc.clone(),
            )?;
            debug!(
                "Preloaded edge {} -> {} via link {}",
                entry.from, entry.to, record.id
            );
        }
        info!(
            "Topology preloaded: {} node(s), {} link(s)",
            self.state.node_count(),
            self.state.link_count()
        );
        Ok(())
    }

    pub async fn spawn(self) -> Result<SpawnedServer, io::Error> {
        info!(
            "Listening to TCP traffic on {}:{}",
            self.base_address, self.base_port
        );
        let address = format!("{}:{}", self.base_address, self.base_port);
        let buffer_size = self.buffer_size;
        let state = RunningServerState { server: self };

        spawn_server(&address, state, buffer_size).await
    }
}

struct RunningServerState {
    server: Server,
}

impl MessageHandler for RunningServerState {
    fn handle_message<'a>(
        &'a self,
        buffer: &'a [u8],
    ) -> futures::future::BoxFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move {
            let result = deserialize_message(buffer);
            let reply = match result {
                Err(_) => Err(LinkMapError::InvalidDecoding),
                Ok(result) => match result {
                    SerializedMessage::PathReq(message) => self
                        .server
                        .state
                        .handle_path_query(*message)
                        .map(|response| serialize_path_response(&response)),
                    SerializedMessage::TopologyCmd(message) => self
                        .server
                        .state
                        .handle_topology_command(*message)
                        .map(|response| serialize_topology_response(&response)),
                    _ => Err(LinkMapError::UnexpectedMessage),
                },
            };

            self.server
                .packets_processed
                .fetch_add(1, Ordering::Relaxed);

            if self.server.packets_processed() % 5000 == 0 {
                info!(
                    "{}:{} has processed {} packets",
                    self.server.base_address,
                    self.server.base_port,
                    self.server.packets_processed()
                );
            }

            match reply {
                Ok(response) => Some(response),
                Err(error) => {
                    // Not-found is an expected answer the planner turns
                    // into "unlimited bandwidth", not a caller fault.
                    if error.is_not_found() {
                        debug!("No path for query: {}", error);
                    } else {
                        warn!("User query failed: {}", error);
                        self.server.user_errors.fetch_add(1, Ordering::Relaxed);
                    }
                    Some(serialize_error(&error))
                }
            }
        })
    }
}
