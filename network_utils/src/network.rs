// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::transport::*;
use linkmap_types::error::*;
use linkmap_types::messages::*;
use linkmap_types::serialize::*;

use std::io;
use tokio::time;
use tracing::debug;

/// A client for one path mapping service endpoint. Cheap to clone; each
/// request opens its own connection, so concurrent callers never share a
/// stream.
#[derive(Clone, Debug)]
pub struct NetworkClient {
    base_address: String,
    base_port: u16,
    buffer_size: usize,
    send_timeout: std::time::Duration,
    recv_timeout: std::time::Duration,
}

impl NetworkClient {
    pub fn new(
        base_address: String,
        base_port: u16,
        buffer_size: usize,
        send_timeout: std::time::Duration,
        recv_timeout: std::time::Duration,
    ) -> Self {
        NetworkClient {
            base_address,
            base_port,
            buffer_size,
            send_timeout,
            recv_timeout,
        }
    }

    async fn send_recv_bytes_internal(&self, buf: Vec<u8>) -> Result<Option<Vec<u8>>, io::Error> {
        let address = format!("{}:{}", self.base_address, self.base_port);
        let mut stream = connect(address, self.buffer_size).await?;
        // Send message
        time::timeout(self.send_timeout, stream.write_data(&buf)).await??;
        // Wait for reply
        time::timeout(self.recv_timeout, async {
            stream.read_data().await.map(Some)
        })
        .await?
    }

    pub async fn send_recv_bytes(&self, buf: Vec<u8>) -> Result<SerializedMessage, LinkMapError> {
        match self.send_recv_bytes_internal(buf).await {
            Err(error) => Err(LinkMapError::ClientIoError {
                error: format!("{error}"),
            }),
            Ok(Some(response)) => {
                // Parse reply
                match deserialize_message(&response[..]) {
                    Ok(SerializedMessage::Error(error)) => Err(*error),
                    Ok(message) => Ok(message),
                    Err(_) => Err(LinkMapError::InvalidDecoding),
                }
            }
            Ok(None) => Err(LinkMapError::ClientIoError {
                error: "Empty response".to_string(),
            }),
        }
    }

    /// Ask which links a transfer from `from` to `to` must cross. A
    /// not-found error comes back as-is so the planner can apply its
    /// "assume unlimited bandwidth" interpretation.
    pub async fn query_path(&self, request: PathRequest) -> Result<PathResponse, LinkMapError> {
        debug!("Querying path {} -> {}", request.from, request.to);
        let message = self
            .send_recv_bytes(serialize_path_request(&request))
            .await?;
        match message {
            SerializedMessage::PathResp(response) => Ok(*response),
            _ => Err(LinkMapError::UnexpectedMessage),
        }
    }

    /// Apply one topology mutation on the service.
    pub async fn topology_command(
        &self,
        command: TopologyCommand,
    ) -> Result<TopologyInfoResponse, LinkMapError> {
        let message = self
            .send_recv_bytes(serialize_topology_command(&command))
            .await?;
        match message {
            SerializedMessage::TopologyResp(response) => Ok(*response),
            _ => Err(LinkMapError::UnexpectedMessage),
        }
    }
}
