// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use super::messages::*;
use crate::error::*;

use anyhow::format_err;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "unit_tests/serialize_tests.rs"]
mod serialize_tests;

#[derive(Serialize, Deserialize, Debug)]
pub enum SerializedMessage {
    PathReq(Box<PathRequest>),
    PathResp(Box<PathResponse>),
    TopologyCmd(Box<TopologyCommand>),
    TopologyResp(Box<TopologyInfoResponse>),
    Error(Box<LinkMapError>),
}

// This helper structure is only here to avoid cloning while serializing
// commands. Here we must replicate the definition of SerializedMessage
// exactly so that the variant tags match.
// (Note that this relies on bincode writing identical serializations for
// Box<T> and &T)
#[allow(dead_code)]
#[derive(Serialize)]
enum ShallowSerializedMessage<'a> {
    PathReq(&'a PathRequest),
    PathResp(&'a PathResponse),
    TopologyCmd(&'a TopologyCommand),
    TopologyResp(&'a TopologyInfoResponse),
    Error(&'a LinkMapError),
}

fn serialize(msg: &ShallowSerializedMessage<'_>) -> Vec<u8> {
    let mut buf = Vec::new();
    bincode::serialize_into(&mut buf, msg)
        .expect("Serializing to a resizable buffer should not fail.");
    buf
}

fn serialize_into<W>(writer: W, msg: &ShallowSerializedMessage<'_>) -> Result<(), anyhow::Error>
where
    W: std::io::Write,
{
    bincode::serialize_into(writer, msg).map_err(|err| format_err!("{err}"))
}

pub fn serialize_path_request(value: &PathRequest) -> Vec<u8> {
    serialize(&ShallowSerializedMessage::PathReq(value))
}

pub fn serialize_path_response(value: &PathResponse) -> Vec<u8> {
    serialize(&ShallowSerializedMessage::PathResp(value))
}

pub fn serialize_topology_command(value: &TopologyCommand) -> Vec<u8> {
    serialize(&ShallowSerializedMessage::TopologyCmd(value))
}

pub fn serialize_topology_response(value: &TopologyInfoResponse) -> Vec<u8> {
    serialize(&ShallowSerializedMessage::TopologyResp(value))
}

pub fn serialize_error(value: &LinkMapError) -> Vec<u8> {
    serialize(&ShallowSerializedMessage::Error(value))
}

pub fn serialize_path_request_into<W>(writer: W, value: &PathRequest) -> Result<(), anyhow::Error>
where
    W: std::io::Write,
{
    serialize_into(writer, &ShallowSerializedMessage::PathReq(value))
}

pub fn deserialize_message<R>(reader: R) -> Result<SerializedMessage, anyhow::Error>
where
    R: std::io::Read,
{
    bincode::deserialize_from(reader).map_err(|err| format_err!("{err}"))
}

pub fn deserialize_path_response(message: SerializedMessage) -> Result<PathResponse, LinkMapError> {
    match message {
        SerializedMessage::PathResp(resp) => Ok(*resp),
        SerializedMessage::Error(error) => Err(*error),
        _ => Err(LinkMapError::UnexpectedMessage),
    }
}

pub fn deserialize_topology_response(
    message: SerializedMessage,
) -> Result<TopologyInfoResponse, LinkMapError> {
    match message {
        SerializedMessage::TopologyResp(resp) => Ok(*resp),
        SerializedMessage::Error(error) => Err(*error),
        _ => Err(LinkMapError::UnexpectedMessage),
    }
}
