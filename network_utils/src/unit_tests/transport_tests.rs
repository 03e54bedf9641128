// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use super::*;

struct TestService;

impl MessageHandler for TestService {
    fn handle_message<'a>(&'a self, buffer: &'a [u8]) -> future::BoxFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move {
            // Echo, dropping empty payloads.
            if buffer.is_empty() {
                None
            } else {
                Some(buffer.to_vec())
            }
        })
    }
}

#[tokio::test]
async fn test_server_echoes_messages() {
    let server = spawn_server("127.0.0.1:0", TestService, 1024).await.unwrap();
    let address = server.local_addr().to_string();

    let mut stream = connect(address, 1024).await.unwrap();
    stream.write_data(b"hello").await.unwrap();
    let reply = stream.read_data().await.unwrap();
    assert_eq!(reply, b"hello");

    // Same stream handles repeated exchanges.
    stream.write_data(b"again").await.unwrap();
    assert_eq!(stream.read_data().await.unwrap(), b"again");

    server.kill().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_connections() {
    let server = spawn_server("127.0.0.1:0", TestService, 1024).await.unwrap();
    let address = server.local_addr().to_string();

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let address = address.clone();
            tokio::spawn(async move {
                let mut stream = connect(address, 1024).await.unwrap();
                let message = vec![i; 16];
                stream.write_data(&message).await.unwrap();
                assert_eq!(stream.read_data().await.unwrap(), message);
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    server.kill().await.unwrap();
}

#[tokio::test]
async fn test_oversized_message_is_rejected() {
    let server = spawn_server("127.0.0.1:0", TestService, 16).await.unwrap();
    let address = server.local_addr().to_string();

    let mut stream = connect(address, 1024).await.unwrap();
    // Larger than the server's buffer size: the connection is dropped
    // without a reply.
    stream.write_data(&[0u8; 64]).await.unwrap();
    assert!(stream.read_data().await.is_err());

    server.kill().await.unwrap();
}
