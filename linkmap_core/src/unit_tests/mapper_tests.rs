// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use linkmap_types::error::LinkMapError;
use std::sync::Arc;

fn node(address: &str) -> NodeAddress {
    NodeAddress::from(address)
}

fn key(k: &str) -> LinkKey {
    LinkKey::from(k)
}

#[test]
fn test_planner_scenario() {
    let state = PathMapperState::default();
    let l1 = state
        .add_edge(node("A"), node("B"), &key("k1"), Some(1000.0), None)
        .unwrap();
    let l2 = state
        .add_edge(
            node("B"),
            node("C"),
            &key("k2"),
            Some(500.0),
            Some("core-link".to_string()),
        )
        .unwrap();

    let path = state.find_path(&node("A"), &node("C")).unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(path[0].id, l1.id);
    assert_eq!(path[0].max_rate, Some(1000.0));
    assert_eq!(path[1].id, l2.id);
    assert_eq!(path[1].max_rate, Some(500.0));
    assert_eq!(path[1].desc.as_deref(), Some("core-link"));

    assert_eq!(
        state.find_path(&node("C"), &node("A")),
        Err(LinkMapError::PathNotFound {
            from: node("C"),
            to: node("A"),
        })
    );
}

#[test]
fn test_attribute_freshness() {
    let state = PathMapperState::default();
    let record = state
        .add_edge(node("A"), node("B"), &key("k1"), Some(1000.0), None)
        .unwrap();

    let before = state.find_path(&node("A"), &node("B")).unwrap();
    assert_eq!(before[0].max_rate, Some(1000.0));

    state.update_link(record.id, Some(500.0), None).unwrap();

    // The same id now reports the new rate: attributes are read from the
    // registry at query time, not captured at graph-edit time.
    let after = state.find_path(&node("A"), &node("B")).unwrap();
    assert_eq!(after[0].id, record.id);
    assert_eq!(after[0].max_rate, Some(500.0));
}

#[test]
fn test_add_edge_reuses_stable_id() {
    let state = PathMapperState::default();
    let first = state
        .add_edge(node("A"), node("B"), &key("k1"), None, None)
        .unwrap();
    // Same physical link reported again for another node pair.
    let second = state
        .add_edge(node("B"), node("C"), &key("k1"), Some(200.0), None)
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(state.link_count(), 1);

    // Two queries traversing the same physical link report the same id.
    let ab = state.find_path(&node("A"), &node("B")).unwrap();
    let bc = state.find_path(&node("B"), &node("C")).unwrap();
    assert_eq!(ab[0].id, bc[0].id);
}

#[test]
fn test_add_edge_with_bad_rate_changes_nothing() {
    let state = PathMapperState::default();
    let result = state.add_edge(node("A"), node("B"), &key("k1"), Some(-5.0), None);
    assert_eq!(result, Err(LinkMapError::InvalidRate { value: -5.0 }));
    assert_eq!(state.node_count(), 0);
    assert_eq!(state.link_count(), 0);
}

#[test]
fn test_degenerate_query_succeeds_empty() {
    let state = PathMapperState::default();
    state
        .add_edge(node("A"), node("B"), &key("k1"), None, None)
        .unwrap();
    let response = state
        .handle_path_query(PathRequest {
            from: node("A"),
            to: node("A"),
        })
        .unwrap();
    assert!(response.links.is_empty());
}

#[test]
fn test_unbounded_link_reports_absent_rate() {
    let state = PathMapperState::default();
    state
        .add_edge(node("A"), node("B"), &key("k1"), None, None)
        .unwrap();
    let path = state.find_path(&node("A"), &node("B")).unwrap();
    // Absent means unbounded, never zero.
    assert_eq!(path[0].max_rate, None);
}

#[test]
fn test_remove_edge_leaves_link_issued() {
    let state = PathMapperState::default();
    let record = state
        .add_edge(node("A"), node("B"), &key("k1"), Some(100.0), None)
        .unwrap();
    state.remove_edge(&node("A"), &node("B"), record.id).unwrap();

    assert!(state.find_path(&node("A"), &node("B")).is_err());
    // The identity survives for other edges or a later re-add.
    assert_eq!(state.link_count(), 1);
    assert!(state.update_link(record.id, Some(50.0), None).is_ok());
}

#[test]
fn test_remove_link_purges_topology() {
    let state = PathMapperState::default();
    let record = state
        .add_edge(node("A"), node("B"), &key("k1"), None, None)
        .unwrap();
    state
        .add_edge(node("B"), node("C"), &key("k2"), None, None)
        .unwrap();

    state.remove_link(record.id).unwrap();

    // No resolution references the retired link anymore.
    assert_eq!(
        state.find_path(&node("A"), &node("C")),
        Err(LinkMapError::PathNotFound {
            from: node("A"),
            to: node("C"),
        })
    );
    assert_eq!(
        state.update_link(record.id, None, None),
        Err(LinkMapError::UnknownLink { id: record.id })
    );
    assert_eq!(state.link_count(), 1);
}

#[test]
fn test_handle_topology_command_acks() {
    let state = PathMapperState::default();
    let ack = state
        .handle_topology_command(TopologyCommand::AddEdge {
            from: node("A"),
            to: node("B"),
            key: key("k1"),
            max_rate: Some(750.0),
            desc: None,
        })
        .unwrap();
    let record = ack.link.unwrap();
    assert_eq!(record.max_rate, Some(750.0));

    let ack = state
        .handle_topology_command(TopologyCommand::RemoveLink { id: record.id })
        .unwrap();
    assert_eq!(ack.link, None);
}

#[test]
fn test_concurrent_queries_and_edits() {
    let state = Arc::new(PathMapperState::default());
    let record = state
        .add_edge(node("A"), node("B"), &key("k1"), Some(1.0), None)
        .unwrap();

    let writer = {
        let state = state.clone();
        std::thread::spawn(move || {
            for i in 0..1000u32 {
                state
                    .update_link(record.id, Some(f64::from(i)), None)
                    .unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let state = state.clone();
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let path = state.find_path(&node("A"), &node("B")).unwrap();
                    // Every read sees a fully written attribute record.
                    assert_eq!(path[0].id, record.id);
                    assert!(path[0].max_rate.unwrap() >= 0.0);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
