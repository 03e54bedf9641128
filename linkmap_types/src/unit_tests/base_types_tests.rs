// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use std::collections::HashSet;

#[test]
fn test_link_id_hex_roundtrip() {
    let id = LinkId::random();
    let hex = id.to_hex();
    assert_eq!(hex.len(), 2 * LinkId::LENGTH);
    let parsed: LinkId = hex.parse().unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn test_link_id_display_matches_hex() {
    let id = LinkId::random();
    assert_eq!(format!("{}", id), id.to_hex());
}

#[test]
fn test_link_id_rejects_bad_input() {
    assert!("not-hex".parse::<LinkId>().is_err());
    // Wrong length, valid hex.
    assert!("abcd".parse::<LinkId>().is_err());
    assert!("".parse::<LinkId>().is_err());
}

#[test]
fn test_link_id_random_uniqueness() {
    let ids: HashSet<_> = (0..1000).map(|_| LinkId::random()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn test_link_id_serde_as_hex_string() {
    let id = LinkId::random();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", id.to_hex()));
    let back: LinkId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn test_node_address_is_opaque() {
    let a = NodeAddress::from("10.0.0.1");
    let b = NodeAddress::new("10.0.0.1".to_string());
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "10.0.0.1");
    // No format validation beyond identity: any string is a valid address.
    assert!(!NodeAddress::from("not an ip").is_empty());
}

#[test]
fn test_link_record_copies_attributes() {
    let id = LinkId::random();
    let attrs = LinkAttributes {
        max_rate: Some(500.0),
        desc: Some("core-link".to_string()),
    };
    let record = LinkRecord::new(id, &attrs);
    assert_eq!(record.id, id);
    assert_eq!(record.max_rate, Some(500.0));
    assert_eq!(record.desc.as_deref(), Some("core-link"));
}

#[test]
fn test_link_attributes_default_is_unbounded() {
    let attrs = LinkAttributes::default();
    assert_eq!(attrs.max_rate, None);
    assert_eq!(attrs.desc, None);
}
