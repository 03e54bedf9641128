// Copyright (c) 2021, Facebook, Inc. and its affiliates
// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_identity_stability() {
    let mut registry = LinkRegistry::new();
    let key = LinkKey::from("switch7:port3");
    let first = registry.resolve_or_create(&key);
    let second = registry.resolve_or_create(&key);
    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_distinct_keys_get_distinct_ids() {
    let mut registry = LinkRegistry::new();
    let l1 = registry.resolve_or_create(&LinkKey::from("switch7:port3"));
    let l2 = registry.resolve_or_create(&LinkKey::from("switch7:port4"));
    assert_ne!(l1, l2);
}

#[test]
fn test_new_link_is_unbounded() {
    let mut registry = LinkRegistry::new();
    let id = registry.resolve_or_create(&LinkKey::from("k"));
    let attributes = registry.get(id).unwrap();
    // Absent, never zero.
    assert_eq!(attributes.max_rate, None);
    assert_eq!(attributes.desc, None);
}

#[test]
fn test_set_attributes_overwrites() {
    let mut registry = LinkRegistry::new();
    let id = registry.resolve_or_create(&LinkKey::from("k"));
    registry
        .set_attributes(id, Some(1000.0), Some("uplink".to_string()))
        .unwrap();
    assert_eq!(registry.get(id).unwrap().max_rate, Some(1000.0));

    // A later overwrite with no rate clears it back to unbounded.
    registry.set_attributes(id, None, None).unwrap();
    let attributes = registry.get(id).unwrap();
    assert_eq!(attributes.max_rate, None);
    assert_eq!(attributes.desc, None);
}

#[test]
fn test_unknown_id_rejection_leaves_registry_unchanged() {
    let mut registry = LinkRegistry::new();
    let id = registry.resolve_or_create(&LinkKey::from("k"));
    registry
        .set_attributes(id, Some(500.0), None)
        .unwrap();

    let bogus = LinkId::random();
    let result = registry.set_attributes(bogus, Some(9000.0), None);
    assert_eq!(result, Err(LinkMapError::UnknownLink { id: bogus }));

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(id).unwrap().max_rate, Some(500.0));
}

#[test]
fn test_negative_rate_rejected_before_state_moves() {
    let mut registry = LinkRegistry::new();
    let id = registry.resolve_or_create(&LinkKey::from("k"));
    registry
        .set_attributes(id, Some(100.0), Some("old".to_string()))
        .unwrap();

    let result = registry.set_attributes(id, Some(-1.0), Some("new".to_string()));
    assert_eq!(result, Err(LinkMapError::InvalidRate { value: -1.0 }));
    assert!(registry.set_attributes(id, Some(f64::NAN), None).is_err());
    assert!(registry
        .set_attributes(id, Some(f64::INFINITY), None)
        .is_err());

    // All-or-nothing: neither attribute of the failed updates landed.
    let attributes = registry.get(id).unwrap();
    assert_eq!(attributes.max_rate, Some(100.0));
    assert_eq!(attributes.desc.as_deref(), Some("old"));
}

#[test]
fn test_zero_rate_is_valid() {
    let mut registry = LinkRegistry::new();
    let id = registry.resolve_or_create(&LinkKey::from("k"));
    registry.set_attributes(id, Some(0.0), None).unwrap();
    assert_eq!(registry.get(id).unwrap().max_rate, Some(0.0));
}

#[test]
fn test_remove_retires_id_and_key() {
    let mut registry = LinkRegistry::new();
    let key = LinkKey::from("k");
    let id = registry.resolve_or_create(&key);
    registry.remove(id).unwrap();

    assert_eq!(registry.get(id), Err(LinkMapError::UnknownLink { id }));
    assert_eq!(registry.remove(id), Err(LinkMapError::UnknownLink { id }));
    assert!(registry.is_empty());

    // The key mints a fresh identity if the link reappears.
    let reissued = registry.resolve_or_create(&key);
    assert_ne!(reissued, id);
}

#[test]
fn test_record_is_a_copy() {
    let mut registry = LinkRegistry::new();
    let id = registry.resolve_or_create(&LinkKey::from("k"));
    registry
        .set_attributes(id, Some(500.0), Some("core-link".to_string()))
        .unwrap();
    let record = registry.record(id).unwrap();

    registry.remove(id).unwrap();

    // Copy-out semantics: retirement does not affect captured records.
    assert_eq!(record.max_rate, Some(500.0));
    assert_eq!(record.desc.as_deref(), Some("core-link"));
}
