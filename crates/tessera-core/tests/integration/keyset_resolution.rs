//! Keyset → primitive set resolution: status filtering, primary selection,
//! prefix buckets and keyset-level failures.

use super::support::{
    handle, key, new_key_data, populated_registry, tag_of, tink_key, DUMMY_MAC, MAC2,
};
use tessera_core::{
    CryptoError, Entry, KeyStatusType, KeysetHandle, Keyset, Mac, OutputPrefixType, Registry,
    TINK_START_BYTE,
};

#[test]
fn primary_is_the_enabled_key_named_by_primary_id() {
    let registry = populated_registry();
    let key1 = new_key_data(&registry, DUMMY_MAC);
    let key2 = new_key_data(&registry, DUMMY_MAC);
    let key3 = new_key_data(&registry, MAC2);

    let keyset = handle(
        2,
        vec![
            tink_key(1, &key1, KeyStatusType::Enabled),
            tink_key(2, &key2, KeyStatusType::Enabled),
            tink_key(3, &key3, KeyStatusType::Enabled),
        ],
    );
    let mac_set = registry.primitive_set::<dyn Mac>(&keyset).unwrap();
    assert_eq!(mac_set.primary().key_id(), 2);
    assert_eq!(tag_of(mac_set.primary().primitive()), DUMMY_MAC);
    assert_eq!(mac_set.len(), 3);
}

#[test]
fn non_enabled_keys_get_no_entry() {
    let registry = populated_registry();
    let key1 = new_key_data(&registry, DUMMY_MAC);
    let key2 = new_key_data(&registry, DUMMY_MAC);
    let key3 = new_key_data(&registry, MAC2);

    let keys = vec![
        tink_key(1, &key1, KeyStatusType::Destroyed),
        tink_key(2, &key2, KeyStatusType::Disabled),
        tink_key(3, &key3, KeyStatusType::Enabled),
    ];
    let keyset = handle(3, keys.clone());
    let mac_set = registry.primitive_set::<dyn Mac>(&keyset).unwrap();

    assert_eq!(tag_of(mac_set.primary().primitive()), MAC2);
    assert_eq!(mac_set.len(), 1);
    assert!(mac_set.primitives_for_key(&keys[0]).is_empty());
    assert!(mac_set.primitives_for_key(&keys[1]).is_empty());
    assert_eq!(mac_set.primitives_for_key(&keys[2]).len(), 1);
}

#[test]
fn primary_follows_status_changes() {
    let registry = populated_registry();
    let mac_a = new_key_data(&registry, DUMMY_MAC);
    let mac_b = new_key_data(&registry, MAC2);

    let before = handle(
        2,
        vec![
            tink_key(1, &mac_a, KeyStatusType::Enabled),
            tink_key(2, &mac_b, KeyStatusType::Enabled),
        ],
    );
    let set = registry.primitive_set::<dyn Mac>(&before).unwrap();
    assert_eq!(set.primary().key_id(), 2);

    let keys = vec![
        tink_key(1, &mac_a, KeyStatusType::Enabled),
        tink_key(2, &mac_b, KeyStatusType::Disabled),
        tink_key(3, &mac_a, KeyStatusType::Enabled),
    ];
    let after = handle(3, keys.clone());
    let set = registry.primitive_set::<dyn Mac>(&after).unwrap();
    assert_eq!(set.primary().key_id(), 3);
    assert_eq!(set.primitives_for_key(&keys[0]).len(), 1);
    assert!(set.primitives_for_key(&keys[1]).is_empty());
}

#[test]
fn empty_keyset_fails_regardless_of_registry() {
    for registry in [Registry::new(), populated_registry()] {
        let err = registry
            .primitive_set::<dyn Mac>(&KeysetHandle::new(Keyset::default()))
            .expect_err("empty keyset should fail");
        assert!(matches!(err, CryptoError::EmptyKeyset));
        assert!(err.to_string().contains("empty keyset"));
    }
}

#[test]
fn missing_primary_fails() {
    let registry = populated_registry();
    let key1 = new_key_data(&registry, DUMMY_MAC);

    // Primary id left unset.
    let keyset = KeysetHandle::new(Keyset {
        keys: vec![tink_key(1, &key1, KeyStatusType::Enabled)],
        ..Keyset::default()
    });
    let err = registry
        .primitive_set::<dyn Mac>(&keyset)
        .expect_err("keyset without primary should fail");
    assert!(matches!(err, CryptoError::InvalidPrimaryKey));
    assert!(err
        .to_string()
        .contains("keyset doesn't contain a valid primary key"));

    // Primary id names no key.
    let keyset = handle(9, vec![tink_key(1, &key1, KeyStatusType::Enabled)]);
    let err = registry
        .primitive_set::<dyn Mac>(&keyset)
        .expect_err("dangling primary should fail");
    assert!(matches!(err, CryptoError::InvalidPrimaryKey));
}

#[test]
fn disabled_primary_fails() {
    let registry = populated_registry();
    let key1 = new_key_data(&registry, DUMMY_MAC);
    for status in [
        KeyStatusType::Disabled,
        KeyStatusType::Destroyed,
        KeyStatusType::Unknown,
    ] {
        let keyset = handle(1, vec![tink_key(1, &key1, status)]);
        let err = registry
            .primitive_set::<dyn Mac>(&keyset)
            .expect_err("non-enabled primary should fail");
        assert!(matches!(err, CryptoError::InvalidPrimaryKey));
    }
}

#[test]
fn raw_keys_share_the_empty_prefix_in_keyset_order() {
    let registry = populated_registry();
    let mac_a = new_key_data(&registry, DUMMY_MAC);
    let mac_b = new_key_data(&registry, MAC2);

    let keys = vec![
        key(5, &mac_b, KeyStatusType::Enabled, OutputPrefixType::Raw),
        key(1, &mac_a, KeyStatusType::Enabled, OutputPrefixType::Tink),
        key(4, &mac_a, KeyStatusType::Enabled, OutputPrefixType::Raw),
    ];
    let set = registry.primitive_set::<dyn Mac>(&handle(1, keys.clone())).unwrap();

    let raw_ids: Vec<u32> = set.raw_primitives().iter().map(Entry::key_id).collect();
    assert_eq!(raw_ids, vec![5, 4]);
    assert_eq!(set.primitives_for_prefix(&[]).len(), 2);
    assert_eq!(set.primitives_for_key(&keys[0]).len(), 2);
    assert_eq!(tag_of(set.raw_primitives()[0].primitive()), MAC2);
    assert_eq!(tag_of(set.raw_primitives()[1].primitive()), DUMMY_MAC);
}

#[test]
fn entries_carry_key_metadata_and_prefix() {
    let registry = populated_registry();
    let mac_a = new_key_data(&registry, DUMMY_MAC);
    let keys = vec![
        key(0x0102_0304, &mac_a, KeyStatusType::Enabled, OutputPrefixType::Tink),
        key(7, &mac_a, KeyStatusType::Enabled, OutputPrefixType::Legacy),
        key(8, &mac_a, KeyStatusType::Enabled, OutputPrefixType::Crunchy),
    ];
    let set = registry
        .primitive_set::<dyn Mac>(&handle(0x0102_0304, keys))
        .unwrap();

    let primary = set.primary();
    assert_eq!(primary.status(), KeyStatusType::Enabled);
    assert_eq!(primary.output_prefix_type(), OutputPrefixType::Tink);
    assert_eq!(
        primary.identifier(),
        &[TINK_START_BYTE, 0x01, 0x02, 0x03, 0x04]
    );

    let legacy = set.primitives_for_prefix(&[0x00, 0, 0, 0, 7]);
    assert_eq!(legacy.len(), 1);
    assert_eq!(legacy[0].output_prefix_type(), OutputPrefixType::Legacy);

    let crunchy = set.primitives_for_prefix(&[0x00, 0, 0, 0, 8]);
    assert_eq!(crunchy.len(), 1);
    assert_eq!(crunchy[0].output_prefix_type(), OutputPrefixType::Crunchy);

    let ids: Vec<u32> = set.entries().map(Entry::key_id).collect();
    assert_eq!(ids, vec![0x0102_0304, 7, 8]);
}

#[test]
fn end_to_end_mac_a_mac_b() {
    let registry = Registry::new();
    registry
        .register_key_manager("MacA", super::support::mac_manager_named("MacA"))
        .unwrap();
    registry
        .register_key_manager("MacB", super::support::mac_manager_named("MacB"))
        .unwrap();
    let mac_a = new_key_data(&registry, "MacA");
    let mac_b = new_key_data(&registry, "MacB");

    let keys = vec![
        tink_key(1, &mac_a, KeyStatusType::Enabled),
        tink_key(2, &mac_a, KeyStatusType::Enabled),
        tink_key(3, &mac_b, KeyStatusType::Enabled),
    ];
    let set = registry.primitive_set::<dyn Mac>(&handle(2, keys.clone())).unwrap();

    assert_eq!(set.primary().key_id(), 2);
    assert_eq!(tag_of(set.primary().primitive()), "MacA");

    let for_key1 = set.primitives_for_key(&keys[0]);
    assert_eq!(for_key1.len(), 1);
    assert_eq!(for_key1[0].key_id(), 1);
    assert_eq!(tag_of(for_key1[0].primitive()), "MacA");

    let for_key3 = set.primitives_for_key(&keys[2]);
    assert_eq!(for_key3.len(), 1);
    assert_eq!(for_key3[0].key_id(), 3);
    assert_eq!(tag_of(for_key3[0].primitive()), "MacB");
}
