//! Tests for location insertion, lookup and removal

use super::*;
use crate::Error;
use std::sync::Arc;

#[test]
fn test_insert_keeps_name_then_county_order() {
    let index = create_test_registry();

    let keys: Vec<(&str, u32)> = index.iter().map(|l| (l.name(), l.county())).collect();
    assert_eq!(
        keys,
        vec![
            ("Bergen", 12),
            ("Blindern", 3),
            ("Springfield", 3),
            ("Springfield", 12),
            ("Tromsø", 19),
        ]
    );
    assert!(index.is_sorted());
}

#[test]
fn test_insert_rejects_duplicate_key() {
    let mut index = create_test_registry();

    let result = index.insert(Location::new("Blindern", 3).unwrap());

    assert!(matches!(result, Err(Error::DuplicateKey { .. })));
    assert_eq!(index.len(), 5);
    // The original keeps its observations
    let blindern = index.find_by_name_and_county("Blindern", 3).unwrap().unwrap();
    assert_eq!(blindern.observations().len(), 3);
}

#[test]
fn test_same_name_in_different_counties() {
    let index = create_test_registry();

    let hordaland = index.find_by_name_and_county("Springfield", 12).unwrap().unwrap();
    let oslo = index.find_by_name_and_county("Springfield", 3).unwrap().unwrap();

    assert_eq!(hordaland.county(), 12);
    assert_eq!(hordaland.observations().len(), 3);
    assert_eq!(oslo.county(), 3);
    assert_eq!(oslo.observations().len(), 2);

    assert!(index.find_by_name_and_county("Springfield", 19).unwrap().is_none());
}

#[test]
fn test_lookup_is_case_sensitive() {
    let index = create_test_registry();

    assert!(index.find_by_name_and_county("blindern", 3).unwrap().is_none());
    assert!(index.find_by_name_and_county("BLINDERN", 3).unwrap().is_none());
    assert!(index.find_by_name_and_county("Blindern", 3).unwrap().is_some());
}

#[test]
fn test_blank_name_is_invalid_argument() {
    let index = create_test_registry();

    assert!(matches!(
        index.find_by_name_and_county("", 3),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(index.find_by_name(""), Err(Error::InvalidArgument { .. })));
    assert!(matches!(
        index.find_by_name_and_county("   ", 3),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(index.find_by_name("\t"), Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_find_by_name_returns_every_county() {
    let index = create_test_registry();

    let springfields = index.find_by_name("Springfield").unwrap();
    let counties: Vec<u32> = springfields.iter().map(|l| l.county()).collect();
    assert_eq!(counties, vec![3, 12]);

    assert_eq!(index.find_by_name("Bergen").unwrap().len(), 1);
    assert!(index.find_by_name("Stavanger").unwrap().is_empty());
}

#[test]
fn test_found_location_records_observations() {
    let index = create_test_registry();

    let bergen = index.find_by_name_and_county("Bergen", 12).unwrap().unwrap();
    bergen
        .add_observation(Observation::new(2010, 7, 2, 14.0, 10.0, 18.0, 30.0).unwrap())
        .unwrap();

    let bergen = index.find_by_name_and_county("Bergen", 12).unwrap().unwrap();
    assert_eq!(bergen.observations().len(), 2);
    assert_eq!(index.observation_count(), 13);
}

#[test]
fn test_filtered_view_shares_locations_with_source() {
    let index = create_test_registry();
    let view = index.filter_by_county(12);

    let in_source = index.find_by_name_and_county("Bergen", 12).unwrap().unwrap();
    in_source
        .add_observation(Observation::new(2010, 7, 2, 14.0, 10.0, 18.0, 30.0).unwrap())
        .unwrap();

    let in_view = view.find_by_name_and_county("Bergen", 12).unwrap().unwrap();
    assert!(Arc::ptr_eq(in_view, in_source));
    assert_eq!(in_view.observations().len(), 2);

    // Additions through the view reach the source as well
    in_view
        .add_observation(Observation::new(2010, 7, 3, 13.0, 9.0, 17.0, 0.0).unwrap())
        .unwrap();
    assert_eq!(in_source.observations().len(), 3);
}

#[test]
fn test_remove_discards_location() {
    let mut index = create_test_registry();
    let total = index.observation_count();

    let key = Location::new("Springfield", 12).unwrap();
    let removed = index.remove(&key).unwrap();

    assert_eq!(removed.observations().len(), 3);
    assert_eq!(index.len(), 4);
    assert_eq!(index.observation_count(), total - 3);
    assert!(index.find_by_name_and_county("Springfield", 12).unwrap().is_none());
    assert!(index.find_by_name_and_county("Springfield", 3).unwrap().is_some());
    assert!(index.is_sorted());

    assert!(index.remove(&key).is_none());
}

#[test]
fn test_sort_is_idempotent() {
    let mut index = create_test_registry();
    let before: Vec<Arc<Location>> = index.iter().cloned().collect();

    index.sort();

    assert!(before.iter().zip(index.iter()).all(|(a, b)| Arc::ptr_eq(a, b)));
}
