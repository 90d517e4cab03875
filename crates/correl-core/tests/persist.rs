// File: crates/correl-core/tests/persist.rs
// Purpose: Round-trip the two-column correlation format and reject bad files.

use correl_core::persist::{load_pointers, save_pointers};
use correl_core::{AnchorPoint, CorrelError, CorrespondenceSet};
use std::path::PathBuf;

fn out_path(name: &str) -> PathBuf {
    let dir = PathBuf::from("target/test_out");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn save_then_load_round_trips() {
    let mut set = CorrespondenceSet::new();
    for (a, b) in [(0.5, 12.0), (3.25, 40.0), (9.0, 41.5)] {
        set.try_add(AnchorPoint::new(a, b)).unwrap();
    }
    let path = out_path("pointers_roundtrip.csv");
    save_pointers(&path, &set).unwrap();

    let loaded = load_pointers(&path).unwrap();
    assert_eq!(loaded, set);
}

#[test]
fn non_monotonic_columns_reject_the_correlation() {
    let path = out_path("pointers_bad_order.csv");
    std::fs::write(&path, "0.0,0.0\n10.0,100.0\n20.0,50.0\n").unwrap();
    match load_pointers(&path) {
        Err(CorrelError::MalformedPersistedData { reason }) => {
            assert!(reason.contains("strictly increasing"), "reason was: {reason}");
        }
        other => panic!("expected MalformedPersistedData, got {other:?}"),
    }
}

#[test]
fn non_numeric_field_rejects_the_correlation() {
    let path = out_path("pointers_bad_field.csv");
    std::fs::write(&path, "0.0,0.0\nten,100.0\n").unwrap();
    assert!(matches!(
        load_pointers(&path),
        Err(CorrelError::MalformedPersistedData { .. })
    ));
}

#[test]
fn short_row_rejects_the_correlation() {
    let path = out_path("pointers_short_row.csv");
    std::fs::write(&path, "0.0,0.0\n10.0\n").unwrap();
    assert!(matches!(
        load_pointers(&path),
        Err(CorrelError::MalformedPersistedData { .. })
    ));
}

#[test]
fn empty_file_loads_an_empty_set() {
    let path = out_path("pointers_empty.csv");
    std::fs::write(&path, "").unwrap();
    let set = load_pointers(&path).unwrap();
    assert!(set.is_empty());
}
