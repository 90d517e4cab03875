// File: crates/correl-core/tests/mapping.rs
// Purpose: Validate mapping round-trips and extrapolation safety.

use correl_core::{AnchorPoint, CorrelError, CorrespondenceSet, Mapping, MappingMode};

fn set_of(pairs: &[(f64, f64)]) -> CorrespondenceSet {
    let mut set = CorrespondenceSet::new();
    for &(a, b) in pairs {
        set.try_add(AnchorPoint::new(a, b)).unwrap();
    }
    set
}

#[test]
fn linear_two_anchor_round_trip_is_exact() {
    let set = set_of(&[(0.0, 0.0), (10.0, 100.0)]);
    let map = Mapping::build(&set, MappingMode::Linear).unwrap();

    assert_eq!(map.a_to_b(5.0), 50.0);
    assert_eq!(map.b_to_a(50.0), 5.0);

    for k in 0..=100 {
        let x = k as f64; // inside [0, 100]
        let round = map.a_to_b(map.b_to_a(x));
        assert!((round - x).abs() < 1e-9, "round trip drifted at {x}: {round}");
    }
}

#[test]
fn insufficient_anchors_is_reported_not_fatal() {
    let set = set_of(&[(0.0, 0.0)]);
    match Mapping::build(&set, MappingMode::MonotonicCubic) {
        Err(CorrelError::InsufficientAnchors { have }) => assert_eq!(have, 1),
        other => panic!("expected InsufficientAnchors, got {other:?}"),
    }
}

#[test]
fn monotonic_cubic_extrapolates_with_the_boundary_secant() {
    // Identity-like anchors: the cubic must not diverge outside the domain.
    let set = set_of(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
    let map = Mapping::build(&set, MappingMode::MonotonicCubic).unwrap();

    // First segment secant slope is 1, so a_to_b(-10) continues linearly.
    assert!((map.a_to_b(-10.0) - (-10.0)).abs() < 1e-9);
    assert!((map.a_to_b(50.0) - 50.0).abs() < 1e-9);
}

#[test]
fn monotonic_cubic_stays_monotone_between_anchors() {
    let set = set_of(&[(0.0, 0.0), (1.0, 0.2), (2.0, 5.0), (3.0, 5.5), (4.0, 9.0)]);
    let map = Mapping::build(&set, MappingMode::MonotonicCubic).unwrap();
    let mut prev = map.a_to_b(0.0);
    for k in 1..=400 {
        let x = k as f64 / 100.0;
        let y = map.a_to_b(x);
        assert!(y >= prev - 1e-12, "non-monotone at {x}: {y} < {prev}");
        prev = y;
    }
}

#[test]
fn directions_are_consistent_inverses_at_anchors() {
    let set = set_of(&[(0.0, 3.0), (2.0, 8.0), (5.0, 21.0), (9.0, 30.0)]);
    for mode in [MappingMode::Linear, MappingMode::MonotonicCubic] {
        let map = Mapping::build(&set, mode).unwrap();
        for p in set.anchors() {
            assert_eq!(map.a_to_b(p.pos_a), p.pos_b);
            assert_eq!(map.b_to_a(p.pos_b), p.pos_a);
        }
    }
}
