// File: crates/correl-core/tests/apply.rs
// Purpose: Validate derived-item operations (filter, sample, interpolate)
// and their provenance records.

use correl_core::apply::{filter_series, interpolate_series, sample_series, save_interpolation};
use correl_core::{
    AnchorPoint, CorrespondenceSet, InterpKind, Item, ItemPayload, MappingMode, Registry,
    SampleParams, Series, SeriesProvenance,
};

fn register_raw(reg: &mut Registry, points: &[(f64, f64)]) -> correl_core::ItemId {
    let item = Item::new(
        "core MD01-2444 d18O",
        ItemPayload::Series {
            series: Series::from_points(points.iter().copied()),
            provenance: SeriesProvenance::Raw,
        },
    )
    .with_labels("depth (m)", "d18O");
    reg.add_item(None, item)
}

#[test]
fn filter_registers_definition_and_trimmed_series() {
    let mut reg = Registry::new();
    let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, i as f64)).collect();
    let sid = register_raw(&mut reg, &points);

    let (filter_id, filtered_id) = filter_series(&mut reg, sid, 5).unwrap();

    assert!(matches!(
        reg.get(filter_id).unwrap().payload,
        ItemPayload::Filter { window_size: 5 }
    ));

    let filtered = reg.require_series(filtered_id).unwrap();
    // half a window trimmed on each side
    assert_eq!(filtered.len(), points.len() - 4);
    assert_eq!(filtered.domain(), Some((2.0, 7.0)));
    // moving average of a linear ramp is the ramp itself on the kept range
    for (x, y) in filtered.points() {
        assert!((y - x).abs() < 1e-12);
    }

    let item = reg.get(filtered_id).unwrap();
    assert!(item.history.contains(&filter_id.to_string()));
    assert!(item.history.contains(&sid.to_string()));
    assert_ne!(item.color, reg.get(sid).unwrap().color);
}

#[test]
fn sample_against_reference_positions() {
    let mut reg = Registry::new();
    let source = register_raw(
        &mut reg,
        &(0..=100).map(|i| (i as f64 * 0.2, (i as f64 * 0.2) * 3.0)).collect::<Vec<_>>(),
    );
    let reference = register_raw(&mut reg, &[(1.0, 0.0), (5.0, 0.0), (30.0, 0.0)]);

    let params = SampleParams::Positions {
        source_id: reference,
        kind: InterpKind::Linear,
        integrated: false,
    };
    let (sample_id, sampled_id) = sample_series(&mut reg, source, params.clone()).unwrap();

    match &reg.get(sample_id).unwrap().payload {
        ItemPayload::Sample { params: stored } => assert_eq!(stored, &params),
        other => panic!("expected SAMPLE payload, got {other:?}"),
    }

    let sampled = reg.require_series(sampled_id).unwrap();
    // 30.0 is outside the source domain [0, 20] and gets dropped
    let pos: Vec<f64> = sampled.positions().collect();
    assert_eq!(pos, vec![1.0, 5.0]);
    for (x, y) in sampled.points() {
        assert!((y - 3.0 * x).abs() < 1e-12);
    }
}

#[test]
fn interpolate_rewrites_positions_into_the_reference_axis() {
    let mut reg = Registry::new();
    // distorted series measured against axis B
    let sid = register_raw(&mut reg, &[(0.0, 1.0), (50.0, 2.0), (100.0, 3.0)]);

    let mut set = CorrespondenceSet::new();
    set.try_add(AnchorPoint::new(0.0, 0.0)).unwrap();
    set.try_add(AnchorPoint::new(10.0, 100.0)).unwrap();
    let iid = save_interpolation(&mut reg, None, &set, "age (ka)").unwrap();

    let out_id = interpolate_series(&mut reg, sid, iid, MappingMode::Linear).unwrap();
    let out = reg.require_series(out_id).unwrap();
    // b_to_a scales positions by 1/10; values ride along unchanged
    assert_eq!(out.points(), &[(0.0, 1.0), (5.0, 2.0), (10.0, 3.0)]);

    let item = reg.get(out_id).unwrap();
    assert_eq!(item.x_label, "age (ka)");
    assert!(matches!(
        item.payload,
        ItemPayload::Series { provenance: SeriesProvenance::Interpolated { mode: MappingMode::Linear }, .. }
    ));
    assert!(item.history.contains("mode Linear"));
}

#[test]
fn save_interpolation_needs_two_anchors() {
    let mut reg = Registry::new();
    let mut set = CorrespondenceSet::new();
    set.try_add(AnchorPoint::new(0.0, 0.0)).unwrap();
    assert!(save_interpolation(&mut reg, None, &set, "age").is_err());
}

#[test]
fn operations_on_missing_or_mistyped_items_fail_cleanly() {
    let mut reg = Registry::new();
    let sid = register_raw(&mut reg, &[(0.0, 0.0), (1.0, 1.0)]);
    let (filter_id, _) = filter_series(&mut reg, sid, 3).unwrap();

    // a FILTER item is not a series
    assert!(filter_series(&mut reg, filter_id, 3).is_err());
    // a series item is not an INTERPOLATION
    assert!(interpolate_series(&mut reg, sid, sid, MappingMode::Linear).is_err());
}
