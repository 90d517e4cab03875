// File: crates/correl-core/src/apply.rs
// Summary: Registry-level operations producing derived items: filter, sample,
// and interpolate a series, each with provenance history.

use crate::anchor::CorrespondenceSet;
use crate::error::CorrelError;
use crate::mapping::{Mapping, MappingMode};
use crate::registry::{
    append_history, Item, ItemId, ItemPayload, Registry, SampleParams, SeriesProvenance,
};
use crate::resample::{resample, ResampleSpec, TargetGrid};

/// Filter a series with a centred moving average.
///
/// Registers a reusable FILTER definition next to the source and the derived
/// filtered series under the source's parent. Returns (filter id, series id).
pub fn filter_series(
    registry: &mut Registry,
    series_id: ItemId,
    window_size: usize,
) -> Result<(ItemId, ItemId), CorrelError> {
    let source = registry.require(series_id)?.clone();
    let series = registry.require_series(series_id)?.clone();

    let parent = registry.parent(series_id);
    let filter_id = registry.add_item(
        parent,
        Item::new(
            format!("Moving average {window_size} pts"),
            ItemPayload::Filter { window_size },
        )
        .with_history(format!("filter as a moving average of size {window_size}")),
    );

    let filtered = series.moving_average(window_size);
    let color = registry.next_color(Some(source.color));
    let mut item = Item::new(
        format!("{} (filtered)", source.name),
        ItemPayload::Series { series: filtered, provenance: SeriesProvenance::Filtered },
    )
    .with_labels(source.x_label.clone(), source.y_label.clone());
    item.color = color;
    let filtered_id = registry.add_item(parent, item);
    let line = format!(
        "serie {series_id} filtered with FILTER {filter_id} with a moving average of size {window_size} ---> serie {filtered_id}"
    );
    registry.set_history(filtered_id, append_history(&source.history, &line));
    Ok((filter_id, filtered_id))
}

/// Resample a series with reusable SAMPLE parameters.
///
/// `SampleParams::Positions` targets are resolved from the positions of the
/// series item they name. Returns (sample id, series id).
pub fn sample_series(
    registry: &mut Registry,
    series_id: ItemId,
    params: SampleParams,
) -> Result<(ItemId, ItemId), CorrelError> {
    let source = registry.require(series_id)?.clone();
    let series = registry.require_series(series_id)?.clone();

    let (target, kind, integrated, name, params_text) = match &params {
        SampleParams::Step { step, kind, integrated } => (
            TargetGrid::Step(*step),
            *kind,
            *integrated,
            format!("Sample every {step}"),
            format!("every {step} and {} interpolation with integration at {integrated}", kind.name()),
        ),
        SampleParams::Positions { source_id, kind, integrated } => {
            let reference = registry.require_series(*source_id)?;
            (
                TargetGrid::Positions(reference.positions().collect()),
                *kind,
                *integrated,
                format!("Sample on positions of {source_id}"),
                format!("using x values of {source_id} and {} interpolation with integration at {integrated}", kind.name()),
            )
        }
    };

    let spec = ResampleSpec { target, kind, integrated };
    let sampled = resample(&series, &spec)?;

    let parent = registry.parent(series_id);
    let sample_id = registry.add_item(
        parent,
        Item::new(name, ItemPayload::Sample { params: params.clone() })
            .with_history(format!("sample with parameters: {params_text}")),
    );

    let color = registry.next_color(Some(source.color));
    let mut item = Item::new(
        format!("{} (sampled)", source.name),
        ItemPayload::Series { series: sampled, provenance: SeriesProvenance::Sampled },
    )
    .with_labels(source.x_label.clone(), source.y_label.clone());
    item.color = color;
    let sampled_id = registry.add_item(parent, item);
    let line = format!(
        "serie {series_id} sampled {params_text} with SAMPLE {sample_id} ---> serie {sampled_id}"
    );
    registry.set_history(sampled_id, append_history(&source.history, &line));
    Ok((sample_id, sampled_id))
}

/// Register a reusable INTERPOLATION definition from a correspondence set.
pub fn save_interpolation(
    registry: &mut Registry,
    parent: Option<ItemId>,
    set: &CorrespondenceSet,
    x1_name: impl Into<String>,
) -> Result<ItemId, CorrelError> {
    if set.len() < 2 {
        return Err(CorrelError::InsufficientAnchors { have: set.len() });
    }
    let payload = ItemPayload::interpolation(set.sorted_by_a(), set.sorted_by_b(), x1_name)?;
    Ok(registry.add_item(parent, Item::new("Interpolation", payload)))
}

/// Re-express a series in the reference axis of a stored INTERPOLATION.
///
/// Positions go through `b_to_a` (distorted axis back to the reference
/// axis); values are untouched. Returns the derived series id.
pub fn interpolate_series(
    registry: &mut Registry,
    series_id: ItemId,
    interpolation_id: ItemId,
    mode: MappingMode,
) -> Result<ItemId, CorrelError> {
    let source = registry.require(series_id)?.clone();
    let series = registry.require_series(series_id)?.clone();

    let (x1, x2, x1_name) = match &registry.require(interpolation_id)?.payload {
        ItemPayload::Interpolation { x1_coords, x2_coords, x1_name } => {
            (x1_coords.clone(), x2_coords.clone(), x1_name.clone())
        }
        _ => {
            return Err(CorrelError::WrongItemKind {
                id: interpolation_id.to_string(),
                expected: "INTERPOLATION",
            })
        }
    };

    let set = CorrespondenceSet::from_columns(&x1, &x2)?;
    let mapping = Mapping::build(&set, mode)?;
    let interpolated = series.map_positions(|x| mapping.b_to_a(x));

    let parent = registry.parent(series_id);
    let color = registry.next_color(Some(source.color));
    let mut item = Item::new(
        format!("{} (interpolated)", source.name),
        ItemPayload::Series {
            series: interpolated,
            provenance: SeriesProvenance::Interpolated { mode },
        },
    )
    .with_labels(x1_name, source.y_label.clone());
    item.color = color;
    let interpolated_id = registry.add_item(parent, item);
    let line = format!(
        "serie {series_id} interpolated with INTERPOLATION {interpolation_id} with mode {} ---> serie {interpolated_id}",
        mode.name()
    );
    registry.set_history(interpolated_id, append_history(&source.history, &line));
    Ok(interpolated_id)
}
