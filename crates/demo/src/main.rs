// File: crates/demo/src/main.rs
// Summary: Demo loads two series and a pointers CSV, builds both mappings,
// and writes interpolated plus resampled outputs as CSV.

use anyhow::{Context, Result};
use correl_core::apply::{interpolate_series, sample_series, save_interpolation};
use correl_core::persist::load_pointers;
use correl_core::{
    CorrelError, EditSession, InterpKind, Item, ItemId, ItemPayload, MappingMode, Registry,
    SampleParams, Series, SeriesProvenance,
};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let data_path = PathBuf::from(args.next().unwrap_or_else(|| "data.csv".to_string()));
    let pointers_path = PathBuf::from(args.next().unwrap_or_else(|| "pointers.csv".to_string()));
    let step: f64 = match args.next() {
        Some(s) => s.parse().context("sampling step must be a number")?,
        None => 2.0,
    };

    println!("Using data file: {}", data_path.display());
    println!("Using pointers file: {}", pointers_path.display());

    let (reference, distorted) = load_two_series_csv(&data_path)
        .with_context(|| format!("failed to load CSV '{}'", data_path.display()))?;
    println!(
        "Loaded reference series ({} points) and distorted series ({} points)",
        reference.series.len(),
        distorted.series.len()
    );

    let mut registry = Registry::new();
    let ref_item = Item::new(
        reference.name.clone(),
        ItemPayload::Series { series: reference.series, provenance: SeriesProvenance::Raw },
    )
    .with_labels(reference.x_name.clone(), reference.y_name.clone());
    let ref_id = registry.add_item(None, ref_item);

    let dist_item = Item::new(
        distorted.name.clone(),
        ItemPayload::Series { series: distorted.series, provenance: SeriesProvenance::Raw },
    )
    .with_labels(distorted.x_name.clone(), distorted.y_name.clone());
    let dist_id = registry.add_item(None, dist_item);

    // Correlation: a malformed pointers file rejects only this item; the
    // resampling part of the demo still runs.
    match load_pointers(&pointers_path) {
        Ok(set) => {
            println!("Loaded {} anchors", set.len());
            let session = EditSession::with_set(set, MappingMode::MonotonicCubic);
            if session.mapping().is_none() {
                println!("Fewer than 2 anchors: interpolation unavailable");
            } else {
                let interp_id = save_interpolation(
                    &mut registry,
                    None,
                    session.set(),
                    reference.x_name.clone(),
                )?;
                for mode in [MappingMode::Linear, MappingMode::MonotonicCubic] {
                    let out_id = interpolate_series(&mut registry, dist_id, interp_id, mode)?;
                    let out = out_name(&data_path, &format!("interpolated_{}", mode.name()));
                    write_series_csv(&out, &registry, out_id)?;
                    println!("Wrote {}", out.display());
                }
            }
        }
        Err(CorrelError::MalformedPersistedData { reason }) => {
            println!("Rejected correlation item: {reason}");
        }
        Err(e) => return Err(e).context("loading pointers"),
    }

    // Uniform-grid resampling of the reference series, point and integrated.
    for (label, integrated) in [("point", false), ("integrated", true)] {
        let params = SampleParams::Step { step, kind: InterpKind::Linear, integrated };
        let (_, sampled_id) = sample_series(&mut registry, ref_id, params)?;
        let out = out_name(&data_path, &format!("sampled_{label}"));
        write_series_csv(&out, &registry, sampled_id)?;
        println!("Wrote {}", out.display());
    }

    // Resampling the distorted series onto the reference positions.
    let params = SampleParams::Positions {
        source_id: ref_id,
        kind: InterpKind::Linear,
        integrated: false,
    };
    let (_, aligned_id) = sample_series(&mut registry, dist_id, params)?;
    let out = out_name(&data_path, "aligned");
    write_series_csv(&out, &registry, aligned_id)?;
    println!("Wrote {}", out.display());

    println!("Registry holds {} items:", registry.len());
    for (id, item) in registry.iter() {
        println!("  {id}  {:<18} {}", item.payload.kind_name(), item.name);
    }
    Ok(())
}

struct LoadedSeries {
    name: String,
    x_name: String,
    y_name: String,
    series: Series,
}

/// Load two series from a four-column CSV (x1, y1, x2, y2). Header names are
/// kept as axis labels when present; rows with unparsable or missing fields
/// are skipped.
fn load_two_series_csv(path: &Path) -> Result<(LoadedSeries, LoadedSeries)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    println!("Headers: {headers:?}");
    let label = |i: usize, fallback: &str| -> String {
        headers.get(i).cloned().unwrap_or_else(|| fallback.to_string())
    };

    let mut points1 = Vec::new();
    let mut points2 = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let field = |i: usize| -> Option<f64> { rec.get(i).and_then(|s| s.parse().ok()) };
        if let (Some(x), Some(y)) = (field(0), field(1)) {
            points1.push((x, y));
        }
        if let (Some(x), Some(y)) = (field(2), field(3)) {
            points2.push((x, y));
        }
    }
    if points1.is_empty() || points2.is_empty() {
        anyhow::bail!("no data rows loaded — check headers/delimiter.");
    }

    Ok((
        LoadedSeries {
            name: format!("{} series", label(1, "reference")),
            x_name: label(0, "x1"),
            y_name: label(1, "y1"),
            series: Series::from_points(points1),
        },
        LoadedSeries {
            name: format!("{} series", label(3, "distorted")),
            x_name: label(2, "x2"),
            y_name: label(3, "y2"),
            series: Series::from_points(points2),
        },
    ))
}

/// Produce output file name like target/out/correl_<stem>_<suffix>.csv
fn out_name(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("series");
    let mut out = PathBuf::from("target/out");
    std::fs::create_dir_all(&out).ok();
    out.push(format!("correl_{stem}_{suffix}.csv"));
    out
}

fn write_series_csv(path: &Path, registry: &Registry, id: ItemId) -> Result<()> {
    let item = registry.require(id)?;
    let series = registry.require_series(id)?;
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record([item.x_label.as_str(), item.y_label.as_str()])?;
    for (x, y) in series.points() {
        wtr.write_record(&[x.to_string(), y.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
