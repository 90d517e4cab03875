// File: crates/correl-core/src/registry.rs
// Summary: Item registry: stable generated identifiers, tagged payloads,
// provenance history, and color assignment for derived artifacts.

use std::collections::BTreeMap;
use std::fmt;

use crate::anchor::CorrespondenceSet;
use crate::error::CorrelError;
use crate::interp::InterpKind;
use crate::mapping::MappingMode;
use crate::series::Series;

/// Stable identifier generated by the registry (a counter, never an object
/// address, so it survives any amount of reordering or window churn).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{:04}", self.0)
    }
}

/// How a series item came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesProvenance {
    Raw,
    Filtered,
    Sampled,
    Interpolated { mode: MappingMode },
}

/// Reusable resample parameters, either grid-derived or tied to the
/// positions of another registered series.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleParams {
    Step { step: f64, kind: InterpKind, integrated: bool },
    Positions { source_id: ItemId, kind: InterpKind, integrated: bool },
}

/// Variant-specific item payload, validated at construction. The display
/// names ("Serie", "Serie filtered", "SAMPLE", ...) come from `kind_name`.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemPayload {
    Series { series: Series, provenance: SeriesProvenance },
    Filter { window_size: usize },
    Sample { params: SampleParams },
    Interpolation { x1_coords: Vec<f64>, x2_coords: Vec<f64>, x1_name: String },
}

impl ItemPayload {
    /// Interpolation payload with the persisted-column checks applied up
    /// front, so a stored correlation is always reloadable.
    pub fn interpolation(
        x1_coords: Vec<f64>,
        x2_coords: Vec<f64>,
        x1_name: impl Into<String>,
    ) -> Result<Self, CorrelError> {
        CorrespondenceSet::from_columns(&x1_coords, &x2_coords)?;
        Ok(ItemPayload::Interpolation { x1_coords, x2_coords, x1_name: x1_name.into() })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ItemPayload::Series { provenance, .. } => match provenance {
                SeriesProvenance::Raw => "Serie",
                SeriesProvenance::Filtered => "Serie filtered",
                SeriesProvenance::Sampled => "Serie sampled",
                SeriesProvenance::Interpolated { .. } => "Serie interpolated",
            },
            ItemPayload::Filter { .. } => "FILTER",
            ItemPayload::Sample { .. } => "SAMPLE",
            ItemPayload::Interpolation { .. } => "INTERPOLATION",
        }
    }
}

/// One registered artifact.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub color: &'static str,
    pub history: String,
    pub comment: String,
    pub payload: ItemPayload,
}

impl Item {
    pub fn new(name: impl Into<String>, payload: ItemPayload) -> Self {
        Self {
            name: name.into(),
            x_label: String::new(),
            y_label: String::new(),
            color: "",
            history: String::new(),
            comment: String::new(),
            payload,
        }
    }

    pub fn with_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = history.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

const PALETTE: &[&str] = &[
    "steelblue", "darkorange", "seagreen", "crimson", "mediumpurple",
    "goldenrod", "teal", "indianred",
];

#[derive(Clone, Debug)]
struct Record {
    parent: Option<ItemId>,
    item: Item,
}

/// Registry of items for display, keyed by generated ids. Iteration order is
/// deterministic (id order).
#[derive(Debug, Default)]
pub struct Registry {
    next_id: u64,
    color_cursor: usize,
    records: BTreeMap<ItemId, Record>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item under `parent` (None for a top-level worksheet
    /// entry). An item without a color is assigned the next palette color.
    pub fn add_item(&mut self, parent: Option<ItemId>, mut item: Item) -> ItemId {
        if item.color.is_empty() {
            item.color = self.next_color(None);
        }
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.records.insert(id, Record { parent, item });
        id
    }

    /// Next palette color, skipping `exclude` so a derived series never
    /// shares its source's color.
    pub fn next_color(&mut self, exclude: Option<&str>) -> &'static str {
        loop {
            let color = PALETTE[self.color_cursor % PALETTE.len()];
            self.color_cursor += 1;
            if Some(color) != exclude {
                return color;
            }
        }
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.records.get(&id).map(|r| &r.item)
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.records.get(&id).and_then(|r| r.parent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.records.iter().map(|(id, r)| (*id, &r.item))
    }

    /// Replace an item's history text. Derived items get their history after
    /// registration, once their own id is known.
    pub fn set_history(&mut self, id: ItemId, history: String) {
        if let Some(r) = self.records.get_mut(&id) {
            r.item.history = history;
        }
    }

    /// Look up an item or fail with `UnknownItem`.
    pub fn require(&self, id: ItemId) -> Result<&Item, CorrelError> {
        self.get(id).ok_or(CorrelError::UnknownItem { id: id.to_string() })
    }

    /// Look up a series payload or fail with `WrongItemKind`.
    pub fn require_series(&self, id: ItemId) -> Result<&Series, CorrelError> {
        match &self.require(id)?.payload {
            ItemPayload::Series { series, .. } => Ok(series),
            _ => Err(CorrelError::WrongItemKind { id: id.to_string(), expected: "series" }),
        }
    }
}

/// Chain a provenance line onto an item's history text.
pub fn append_history(history: &str, line: &str) -> String {
    if history.is_empty() {
        line.to_string()
    } else {
        format!("{history}\n{line}")
    }
}
