// File: crates/correl-core/src/lib.rs
// Summary: Core library entry point; exports the correlation, mapping, and
// resampling API.

pub mod anchor;
pub mod apply;
pub mod error;
pub mod interp;
pub mod mapping;
pub mod persist;
pub mod registry;
pub mod resample;
pub mod series;
pub mod session;

pub use anchor::{AnchorPoint, CorrespondenceSet};
pub use error::CorrelError;
pub use interp::InterpKind;
pub use mapping::{Mapping, MappingMode};
pub use registry::{Item, ItemId, ItemPayload, Registry, SampleParams, SeriesProvenance};
pub use resample::{resample, ResampleSpec, TargetGrid};
pub use series::Series;
pub use session::{EditSession, SessionCommand, SessionObserver, SessionState};
