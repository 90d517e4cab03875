// File: crates/correl-core/src/session.rs
// Summary: Interactive correlation session: pending pins, commit/toggle/clear
// commands, eager mapping rebuild, synchronous observer fan-out.

use crate::anchor::{AnchorPoint, CorrespondenceSet};
use crate::error::CorrelError;
use crate::mapping::{Mapping, MappingMode};

/// Session state derived from the pending pin slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// One endpoint pinned on axis A, awaiting axis B.
    HalfA,
    /// One endpoint pinned on axis B, awaiting axis A.
    HalfB,
    /// Both endpoints pinned; ready to commit.
    BothPinned,
}

/// Explicit command values dispatched to the session controller, decoupling
/// the core from whatever presentation layer produced the user action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionCommand {
    PinA(f64),
    PinB(f64),
    Commit,
    /// Programmatic insert (e.g. restoring persisted anchors); unlike Commit
    /// it does not touch the toggle slot.
    AddAnchor(AnchorPoint),
    /// Delete one anchor by value (the pick-and-delete gesture).
    RemoveAnchor(AnchorPoint),
    ToggleLast,
    Clear { confirmed: bool },
}

/// Observer notified synchronously after every successful mutation, so every
/// display surface sharing this correlation can refresh its cached view.
/// Execution is single-threaded; this is a direct call loop, not a channel.
pub trait SessionObserver {
    fn correlation_changed(&mut self, set: &CorrespondenceSet, mapping: Option<&Mapping>);
}

/// Interactive correlation editing session.
///
/// Owns the correspondence set and keeps a live mapping in sync: the mapping
/// is rebuilt eagerly after every successful commit/toggle/clear, so readers
/// never observe a mapping inconsistent with the current set.
pub struct EditSession {
    set: CorrespondenceSet,
    mode: MappingMode,
    mapping: Option<Mapping>,
    pending_a: Option<f64>,
    pending_b: Option<f64>,
    // Single-slot toggle target: the last committed or removed anchor.
    last_toggle: Option<AnchorPoint>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl EditSession {
    pub fn new(mode: MappingMode) -> Self {
        Self {
            set: CorrespondenceSet::new(),
            mode,
            mapping: None,
            pending_a: None,
            pending_b: None,
            last_toggle: None,
            observers: Vec::new(),
        }
    }

    /// Open a session over an existing correspondence set (e.g. one
    /// reconstructed from persisted columns).
    pub fn with_set(set: CorrespondenceSet, mode: MappingMode) -> Self {
        let mut session = Self::new(mode);
        session.set = set;
        session.rebuild_mapping();
        session
    }

    pub fn state(&self) -> SessionState {
        match (self.pending_a, self.pending_b) {
            (None, None) => SessionState::Idle,
            (Some(_), None) => SessionState::HalfA,
            (None, Some(_)) => SessionState::HalfB,
            (Some(_), Some(_)) => SessionState::BothPinned,
        }
    }

    pub fn set(&self) -> &CorrespondenceSet { &self.set }
    pub fn mapping(&self) -> Option<&Mapping> { self.mapping.as_ref() }
    pub fn mode(&self) -> MappingMode { self.mode }
    pub fn pending_a(&self) -> Option<f64> { self.pending_a }
    pub fn pending_b(&self) -> Option<f64> { self.pending_b }

    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Dispatch one command. Returns whether the correspondence set changed.
    pub fn apply(&mut self, command: SessionCommand) -> Result<bool, CorrelError> {
        match command {
            SessionCommand::PinA(x) => self.pin_a(x).map(|_| false),
            SessionCommand::PinB(x) => self.pin_b(x).map(|_| false),
            SessionCommand::Commit => self.commit(),
            SessionCommand::AddAnchor(anchor) => self.add_anchor(anchor).map(|_| true),
            SessionCommand::RemoveAnchor(anchor) => Ok(self.remove_anchor(anchor)),
            SessionCommand::ToggleLast => self.toggle_last(),
            SessionCommand::Clear { confirmed } => Ok(self.clear(confirmed)),
        }
    }

    /// Place (or move) the axis-A pin. Allowed before commit at any time.
    pub fn pin_a(&mut self, pos: f64) -> Result<(), CorrelError> {
        if !pos.is_finite() {
            return Err(CorrelError::domain(format!("pin position must be finite, got {pos}")));
        }
        self.pending_a = Some(pos);
        Ok(())
    }

    /// Place (or move) the axis-B pin.
    pub fn pin_b(&mut self, pos: f64) -> Result<(), CorrelError> {
        if !pos.is_finite() {
            return Err(CorrelError::domain(format!("pin position must be finite, got {pos}")));
        }
        self.pending_b = Some(pos);
        Ok(())
    }

    /// Commit the pending pin pair as an anchor.
    ///
    /// Returns Ok(false) when no complete pair is pending. On a crossing the
    /// pins stay pending and the set is untouched, so the user can move a pin
    /// and retry without losing state.
    pub fn commit(&mut self) -> Result<bool, CorrelError> {
        let (Some(a), Some(b)) = (self.pending_a, self.pending_b) else {
            return Ok(false);
        };
        let anchor = AnchorPoint::new(a, b);
        self.set.try_add(anchor)?;
        self.pending_a = None;
        self.pending_b = None;
        self.last_toggle = Some(anchor);
        self.after_mutation();
        Ok(true)
    }

    /// Insert an anchor directly, subject to the crossing check. Leaves the
    /// toggle slot alone.
    pub fn add_anchor(&mut self, anchor: AnchorPoint) -> Result<(), CorrelError> {
        self.set.try_add(anchor)?;
        self.after_mutation();
        Ok(())
    }

    /// Remove one anchor by value. Returns whether anything was removed.
    pub fn remove_anchor(&mut self, anchor: AnchorPoint) -> bool {
        if self.set.remove(anchor) {
            self.after_mutation();
            true
        } else {
            false
        }
    }

    /// Single-slot undo/redo: remove the last toggled anchor if present,
    /// otherwise re-add it (re-running the crossing check, since the set may
    /// have changed since removal). Only one slot of history is kept.
    pub fn toggle_last(&mut self) -> Result<bool, CorrelError> {
        let Some(anchor) = self.last_toggle else {
            return Ok(false);
        };
        if self.set.contains(anchor) {
            self.set.remove(anchor);
        } else {
            self.set.try_add(anchor)?;
        }
        self.after_mutation();
        Ok(true)
    }

    /// Drop all pending pins; with `confirmed`, also empty the set and its
    /// derived mapping. Returns whether the set was emptied.
    pub fn clear(&mut self, confirmed: bool) -> bool {
        self.pending_a = None;
        self.pending_b = None;
        if !confirmed || self.set.is_empty() {
            return false;
        }
        self.set.clear();
        self.last_toggle = None;
        self.after_mutation();
        true
    }

    /// Switch interpolation mode; the mapping is rebuilt from the same set.
    pub fn set_mode(&mut self, mode: MappingMode) {
        if self.mode != mode {
            self.mode = mode;
            self.after_mutation();
        }
    }

    fn rebuild_mapping(&mut self) {
        // Fewer than 2 anchors: mapping unavailable, not an error state.
        self.mapping = Mapping::build(&self.set, self.mode).ok();
    }

    fn after_mutation(&mut self) {
        self.rebuild_mapping();
        // Take the observer list out so each callback can borrow the session
        // state immutably while being called mutably.
        let mut observers = std::mem::take(&mut self.observers);
        for obs in observers.iter_mut() {
            obs.correlation_changed(&self.set, self.mapping.as_ref());
        }
        self.observers = observers;
    }
}
