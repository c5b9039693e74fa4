// Copyright 2025 Cowboy AI, LLC.

//! Domain events recorded by the order draft
//!
//! Events are facts about draft mutations. The draft buffers them until a
//! front end drains them with [`OrderDraft::take_events`](crate::OrderDraft::take_events)
//! to decide what to re-render.

use crate::catalog::Category;
use crate::entity::{DraftId, PairId};
use crate::wizard::WizardStep;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base trait for all domain events
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Get the aggregate ID this event relates to
    fn aggregate_id(&self) -> Uuid;

    /// Get the event type name
    fn event_type(&self) -> &'static str;

    /// Get the schema version
    fn version(&self) -> &'static str {
        "v1"
    }
}

/// What happened to the draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftChange {
    /// A pair was appended
    PairAdded {
        /// New pair
        pair_id: PairId,
    },
    /// A pair was removed
    PairRemoved {
        /// Removed pair
        pair_id: PairId,
    },
    /// A pair's category changed (services cleared)
    CategoryChanged {
        /// Pair
        pair_id: PairId,
        /// New category
        category: Category,
    },
    /// A service was added to or removed from a pair
    ServiceToggled {
        /// Pair
        pair_id: PairId,
        /// Service id
        service_id: i64,
        /// Whether it is selected now
        selected: bool,
    },
    /// A photo was attached to a pair
    PhotoAttached {
        /// Pair
        pair_id: PairId,
    },
    /// A pair's note changed
    NoteChanged {
        /// Pair
        pair_id: PairId,
    },
    /// A pair was confirmed complete
    PairValidated {
        /// Pair
        pair_id: PairId,
    },
    /// A pair was reopened for editing
    PairReopened {
        /// Pair
        pair_id: PairId,
    },
    /// The wizard moved to another step
    StepChanged {
        /// Previous step
        from: WizardStep,
        /// New step
        to: WizardStep,
    },
    /// Client contact fields changed
    ClientInfoUpdated,
    /// The order payload was built for submission
    OrderSubmitted {
        /// Number of pairs in the payload
        pair_count: usize,
    },
}

/// Event envelope carrying the draft identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEvent {
    /// Draft the event belongs to
    pub draft_id: DraftId,
    /// Draft version after the change
    pub version: u64,
    /// The change itself
    #[serde(flatten)]
    pub change: DraftChange,
}

impl DomainEvent for DraftEvent {
    fn aggregate_id(&self) -> Uuid {
        self.draft_id.into()
    }

    fn event_type(&self) -> &'static str {
        match self.change {
            DraftChange::PairAdded { .. } => "PairAdded",
            DraftChange::PairRemoved { .. } => "PairRemoved",
            DraftChange::CategoryChanged { .. } => "CategoryChanged",
            DraftChange::ServiceToggled { .. } => "ServiceToggled",
            DraftChange::PhotoAttached { .. } => "PhotoAttached",
            DraftChange::NoteChanged { .. } => "NoteChanged",
            DraftChange::PairValidated { .. } => "PairValidated",
            DraftChange::PairReopened { .. } => "PairReopened",
            DraftChange::StepChanged { .. } => "StepChanged",
            DraftChange::ClientInfoUpdated => "ClientInfoUpdated",
            DraftChange::OrderSubmitted { .. } => "OrderSubmitted",
        }
    }
}

impl DraftChange {
    /// Pair the change concerns, if any
    pub fn pair_id(&self) -> Option<PairId> {
        match self {
            DraftChange::PairAdded { pair_id }
            | DraftChange::PairRemoved { pair_id }
            | DraftChange::CategoryChanged { pair_id, .. }
            | DraftChange::ServiceToggled { pair_id, .. }
            | DraftChange::PhotoAttached { pair_id }
            | DraftChange::NoteChanged { pair_id }
            | DraftChange::PairValidated { pair_id }
            | DraftChange::PairReopened { pair_id } => Some(*pair_id),
            DraftChange::StepChanged { .. }
            | DraftChange::ClientInfoUpdated
            | DraftChange::OrderSubmitted { .. } => None,
        }
    }
}
