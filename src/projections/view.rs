// Copyright 2025 Cowboy AI, LLC.

//! Render-on-read view of the draft
//!
//! Front ends re-render from this projection instead of tracking which
//! widgets each mutation touched.

use crate::catalog::{Catalog, Category};
use crate::draft::OrderDraft;
use crate::entity::PairId;
use crate::pair::{MissingRequirement, Pair, PairStatus, PhotoRef};
use crate::projections::recap::project_pair;
use crate::wizard::WizardStep;
use rust_decimal::Decimal;
use serde::Serialize;

/// What the UI needs to draw one pair card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairView {
    /// Pair identity
    pub pair_id: PairId,
    /// 1-based position ("Paire 2")
    pub position: usize,
    /// Lifecycle status
    pub status: PairStatus,
    /// Chosen category
    pub category: Option<Category>,
    /// Selected services in selection order
    pub selected_services: Vec<i64>,
    /// Service checkboxes are shown once a category is chosen
    pub services_visible: bool,
    /// The note field is shown while a selected service requires one
    pub note_visible: bool,
    /// The photo area is shown once a service is selected
    pub photo_visible: bool,
    /// Attached photo
    pub photo: Option<PhotoRef>,
    /// Note text
    pub note: String,
    /// The validate button is enabled
    pub can_validate: bool,
    /// First unmet requirement, if any
    pub missing: Option<MissingRequirement>,
    /// Priced subtotal
    pub subtotal: Decimal,
}

/// What the UI needs to draw the whole wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftView {
    /// Current step
    pub current_step: WizardStep,
    /// Pair cards in order
    pub pairs: Vec<PairView>,
    /// The "continue to review" button is enabled
    pub can_advance_to_review: bool,
    /// Order total
    pub total: Decimal,
}

/// Project one pair
pub fn pair_view(pair: &Pair, position: usize, catalog: &Catalog) -> PairView {
    let missing = pair.missing_requirement();
    PairView {
        pair_id: pair.id(),
        position,
        status: pair.status(),
        category: pair.category(),
        selected_services: pair.selected_services().iter().copied().collect(),
        services_visible: pair.category().is_some(),
        note_visible: pair.note_required(catalog),
        photo_visible: !pair.selected_services().is_empty(),
        photo: pair.photo().cloned(),
        note: pair.note().to_string(),
        can_validate: !pair.is_validated() && missing.is_none(),
        missing,
        subtotal: project_pair(pair, catalog).subtotal,
    }
}

/// Project the whole draft
pub fn draft_view(draft: &OrderDraft, catalog: &Catalog) -> DraftView {
    let pairs: Vec<PairView> = draft
        .pairs()
        .iter()
        .enumerate()
        .map(|(i, pair)| pair_view(pair, i + 1, catalog))
        .collect();
    let total = pairs.iter().map(|p| p.subtotal).sum();

    DraftView {
        current_step: draft.current_step(),
        pairs,
        can_advance_to_review: draft.can_advance_to_review(),
        total,
    }
}
