// Copyright 2025 Cowboy AI, LLC.

//! Order draft aggregate root
//!
//! The draft owns the ordered pairs, the client contact fields and the wizard
//! step pointer. Every change goes through its methods so that the step gate
//! and the pair invariants hold, and every change is recorded as a
//! [`DraftEvent`].
//!
//! When the last pair is removed a fresh empty pair is created in its place:
//! a draft never has zero pairs, the same rule as at construction.
//!
//! Changing the pair list from Review or Payment sends the draft back to
//! the Pairs step, so a draft past Pairs always has every pair validated.

use crate::catalog::{Catalog, Category};
use crate::client::ClientInfo;
use crate::entity::{AggregateRoot, DraftId, PairId};
use crate::errors::{IntakeError, IntakeResult};
use crate::events::{DraftChange, DraftEvent};
use crate::pair::{Pair, PhotoRef};
use crate::state_machine::{moore_transition, StateTransition};
use crate::transport::{OrderPayload, PairPayload};
use crate::wizard::{StepEntry, WizardStep};
use tracing::debug;

/// Events buffered before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// In-progress order before checkout hand-off
#[derive(Debug, Clone)]
pub struct OrderDraft {
    id: DraftId,
    pairs: Vec<Pair>,
    client_info: ClientInfo,
    current_step: WizardStep,
    version: u64,
    events: Vec<DraftEvent>,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateRoot for OrderDraft {
    type Id = DraftId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
    }
}

impl OrderDraft {
    /// Fresh draft with one empty pair
    pub fn new() -> Self {
        let mut draft = Self::empty();
        draft.push_pair();
        draft
    }

    /// Draft without any pair
    pub fn empty() -> Self {
        Self {
            id: DraftId::new(),
            pairs: Vec::new(),
            client_info: ClientInfo::default(),
            current_step: WizardStep::Pairs,
            version: 0,
            events: Vec::new(),
        }
    }

    /// Rebuild a draft from restored parts
    ///
    /// Callers are expected to have normalized the pairs already; an empty
    /// pair list gets one fresh pair and a step whose gate no longer holds
    /// falls back to [`WizardStep::Pairs`].
    pub fn restore(pairs: Vec<Pair>, client_info: ClientInfo, current_step: WizardStep) -> Self {
        let mut draft = Self {
            pairs,
            client_info,
            current_step,
            ..Self::empty()
        };
        if draft.pairs.is_empty() {
            draft.pairs.push(Pair::new());
        }
        if draft.current_step != WizardStep::Pairs && !draft.can_advance_to_review() {
            debug!(step = %draft.current_step, "restored step no longer reachable, back to pairs");
            draft.current_step = WizardStep::Pairs;
        }
        draft
    }

    /// Pairs in order
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Look up a pair
    pub fn pair(&self, id: PairId) -> Option<&Pair> {
        self.pairs.iter().find(|p| p.id() == id)
    }

    /// 1-based position of a pair, as shown to the customer
    pub fn position_of(&self, id: PairId) -> Option<usize> {
        self.pairs.iter().position(|p| p.id() == id).map(|i| i + 1)
    }

    /// Current wizard step
    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    /// Client contact fields
    pub fn client_info(&self) -> &ClientInfo {
        &self.client_info
    }

    /// Drain the events recorded since the last call
    ///
    /// At most [`MAX_PENDING_EVENTS`] are kept; older ones are dropped.
    pub fn take_events(&mut self) -> Vec<DraftEvent> {
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, change: DraftChange) {
        self.increment_version();
        if self.events.len() >= MAX_PENDING_EVENTS {
            let overflow = self.events.len() + 1 - MAX_PENDING_EVENTS;
            self.events.drain(..overflow);
        }
        self.events.push(DraftEvent {
            draft_id: self.id,
            version: self.version,
            change,
        });
    }

    fn pair_mut(&mut self, id: PairId) -> IntakeResult<&mut Pair> {
        self.pairs
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(IntakeError::PairNotFound(id))
    }

    // The pair list changed outside the Pairs step: go back to it.
    fn reopen_pairs_step(&mut self) {
        if self.current_step != WizardStep::Pairs {
            let from = self.current_step;
            self.current_step = WizardStep::Pairs;
            debug!(%from, "pairs changed, back to the pairs step");
            self.record(DraftChange::StepChanged {
                from,
                to: WizardStep::Pairs,
            });
        }
    }

    fn push_pair(&mut self) -> PairId {
        let pair = Pair::new();
        let pair_id = pair.id();
        self.pairs.push(pair);
        self.record(DraftChange::PairAdded { pair_id });
        pair_id
    }

    /// Append a new empty pair
    pub fn add_pair(&mut self) -> PairId {
        let pair_id = self.push_pair();
        self.reopen_pairs_step();
        pair_id
    }

    /// Remove a pair; removing the last one leaves a fresh empty pair
    pub fn remove_pair(&mut self, id: PairId) -> IntakeResult<()> {
        let index = self
            .pairs
            .iter()
            .position(|p| p.id() == id)
            .ok_or(IntakeError::PairNotFound(id))?;
        self.pairs.remove(index);
        self.record(DraftChange::PairRemoved { pair_id: id });

        if self.pairs.is_empty() {
            self.push_pair();
        }
        self.reopen_pairs_step();
        Ok(())
    }

    /// Change a pair's category
    pub fn set_category(&mut self, id: PairId, category: Category) -> IntakeResult<()> {
        self.pair_mut(id)?.set_category(category)?;
        self.record(DraftChange::CategoryChanged {
            pair_id: id,
            category,
        });
        self.reopen_pairs_step();
        Ok(())
    }

    /// Toggle a service on a pair; returns whether it is selected now
    pub fn toggle_service(
        &mut self,
        id: PairId,
        service_id: i64,
        catalog: &Catalog,
    ) -> IntakeResult<bool> {
        let selected = self.pair_mut(id)?.toggle_service(service_id, catalog)?;
        self.record(DraftChange::ServiceToggled {
            pair_id: id,
            service_id,
            selected,
        });
        self.reopen_pairs_step();
        Ok(selected)
    }

    /// Attach a photo; returns whether it was attached
    pub fn set_photo(&mut self, id: PairId, photo: PhotoRef) -> IntakeResult<bool> {
        let attached = self.pair_mut(id)?.set_photo(photo)?;
        if attached {
            self.record(DraftChange::PhotoAttached { pair_id: id });
            self.reopen_pairs_step();
        }
        Ok(attached)
    }

    /// Set a pair's note (kept only while a note is required)
    pub fn set_note(
        &mut self,
        id: PairId,
        text: impl Into<String>,
        catalog: &Catalog,
    ) -> IntakeResult<()> {
        let pair = self.pair_mut(id)?;
        let before = pair.note().to_string();
        pair.set_note(text, catalog)?;
        if pair.note() != before {
            self.record(DraftChange::NoteChanged { pair_id: id });
            self.reopen_pairs_step();
        }
        Ok(())
    }

    /// Validate a pair, naming its position on failure
    pub fn validate_pair(&mut self, id: PairId) -> IntakeResult<()> {
        let position = self.position_of(id).ok_or(IntakeError::PairNotFound(id))?;
        self.pair_mut(id)?
            .validate()
            .map_err(|missing| IntakeError::IncompletePair { position, missing })?;
        self.record(DraftChange::PairValidated { pair_id: id });
        Ok(())
    }

    /// Reopen a pair for editing
    pub fn edit_pair(&mut self, id: PairId) -> IntakeResult<()> {
        let pair = self.pair_mut(id)?;
        let was_validated = pair.is_validated();
        pair.edit();
        if was_validated {
            self.record(DraftChange::PairReopened { pair_id: id });
            self.reopen_pairs_step();
        }
        Ok(())
    }

    /// Non-empty and every pair explicitly validated
    pub fn can_advance_to_review(&self) -> bool {
        !self.pairs.is_empty() && self.pairs.iter().all(Pair::is_validated)
    }

    fn ensure_reviewable(&self) -> IntakeResult<()> {
        if self.pairs.is_empty() {
            return Err(IntakeError::NoPairs);
        }
        match self.pairs.iter().position(|p| !p.is_validated()) {
            Some(index) => Err(IntakeError::PairsNotValidated {
                position: index + 1,
            }),
            None => Ok(()),
        }
    }

    /// Move to another step
    ///
    /// Allowed: Pairs→Review (all pairs validated), Review→Pairs,
    /// Review→Payment, Payment→Review.
    pub fn advance(&mut self, target: WizardStep) -> IntakeResult<StateTransition<WizardStep, StepEntry>> {
        let transition = moore_transition(&self.current_step, target, |from, to| {
            IntakeError::InvalidStepTransition {
                from: *from,
                to: *to,
            }
        })?;
        if self.current_step == WizardStep::Pairs && target == WizardStep::Review {
            self.ensure_reviewable()?;
        }

        self.current_step = target;
        self.record(DraftChange::StepChanged {
            from: transition.from,
            to: transition.to,
        });
        Ok(transition)
    }

    /// Replace the client contact fields
    pub fn set_client_info(&mut self, info: ClientInfo) {
        if info != self.client_info {
            self.client_info = info;
            self.record(DraftChange::ClientInfoUpdated);
        }
    }

    /// Build the transport-ready order
    ///
    /// Every pair must be validated; the payload keeps the pair order.
    pub fn submit(&mut self) -> IntakeResult<OrderPayload> {
        self.ensure_reviewable()?;

        let mut paires = Vec::with_capacity(self.pairs.len());
        for (index, pair) in self.pairs.iter().enumerate() {
            // validated pairs are complete, so the category is set
            let type_chaussure = pair.category().ok_or(IntakeError::IncompletePair {
                position: index + 1,
                missing: crate::pair::MissingRequirement::Category,
            })?;
            paires.push(PairPayload {
                type_chaussure,
                photo_url: pair.photo().map(|p| p.url.clone()),
                photo_filename: pair.photo().map(|p| p.filename.clone()),
                description: Some(pair.note().to_string()).filter(|n| !n.is_empty()),
                prestations: pair.selected_services().iter().copied().collect(),
            });
        }

        let info = &self.client_info;
        let payload = OrderPayload {
            nom: info.name.trim().to_string(),
            email: info.email.trim().to_string(),
            telephone: info.phone.trim().to_string(),
            entreprise: info
                .company
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            paires,
        };
        self.record(DraftChange::OrderSubmitted {
            pair_count: payload.paires.len(),
        });
        Ok(payload)
    }
}
