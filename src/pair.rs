// Copyright 2025 Cowboy AI, LLC.

//! Pair entity and its lifecycle
//!
//! A pair is one line item of the order. Its lifecycle is a small Mealy
//! machine:
//!
//! ```text
//! Editing --Validate (complete)--> ValidatedCollapsed --Edit--> Editing
//! ```
//!
//! While validated, the content mutators are locked so that a validated
//! pair is always complete.

use crate::catalog::{Catalog, Category};
use crate::entity::PairId;
use crate::errors::{IntakeError, IntakeResult};
use crate::state_machine::{MealyStateTransitions, State, TransitionInput};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Reference to an uploaded photo
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoRef {
    /// Public URL returned by the upload
    pub url: String,
    /// Stored file name returned by the upload
    pub filename: String,
}

/// Sub-conditions of the completeness predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissingRequirement {
    /// No category chosen
    Category,
    /// No service selected
    Services,
    /// No photo attached
    Photo,
}

impl MissingRequirement {
    /// Message shown next to the pair itself
    pub fn user_message(&self) -> &'static str {
        match self {
            MissingRequirement::Category => "Sélectionnez le type de chaussure",
            MissingRequirement::Services => "Sélectionnez au moins un service",
            MissingRequirement::Photo => "Prenez une photo de cette paire",
        }
    }
}

impl fmt::Display for MissingRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissingRequirement::Category => "category",
            MissingRequirement::Services => "services",
            MissingRequirement::Photo => "photo",
        })
    }
}

/// Lifecycle status of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairStatus {
    /// Fields can be changed
    Editing,
    /// Explicitly confirmed complete and shown collapsed
    ValidatedCollapsed,
}

impl State for PairStatus {
    fn name(&self) -> &'static str {
        match self {
            PairStatus::Editing => "Editing",
            PairStatus::ValidatedCollapsed => "ValidatedCollapsed",
        }
    }
}

/// Inputs driving the pair lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairInput {
    /// Confirm the pair; carries whether the completeness predicate holds
    Validate {
        /// Result of the completeness predicate
        complete: bool,
    },
    /// Reopen the pair for editing
    Edit,
}

impl TransitionInput for PairInput {
    fn description(&self) -> String {
        format!("{self:?}")
    }
}

impl MealyStateTransitions for PairStatus {
    type Input = PairInput;
    type Output = ();

    fn can_transition_to(&self, target: &Self, input: &Self::Input) -> bool {
        use PairInput as I;
        use PairStatus as S;
        matches!(
            (*self, *target, *input),
            (S::Editing, S::ValidatedCollapsed, I::Validate { complete: true })
                | (S::ValidatedCollapsed, S::ValidatedCollapsed, I::Validate { complete: true })
                | (S::ValidatedCollapsed, S::Editing, I::Edit)
                | (S::Editing, S::Editing, I::Edit)
        )
    }

    fn valid_transitions(&self, input: &Self::Input) -> Vec<Self> {
        match input {
            PairInput::Validate { complete: true } => vec![PairStatus::ValidatedCollapsed],
            PairInput::Validate { complete: false } => Vec::new(),
            PairInput::Edit => vec![PairStatus::Editing],
        }
    }

    fn transition_output(&self, _target: &Self, _input: &Self::Input) -> Self::Output {}
}

/// One pair of shoes in the order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    id: PairId,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    selected_service_ids: IndexSet<i64>,
    #[serde(default)]
    photo_ref: Option<PhotoRef>,
    #[serde(default)]
    note: String,
    #[serde(default)]
    validated: bool,
    #[serde(default)]
    collapsed: bool,
}

impl Default for Pair {
    fn default() -> Self {
        Self::new()
    }
}

impl Pair {
    /// Create an editable, empty pair with a fresh id
    pub fn new() -> Self {
        Self {
            id: PairId::new(),
            category: None,
            selected_service_ids: IndexSet::new(),
            photo_ref: None,
            note: String::new(),
            validated: false,
            collapsed: false,
        }
    }

    /// Stable identity
    pub fn id(&self) -> PairId {
        self.id
    }

    /// Chosen category, if any
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Selected service ids in selection order
    pub fn selected_services(&self) -> &IndexSet<i64> {
        &self.selected_service_ids
    }

    /// Attached photo, if any
    pub fn photo(&self) -> Option<&PhotoRef> {
        self.photo_ref.as_ref()
    }

    /// Free-text note
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Whether the customer confirmed this pair
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Whether the pair is shown collapsed
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Current lifecycle status
    pub fn status(&self) -> PairStatus {
        if self.validated {
            PairStatus::ValidatedCollapsed
        } else {
            PairStatus::Editing
        }
    }

    /// First unmet part of the completeness predicate
    pub fn missing_requirement(&self) -> Option<MissingRequirement> {
        if self.category.is_none() {
            Some(MissingRequirement::Category)
        } else if self.selected_service_ids.is_empty() {
            Some(MissingRequirement::Services)
        } else if self.photo_ref.is_none() {
            Some(MissingRequirement::Photo)
        } else {
            None
        }
    }

    /// Category set, at least one service, photo present
    pub fn is_complete(&self) -> bool {
        self.missing_requirement().is_none()
    }

    /// Whether any selected service asks for a note
    pub fn note_required(&self, catalog: &Catalog) -> bool {
        self.selected_service_ids
            .iter()
            .any(|id| catalog.requires_note(*id))
    }

    /// Whether a photo may be attached now
    pub fn accepts_photo(&self) -> bool {
        !self.validated && !self.selected_service_ids.is_empty()
    }

    fn ensure_editable(&self) -> IntakeResult<()> {
        if self.validated {
            Err(IntakeError::PairLocked(self.id))
        } else {
            Ok(())
        }
    }

    /// Change the category; services, photo and note are cleared
    pub fn set_category(&mut self, category: Category) -> IntakeResult<()> {
        self.ensure_editable()?;
        self.category = Some(category);
        self.selected_service_ids.clear();
        self.photo_ref = None;
        self.note.clear();
        Ok(())
    }

    /// Add the service when absent, remove it when present
    ///
    /// Returns `true` when the service is selected afterwards. Removing a
    /// stale id is always possible; adding requires the catalog to offer
    /// the id for the pair's category.
    pub fn toggle_service(&mut self, service_id: i64, catalog: &Catalog) -> IntakeResult<bool> {
        self.ensure_editable()?;

        let selected = if self.selected_service_ids.shift_remove(&service_id) {
            false
        } else {
            match self.category {
                Some(category) if catalog.offers(category, service_id) => {
                    self.selected_service_ids.insert(service_id);
                    true
                }
                category => {
                    return Err(IntakeError::ServiceNotOffered {
                        service_id,
                        category,
                    })
                }
            }
        };

        self.reconcile(catalog);
        Ok(selected)
    }

    /// Attach a photo; ignored while no service is selected
    ///
    /// Returns whether the photo was attached.
    pub fn set_photo(&mut self, photo: PhotoRef) -> IntakeResult<bool> {
        self.ensure_editable()?;
        if self.selected_service_ids.is_empty() {
            debug!(pair_id = %self.id, "photo ignored: no service selected");
            return Ok(false);
        }
        self.photo_ref = Some(photo);
        Ok(true)
    }

    /// Store the note when one is required, otherwise force it empty
    pub fn set_note(&mut self, text: impl Into<String>, catalog: &Catalog) -> IntakeResult<()> {
        self.ensure_editable()?;
        if self.note_required(catalog) {
            self.note = text.into();
        } else {
            self.note.clear();
        }
        Ok(())
    }

    /// Confirm the pair when the completeness predicate holds
    pub fn validate(&mut self) -> Result<(), MissingRequirement> {
        if let Some(missing) = self.missing_requirement() {
            return Err(missing);
        }
        let input = PairInput::Validate { complete: true };
        debug_assert!(self
            .status()
            .can_transition_to(&PairStatus::ValidatedCollapsed, &input));
        self.validated = true;
        self.collapsed = true;
        Ok(())
    }

    /// Reopen the pair for editing; idempotent
    pub fn edit(&mut self) {
        self.validated = false;
        self.collapsed = false;
    }

    // Derived clean-up after the service selection changed.
    fn reconcile(&mut self, catalog: &Catalog) {
        if !self.note_required(catalog) {
            self.note.clear();
        }
        if self.selected_service_ids.is_empty() {
            self.photo_ref = None;
        }
    }

    /// Repair a pair restored from an untrusted snapshot
    ///
    /// Returns `true` when anything was changed.
    pub fn normalize(&mut self, catalog: &Catalog) -> bool {
        let before = self.clone();

        // Stale ids stay; ids known to belong to the other category go.
        match self.category {
            None => self.selected_service_ids.clear(),
            Some(category) => self
                .selected_service_ids
                .retain(|id| catalog.lookup(*id).map_or(true, |s| s.category == category)),
        }
        self.reconcile(catalog);
        if self.validated && !self.is_complete() {
            self.validated = false;
        }
        if !self.validated {
            self.collapsed = false;
        }

        *self != before
    }

    /// Give the pair a fresh id, for restored pairs whose id is taken
    pub(crate) fn reassign_id(&mut self) {
        self.id = PairId::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Service;
    use rust_decimal::Decimal;

    fn catalog() -> Catalog {
        Catalog::from_services(vec![
            Service {
                id: 1,
                name: "Talon classique".into(),
                description: None,
                price: Decimal::new(2200, 2),
                category: Category::Men,
                requires_note: false,
            },
            Service {
                id: 2,
                name: "Autre".into(),
                description: None,
                price: Decimal::ZERO,
                category: Category::Men,
                requires_note: true,
            },
            Service {
                id: 3,
                name: "Patin".into(),
                description: None,
                price: Decimal::new(1500, 2),
                category: Category::Women,
                requires_note: false,
            },
        ])
    }

    fn photo() -> PhotoRef {
        PhotoRef {
            url: "https://cdn.example/p.jpg".into(),
            filename: "p.jpg".into(),
        }
    }

    #[test]
    fn test_new_pair_is_editable() {
        let pair = Pair::new();
        assert_eq!(pair.status(), PairStatus::Editing);
        assert!(!pair.is_validated());
        assert!(!pair.is_collapsed());
        assert_eq!(pair.missing_requirement(), Some(MissingRequirement::Category));
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let catalog = catalog();
        let mut pair = Pair::new();
        pair.set_category(Category::Men).unwrap();

        assert!(pair.toggle_service(1, &catalog).unwrap());
        assert!(pair.selected_services().contains(&1));
        assert!(!pair.toggle_service(1, &catalog).unwrap());
        assert!(pair.selected_services().is_empty());
    }

    #[test]
    fn test_toggle_rejects_other_category_and_unset() {
        let catalog = catalog();
        let mut pair = Pair::new();
        assert!(matches!(
            pair.toggle_service(1, &catalog),
            Err(IntakeError::ServiceNotOffered { category: None, .. })
        ));

        pair.set_category(Category::Women).unwrap();
        assert!(pair.toggle_service(1, &catalog).is_err());
        assert!(pair.toggle_service(3, &catalog).unwrap());
    }

    #[test]
    fn test_photo_requires_a_service() {
        let catalog = catalog();
        let mut pair = Pair::new();
        pair.set_category(Category::Men).unwrap();
        assert!(!pair.set_photo(photo()).unwrap());
        assert!(pair.photo().is_none());

        pair.toggle_service(1, &catalog).unwrap();
        assert!(pair.set_photo(photo()).unwrap());
        assert_eq!(pair.photo(), Some(&photo()));

        // emptying the selection drops the photo
        pair.toggle_service(1, &catalog).unwrap();
        assert!(pair.photo().is_none());
    }

    #[test]
    fn test_note_only_kept_when_required() {
        let catalog = catalog();
        let mut pair = Pair::new();
        pair.set_category(Category::Men).unwrap();
        pair.toggle_service(1, &catalog).unwrap();

        pair.set_note("ignored", &catalog).unwrap();
        assert_eq!(pair.note(), "");

        pair.toggle_service(2, &catalog).unwrap();
        assert!(pair.note_required(&catalog));
        pair.set_note("scuffed heel", &catalog).unwrap();
        assert_eq!(pair.note(), "scuffed heel");

        pair.toggle_service(2, &catalog).unwrap();
        assert_eq!(pair.note(), "");
    }

    #[test]
    fn test_validate_reports_missing_in_order() {
        let catalog = catalog();
        let mut pair = Pair::new();
        assert_eq!(pair.validate(), Err(MissingRequirement::Category));

        pair.set_category(Category::Men).unwrap();
        assert_eq!(pair.validate(), Err(MissingRequirement::Services));

        pair.toggle_service(1, &catalog).unwrap();
        assert_eq!(pair.validate(), Err(MissingRequirement::Photo));

        pair.set_photo(photo()).unwrap();
        assert_eq!(pair.validate(), Ok(()));
        assert_eq!(pair.status(), PairStatus::ValidatedCollapsed);
        assert!(pair.is_collapsed());
    }

    #[test]
    fn test_validated_pair_is_locked_until_edit() {
        let catalog = catalog();
        let mut pair = Pair::new();
        pair.set_category(Category::Men).unwrap();
        pair.toggle_service(1, &catalog).unwrap();
        pair.set_photo(photo()).unwrap();
        pair.validate().unwrap();

        assert!(matches!(
            pair.set_category(Category::Women),
            Err(IntakeError::PairLocked(_))
        ));
        assert!(pair.toggle_service(1, &catalog).is_err());

        pair.edit();
        pair.edit();
        assert_eq!(pair.status(), PairStatus::Editing);
        pair.set_category(Category::Women).unwrap();
        assert!(pair.selected_services().is_empty());
        assert!(pair.photo().is_none());
    }

    #[test]
    fn test_status_machine_edges() {
        use PairInput as I;
        use PairStatus as S;
        assert!(S::Editing.can_transition_to(&S::ValidatedCollapsed, &I::Validate { complete: true }));
        assert!(!S::Editing.can_transition_to(&S::ValidatedCollapsed, &I::Validate { complete: false }));
        assert!(S::ValidatedCollapsed.can_transition_to(&S::Editing, &I::Edit));
        assert!(S::Editing.can_transition_to(&S::Editing, &I::Edit));
        assert!(S::Editing.valid_transitions(&I::Validate { complete: false }).is_empty());
        assert!(!S::ValidatedCollapsed.is_terminal());
    }

    #[test]
    fn test_normalize_repairs_inconsistent_snapshot() {
        let catalog = catalog();
        let json = serde_json::json!({
            "id": PairId::new(),
            "category": "HOMME",
            "selectedServiceIds": [3],
            "photoRef": {"url": "u", "filename": "f"},
            "note": "stale",
            "validated": true,
            "collapsed": true
        });
        let mut pair: Pair = serde_json::from_value(json).unwrap();

        assert!(pair.normalize(&catalog));
        assert!(pair.selected_services().is_empty());
        assert!(pair.photo().is_none());
        assert_eq!(pair.note(), "");
        assert!(!pair.is_validated());
        assert!(!pair.is_collapsed());
        assert!(!pair.normalize(&catalog));
    }
}
