mod common;

use common::{catalog, client, complete_pair, photo, session};
use cordo_intake::projections::project;
use cordo_intake::{
    Category, InMemorySnapshotStore, IntakeError, MissingRequirement, OrderDraft, PairStatus,
    WizardCommand, WizardStep,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

#[test]
fn fresh_draft_after_add_pair_has_a_single_unvalidated_pair() {
    let mut draft = OrderDraft::empty();
    draft.add_pair();

    assert_eq!(draft.pairs().len(), 1);
    assert_eq!(draft.current_step(), WizardStep::Pairs);
    assert_eq!(draft.current_step().number(), 1);
    assert!(!draft.pairs()[0].is_validated());
}

#[test]
fn womens_pair_with_two_services_prices_to_their_sum() {
    let catalog = catalog();
    let mut draft = OrderDraft::new();
    let id = draft.pairs()[0].id();
    draft.set_category(id, Category::Women).unwrap();
    draft.toggle_service(id, 10, &catalog).unwrap();
    draft.toggle_service(id, 11, &catalog).unwrap();
    draft.set_photo(id, photo("w.jpg")).unwrap();

    draft.validate_pair(id).unwrap();

    let recap = project(draft.pairs(), &catalog);
    assert_eq!(recap.per_pair[0].subtotal, Decimal::new(2500, 2));
    assert_eq!(recap.total, Decimal::new(2500, 2));
}

#[test]
fn changing_category_after_edit_clears_services_and_photo() {
    let mut session = session(InMemorySnapshotStore::new());
    let id = session.draft().pairs()[0].id();
    complete_pair(&mut session, id, Category::Women, &[10]);

    assert!(matches!(
        session.set_category(id, Category::Men),
        Err(IntakeError::PairLocked(_))
    ));

    session.edit_pair(id).unwrap();
    session.set_category(id, Category::Men).unwrap();

    let pair = session.draft().pair(id).unwrap();
    assert!(pair.selected_services().is_empty());
    assert!(pair.photo().is_none());
    assert!(!pair.is_validated());
    assert_eq!(pair.status(), PairStatus::Editing);
    assert_eq!(pair.missing_requirement(), Some(MissingRequirement::Services));
}

#[test]
fn complete_pair_gates_review_only_once_validated() {
    let mut session = session(InMemorySnapshotStore::new());
    let id = session.draft().pairs()[0].id();
    session.set_category(id, Category::Men).unwrap();
    session.toggle_service(id, 1).unwrap();
    session.set_photo(id, photo("m.jpg")).unwrap();

    assert!(session.draft().pair(id).unwrap().is_complete());
    assert!(!session.draft().can_advance_to_review());
    assert!(!session.view().can_advance_to_review);

    session.validate_pair(id).unwrap();
    assert!(session.draft().can_advance_to_review());
    assert!(session.view().can_advance_to_review);
}

#[test]
fn note_service_is_priced_and_removing_it_clears_the_note() {
    let mut session = session(InMemorySnapshotStore::new());
    let first = session.draft().pairs()[0].id();
    complete_pair(&mut session, first, Category::Women, &[11]);

    let second = session.add_pair();
    session.set_category(second, Category::Men).unwrap();
    session.toggle_service(second, 2).unwrap();
    session.toggle_service(second, 3).unwrap();
    session.set_note(second, "scuffed heel").unwrap();
    assert!(session.view().pairs[1].note_visible);

    let recap = project(session.draft().pairs(), session.catalog());
    assert_eq!(recap.per_pair[1].line_items.len(), 2);
    assert_eq!(recap.per_pair[1].subtotal, Decimal::new(2250, 2));
    assert_eq!(recap.per_pair[1].note.as_deref(), Some("scuffed heel"));
    assert_eq!(recap.total, Decimal::new(3750, 2));

    session.toggle_service(second, 3).unwrap();
    let pair = session.draft().pair(second).unwrap();
    assert_eq!(pair.note(), "");
    assert!(!session.view().pairs[1].note_visible);
}

#[test]
fn note_is_dropped_when_no_selected_service_asks_for_it() {
    let mut session = session(InMemorySnapshotStore::new());
    let id = session.draft().pairs()[0].id();
    session.set_category(id, Category::Men).unwrap();
    session.toggle_service(id, 1).unwrap();

    session.set_note(id, "ignored").unwrap();
    assert_eq!(session.draft().pair(id).unwrap().note(), "");
}

#[test]
fn services_of_the_other_category_are_refused() {
    let mut session = session(InMemorySnapshotStore::new());
    let id = session.draft().pairs()[0].id();
    session.set_category(id, Category::Men).unwrap();

    let err = session.toggle_service(id, 10).unwrap_err();
    assert!(err.is_validation_error());
    assert!(session.draft().pair(id).unwrap().selected_services().is_empty());
}

#[test]
fn walking_the_whole_wizard_with_commands() {
    let mut session = session(InMemorySnapshotStore::new());
    let pair_id = session.draft().pairs()[0].id();

    let commands = vec![
        WizardCommand::SetCategory {
            pair_id,
            category: Category::Women,
        },
        WizardCommand::ToggleService {
            pair_id,
            service_id: 12,
        },
        WizardCommand::SetNote {
            pair_id,
            text: "bottes en daim".into(),
        },
        WizardCommand::SetPhoto {
            pair_id,
            photo: photo("daim.jpg"),
        },
        WizardCommand::ValidatePair { pair_id },
        WizardCommand::Advance {
            step: WizardStep::Review,
        },
        WizardCommand::Advance {
            step: WizardStep::Payment,
        },
        WizardCommand::SetClientInfo { info: client() },
    ];
    for command in commands {
        session.execute(command).unwrap();
    }

    assert_eq!(session.draft().current_step(), WizardStep::Payment);
    assert_eq!(session.recap().unwrap().total, Decimal::new(3000, 2));

    // back from payment to review and on to pairs
    session.advance(WizardStep::Review).unwrap();
    session.advance(WizardStep::Pairs).unwrap();
    assert!(matches!(
        session.advance(WizardStep::Payment),
        Err(IntakeError::InvalidStepTransition { .. })
    ));
}

#[test]
fn validation_failures_name_the_pair() {
    let mut session = session(InMemorySnapshotStore::new());
    let first = session.draft().pairs()[0].id();
    complete_pair(&mut session, first, Category::Men, &[1]);
    let second = session.add_pair();
    session.set_category(second, Category::Men).unwrap();
    session.toggle_service(second, 1).unwrap();

    let err = session.validate_pair(second).unwrap_err();
    assert_eq!(err.user_message(), "Ajoutez une photo pour la paire 2");

    let err = session.advance(WizardStep::Review).unwrap_err();
    assert_eq!(err.user_message(), "Validez la paire 2 avant de continuer");
}

#[test]
fn removing_every_pair_leaves_one_fresh_pair() {
    let mut session = session(InMemorySnapshotStore::new());
    let first = session.draft().pairs()[0].id();
    let second = session.add_pair();

    session.remove_pair(first).unwrap();
    session.remove_pair(second).unwrap();

    let pairs = session.draft().pairs();
    assert_eq!(pairs.len(), 1);
    assert_ne!(pairs[0].id(), first);
    assert_ne!(pairs[0].id(), second);
    assert!(pairs[0].category().is_none());
}
