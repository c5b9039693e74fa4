// Copyright 2025 Cowboy AI, LLC.

//! # Cordo Intake
//!
//! Order-intake wizard for a shoe-care service. A customer builds an order
//! of one or more pairs of shoes, picks services for each pair from a
//! catalog, photographs each pair, reviews a priced recap, and is handed
//! off to checkout.
//!
//! The crate provides the building blocks for that flow:
//! - **Catalog**: the read-only service list, indexed by id and category
//! - **Pairs**: line items with a completeness predicate and a
//!   validate/edit lifecycle
//! - **Order Draft**: the aggregate root owning the pairs, the client
//!   fields and the wizard step
//! - **Projections**: the priced recap and the render-on-read view
//! - **Persistence**: best-effort snapshots with a 24 hour freshness window
//! - **Wizard Session**: the per-customer handle driving the photo and
//!   submission flows over a caller-supplied transport
//!
//! ## Design Principles
//!
//! 1. **Single Source of Truth**: every view is derived from the draft on read
//! 2. **Controlled State**: step and pair moves go through state machines
//! 3. **Explicit Boundaries**: network, camera and storage are traits

#![warn(missing_docs)]

mod catalog;
mod client;
mod draft;
mod entity;
mod errors;
mod events;
mod pair;
mod state_machine;
mod transport;

pub mod config;
pub mod persistence;
pub mod projections;
pub mod telemetry;
pub mod wizard;

// Re-export core types
pub use catalog::{Catalog, CatalogSource, Category, Service, ServiceEntry};
pub use client::{
    is_valid_email, ClientField, ClientInfo, ClientInfoValidator, RequiredFieldsValidator,
};
pub use config::{IntakeConfig, LogFormat, LoggingSettings, PersistenceSettings, PhotoSettings};
pub use draft::{OrderDraft, MAX_PENDING_EVENTS};
pub use entity::{AggregateRoot, DraftId, DraftMarker, EntityId, PairId, PairMarker};
pub use errors::{IntakeError, IntakeResult};
pub use events::{DomainEvent, DraftChange, DraftEvent};
pub use pair::{MissingRequirement, Pair, PairInput, PairStatus, PhotoRef};
pub use persistence::{
    DraftSnapshot, FileSnapshotStore, InMemorySnapshotStore, PersistenceGateway, SnapshotError,
    SnapshotStore,
};
pub use projections::{format_price, DraftView, LineItem, PairRecap, PairView, Recap};
pub use state_machine::{
    moore_transition, MealyStateTransitions, MooreStateTransitions, State, StateTransition,
    TransitionInput, TransitionOutput,
};
pub use transport::{
    check_picked_file, CaptureError, CheckoutSession, CreatedOrder, ImageCompressor,
    IntakeTransport, OperationKind, OrderCreated, OrderPayload, PairPayload, PassthroughCompressor,
    PhotoCapture, TransportError, UploadPhotoRequest, UploadPhotoResponse, MAX_PICKED_FILE_BYTES,
};
pub use wizard::{
    CommandOutcome, PhotoUploadTicket, StepEntry, SubmissionOutcome, SubmissionTicket,
    WizardCommand, WizardSession, WizardStep,
};
