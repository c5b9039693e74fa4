// Copyright 2025 Cowboy AI, LLC.

//! Wizard session: one customer's draft plus its collaborators
//!
//! The session applies user actions to the draft, saves the draft after
//! every change and guards the two flows that suspend on external I/O.
//!
//! Both flows are split in two so that no borrow of the session is held
//! while a request is pending:
//!
//! ```text
//! begin_photo_upload ──► transport.upload_photo ──► finish_photo_upload
//! begin_submission   ──► ticket.send(transport) ──► finish_submission
//! ```
//!
//! While a flow is between its `begin_*` and `finish_*` calls, a second
//! `begin_*` of the same kind fails with [`IntakeError::OperationInFlight`].

use super::commands::{CommandOutcome, WizardCommand};
use super::step::WizardStep;
use crate::catalog::{Catalog, Category};
use crate::client::{ClientInfo, ClientInfoValidator};
use crate::config::{IntakeConfig, PhotoSettings};
use crate::draft::OrderDraft;
use crate::entity::{AggregateRoot, PairId};
use crate::errors::{IntakeError, IntakeResult};
use crate::events::DraftEvent;
use crate::pair::{MissingRequirement, PhotoRef};
use crate::persistence::{PersistenceGateway, SnapshotStore};
use crate::projections::{draft_view, project, DraftView, Recap};
use crate::transport::{
    ImageCompressor, IntakeTransport, OperationKind, OrderPayload, PhotoCapture, TransportError,
    UploadPhotoRequest, UploadPhotoResponse,
};
use tracing::{debug, info, warn};

/// A photo upload that has been prepared and awaits the transport
#[derive(Debug)]
pub struct PhotoUploadTicket {
    pair_id: PairId,
    request: UploadPhotoRequest,
}

impl PhotoUploadTicket {
    /// Pair the photo is for
    pub fn pair_id(&self) -> PairId {
        self.pair_id
    }

    /// Body to send to the upload endpoint
    pub fn request(&self) -> &UploadPhotoRequest {
        &self.request
    }
}

#[derive(Debug)]
enum SubmissionStage {
    CreateOrder(OrderPayload),
    RetryCheckout { order_id: i64 },
}

/// A submission that has been prepared and awaits the transport
#[derive(Debug)]
pub struct SubmissionTicket {
    stage: SubmissionStage,
    draft_version: u64,
}

impl SubmissionTicket {
    /// Order payload, absent when only the checkout is retried
    pub fn payload(&self) -> Option<&OrderPayload> {
        match &self.stage {
            SubmissionStage::CreateOrder(payload) => Some(payload),
            SubmissionStage::RetryCheckout { .. } => None,
        }
    }

    /// Whether this ticket reuses an order created by an earlier attempt
    pub fn is_checkout_retry(&self) -> bool {
        matches!(self.stage, SubmissionStage::RetryCheckout { .. })
    }

    /// Perform the transport calls
    pub async fn send(&self, transport: &dyn IntakeTransport) -> SubmissionOutcome {
        let order_id = match &self.stage {
            SubmissionStage::CreateOrder(payload) => {
                match transport.create_order(payload.clone()).await {
                    Ok(created) => created.commande.id,
                    Err(error) => return SubmissionOutcome::OrderFailed(error),
                }
            }
            SubmissionStage::RetryCheckout { order_id } => *order_id,
        };

        match transport.create_checkout(order_id).await {
            Ok(session) => SubmissionOutcome::Completed {
                order_id,
                checkout_url: session.checkout_url,
            },
            Err(error) => SubmissionOutcome::CheckoutFailed { order_id, error },
        }
    }
}

/// Result of the transport calls of a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Order created and checkout session opened
    Completed {
        /// Server-side order id
        order_id: i64,
        /// Where to send the customer
        checkout_url: String,
    },
    /// Order created but no checkout session
    CheckoutFailed {
        /// Server-side order id
        order_id: i64,
        /// Checkout failure
        error: TransportError,
    },
    /// Order creation failed
    OrderFailed(TransportError),
}

#[derive(Debug, Clone, Copy)]
struct PendingOrder {
    order_id: i64,
    draft_version: u64,
}

/// One customer's wizard
///
/// Draft events are buffered, not consumed, by the session: front ends that
/// react to them drain them with [`WizardSession::take_events`]. The buffer
/// keeps at most [`MAX_PENDING_EVENTS`](crate::MAX_PENDING_EVENTS)
/// entries.
pub struct WizardSession<S: SnapshotStore> {
    draft: OrderDraft,
    catalog: Catalog,
    gateway: PersistenceGateway<S>,
    photo: PhotoSettings,
    recap: Option<Recap>,
    upload_in_flight: Option<PairId>,
    submission_in_flight: bool,
    pending_order: Option<PendingOrder>,
}

impl<S: SnapshotStore> WizardSession<S> {
    /// Resume the saved draft when there is a fresh one, else start over
    pub fn open(catalog: Catalog, gateway: PersistenceGateway<S>, photo: PhotoSettings) -> Self {
        let draft = match gateway.load(&catalog) {
            Some(draft) => {
                debug!(pairs = draft.pairs().len(), step = %draft.current_step(), "draft restored");
                draft
            }
            None => OrderDraft::new(),
        };
        Self::with_draft(draft, catalog, gateway, photo)
    }

    /// Open a session on `store` using the configured key, TTL and photo settings
    pub fn from_config(catalog: Catalog, store: S, config: &IntakeConfig) -> Self {
        let gateway = PersistenceGateway::with_settings(
            store,
            config.persistence.key.clone(),
            config.persistence.ttl(),
        );
        Self::open(catalog, gateway, config.photo)
    }

    /// Session around an existing draft
    pub fn with_draft(
        draft: OrderDraft,
        catalog: Catalog,
        gateway: PersistenceGateway<S>,
        photo: PhotoSettings,
    ) -> Self {
        let recap = (draft.current_step() != WizardStep::Pairs)
            .then(|| project(draft.pairs(), &catalog));
        Self {
            draft,
            catalog,
            gateway,
            photo,
            recap,
            upload_in_flight: None,
            submission_in_flight: false,
            pending_order: None,
        }
    }

    /// The draft
    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// The service catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The persistence gateway
    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    /// Recap computed when Review was last entered
    pub fn recap(&self) -> Option<&Recap> {
        self.recap.as_ref()
    }

    /// Order created by a submission whose checkout failed
    pub fn pending_order_id(&self) -> Option<i64> {
        self.pending_order.map(|p| p.order_id)
    }

    /// Current render-on-read projection
    pub fn view(&self) -> DraftView {
        draft_view(&self.draft, &self.catalog)
    }

    /// Drain the draft events recorded since the last call
    pub fn take_events(&mut self) -> Vec<DraftEvent> {
        self.draft.take_events()
    }

    /// Whether an operation of `kind` awaits its I/O
    pub fn is_busy(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::PhotoUpload => self.upload_in_flight.is_some(),
            OperationKind::Submission => self.submission_in_flight,
        }
    }

    // Common tail of every mutation: drop a pending order the draft has
    // moved past and a recap the draft has left, then save.
    fn touch(&mut self) {
        if self.draft.current_step() == WizardStep::Pairs {
            self.recap = None;
        }
        if let Some(pending) = self.pending_order {
            if pending.draft_version != self.draft.version() {
                warn!(
                    order_id = pending.order_id,
                    "draft changed after order creation, a new order will be created"
                );
                self.pending_order = None;
            }
        }
        self.gateway.save(&self.draft);
    }

    fn apply<T>(
        &mut self,
        change: impl FnOnce(&mut OrderDraft, &Catalog) -> IntakeResult<T>,
    ) -> IntakeResult<T> {
        let result = change(&mut self.draft, &self.catalog);
        if result.is_ok() {
            self.touch();
        }
        result
    }

    /// Append a new empty pair
    pub fn add_pair(&mut self) -> PairId {
        let pair_id = self.draft.add_pair();
        self.touch();
        pair_id
    }

    /// Remove a pair
    pub fn remove_pair(&mut self, pair_id: PairId) -> IntakeResult<()> {
        self.apply(|draft, _| draft.remove_pair(pair_id))
    }

    /// Choose a pair's category
    pub fn set_category(&mut self, pair_id: PairId, category: Category) -> IntakeResult<()> {
        self.apply(|draft, _| draft.set_category(pair_id, category))
    }

    /// Toggle a service; returns whether it is selected now
    pub fn toggle_service(&mut self, pair_id: PairId, service_id: i64) -> IntakeResult<bool> {
        self.apply(|draft, catalog| draft.toggle_service(pair_id, service_id, catalog))
    }

    /// Attach an already uploaded photo
    pub fn set_photo(&mut self, pair_id: PairId, photo: PhotoRef) -> IntakeResult<bool> {
        self.apply(|draft, _| draft.set_photo(pair_id, photo))
    }

    /// Edit a pair's note
    pub fn set_note(&mut self, pair_id: PairId, text: impl Into<String>) -> IntakeResult<()> {
        self.apply(|draft, catalog| draft.set_note(pair_id, text, catalog))
    }

    /// Validate and collapse a pair
    pub fn validate_pair(&mut self, pair_id: PairId) -> IntakeResult<()> {
        self.apply(|draft, _| draft.validate_pair(pair_id))
    }

    /// Reopen a validated pair
    pub fn edit_pair(&mut self, pair_id: PairId) -> IntakeResult<()> {
        self.apply(|draft, _| draft.edit_pair(pair_id))
    }

    /// Replace the client contact fields
    pub fn set_client_info(&mut self, info: ClientInfo) {
        self.draft.set_client_info(info);
        self.touch();
    }

    /// Move to another step; entering Review recomputes the recap
    pub fn advance(&mut self, target: WizardStep) -> IntakeResult<WizardStep> {
        let transition = self.draft.advance(target)?;
        if transition.output.recompute_recap {
            self.recap = Some(project(self.draft.pairs(), &self.catalog));
        }
        self.touch();
        Ok(transition.to)
    }

    /// Apply a command
    pub fn execute(&mut self, command: WizardCommand) -> IntakeResult<CommandOutcome> {
        debug!(command = command.name(), "executing wizard command");
        let outcome = match command {
            WizardCommand::AddPair => CommandOutcome::PairAdded {
                pair_id: self.add_pair(),
            },
            WizardCommand::RemovePair { pair_id } => {
                self.remove_pair(pair_id)?;
                CommandOutcome::Applied
            }
            WizardCommand::SetCategory { pair_id, category } => {
                self.set_category(pair_id, category)?;
                CommandOutcome::Applied
            }
            WizardCommand::ToggleService {
                pair_id,
                service_id,
            } => CommandOutcome::ServiceToggled {
                selected: self.toggle_service(pair_id, service_id)?,
            },
            WizardCommand::SetPhoto { pair_id, photo } => CommandOutcome::PhotoSet {
                attached: self.set_photo(pair_id, photo)?,
            },
            WizardCommand::SetNote { pair_id, text } => {
                self.set_note(pair_id, text)?;
                CommandOutcome::Applied
            }
            WizardCommand::ValidatePair { pair_id } => {
                self.validate_pair(pair_id)?;
                CommandOutcome::Applied
            }
            WizardCommand::EditPair { pair_id } => {
                self.edit_pair(pair_id)?;
                CommandOutcome::Applied
            }
            WizardCommand::Advance { step } => CommandOutcome::StepChanged {
                step: self.advance(step)?,
            },
            WizardCommand::SetClientInfo { info } => {
                self.set_client_info(info);
                CommandOutcome::Applied
            }
        };
        Ok(outcome)
    }

    /// Start over with a fresh draft and forget the saved one
    pub fn reset(&mut self) {
        self.gateway.clear();
        self.draft = OrderDraft::new();
        self.recap = None;
        self.pending_order = None;
    }

    /// Capture and compress the photo for `pair_id`
    ///
    /// The pair must be editable and have at least one service selected.
    pub fn begin_photo_upload(
        &mut self,
        pair_id: PairId,
        capture: &dyn PhotoCapture,
        compressor: &dyn ImageCompressor,
    ) -> IntakeResult<PhotoUploadTicket> {
        if self.upload_in_flight.is_some() {
            return Err(IntakeError::OperationInFlight(OperationKind::PhotoUpload));
        }
        let pair = self
            .draft
            .pair(pair_id)
            .ok_or(IntakeError::PairNotFound(pair_id))?;
        if pair.is_validated() {
            return Err(IntakeError::PairLocked(pair_id));
        }
        if !pair.accepts_photo() {
            return Err(IntakeError::IncompletePair {
                position: self.draft.position_of(pair_id).unwrap_or(0),
                missing: pair
                    .missing_requirement()
                    .unwrap_or(MissingRequirement::Services),
            });
        }
        if !capture.has_photo() {
            return Err(IntakeError::NoPhotoCaptured);
        }

        let data_url = capture.photo_data_url()?;
        let photo = compressor.compress(
            &data_url,
            self.photo.quality,
            self.photo.max_width,
            self.photo.max_height,
        )?;

        self.upload_in_flight = Some(pair_id);
        debug!(%pair_id, bytes = photo.len(), "photo upload started");
        Ok(PhotoUploadTicket {
            pair_id,
            request: UploadPhotoRequest { photo },
        })
    }

    /// Record the upload result; returns the photo when the pair took it
    ///
    /// The guard is released whatever the result. A pair that lost its
    /// services while the upload was pending keeps no photo.
    pub fn finish_photo_upload(
        &mut self,
        ticket: PhotoUploadTicket,
        result: Result<UploadPhotoResponse, TransportError>,
    ) -> IntakeResult<Option<PhotoRef>> {
        self.upload_in_flight = None;

        let response = result.map_err(|source| {
            warn!(pair_id = %ticket.pair_id, error = %source, "photo upload failed");
            IntakeError::Transport {
                operation: OperationKind::PhotoUpload,
                source,
            }
        })?;
        let photo = PhotoRef {
            url: response.photo_url,
            filename: response.filename,
        };
        let attached = self.set_photo(ticket.pair_id, photo.clone())?;
        Ok(attached.then_some(photo))
    }

    /// Capture, compress, upload and attach in one go
    pub async fn confirm_photo(
        &mut self,
        pair_id: PairId,
        capture: &dyn PhotoCapture,
        compressor: &dyn ImageCompressor,
        transport: &dyn IntakeTransport,
    ) -> IntakeResult<Option<PhotoRef>> {
        let ticket = self.begin_photo_upload(pair_id, capture, compressor)?;
        let result = transport.upload_photo(ticket.request().clone()).await;
        self.finish_photo_upload(ticket, result)
    }

    /// Check the draft and the client form, then prepare the order
    ///
    /// When an earlier attempt created the order but not the checkout and
    /// the draft has not changed since, only the checkout is retried.
    pub fn begin_submission(
        &mut self,
        validator: &dyn ClientInfoValidator,
    ) -> IntakeResult<SubmissionTicket> {
        if self.submission_in_flight {
            return Err(IntakeError::OperationInFlight(OperationKind::Submission));
        }

        let invalid = validator.invalid_fields(self.draft.client_info());
        if !invalid.is_empty() {
            let fields: Vec<String> = invalid.iter().map(ToString::to_string).collect();
            debug!(fields = ?fields, "client form rejected");
            return Err(IntakeError::InvalidClientInfo(fields.join(", ")));
        }

        let ticket = match self.pending_order {
            Some(pending) if pending.draft_version == self.draft.version() => {
                debug!(order_id = pending.order_id, "retrying checkout for existing order");
                SubmissionTicket {
                    stage: SubmissionStage::RetryCheckout {
                        order_id: pending.order_id,
                    },
                    draft_version: pending.draft_version,
                }
            }
            _ => {
                self.pending_order = None;
                let payload = self.draft.submit()?;
                SubmissionTicket {
                    stage: SubmissionStage::CreateOrder(payload),
                    draft_version: self.draft.version(),
                }
            }
        };

        self.submission_in_flight = true;
        Ok(ticket)
    }

    /// Record the submission result; returns the checkout URL
    ///
    /// On success the saved draft is cleared. When only the checkout
    /// failed the created order is kept for the next attempt.
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: SubmissionOutcome,
    ) -> IntakeResult<String> {
        self.submission_in_flight = false;

        match outcome {
            SubmissionOutcome::Completed {
                order_id,
                checkout_url,
            } => {
                info!(order_id, pairs = self.draft.pairs().len(), "order submitted");
                self.pending_order = None;
                self.gateway.clear();
                Ok(checkout_url)
            }
            SubmissionOutcome::CheckoutFailed { order_id, error } => {
                warn!(order_id, error = %error, "checkout creation failed, order kept for retry");
                if ticket.draft_version == self.draft.version() {
                    self.pending_order = Some(PendingOrder {
                        order_id,
                        draft_version: ticket.draft_version,
                    });
                }
                Err(IntakeError::Transport {
                    operation: OperationKind::Submission,
                    source: error,
                })
            }
            SubmissionOutcome::OrderFailed(error) => {
                warn!(error = %error, "order creation failed");
                Err(IntakeError::Transport {
                    operation: OperationKind::Submission,
                    source: error,
                })
            }
        }
    }

    /// Validate, create the order and open checkout in one go
    pub async fn submit(
        &mut self,
        transport: &dyn IntakeTransport,
        validator: &dyn ClientInfoValidator,
    ) -> IntakeResult<String> {
        let ticket = self.begin_submission(validator)?;
        let outcome = ticket.send(transport).await;
        self.finish_submission(ticket, outcome)
    }
}
