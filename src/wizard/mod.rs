// Copyright 2025 Cowboy AI, LLC.

//! The three-step order wizard
//!
//! - [`step`]: the step pointer and its allowed moves
//! - [`commands`]: serializable user actions
//! - [`session`]: the per-customer handle tying draft, catalog, persistence
//!   and transports together

pub mod commands;
pub mod session;
pub mod step;

pub use commands::{CommandOutcome, WizardCommand};
pub use session::{PhotoUploadTicket, SubmissionOutcome, SubmissionTicket, WizardSession};
pub use step::{StepEntry, WizardStep};
