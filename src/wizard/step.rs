// Copyright 2025 Cowboy AI, LLC.

//! Wizard step pointer (Moore machine)

use crate::state_machine::{MooreStateTransitions, State, TransitionOutput};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three steps of the order wizard
///
/// Serialized as its step number so snapshots read `"currentStep": 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    /// Step 1: add and validate pairs
    Pairs = 1,
    /// Step 2: review the priced recap
    Review = 2,
    /// Step 3: client details and payment hand-off
    Payment = 3,
}

impl WizardStep {
    /// Step number as shown in the step indicator
    pub fn number(&self) -> u8 {
        *self as u8
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(WizardStep::Pairs),
            2 => Ok(WizardStep::Review),
            3 => Ok(WizardStep::Payment),
            other => Err(format!("unknown wizard step {other}")),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl State for WizardStep {
    fn name(&self) -> &'static str {
        match self {
            WizardStep::Pairs => "Pairs",
            WizardStep::Review => "Review",
            WizardStep::Payment => "Payment",
        }
    }
}

/// Work the session must do when a step is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepEntry {
    /// Recompute the pricing recap
    pub recompute_recap: bool,
}

impl TransitionOutput for StepEntry {}

impl MooreStateTransitions for WizardStep {
    type Output = StepEntry;

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WizardStep::*;

        match self {
            Pairs => vec![Review],
            Review => vec![Pairs, Payment],
            Payment => vec![Review],
        }
    }

    fn entry_output(&self) -> Self::Output {
        StepEntry {
            recompute_recap: matches!(self, WizardStep::Review),
        }
    }
}
