// Copyright 2025 Cowboy AI, LLC.

//! State machine traits for the wizard and the pair lifecycle
//!
//! - **Moore machine**: output depends only on the state being entered.
//!   The wizard step pointer is a Moore machine; entering a step yields the
//!   side effects the session must run (recap recompute on Review).
//! - **Mealy machine**: output depends on current state AND input. The pair
//!   lifecycle is a Mealy machine driven by validate/edit inputs.

use crate::errors::{IntakeError, IntakeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Input to a state machine transition
pub trait TransitionInput: Debug + Clone + Send + Sync {
    /// Get a description of this input for logging
    fn description(&self) -> String;
}

/// Output from a state machine transition
pub trait TransitionOutput: Debug + Clone + Send + Sync {}

impl TransitionOutput for () {}

/// Trait for types that can be used as states in a state machine
pub trait State: Debug + Clone + PartialEq + Eq + Send + Sync {
    /// Get the name of this state for logging/debugging
    fn name(&self) -> &'static str;

    /// Check if this is a terminal state
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Moore machine: output depends only on the entered state
pub trait MooreStateTransitions: State {
    /// The output type for this state machine
    type Output: TransitionOutput;

    /// Check if a transition to the target state is valid
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Get all valid target states from this state
    fn valid_transitions(&self) -> Vec<Self>;

    /// Get the output for entering this state
    fn entry_output(&self) -> Self::Output;
}

/// Mealy machine: output depends on current state AND input
pub trait MealyStateTransitions: State {
    /// The input type for transitions
    type Input: TransitionInput;
    /// The output type for transitions
    type Output: TransitionOutput;

    /// Check if a transition is valid given the input
    fn can_transition_to(&self, target: &Self, input: &Self::Input) -> bool;

    /// Get valid transitions for a given input
    fn valid_transitions(&self, input: &Self::Input) -> Vec<Self>;

    /// Get the output for a transition
    fn transition_output(&self, target: &Self, input: &Self::Input) -> Self::Output;
}

/// Record of a state transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition<S, O> {
    /// The state before the transition
    pub from: S,
    /// The state after the transition
    pub to: S,
    /// The output produced by the transition
    pub output: O,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Check and perform a Moore transition, returning the record
///
/// Terminal states and transitions missing from the graph are rejected
/// with the `reject` constructor so each machine reports its own error.
pub fn moore_transition<S, F>(
    current: &S,
    target: S,
    reject: F,
) -> IntakeResult<StateTransition<S, S::Output>>
where
    S: MooreStateTransitions,
    F: FnOnce(&S, &S) -> IntakeError,
{
    if current.is_terminal() || !current.can_transition_to(&target) {
        return Err(reject(current, &target));
    }

    Ok(StateTransition {
        from: current.clone(),
        output: target.entry_output(),
        to: target,
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Off,
    }

    impl State for Light {
        fn name(&self) -> &'static str {
            match self {
                Light::Red => "Red",
                Light::Green => "Green",
                Light::Off => "Off",
            }
        }

        fn is_terminal(&self) -> bool {
            matches!(self, Light::Off)
        }
    }

    impl MooreStateTransitions for Light {
        type Output = ();

        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Light::Red => vec![Light::Green, Light::Off],
                Light::Green => vec![Light::Red],
                Light::Off => vec![Light::Red],
            }
        }

        fn entry_output(&self) -> Self::Output {}
    }

    fn reject(from: &Light, to: &Light) -> IntakeError {
        IntakeError::InvalidConfig {
            key: "light",
            reason: format!("{} -> {}", from.name(), to.name()),
        }
    }

    #[test]
    fn test_moore_transition_follows_graph() {
        let record = moore_transition(&Light::Red, Light::Green, reject).unwrap();
        assert_eq!(record.from, Light::Red);
        assert_eq!(record.to, Light::Green);

        assert!(moore_transition(&Light::Green, Light::Off, reject).is_err());
    }

    #[test]
    fn test_moore_transition_rejects_from_terminal() {
        // Off lists Red as a neighbour but is terminal
        let err = moore_transition(&Light::Off, Light::Red, reject).unwrap_err();
        assert!(err.to_string().contains("Off -> Red"));
    }
}
