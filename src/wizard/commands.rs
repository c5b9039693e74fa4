// Copyright 2025 Cowboy AI, LLC.

//! Serializable commands for driving a wizard session

use crate::catalog::Category;
use crate::client::ClientInfo;
use crate::entity::PairId;
use crate::pair::PhotoRef;
use crate::wizard::WizardStep;
use serde::{Deserialize, Serialize};

/// One customer action on the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WizardCommand {
    /// Append an empty pair
    AddPair,
    /// Remove a pair
    RemovePair {
        /// Target pair
        pair_id: PairId,
    },
    /// Choose a pair's category
    SetCategory {
        /// Target pair
        pair_id: PairId,
        /// New category
        category: Category,
    },
    /// Check or uncheck a service
    ToggleService {
        /// Target pair
        pair_id: PairId,
        /// Catalog id
        service_id: i64,
    },
    /// Attach an already uploaded photo
    SetPhoto {
        /// Target pair
        pair_id: PairId,
        /// Uploaded photo
        photo: PhotoRef,
    },
    /// Edit a pair's note
    SetNote {
        /// Target pair
        pair_id: PairId,
        /// Note text
        text: String,
    },
    /// Validate and collapse a pair
    ValidatePair {
        /// Target pair
        pair_id: PairId,
    },
    /// Reopen a validated pair
    EditPair {
        /// Target pair
        pair_id: PairId,
    },
    /// Move to another step
    Advance {
        /// Target step
        step: WizardStep,
    },
    /// Replace the client contact fields
    SetClientInfo {
        /// New contact fields
        info: ClientInfo,
    },
}

impl WizardCommand {
    /// Command name for logs
    pub fn name(&self) -> &'static str {
        match self {
            WizardCommand::AddPair => "add_pair",
            WizardCommand::RemovePair { .. } => "remove_pair",
            WizardCommand::SetCategory { .. } => "set_category",
            WizardCommand::ToggleService { .. } => "toggle_service",
            WizardCommand::SetPhoto { .. } => "set_photo",
            WizardCommand::SetNote { .. } => "set_note",
            WizardCommand::ValidatePair { .. } => "validate_pair",
            WizardCommand::EditPair { .. } => "edit_pair",
            WizardCommand::Advance { .. } => "advance",
            WizardCommand::SetClientInfo { .. } => "set_client_info",
        }
    }
}

/// What a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The change was applied
    Applied,
    /// A pair was appended
    PairAdded {
        /// New pair
        pair_id: PairId,
    },
    /// A service was toggled
    ServiceToggled {
        /// Whether it is selected now
        selected: bool,
    },
    /// A photo was offered to a pair
    PhotoSet {
        /// Whether the pair took it
        attached: bool,
    },
    /// The step changed
    StepChanged {
        /// Step now current
        step: WizardStep,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_json_is_tagged() {
        let pair_id = PairId::new();
        let command = WizardCommand::ToggleService {
            pair_id,
            service_id: 4,
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["command"], "toggle_service");
        assert_eq!(json["service_id"], 4);

        let parsed: WizardCommand =
            serde_json::from_str(r#"{"command":"advance","step":2}"#).unwrap();
        assert_eq!(
            parsed,
            WizardCommand::Advance {
                step: WizardStep::Review
            }
        );
        assert_eq!(parsed.name(), "advance");
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        let parsed = serde_json::from_str::<WizardCommand>(r#"{"command":"advance","step":7}"#);
        assert!(parsed.is_err());
    }
}
