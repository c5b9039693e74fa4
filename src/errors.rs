// Copyright 2025 Cowboy AI, LLC.

//! Error types for intake operations

use crate::catalog::Category;
use crate::entity::PairId;
use crate::pair::MissingRequirement;
use crate::transport::{CaptureError, OperationKind, TransportError};
use crate::wizard::WizardStep;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while driving the intake wizard
#[derive(Debug, Clone, Error)]
pub enum IntakeError {
    /// No pair with this id exists in the draft
    #[error("Pair not found: {0}")]
    PairNotFound(PairId),

    /// The service id is not offered for the pair's category
    #[error("Service {service_id} is not offered for category {category:?}")]
    ServiceNotOffered {
        /// Requested service id
        service_id: i64,
        /// The pair's category at the time of the request
        category: Option<Category>,
    },

    /// The pair is validated and collapsed; it must be reopened before editing
    #[error("Pair {0} is validated; reopen it before editing")]
    PairLocked(PairId),

    /// A pair failed the completeness predicate
    #[error("Pair {position} is incomplete: missing {missing}")]
    IncompletePair {
        /// 1-based position of the pair in the draft
        position: usize,
        /// First requirement that is not met
        missing: MissingRequirement,
    },

    /// A pair has not been explicitly validated
    #[error("Pair {position} has not been validated")]
    PairsNotValidated {
        /// 1-based position of the first unvalidated pair
        position: usize,
    },

    /// The draft has no pairs
    #[error("The order has no pairs")]
    NoPairs,

    /// Invalid wizard step transition
    #[error("Invalid step transition from {from} to {to}")]
    InvalidStepTransition {
        /// Current step
        from: WizardStep,
        /// Attempted target step
        to: WizardStep,
    },

    /// Client contact fields are missing or malformed
    #[error("Invalid client information: {0}")]
    InvalidClientInfo(String),

    /// The capture collaborator holds no photo
    #[error("No photo captured")]
    NoPhotoCaptured,

    /// The capture device failed
    #[error("Capture device error: {0}")]
    Capture(#[from] CaptureError),

    /// The same operation is already awaiting its I/O
    #[error("Operation already in flight: {0}")]
    OperationInFlight(OperationKind),

    /// A transport call failed
    #[error("Transport error during {operation}: {source}")]
    Transport {
        /// What the session was doing
        operation: OperationKind,
        /// Underlying failure
        source: TransportError,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Catalog file could not be read
    #[error("Failed to read catalog {}: {reason}", path.display())]
    CatalogUnreadable {
        /// File that was read
        path: PathBuf,
        /// I/O failure
        reason: String,
    },

    /// Configuration is invalid
    #[error("Invalid configuration for `{key}`: {reason}")]
    InvalidConfig {
        /// Offending key
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type for intake operations
pub type IntakeResult<T> = Result<T, IntakeError>;

impl From<serde_json::Error> for IntakeError {
    fn from(err: serde_json::Error) -> Self {
        IntakeError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for IntakeError {
    fn from(err: config::ConfigError) -> Self {
        IntakeError::InvalidConfig {
            key: "config",
            reason: err.to_string(),
        }
    }
}

impl IntakeError {
    /// Check if this is a user-correctable validation failure
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            IntakeError::ServiceNotOffered { .. }
                | IntakeError::PairLocked(_)
                | IntakeError::IncompletePair { .. }
                | IntakeError::PairsNotValidated { .. }
                | IntakeError::NoPairs
                | IntakeError::InvalidClientInfo(_)
                | IntakeError::NoPhotoCaptured
        )
    }

    /// Check if this is a transport failure
    pub fn is_transport_error(&self) -> bool {
        matches!(self, IntakeError::Transport { .. })
    }

    /// Localized message suitable for the customer
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::IncompletePair { position, missing } => match missing {
                MissingRequirement::Category => {
                    format!("Sélectionnez le type pour la paire {position}")
                }
                MissingRequirement::Services => {
                    format!("Sélectionnez au moins un service pour la paire {position}")
                }
                MissingRequirement::Photo => {
                    format!("Ajoutez une photo pour la paire {position}")
                }
            },
            IntakeError::PairsNotValidated { position } => {
                format!("Validez la paire {position} avant de continuer")
            }
            IntakeError::NoPairs => "Ajoutez au moins une paire de chaussures".to_string(),
            IntakeError::InvalidClientInfo(_) => {
                "Veuillez remplir tous les champs requis".to_string()
            }
            IntakeError::NoPhotoCaptured => "Aucune photo sélectionnée".to_string(),
            IntakeError::Capture(err) => err.user_message().to_string(),
            IntakeError::Transport { operation, .. } => match operation {
                OperationKind::PhotoUpload => {
                    "Erreur lors de l'upload de la photo".to_string()
                }
                OperationKind::Submission => {
                    "Erreur lors du traitement de la commande".to_string()
                }
            },
            IntakeError::OperationInFlight(_) => "Opération en cours, patientez".to_string(),
            _ => "Une erreur est survenue".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = IntakeError::IncompletePair {
            position: 2,
            missing: MissingRequirement::Photo,
        };
        assert_eq!(err.to_string(), "Pair 2 is incomplete: missing photo");

        let err = IntakeError::InvalidStepTransition {
            from: WizardStep::Pairs,
            to: WizardStep::Payment,
        };
        assert_eq!(err.to_string(), "Invalid step transition from Pairs to Payment");

        let err = IntakeError::ServiceNotOffered {
            service_id: 7,
            category: None,
        };
        assert_eq!(
            err.to_string(),
            "Service 7 is not offered for category None"
        );
    }

    #[test]
    fn test_is_validation_error() {
        assert!(IntakeError::NoPairs.is_validation_error());
        assert!(IntakeError::PairsNotValidated { position: 1 }.is_validation_error());
        assert!(IntakeError::InvalidClientInfo("email".into()).is_validation_error());

        let transport = IntakeError::Transport {
            operation: OperationKind::Submission,
            source: TransportError::Network("reset".into()),
        };
        assert!(!transport.is_validation_error());
        assert!(transport.is_transport_error());
    }

    #[test]
    fn test_user_messages_name_the_pair() {
        let err = IntakeError::IncompletePair {
            position: 3,
            missing: MissingRequirement::Services,
        };
        assert_eq!(
            err.user_message(),
            "Sélectionnez au moins un service pour la paire 3"
        );
    }

    #[test]
    fn test_transport_message_is_generic() {
        let err = IntakeError::Transport {
            operation: OperationKind::PhotoUpload,
            source: TransportError::Rejected {
                status: 500,
                message: "GCS not configured".into(),
            },
        };
        assert_eq!(err.user_message(), "Erreur lors de l'upload de la photo");
    }

    #[test]
    fn test_serde_json_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let err: IntakeError = serde_err.into();
        assert!(matches!(err, IntakeError::SerializationError(msg) if !msg.is_empty()));
    }
}
