// Copyright 2025 Cowboy AI, LLC.

//! Boundary collaborators: upload and order transports, photo capture
//!
//! The core never performs network I/O itself. It builds the wire payloads
//! below and hands them to an [`IntakeTransport`] implementation supplied by
//! the front end.

use crate::catalog::Category;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Operations that suspend on external I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Photo confirmation (compress + upload)
    PhotoUpload,
    /// Order creation followed by checkout session creation
    Submission,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::PhotoUpload => "photo upload",
            OperationKind::Submission => "order submission",
        })
    }
}

/// Failures reported by a transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status
        status: u16,
        /// Error text from the response body
        message: String,
    },

    /// The request never completed
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Failures of the capture device or the file-picker fallback
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// Camera permission refused
    #[error("camera permission denied")]
    PermissionDenied,
    /// No camera present
    #[error("no camera found")]
    DeviceNotFound,
    /// The platform has no camera API
    #[error("camera not supported")]
    Unsupported,
    /// Picked file is not an image
    #[error("picked file is not an image: {0}")]
    NotAnImage(String),
    /// Picked file exceeds the size limit
    #[error("picked file is {size} bytes, limit is {limit}")]
    TooLarge {
        /// File size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },
    /// Re-encoding the photo failed
    #[error("photo compression failed: {0}")]
    Compression(String),
}

impl CaptureError {
    /// Cause-specific message for the customer
    pub fn user_message(&self) -> &'static str {
        match self {
            CaptureError::PermissionDenied => {
                "Impossible d'accéder à la caméra. Veuillez autoriser l'accès à la caméra."
            }
            CaptureError::DeviceNotFound => {
                "Impossible d'accéder à la caméra. Aucune caméra trouvée sur cet appareil."
            }
            CaptureError::Unsupported => {
                "Impossible d'accéder à la caméra. Utilisez le sélecteur de fichier ci-dessous."
            }
            CaptureError::NotAnImage(_) => "Veuillez sélectionner un fichier image",
            CaptureError::TooLarge { .. } => "L'image est trop volumineuse (max 5MB)",
            CaptureError::Compression(_) => "Erreur lors de la prise de photo",
        }
    }
}

/// Size limit applied to files chosen through the picker
pub const MAX_PICKED_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Check a file chosen through the file-picker fallback
pub fn check_picked_file(content_type: &str, size: u64) -> Result<(), CaptureError> {
    if !content_type.starts_with("image/") {
        return Err(CaptureError::NotAnImage(content_type.to_string()));
    }
    if size > MAX_PICKED_FILE_BYTES {
        return Err(CaptureError::TooLarge {
            size,
            limit: MAX_PICKED_FILE_BYTES,
        });
    }
    Ok(())
}

/// The photo capture widget
pub trait PhotoCapture: Send + Sync {
    /// Whether a photo is currently held
    fn has_photo(&self) -> bool;

    /// The held photo as a data URL
    fn photo_data_url(&self) -> Result<String, CaptureError>;
}

/// Re-encodes a photo before upload
pub trait ImageCompressor: Send + Sync {
    /// Compress `data_url` to JPEG at `quality`, fitting within the box
    fn compress(
        &self,
        data_url: &str,
        quality: f32,
        max_width: u32,
        max_height: u32,
    ) -> Result<String, CaptureError>;
}

/// Compressor that forwards the photo unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCompressor;

impl ImageCompressor for PassthroughCompressor {
    fn compress(
        &self,
        data_url: &str,
        _quality: f32,
        _max_width: u32,
        _max_height: u32,
    ) -> Result<String, CaptureError> {
        Ok(data_url.to_string())
    }
}

/// `POST /api/upload-photo` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadPhotoRequest {
    /// Compressed photo as a data URL
    pub photo: String,
}

/// `POST /api/upload-photo` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadPhotoResponse {
    /// Public URL of the stored photo
    pub photo_url: String,
    /// Stored file name
    pub filename: String,
}

/// One pair in the order payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PairPayload {
    /// Shoe category
    pub type_chaussure: Category,
    /// Photo URL
    pub photo_url: Option<String>,
    /// Photo file name
    pub photo_filename: Option<String>,
    /// Note for quote-on-request services
    pub description: Option<String>,
    /// Selected service ids
    pub prestations: Vec<i64>,
}

/// `POST /api/commande` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrderPayload {
    /// Client name
    pub nom: String,
    /// Client email
    pub email: String,
    /// Client phone
    pub telephone: String,
    /// Client company
    pub entreprise: Option<String>,
    /// Pairs in draft order
    pub paires: Vec<PairPayload>,
}

/// Order as echoed back by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CreatedOrder {
    /// Server-side order id
    pub id: i64,
    /// Order status, when reported
    #[serde(default)]
    pub statut: Option<String>,
}

/// `POST /api/commande` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrderCreated {
    /// The created order
    pub commande: CreatedOrder,
}

/// `POST /api/commande/{id}/checkout` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckoutSession {
    /// Where to send the customer
    pub checkout_url: String,
    /// Provider session id, when reported
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Upload and order transport
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntakeTransport: Send + Sync {
    /// `POST /api/upload-photo`
    async fn upload_photo(
        &self,
        request: UploadPhotoRequest,
    ) -> Result<UploadPhotoResponse, TransportError>;

    /// `POST /api/commande`
    async fn create_order(&self, payload: OrderPayload) -> Result<OrderCreated, TransportError>;

    /// `POST /api/commande/{order_id}/checkout`
    async fn create_checkout(&self, order_id: i64) -> Result<CheckoutSession, TransportError>;
}
