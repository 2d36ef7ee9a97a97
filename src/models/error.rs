use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tipo de error de escaneo (códigos numéricos estables para JS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeErrorKind {
    Unknown = 0,
    Permission = 1,
    Video = 2,
    Abort = 3,
}

impl BarcodeErrorKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Error normalizado que devuelve el lector
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ErrorEntity {
    #[serde(rename = "type")]
    pub kind: BarcodeErrorKind,
    pub message: String,
}

impl ErrorEntity {
    pub fn new(kind: BarcodeErrorKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(BarcodeErrorKind::Unknown, "Something went wrong")
    }

    pub fn permission() -> Self {
        Self::new(BarcodeErrorKind::Permission, "No access to camera")
    }

    pub fn video_error() -> Self {
        Self::new(BarcodeErrorKind::Video, "Something went wrong with the video")
    }

    pub fn video_stopped() -> Self {
        Self::new(BarcodeErrorKind::Video, "The video was stopped")
    }

    pub fn abort() -> Self {
        Self::new(BarcodeErrorKind::Abort, "Aborted")
    }

    /// Las cancelaciones nunca se muestran al usuario
    pub fn is_abort(&self) -> bool {
        self.kind == BarcodeErrorKind::Abort
    }
}
