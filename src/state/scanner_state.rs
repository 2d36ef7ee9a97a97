// ============================================================================
// SCANNER STATE - Estado del widget de escaneo
// ============================================================================

use crate::models::{DetectedBarcode, ErrorEntity};
use crate::state::ReactiveState;

/// Sub-estado del widget mientras está abierto
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScannerView {
    /// Montado, sesión aún no iniciada
    #[default]
    Idle,
    Scanning,
    /// Error visible con "reintentar" / "cancelar"
    Error(ErrorEntity),
    /// Varios códigos en el mismo frame: el usuario elige
    MultipleResults(Vec<DetectedBarcode>),
    /// Código entregado o widget cancelado
    Closed,
}

impl ScannerView {
    pub fn is_scanning(&self) -> bool {
        matches!(self, ScannerView::Scanning)
    }
}

pub type ScannerState = ReactiveState<ScannerView>;
