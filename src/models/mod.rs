pub mod barcode;
pub mod error;

pub use barcode::{BoundingBox, DetectedBarcode, Point, ScanSuccess};
pub use error::{BarcodeErrorKind, ErrorEntity};

/// Resultado de `BarcodeReader::start`
pub type ScanOutcome = Result<ScanSuccess, ErrorEntity>;
