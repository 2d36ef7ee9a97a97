use serde::{Deserialize, Serialize};

/// Punto en coordenadas del frame de vídeo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Rectángulo que encierra el código detectado
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Código detectado por el BarcodeDetector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedBarcode {
    #[serde(rename = "rawValue")]
    pub raw_value: String,
    pub format: String,
    #[serde(rename = "boundingBox")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(rename = "cornerPoints", default)]
    pub corner_points: Vec<Point>,
}

impl DetectedBarcode {
    /// Crear un código solo con valor y formato (sin geometría)
    pub fn new(raw_value: &str, format: &str) -> Self {
        Self {
            raw_value: raw_value.to_string(),
            format: format.to_string(),
            bounding_box: None,
            corner_points: Vec::new(),
        }
    }
}

/// Resultado exitoso de una sesión de escaneo (nunca vacío)
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSuccess {
    pub barcodes: Vec<DetectedBarcode>,
}

impl ScanSuccess {
    pub fn first(&self) -> Option<&DetectedBarcode> {
        self.barcodes.first()
    }
}
