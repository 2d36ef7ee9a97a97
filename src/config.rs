use serde::{Deserialize, Serialize};

/// Intervalo de escaneo por defecto (ms)
pub const DEFAULT_SCAN_INTERVAL_MS: u32 = 800;

/// Módulo ES con `BarcodeDetector` para navegadores sin API nativa
pub const DEFAULT_DETECTOR_POLYFILL_URL: &str =
    "https://cdn.jsdelivr.net/npm/barcode-detector@2/dist/es/pure.min.js";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub scan_interval_ms: u32,
    pub camera: CameraConfig,
    /// Formatos para el BarcodeDetector (vacío = todos los soportados)
    pub barcode_formats: Vec<String>,
    /// Polyfill cargado con import() si falta `BarcodeDetector` (None = no cargar)
    pub detector_polyfill_url: Option<String>,
    pub enable_logging: bool,
    pub log_level: String,
    pub ui_language: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: DEFAULT_SCAN_INTERVAL_MS,
            camera: CameraConfig::default(),
            barcode_formats: Vec::new(),
            detector_polyfill_url: Some(DEFAULT_DETECTOR_POLYFILL_URL.to_string()),
            enable_logging: true,
            log_level: "info".to_string(),
            ui_language: "EN".to_string(),
        }
    }
}

/// Restricciones de la cámara pedidas a getUserMedia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// "environment" = cámara trasera, "user" = frontal
    pub facing_mode: String,
    pub audio: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            facing_mode: "environment".to_string(),
            audio: false,
        }
    }
}

impl ScannerConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let config = Self::from_values(
            option_env!("SCAN_INTERVAL_MS"),
            option_env!("CAMERA_FACING_MODE"),
            option_env!("BARCODE_FORMATS"),
            option_env!("ENABLE_LOGGING"),
            option_env!("LOG_LEVEL"),
            option_env!("UI_LANGUAGE"),
        );
        config.with_polyfill_url(option_env!("DETECTOR_POLYFILL_URL"))
    }

    /// `None` mantiene el valor actual; una cadena vacía desactiva el polyfill
    fn with_polyfill_url(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url {
            let url = url.trim();
            self.detector_polyfill_url = (!url.is_empty()).then(|| url.to_string());
        }
        self
    }

    fn from_values(
        interval: Option<&str>,
        facing_mode: Option<&str>,
        formats: Option<&str>,
        enable_logging: Option<&str>,
        log_level: Option<&str>,
        ui_language: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            // Un intervalo de 0 dispararía el detector sin pausa
            scan_interval_ms: interval
                .and_then(|v| v.trim().parse().ok())
                .filter(|ms: &u32| *ms > 0)
                .unwrap_or(defaults.scan_interval_ms),
            camera: CameraConfig {
                facing_mode: facing_mode
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .unwrap_or(defaults.camera.facing_mode),
                audio: false,
            },
            barcode_formats: formats
                .map(parse_formats)
                .unwrap_or(defaults.barcode_formats),
            detector_polyfill_url: defaults.detector_polyfill_url,
            enable_logging: enable_logging
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.enable_logging),
            log_level: log_level
                .map(|v| v.trim().to_lowercase())
                .unwrap_or(defaults.log_level),
            ui_language: ui_language
                .map(|v| v.trim().to_uppercase())
                .unwrap_or(defaults.ui_language),
        }
    }

    /// Nivel de log para wasm-logger
    pub fn log_level(&self) -> log::Level {
        match self.log_level.as_str() {
            "error" => log::Level::Error,
            "warn" => log::Level::Warn,
            "debug" => log::Level::Debug,
            "trace" => log::Level::Trace,
            _ => log::Level::Info,
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

/// "qr_code, ean_13,,code_128" -> ["qr_code", "ean_13", "code_128"]
fn parse_formats(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty())
        .collect()
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: ScannerConfig = ScannerConfig::from_env();
}
