/// Contenedor raíz de la app en index.html
pub const APP_ROOT_ID: &str = "app";

pub const SCANNER_MODAL_ID: &str = "scanner-modal";
pub const SCANNER_VIDEO_ID: &str = "scanner-video";
pub const SCANNER_OVERLAY_ID: &str = "scanner-overlay";
