// ============================================================================
// SCAN PLATFORM - Capacidades del host que necesita el lector
// ============================================================================
// Cámara, superficie de vídeo, temporizador y detector. El lector no toca
// web_sys directamente: BrowserPlatform las implementa sobre el navegador.
// ============================================================================

use futures::future::LocalBoxFuture;
use crate::config::CameraConfig;
use crate::models::DetectedBarcode;

/// Stream de cámara adquirido
pub trait CameraStream {
    /// Detener y liberar todas las pistas del stream
    fn stop_tracks(&self);
}

/// Capacidades de un host capaz de escanear.
///
/// `Interval` y `Listener` son guardas: soltarlas cancela el temporizador
/// o desregistra el listener.
pub trait ScanPlatform: 'static {
    type Stream: CameraStream + 'static;
    type Interval: 'static;
    type Listener: 'static;

    /// Preparar el detector (puede cargarse de forma asíncrona)
    fn prepare_detector(&self) -> LocalBoxFuture<'static, Result<(), String>>;

    /// Pedir acceso a la cámara. `Ok(None)` = el host no devolvió stream
    fn request_stream(
        &self,
        constraints: &CameraConfig,
    ) -> LocalBoxFuture<'static, Result<Option<Self::Stream>, String>>;

    /// Conectar el stream a la superficie y empezar la reproducción
    fn attach_stream(&self, stream: &Self::Stream) -> Result<(), String>;

    /// Desconectar cualquier stream de la superficie
    fn detach_stream(&self);

    fn is_paused(&self) -> bool;

    /// Registrar listener del evento "error" de la superficie
    fn on_video_error(&self, handler: Box<dyn FnMut()>) -> Result<Self::Listener, String>;

    /// Temporizador repetitivo cada `period_ms`
    fn set_interval(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Interval;

    /// Detectar códigos en el frame actual de la superficie
    fn detect(&self) -> LocalBoxFuture<'static, Result<Vec<DetectedBarcode>, String>>;
}
