// ============================================================================
// BARCODE READER - Ciclo de vida cámara + detector
// ============================================================================
// Una sesión por start(): stream, temporizador, listener de error y señal
// de cancelación. destroy() libera todo y es idempotente.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use futures::channel::mpsc;
use futures::future::{AbortHandle, Abortable, Aborted};
use futures::{FutureExt, StreamExt};
use crate::config::{CameraConfig, ScannerConfig, CONFIG};
use crate::models::{DetectedBarcode, ErrorEntity, ScanOutcome, ScanSuccess};
use crate::services::scan_platform::{CameraStream, ScanPlatform};

/// Eventos que alimentan el bucle de escaneo
#[derive(Debug, Clone, Copy, PartialEq)]
enum SessionEvent {
    Tick,
    VideoError,
}

/// Recursos vivos de una sesión
struct ActiveSession<P: ScanPlatform> {
    id: u64,
    abort: AbortHandle,
    stream: Option<P::Stream>,
    interval: Option<P::Interval>,
    listener: Option<P::Listener>,
}

enum SessionState<P: ScanPlatform> {
    Idle,
    Active(ActiveSession<P>),
}

/// Vista de los recursos retenidos (debug y tests)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub active: bool,
    pub has_stream: bool,
    pub has_interval: bool,
    pub has_listener: bool,
}

struct ReaderInner<P: ScanPlatform> {
    platform: P,
    interval_ms: u32,
    camera: CameraConfig,
    session: RefCell<SessionState<P>>,
    destroyed: Cell<bool>,
    next_session_id: Cell<u64>,
}

/// Lector de códigos ligado a una superficie de vídeo.
///
/// Clonar comparte la misma sesión (Rc), igual que el estado de la app.
pub struct BarcodeReader<P: ScanPlatform> {
    inner: Rc<ReaderInner<P>>,
}

impl<P: ScanPlatform> Clone for BarcodeReader<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: ScanPlatform> BarcodeReader<P> {
    /// Crear lector con la configuración global
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, &CONFIG)
    }

    pub fn with_config(platform: P, config: &ScannerConfig) -> Self {
        Self::build(platform, config.scan_interval_ms, config.camera.clone())
    }

    /// Crear lector con un intervalo de escaneo concreto (ms)
    pub fn with_interval(platform: P, interval_ms: u32) -> Self {
        Self::build(platform, interval_ms, CameraConfig::default())
    }

    fn build(platform: P, interval_ms: u32, camera: CameraConfig) -> Self {
        Self {
            inner: Rc::new(ReaderInner {
                platform,
                interval_ms: interval_ms.max(1),
                camera,
                session: RefCell::new(SessionState::Idle),
                destroyed: Cell::new(false),
                next_session_id: Cell::new(1),
            }),
        }
    }

    /// Diferenciar error de éxito en un resultado
    pub fn is_error(outcome: &ScanOutcome) -> bool {
        outcome.is_err()
    }

    /// ¿Se llamó a destroy() desde el último start()?
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match &*self.inner.session.borrow() {
            SessionState::Idle => SessionSnapshot::default(),
            SessionState::Active(session) => SessionSnapshot {
                active: true,
                has_stream: session.stream.is_some(),
                has_interval: session.interval.is_some(),
                has_listener: session.listener.is_some(),
            },
        }
    }

    /// Iniciar una sesión de escaneo.
    ///
    /// Libera la sesión anterior, abre la cámara y consulta el detector en
    /// cada tick hasta obtener al menos un código. Cualquier fallo se
    /// normaliza en `ErrorEntity`. Los recursos de la sesión se liberan
    /// antes de devolver el resultado.
    pub async fn start(&self) -> ScanOutcome {
        self.teardown();
        self.inner.destroyed.set(false);

        let (abort, registration) = AbortHandle::new_pair();
        let id = self.open_session(abort);
        log::info!("📷 [READER] Sesión {} iniciada", id);

        let outcome = match Abortable::new(self.run_session(id), registration).await {
            Ok(result) => result,
            Err(Aborted) => Err(ErrorEntity::abort()),
        };

        // Solo liberar si nadie abrió otra sesión mientras tanto
        self.close_session(id);

        match &outcome {
            Ok(barcodes) => {
                log::info!("✅ [READER] Sesión {}: {} código(s) detectado(s)", id, barcodes.len());
            }
            Err(error) if error.is_abort() => {
                log::info!("🛑 [READER] Sesión {} cancelada", id);
            }
            Err(error) => {
                log::warn!("⚠️ [READER] Sesión {} terminó con error {:?}: {}", id, error.kind, error);
            }
        }

        outcome.map(|barcodes| ScanSuccess { barcodes })
    }

    /// Liberar stream, temporizador, listener y señal. Idempotente.
    pub fn destroy(&self) {
        if self.teardown() {
            log::info!("🧹 [READER] Recursos liberados");
        }
        self.inner.destroyed.set(true);
    }

    async fn run_session(&self, id: u64) -> Result<Vec<DetectedBarcode>, ErrorEntity> {
        let platform = &self.inner.platform;

        if let Err(e) = platform.prepare_detector().await {
            log::error!("❌ [READER] Detector no disponible: {}", e);
            return Err(ErrorEntity::unknown());
        }

        let stream = match platform.request_stream(&self.inner.camera).await {
            Ok(Some(stream)) => stream,
            Ok(None) => {
                log::warn!("⚠️ [READER] getUserMedia no devolvió stream");
                return Err(ErrorEntity::permission());
            }
            Err(e) => {
                log::error!("❌ [READER] Sin acceso a la cámara: {}", e);
                return Err(ErrorEntity::permission());
            }
        };

        let (tx, mut events) = mpsc::unbounded();

        let listener = {
            let tx = tx.clone();
            platform.on_video_error(Box::new(move || {
                let _ = tx.unbounded_send(SessionEvent::VideoError);
            }))
        };
        let listener = match listener {
            Ok(listener) => Some(listener),
            Err(e) => {
                log::warn!("⚠️ [READER] No se pudo escuchar errores del vídeo: {}", e);
                None
            }
        };

        let attached = platform.attach_stream(&stream);
        self.adopt_stream(id, stream);
        self.with_session(id, |session| session.listener = listener);
        if let Err(e) = attached {
            log::error!("❌ [READER] No se pudo conectar el stream al vídeo: {}", e);
            return Err(ErrorEntity::video_error());
        }

        let interval = platform.set_interval(
            self.inner.interval_ms,
            Box::new(move || {
                let _ = tx.unbounded_send(SessionEvent::Tick);
            }),
        );
        self.with_session(id, |session| session.interval = Some(interval));
        log::debug!("⏱️ [READER] Escaneando cada {}ms", self.inner.interval_ms);

        while let Some(event) = events.next().await {
            if event == SessionEvent::VideoError {
                return Err(ErrorEntity::video_error());
            }

            if platform.is_paused() {
                return Err(ErrorEntity::video_stopped());
            }

            // Un error del vídeo no espera a que termine un detect() lento
            let mut detection = platform.detect().fuse();
            let detected = loop {
                futures::select_biased! {
                    pending = events.next() => match pending {
                        Some(SessionEvent::VideoError) => return Err(ErrorEntity::video_error()),
                        // Ticks acumulados durante un detect() lento no disparan ráfagas
                        Some(SessionEvent::Tick) => {}
                        None => return Err(ErrorEntity::abort()),
                    },
                    result = detection => break result,
                }
            };

            match detected {
                Ok(barcodes) if !barcodes.is_empty() => return Ok(barcodes),
                Ok(_) => {}
                Err(e) => log::warn!("⚠️ [READER] Fallo en detect(): {}", e),
            }
        }

        // Canal cerrado: el temporizador y el listener se soltaron
        Err(ErrorEntity::abort())
    }

    fn open_session(&self, abort: AbortHandle) -> u64 {
        let id = self.inner.next_session_id.get();
        self.inner.next_session_id.set(id.wrapping_add(1));
        *self.inner.session.borrow_mut() = SessionState::Active(ActiveSession {
            id,
            abort,
            stream: None,
            interval: None,
            listener: None,
        });
        id
    }

    fn with_session(&self, id: u64, apply: impl FnOnce(&mut ActiveSession<P>)) {
        if let SessionState::Active(session) = &mut *self.inner.session.borrow_mut() {
            if session.id == id {
                apply(session);
            }
        }
    }

    fn adopt_stream(&self, id: u64, stream: P::Stream) {
        let mut stream = Some(stream);
        self.with_session(id, |session| session.stream = stream.take());
        if let Some(late) = stream {
            log::warn!("⚠️ [READER] Stream tardío de la sesión {}, liberando", id);
            late.stop_tracks();
        }
    }

    /// Liberar la sesión `id` si sigue siendo la actual
    fn close_session(&self, id: u64) {
        let is_current = matches!(
            &*self.inner.session.borrow(),
            SessionState::Active(session) if session.id == id
        );
        if is_current {
            self.teardown();
        }
    }

    /// Liberar la sesión actual. Devuelve `false` si no había ninguna
    fn teardown(&self) -> bool {
        let previous = std::mem::replace(&mut *self.inner.session.borrow_mut(), SessionState::Idle);
        match previous {
            SessionState::Idle => false,
            SessionState::Active(session) => {
                self.release(session);
                true
            }
        }
    }

    fn release(&self, session: ActiveSession<P>) {
        let ActiveSession {
            id,
            abort,
            stream,
            interval,
            listener,
        } = session;

        abort.abort();
        drop(interval);
        drop(listener);
        if let Some(stream) = stream {
            stream.stop_tracks();
            self.inner.platform.detach_stream();
        }
        log::debug!("🧹 [READER] Sesión {} liberada", id);
    }
}
