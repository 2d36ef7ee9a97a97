// ============================================================================
// BROWSER PLATFORM - ScanPlatform sobre web_sys
// ============================================================================
// getUserMedia + <video> + setInterval (gloo) + BarcodeDetector (FFI,
// nativo o polyfill importado bajo demanda)
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use gloo_timers::callback::Interval;
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};
use crate::config::CameraConfig;
use crate::dom::EventListener;
use crate::models::DetectedBarcode;
use crate::services::scan_platform::{CameraStream, ScanPlatform};
use crate::utils::barcode_ffi::{self, js_error_message, BarcodeDetector};

/// Stream de getUserMedia
pub struct BrowserStream {
    stream: MediaStream,
}

impl CameraStream for BrowserStream {
    fn stop_tracks(&self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

/// Host real: un `<video>` y el BarcodeDetector del navegador
pub struct BrowserPlatform {
    video: HtmlVideoElement,
    formats: Vec<String>,
    polyfill_url: Option<String>,
    detector: Rc<RefCell<Option<BarcodeDetector>>>,
}

impl BrowserPlatform {
    /// `polyfill_url`: módulo a importar si el navegador no trae BarcodeDetector
    pub fn new(video: HtmlVideoElement, formats: Vec<String>, polyfill_url: Option<String>) -> Self {
        Self {
            video,
            formats,
            polyfill_url,
            detector: Rc::new(RefCell::new(None)),
        }
    }

    fn user_media_promise(&self, camera: &CameraConfig) -> Result<js_sys::Promise, String> {
        let window = web_sys::window().ok_or_else(|| "No window".to_string())?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|e| js_error_message(&e))?;
        let constraints = build_constraints(camera).map_err(|e| js_error_message(&e))?;
        devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| js_error_message(&e))
    }
}

/// { video: { facingMode: { ideal } }, audio }
fn build_constraints(camera: &CameraConfig) -> Result<MediaStreamConstraints, JsValue> {
    let facing = Object::new();
    Reflect::set(&facing, &"ideal".into(), &JsValue::from_str(&camera.facing_mode))?;
    let video = Object::new();
    Reflect::set(&video, &"facingMode".into(), &facing)?;

    let constraints = Object::new();
    Reflect::set(&constraints, &"video".into(), &video)?;
    Reflect::set(&constraints, &"audio".into(), &JsValue::from_bool(camera.audio))?;
    Ok(constraints.unchecked_into::<MediaStreamConstraints>())
}

impl ScanPlatform for BrowserPlatform {
    type Stream = BrowserStream;
    type Interval = Interval;
    type Listener = EventListener;

    fn prepare_detector(&self) -> LocalBoxFuture<'static, Result<(), String>> {
        let slot = self.detector.clone();
        let formats = self.formats.clone();
        let polyfill_url = self.polyfill_url.clone();
        async move {
            if slot.borrow().is_some() {
                return Ok(());
            }
            if !barcode_ffi::is_supported() {
                let Some(url) = polyfill_url else {
                    return Err("BarcodeDetector no está disponible en este navegador".to_string());
                };
                log::info!("📦 [DETECTOR] Sin BarcodeDetector nativo, cargando polyfill {}", url);
                barcode_ffi::load_polyfill(&url).await?;
            }

            let mut wanted = formats;
            if !wanted.is_empty() {
                match barcode_ffi::supported_formats().await {
                    Ok(supported) if !supported.is_empty() => {
                        log::debug!("🔎 [DETECTOR] Formatos soportados: {:?}", supported);
                        wanted.retain(|f| supported.contains(f));
                        if wanted.is_empty() {
                            return Err("Ningún formato configurado está soportado".to_string());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("⚠️ [DETECTOR] getSupportedFormats() falló: {}", e),
                }
            }

            let detector = barcode_ffi::create_detector(&wanted)?;
            *slot.borrow_mut() = Some(detector);
            log::info!("✅ [DETECTOR] BarcodeDetector listo");
            Ok(())
        }
        .boxed_local()
    }

    fn request_stream(
        &self,
        constraints: &CameraConfig,
    ) -> LocalBoxFuture<'static, Result<Option<BrowserStream>, String>> {
        let promise = match self.user_media_promise(constraints) {
            Ok(promise) => promise,
            Err(e) => return future::ready(Err(e)).boxed_local(),
        };

        // La promesa corre en su propia tarea: si la sesión se cancela durante
        // el prompt de permisos, el stream que llegue tarde se detiene aquí.
        let (sender, receiver) = oneshot::channel();
        wasm_bindgen_futures::spawn_local(async move {
            let result = JsFuture::from(promise)
                .await
                .map(|value| value.dyn_into::<MediaStream>().ok().map(|stream| BrowserStream { stream }))
                .map_err(|e| js_error_message(&e));
            if let Err(Ok(Some(late))) = sender.send(result) {
                log::info!("🧹 [CAMERA] Permiso concedido tras cancelar, liberando stream");
                late.stop_tracks();
            }
        });

        receiver
            .map(|reply| reply.unwrap_or_else(|_| Err("getUserMedia cancelado".to_string())))
            .boxed_local()
    }

    fn attach_stream(&self, stream: &BrowserStream) -> Result<(), String> {
        self.video.set_autoplay(true);
        Reflect::set(&self.video, &"playsInline".into(), &JsValue::from_bool(true))
            .map_err(|e| js_error_message(&e))?;
        self.video.set_src_object(Some(&stream.stream));

        let playing = self.video.play().map_err(|e| js_error_message(&e))?;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(playing).await {
                // Si el vídeo queda en pausa el siguiente tick lo reporta
                log::warn!("⚠️ [CAMERA] play() rechazado: {}", js_error_message(&e));
            }
        });
        Ok(())
    }

    fn detach_stream(&self) {
        self.video.set_src_object(None);
    }

    fn is_paused(&self) -> bool {
        self.video.paused()
    }

    fn on_video_error(&self, mut handler: Box<dyn FnMut()>) -> Result<EventListener, String> {
        EventListener::new(self.video.as_ref(), "error", move || handler())
            .map_err(|e| js_error_message(&e))
    }

    fn set_interval(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, move || tick())
    }

    fn detect(&self) -> LocalBoxFuture<'static, Result<Vec<DetectedBarcode>, String>> {
        let Some(detector) = self.detector.borrow().clone() else {
            return future::ready(Err("Detector no preparado".to_string())).boxed_local();
        };
        let promise = match detector.detect(self.video.as_ref()) {
            Ok(promise) => promise,
            Err(e) => return future::ready(Err(js_error_message(&e))).boxed_local(),
        };
        async move {
            let value = JsFuture::from(promise).await.map_err(|e| js_error_message(&e))?;
            barcode_ffi::parse_detected(&value)
        }
        .boxed_local()
    }
}
