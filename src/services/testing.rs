// ============================================================================
// FAKE PLATFORM - Host guionizado para tests nativos
// ============================================================================
// Ticks, eventos de error y permisos se disparan a mano desde el test.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{self, FutureExt, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use crate::config::CameraConfig;
use crate::models::{DetectedBarcode, ScanOutcome};
use crate::services::barcode_reader::BarcodeReader;
use crate::services::scan_platform::{CameraStream, ScanPlatform};

/// Lanzar `reader.start()` en el pool y devolver el hueco del resultado
pub fn spawn_start(
    pool: &LocalPool,
    reader: &BarcodeReader<FakePlatform>,
) -> Rc<RefCell<Option<ScanOutcome>>> {
    let slot = Rc::new(RefCell::new(None));
    let out = slot.clone();
    let reader = reader.clone();
    pool.spawner()
        .spawn_local(async move {
            let outcome = reader.start().await;
            *out.borrow_mut() = Some(outcome);
        })
        .expect("spawn start()");
    slot
}

/// Respuesta del detector para una llamada
pub enum DetectStep {
    Found(Vec<DetectedBarcode>),
    Fail(String),
    /// detect() que nunca se resuelve
    Hang,
}

#[derive(Clone)]
enum CameraBehavior {
    Grant,
    Deny(String),
    NoStream,
    Hold,
}

pub struct FakeStream {
    stopped: Rc<Cell<bool>>,
}

impl CameraStream for FakeStream {
    fn stop_tracks(&self) {
        self.stopped.set(true);
    }
}

type CameraReply = Result<Option<FakeStream>, String>;

struct FakeState {
    camera: CameraBehavior,
    held_camera: Option<oneshot::Sender<CameraReply>>,
    camera_requests: Vec<CameraConfig>,
    streams: Vec<Rc<Cell<bool>>>,
    detector: Result<(), String>,
    detections: VecDeque<DetectStep>,
    detect_calls: usize,
    paused: bool,
    attached: bool,
    attach_error: Option<String>,
    listener_error: Option<String>,
    detach_calls: usize,
    next_guard_id: u64,
    tick: Option<(u64, u32, Box<dyn FnMut()>)>,
    error_handler: Option<(u64, Box<dyn FnMut()>)>,
    intervals_cleared: usize,
    listeners_removed: usize,
}

/// Plataforma falsa compartida entre el test y el lector
#[derive(Clone)]
pub struct FakePlatform {
    state: Rc<RefCell<FakeState>>,
}

pub struct FakeInterval {
    id: u64,
    state: Rc<RefCell<FakeState>>,
}

impl Drop for FakeInterval {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        if matches!(state.tick, Some((id, _, _)) if id == self.id) {
            state.tick = None;
        }
        state.intervals_cleared += 1;
    }
}

pub struct FakeListener {
    id: u64,
    state: Rc<RefCell<FakeState>>,
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        if matches!(state.error_handler, Some((id, _)) if id == self.id) {
            state.error_handler = None;
        }
        state.listeners_removed += 1;
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                camera: CameraBehavior::Grant,
                held_camera: None,
                camera_requests: Vec::new(),
                streams: Vec::new(),
                detector: Ok(()),
                detections: VecDeque::new(),
                detect_calls: 0,
                paused: false,
                attached: false,
                attach_error: None,
                listener_error: None,
                detach_calls: 0,
                next_guard_id: 1,
                tick: None,
                error_handler: None,
                intervals_cleared: 0,
                listeners_removed: 0,
            })),
        }
    }

    pub fn grant_camera(&self) {
        self.state.borrow_mut().camera = CameraBehavior::Grant;
    }

    pub fn deny_camera(&self, reason: &str) {
        self.state.borrow_mut().camera = CameraBehavior::Deny(reason.to_string());
    }

    pub fn return_no_stream(&self) {
        self.state.borrow_mut().camera = CameraBehavior::NoStream;
    }

    /// Dejar el permiso de cámara pendiente hasta `grant_held_camera`
    pub fn hold_camera(&self) {
        self.state.borrow_mut().camera = CameraBehavior::Hold;
    }

    pub fn grant_held_camera(&self) {
        let (sender, stream) = {
            let mut state = self.state.borrow_mut();
            let sender = state.held_camera.take().expect("camera request pending");
            (sender, Self::issue_stream(&mut state))
        };
        // Como el navegador: un stream que llega sin receptor se libera
        if let Err(Ok(Some(late))) = sender.send(Ok(Some(stream))) {
            late.stop_tracks();
        }
    }

    pub fn fail_detector(&self, reason: &str) {
        self.state.borrow_mut().detector = Err(reason.to_string());
    }

    /// El próximo attach_stream() falla (p.ej. srcObject rechazado)
    pub fn fail_attach(&self, reason: &str) {
        self.state.borrow_mut().attach_error = Some(reason.to_string());
    }

    /// No se puede registrar el listener de "error" del vídeo
    pub fn fail_listener(&self, reason: &str) {
        self.state.borrow_mut().listener_error = Some(reason.to_string());
    }

    pub fn push_detection(&self, step: DetectStep) {
        self.state.borrow_mut().detections.push_back(step);
    }

    pub fn set_paused(&self, paused: bool) {
        self.state.borrow_mut().paused = paused;
    }

    pub fn fire_tick(&self) {
        if let Some((_, _, tick)) = self.state.borrow_mut().tick.as_mut() {
            tick();
        }
    }

    pub fn emit_video_error(&self) {
        if let Some((_, handler)) = self.state.borrow_mut().error_handler.as_mut() {
            handler();
        }
    }

    pub fn camera_requests(&self) -> Vec<CameraConfig> {
        self.state.borrow().camera_requests.clone()
    }

    pub fn interval_period(&self) -> Option<u32> {
        self.state.borrow().tick.as_ref().map(|(_, period, _)| *period)
    }

    pub fn has_active_interval(&self) -> bool {
        self.state.borrow().tick.is_some()
    }

    pub fn has_error_listener(&self) -> bool {
        self.state.borrow().error_handler.is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    pub fn detect_calls(&self) -> usize {
        self.state.borrow().detect_calls
    }

    pub fn detach_calls(&self) -> usize {
        self.state.borrow().detach_calls
    }

    pub fn intervals_cleared(&self) -> usize {
        self.state.borrow().intervals_cleared
    }

    pub fn listeners_removed(&self) -> usize {
        self.state.borrow().listeners_removed
    }

    pub fn streams_issued(&self) -> usize {
        self.state.borrow().streams.len()
    }

    pub fn streams_stopped(&self) -> usize {
        self.state.borrow().streams.iter().filter(|s| s.get()).count()
    }

    pub fn all_streams_stopped(&self) -> bool {
        self.state.borrow().streams.iter().all(|s| s.get())
    }

    fn issue_stream(state: &mut FakeState) -> FakeStream {
        let stopped = Rc::new(Cell::new(false));
        state.streams.push(stopped.clone());
        FakeStream { stopped }
    }

    fn next_guard_id(state: &mut FakeState) -> u64 {
        let id = state.next_guard_id;
        state.next_guard_id += 1;
        id
    }
}

impl ScanPlatform for FakePlatform {
    type Stream = FakeStream;
    type Interval = FakeInterval;
    type Listener = FakeListener;

    fn prepare_detector(&self) -> LocalBoxFuture<'static, Result<(), String>> {
        future::ready(self.state.borrow().detector.clone()).boxed_local()
    }

    fn request_stream(
        &self,
        constraints: &CameraConfig,
    ) -> LocalBoxFuture<'static, Result<Option<FakeStream>, String>> {
        let mut state = self.state.borrow_mut();
        state.camera_requests.push(constraints.clone());
        let reply = match state.camera.clone() {
            CameraBehavior::Grant => Ok(Some(Self::issue_stream(&mut state))),
            CameraBehavior::Deny(reason) => Err(reason),
            CameraBehavior::NoStream => Ok(None),
            CameraBehavior::Hold => {
                let (sender, receiver) = oneshot::channel();
                state.held_camera = Some(sender);
                return receiver
                    .map(|reply| reply.unwrap_or_else(|_| Err("camera request dropped".to_string())))
                    .boxed_local();
            }
        };
        future::ready(reply).boxed_local()
    }

    fn attach_stream(&self, _stream: &FakeStream) -> Result<(), String> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.attach_error.take() {
            return Err(reason);
        }
        state.attached = true;
        Ok(())
    }

    fn detach_stream(&self) {
        let mut state = self.state.borrow_mut();
        state.attached = false;
        state.detach_calls += 1;
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn on_video_error(&self, handler: Box<dyn FnMut()>) -> Result<FakeListener, String> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.listener_error.clone() {
            return Err(reason);
        }
        let id = Self::next_guard_id(&mut state);
        state.error_handler = Some((id, handler));
        Ok(FakeListener {
            id,
            state: self.state.clone(),
        })
    }

    fn set_interval(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> FakeInterval {
        let mut state = self.state.borrow_mut();
        let id = Self::next_guard_id(&mut state);
        state.tick = Some((id, period_ms, tick));
        FakeInterval {
            id,
            state: self.state.clone(),
        }
    }

    fn detect(&self) -> LocalBoxFuture<'static, Result<Vec<DetectedBarcode>, String>> {
        let mut state = self.state.borrow_mut();
        state.detect_calls += 1;
        match state.detections.pop_front() {
            Some(DetectStep::Found(barcodes)) => future::ready(Ok(barcodes)).boxed_local(),
            Some(DetectStep::Fail(reason)) => future::ready(Err(reason)).boxed_local(),
            Some(DetectStep::Hang) => future::pending().boxed_local(),
            None => future::ready(Ok(Vec::new())).boxed_local(),
        }
    }
}
