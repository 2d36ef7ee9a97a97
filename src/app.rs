// ============================================================================
// APP - Aplicación principal
// ============================================================================
// closed -> botón "Start"; open -> widget de escaneo con su lector.
// Sin #app se crea un contenedor en <body> sin botón: solo open_scanner().
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::config::CONFIG;
use crate::dom::{append_child, body, clear_children, create_element, get_element_by_id, window};
use crate::services::{BarcodeReader, BrowserPlatform};
use crate::state::AppState;
use crate::utils::APP_ROOT_ID;
use crate::viewmodels::ScannerViewModel;
use crate::views::{render_app, render_overlay, render_scanner, OverlayActions};

type BarcodeCallback = Rc<dyn Fn(String)>;
type BrowserScanner = ScannerViewModel<BrowserPlatform>;

/// Aplicación principal
pub struct App {
    state: AppState,
    root: Element,
    callback: Rc<RefCell<BarcodeCallback>>,
    scanner: Option<Rc<BrowserScanner>>,
}

impl App {
    /// Crear nueva aplicación sobre `#app` (o un contenedor propio en <body>)
    pub fn new() -> Result<Self, JsValue> {
        let (root, state) = match get_element_by_id(APP_ROOT_ID) {
            Some(root) => (root, AppState::new()),
            None => {
                log::info!("📎 [APP] No hay #app, modo embebido (solo API JS)");
                (create_embedded_root()?, AppState::embedded())
            }
        };

        // Re-render en el siguiente tick para no re-entrar en APP
        state.subscribe_to_changes(move || {
            use gloo_timers::callback::Timeout;
            Timeout::new(0, move || {
                crate::rerender_app();
            })
            .forget();
        });

        Ok(Self {
            state,
            root,
            callback: Rc::new(RefCell::new(default_callback())),
            scanner: None,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Reemplazar el callback que recibe el código leído
    pub fn set_callback(&self, callback: BarcodeCallback) {
        *self.callback.borrow_mut() = callback;
    }

    /// Renderizar según el toggle closed/open
    pub fn render(&mut self) -> Result<(), JsValue> {
        if self.state.is_scanner_open() {
            if self.scanner.is_none() {
                self.mount_scanner()?;
            }
            return Ok(());
        }

        if let Some(scanner) = self.scanner.take() {
            scanner.unmount();
        }

        clear_children(&self.root);
        if !self.state.shows_launcher() {
            return Ok(());
        }
        let state = self.state.clone();
        let last = self.state.last_barcode.borrow().clone();
        let view = render_app(
            &self.state.language(),
            last.as_deref(),
            Rc::new(move || state.open_scanner()),
        )?;
        append_child(&self.root, &view)
    }

    fn mount_scanner(&mut self) -> Result<(), JsValue> {
        log::info!("📷 [APP] Abriendo scanner");
        clear_children(&self.root);
        let lang = self.state.language();

        let close: Rc<dyn Fn()> = {
            let state = self.state.clone();
            Rc::new(move || state.close_scanner())
        };

        let callback: BarcodeCallback = {
            let external = self.callback.clone();
            let state = self.state.clone();
            Rc::new(move |value: String| {
                state.set_last_barcode(value.clone());
                // Clonar antes de llamar: el callback puede reemplazarse a sí mismo
                let callback = external.borrow().clone();
                callback(value);
            })
        };

        let vm: Rc<BrowserScanner> = Rc::new(ScannerViewModel::new(callback, close));
        let weak = Rc::downgrade(&vm);

        let elements = render_scanner(&lang, cancel_action(&weak))?;
        append_child(&self.root, &elements.modal)?;

        let platform = BrowserPlatform::new(
            elements.video.clone(),
            CONFIG.barcode_formats.clone(),
            CONFIG.detector_polyfill_url.clone(),
        );
        vm.mount(BarcodeReader::new(platform));

        let actions = OverlayActions {
            on_retry: retry_action(&weak),
            on_cancel: cancel_action(&weak),
            on_select: {
                let weak = weak.clone();
                Rc::new(move |index: usize| {
                    if let Some(vm) = weak.upgrade() {
                        vm.select(index);
                    }
                })
            },
        };

        let refresh: Rc<dyn Fn()> = {
            let overlay = elements.overlay.clone();
            let weak = weak.clone();
            Rc::new(move || {
                let Some(vm) = weak.upgrade() else { return };
                if let Err(e) = render_overlay(&overlay, &vm.view(), &lang, &actions) {
                    log::error!("❌ [APP] Error renderizando overlay: {:?}", e);
                }
            })
        };
        refresh();
        vm.state().subscribe(move || refresh());

        let runner = vm.clone();
        wasm_bindgen_futures::spawn_local(async move {
            runner.run().await;
        });

        self.scanner = Some(vm);
        Ok(())
    }
}

fn retry_action(weak: &Weak<BrowserScanner>) -> Rc<dyn Fn()> {
    let weak = weak.clone();
    Rc::new(move || {
        if let Some(vm) = weak.upgrade() {
            wasm_bindgen_futures::spawn_local(async move {
                vm.retry().await;
            });
        }
    })
}

fn cancel_action(weak: &Weak<BrowserScanner>) -> Rc<dyn Fn()> {
    let weak = weak.clone();
    Rc::new(move || {
        if let Some(vm) = weak.upgrade() {
            vm.cancel();
        }
    })
}

/// Contenedor para páginas que solo usan open_scanner()
fn create_embedded_root() -> Result<Element, JsValue> {
    let body = body().ok_or_else(|| JsValue::from_str("No <body> element found"))?;
    let root = create_element("div")?;
    root.set_id(APP_ROOT_ID);
    append_child(&body, &root)?;
    Ok(root)
}

/// Callback por defecto: alert() con el código
fn default_callback() -> BarcodeCallback {
    Rc::new(|value: String| {
        if let Some(win) = window() {
            if let Err(e) = win.alert_with_message(&value) {
                log::warn!("⚠️ [APP] alert() falló: {:?}", e);
            }
        }
    })
}
