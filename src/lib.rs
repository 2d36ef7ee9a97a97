// ============================================================================
// BARCODE SCANNER PWA - FRONTEND MVVM (RUST PURO)
// ============================================================================
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI
// - Services: Lector de códigos y capacidades del navegador
// - State: State Management con Rc<RefCell>
// - Models: Códigos detectados y errores
// ============================================================================

pub mod config;
pub mod models;
pub mod services;
pub mod viewmodels;
pub mod state;
pub mod dom;
pub mod views;
pub mod utils;
pub mod app;

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use crate::app::App;
use crate::config::CONFIG;

pub use crate::models::{BarcodeErrorKind, DetectedBarcode, ErrorEntity, ScanOutcome, ScanSuccess};
pub use crate::services::{BarcodeReader, BrowserPlatform, ScanPlatform};

// Variable estática global para mantener la instancia de App
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    if CONFIG.is_logging_enabled() {
        wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level()));
    }
    log::info!("🚀 Barcode Scanner - Rust Puro + MVVM");

    // Sin #app la App crea su propio contenedor y espera a open_scanner()
    let mut app = App::new()?;
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|app_cell| {
        if let Some(ref mut app) = *app_cell.borrow_mut() {
            if let Err(e) = app.render() {
                log::error!("❌ [RERENDER] Error re-renderizando: {:?}", e);
            }
        } else {
            log::warn!("⚠️ [RERENDER] App no está inicializada");
        }
    });
}

/// Abrir el scanner desde JavaScript; `callback(rawValue)` recibe el código
#[wasm_bindgen]
pub fn open_scanner(callback: js_sys::Function) -> Result<(), JsValue> {
    APP.with(|app_cell| {
        let app = app_cell.borrow();
        let app = app
            .as_ref()
            .ok_or_else(|| JsValue::from_str("App no está inicializada"))?;

        app.set_callback(Rc::new(move |value: String| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&value)) {
                log::error!("❌ [MAIN] El callback JS lanzó: {:?}", e);
            }
        }));
        app.state().open_scanner();
        Ok(())
    })
}

/// Cerrar el scanner desde JavaScript (libera cámara y temporizador)
#[wasm_bindgen]
pub fn close_scanner() {
    APP.with(|app_cell| {
        if let Some(ref app) = *app_cell.borrow() {
            app.state().close_scanner();
        }
    });
}
