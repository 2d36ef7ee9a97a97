// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::config::CONFIG;
use crate::state::ReactiveState;

/// Estado global: toggle del widget y último código leído
#[derive(Clone)]
pub struct AppState {
    /// closed (false) / open (true)
    pub scanner_open: ReactiveState<bool>,
    pub last_barcode: Rc<RefCell<Option<String>>>,
    pub language: Rc<RefCell<String>>,
    /// Mostrar el botón "Start" cuando el widget está cerrado
    launcher: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            scanner_open: ReactiveState::new(false),
            last_barcode: Rc::new(RefCell::new(None)),
            language: Rc::new(RefCell::new(CONFIG.ui_language.clone())),
            launcher: true,
        }
    }

    /// Página sin #app: el widget solo se abre desde JS
    pub fn embedded() -> Self {
        Self {
            launcher: false,
            ..Self::new()
        }
    }

    pub fn shows_launcher(&self) -> bool {
        self.launcher
    }

    pub fn is_scanner_open(&self) -> bool {
        self.scanner_open.get()
    }

    pub fn open_scanner(&self) {
        if !self.is_scanner_open() {
            self.scanner_open.set(true);
        }
    }

    pub fn close_scanner(&self) {
        if self.is_scanner_open() {
            self.scanner_open.set(false);
        }
    }

    pub fn set_last_barcode(&self, barcode: String) {
        *self.last_barcode.borrow_mut() = Some(barcode);
    }

    pub fn language(&self) -> String {
        self.language.borrow().clone()
    }

    /// Suscribirse a cambios que requieren re-render
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.scanner_open.subscribe(callback);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
