// ============================================================================
// SCANNER VIEWMODEL - Lógica del widget de escaneo
// ============================================================================
// Une el BarcodeReader con el estado de la vista. Las vistas solo leen
// `state` y llaman a retry / cancel / select.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use crate::services::{BarcodeReader, ScanPlatform};
use crate::state::{ScannerState, ScannerView};

/// ViewModel del widget de escaneo (un montaje = una instancia)
pub struct ScannerViewModel<P: ScanPlatform> {
    reader: RefCell<Option<BarcodeReader<P>>>,
    state: ScannerState,
    callback: Rc<dyn Fn(String)>,
    close: Rc<dyn Fn()>,
    mounted: Cell<bool>,
    delivered: Cell<bool>,
}

impl<P: ScanPlatform> ScannerViewModel<P> {
    /// `callback` recibe el código; `close` desmonta el widget
    pub fn new(callback: Rc<dyn Fn(String)>, close: Rc<dyn Fn()>) -> Self {
        Self {
            reader: RefCell::new(None),
            state: ScannerState::new(ScannerView::Idle),
            callback,
            close,
            mounted: Cell::new(false),
            delivered: Cell::new(false),
        }
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    pub fn view(&self) -> ScannerView {
        self.state.get()
    }

    /// Ligar el lector (una sola vez por montaje)
    pub fn mount(&self, reader: BarcodeReader<P>) -> bool {
        if self.reader.borrow().is_some() {
            log::warn!("⚠️ [SCANNER] Lector ya montado, ignorando");
            return false;
        }
        *self.reader.borrow_mut() = Some(reader);
        self.mounted.set(true);
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Desmontar: destroy() siempre se ejecuta
    pub fn unmount(&self) {
        self.mounted.set(false);
        if let Some(reader) = self.reader.borrow_mut().take() {
            reader.destroy();
            log::info!("📴 [SCANNER] Widget desmontado");
        }
    }

    /// Lanzar una sesión y reflejar el resultado en el estado
    pub async fn run(&self) {
        let Some(reader) = self.reader.borrow().clone() else {
            log::warn!("⚠️ [SCANNER] run() sin lector montado");
            return;
        };

        self.state.set(ScannerView::Scanning);
        let outcome = reader.start().await;

        // Desmontado durante la sesión: nadie escucha ya este resultado
        if reader.is_destroyed() || !self.mounted.get() {
            log::debug!("🗑️ [SCANNER] Resultado descartado tras destroy()");
            return;
        }

        match outcome {
            Err(error) if error.is_abort() => {
                log::debug!("🛑 [SCANNER] Sesión cancelada, sin mensaje");
            }
            Err(error) => {
                log::warn!("⚠️ [SCANNER] {}", error);
                self.state.set(ScannerView::Error(error));
            }
            Ok(success) if success.barcodes.len() > 1 => {
                log::info!("📋 [SCANNER] {} códigos, esperando selección", success.barcodes.len());
                self.state.set(ScannerView::MultipleResults(success.barcodes));
            }
            Ok(success) => {
                if let Some(barcode) = success.first() {
                    self.deliver(barcode.raw_value.clone());
                }
            }
        }
    }

    /// Botón "reintentar" del error
    pub async fn retry(&self) {
        log::info!("🔁 [SCANNER] Reintentando");
        self.run().await;
    }

    /// Botón "cancelar": cerrar sin entregar código
    pub fn cancel(&self) {
        log::info!("✕ [SCANNER] Cancelado por el usuario");
        if let Some(reader) = self.reader.borrow().as_ref() {
            reader.destroy();
        }
        self.state.set(ScannerView::Closed);
        (self.close)();
    }

    /// Elegir un código de la lista de resultados múltiples
    pub fn select(&self, index: usize) -> bool {
        let chosen = self.state.with(|view| match view {
            ScannerView::MultipleResults(barcodes) => barcodes.get(index).map(|b| b.raw_value.clone()),
            _ => None,
        });
        match chosen {
            Some(raw_value) => {
                self.deliver(raw_value);
                true
            }
            None => {
                log::warn!("⚠️ [SCANNER] Selección {} no disponible", index);
                false
            }
        }
    }

    /// Entregar el código al caller y cerrar (una sola vez)
    fn deliver(&self, raw_value: String) {
        if self.delivered.replace(true) {
            return;
        }
        log::info!("📱 [SCANNER] Código: {}", raw_value);
        self.state.set(ScannerView::Closed);
        (self.callback)(raw_value);
        (self.close)();
    }
}

impl<P: ScanPlatform> Drop for ScannerViewModel<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}
