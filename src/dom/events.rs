// ============================================================================
// EVENT HANDLING - Sistema de eventos
// ============================================================================
// GESTIÓN DE MEMORY LEAKS:
// - Botones del widget: closure.forget() es seguro, el navegador limpia los
//   listeners cuando el elemento sale del DOM (set_inner_html("")).
// - Listeners ligados a una sesión (p.ej. "error" del <video>): usar
//   EventListener, que guarda el closure y lo desregistra en Drop.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use web_sys::{EventTarget, MouseEvent};

/// Listener con ciclo de vida: se desregistra al soltarlo
pub struct EventListener {
    target: EventTarget,
    event_type: String,
    closure: Closure<dyn FnMut()>,
}

impl EventListener {
    /// Registrar `handler` para `event_type` en `target`
    pub fn new<F>(target: &EventTarget, event_type: &str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        target.add_event_listener_with_callback(
            event_type,
            closure.as_ref().unchecked_ref(),
        )?;
        Ok(Self {
            target: target.clone(),
            event_type: event_type.to_string(),
            closure,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            &self.event_type,
            self.closure.as_ref().unchecked_ref(),
        );
    }
}

/// Helper para crear click handler simple
/// Nota: cuando el elemento se destruye del DOM el navegador limpia el listener,
/// por lo que closure.forget() es seguro.
pub fn on_click<F>(target: &EventTarget, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    target.add_event_listener_with_callback(
        "click",
        closure.as_ref().unchecked_ref(),
    )?;
    closure.forget();
    Ok(())
}
