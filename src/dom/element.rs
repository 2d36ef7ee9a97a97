// ============================================================================
// ELEMENT HELPERS - Funciones básicas para manipular DOM
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlVideoElement, Window};

/// Obtener window global
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Obtener document
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Obtener <body> como Element
pub fn body() -> Option<Element> {
    document()?.body().map(Element::from)
}

/// Obtener elemento por ID
pub fn get_element_by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

/// Crear elemento
pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document()
        .ok_or_else(|| JsValue::from_str("No document"))
        .and_then(|doc| doc.create_element(tag))
}

/// Crear <video> listo para la cámara (autoplay + playsinline + muted)
pub fn create_video_element(id: &str) -> Result<HtmlVideoElement, JsValue> {
    let element = create_element("video")?;
    element.set_id(id);
    element.set_attribute("autoplay", "")?;
    element.set_attribute("playsinline", "")?;
    element.set_attribute("muted", "")?;
    element
        .dyn_into::<HtmlVideoElement>()
        .map_err(|_| JsValue::from_str("Element is not an HtmlVideoElement"))
}

/// Vaciar contenido (el navegador limpia los listeners de los hijos)
pub fn clear_children(element: &Element) {
    element.set_inner_html("");
}

/// Agregar hijo
pub fn append_child(parent: &Element, child: &Element) -> Result<(), JsValue> {
    parent.append_child(child).map(|_| ())
}

/// Establecer atributo
pub fn set_attribute(element: &Element, name: &str, value: &str) -> Result<(), JsValue> {
    element.set_attribute(name, value)
}
