// ============================================================================
// BARCODE DETECTOR FFI - Bindings a la API BarcodeDetector del navegador
// ============================================================================
// Nativa (Chrome/Android) o polyfill registrado en globalThis.
// Solo wrappers y conversión de valores JS, sin estado.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use js_sys::{Array, Object, Reflect};
use wasm_bindgen_futures::JsFuture;
use crate::models::{BoundingBox, DetectedBarcode, Point};

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type BarcodeDetector;

    #[wasm_bindgen(catch, constructor, js_class = "BarcodeDetector")]
    fn new_default() -> Result<BarcodeDetector, JsValue>;

    #[wasm_bindgen(catch, constructor, js_class = "BarcodeDetector")]
    fn new_with_options(options: &JsValue) -> Result<BarcodeDetector, JsValue>;

    #[wasm_bindgen(catch, static_method_of = BarcodeDetector, js_name = getSupportedFormats)]
    fn get_supported_formats() -> Result<js_sys::Promise, JsValue>;

    /// detect(source) -> Promise<DetectedBarcode[]>
    #[wasm_bindgen(catch, method)]
    pub fn detect(this: &BarcodeDetector, source: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

// import() dinámico: solo existe como expresión JS
#[wasm_bindgen(inline_js = "export function import_module(url) { return import(url); }")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn import_module(url: &str) -> Result<js_sys::Promise, JsValue>;
}

/// Convertir un error JS a mensaje legible
pub fn js_error_message(error: &JsValue) -> String {
    if let Some(message) = Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
    {
        let name = Reflect::get(error, &JsValue::from_str("name"))
            .ok()
            .and_then(|n| n.as_string())
            .unwrap_or_else(|| "Error".to_string());
        return format!("{}: {}", name, message);
    }
    error.as_string().unwrap_or_else(|| format!("{:?}", error))
}

/// ¿Existe `BarcodeDetector` en el scope global?
pub fn is_supported() -> bool {
    Reflect::has(&js_sys::global(), &JsValue::from_str("BarcodeDetector")).unwrap_or(false)
}

/// Cargar el polyfill de `url` e instalar su `BarcodeDetector` en globalThis
pub async fn load_polyfill(url: &str) -> Result<(), String> {
    let promise = import_module(url).map_err(|e| js_error_message(&e))?;
    let module = JsFuture::from(promise).await.map_err(|e| js_error_message(&e))?;

    let detector = Reflect::get(&module, &JsValue::from_str("BarcodeDetector"))
        .map_err(|e| js_error_message(&e))?;
    if !detector.is_function() {
        return Err(format!("{} no exporta BarcodeDetector", url));
    }
    Reflect::set(&js_sys::global(), &JsValue::from_str("BarcodeDetector"), &detector)
        .map_err(|e| js_error_message(&e))?;
    Ok(())
}

/// Formatos soportados por el detector del navegador
pub async fn supported_formats() -> Result<Vec<String>, String> {
    let promise = BarcodeDetector::get_supported_formats().map_err(|e| js_error_message(&e))?;
    let value = JsFuture::from(promise).await.map_err(|e| js_error_message(&e))?;
    let formats = value
        .dyn_into::<Array>()
        .map_err(|_| "getSupportedFormats() no devolvió un array".to_string())?;
    Ok(formats.iter().filter_map(|f| f.as_string()).collect())
}

/// Crear detector; `formats` vacío = todos los formatos
pub fn create_detector(formats: &[String]) -> Result<BarcodeDetector, String> {
    if formats.is_empty() {
        return BarcodeDetector::new_default().map_err(|e| js_error_message(&e));
    }

    let list = Array::new();
    for format in formats {
        list.push(&JsValue::from_str(format));
    }
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("formats"), &list).map_err(|e| js_error_message(&e))?;
    BarcodeDetector::new_with_options(&options).map_err(|e| js_error_message(&e))
}

/// Convertir el array devuelto por detect() a modelos Rust
pub fn parse_detected(value: &JsValue) -> Result<Vec<DetectedBarcode>, String> {
    let items = value
        .dyn_ref::<Array>()
        .ok_or_else(|| "detect() no devolvió un array".to_string())?;

    let mut barcodes = Vec::with_capacity(items.length() as usize);
    for item in items.iter() {
        let Some(raw_value) = get_string(&item, "rawValue") else {
            log::warn!("⚠️ [FFI] Código sin rawValue, ignorado");
            continue;
        };
        barcodes.push(DetectedBarcode {
            raw_value,
            format: get_string(&item, "format").unwrap_or_default(),
            bounding_box: parse_bounding_box(&item),
            corner_points: parse_corner_points(&item),
        });
    }
    Ok(barcodes)
}

fn get_string(obj: &JsValue, key: &str) -> Option<String> {
    Reflect::get(obj, &JsValue::from_str(key)).ok()?.as_string()
}

fn get_f64(obj: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(obj, &JsValue::from_str(key)).ok()?.as_f64()
}

fn parse_bounding_box(item: &JsValue) -> Option<BoundingBox> {
    let rect = Reflect::get(item, &JsValue::from_str("boundingBox")).ok()?;
    if rect.is_undefined() || rect.is_null() {
        return None;
    }
    Some(BoundingBox {
        x: get_f64(&rect, "x")?,
        y: get_f64(&rect, "y")?,
        width: get_f64(&rect, "width")?,
        height: get_f64(&rect, "height")?,
    })
}

fn parse_corner_points(item: &JsValue) -> Vec<Point> {
    let Ok(points) = Reflect::get(item, &JsValue::from_str("cornerPoints")) else {
        return Vec::new();
    };
    let Some(points) = points.dyn_ref::<Array>() else {
        return Vec::new();
    };
    points
        .iter()
        .filter_map(|p| {
            Some(Point {
                x: get_f64(&p, "x")?,
                y: get_f64(&p, "y")?,
            })
        })
        .collect()
}
