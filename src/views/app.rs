// ============================================================================
// APP VIEW - Botón de inicio (widget cerrado)
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::ElementBuilder;
use crate::utils::t;

/// Renderizar la vista cerrada: botón "Start" y último código leído
pub fn render_app(
    lang: &str,
    last_barcode: Option<&str>,
    on_start: Rc<dyn Fn()>,
) -> Result<Element, JsValue> {
    let start = ElementBuilder::new("button")?
        .class("btn-start")
        .attr("type", "button")?
        .text(&t("start", lang))
        .on_click(move |_e| on_start())?
        .build();

    let container = ElementBuilder::new("div")?
        .class("app-container")
        .child(&start)?;

    let container = match last_barcode {
        Some(value) => {
            let last = ElementBuilder::new("p")?
                .class("last-barcode")
                .text(value)
                .build();
            container.child(&last)?
        }
        None => container,
    };

    Ok(container.build())
}
