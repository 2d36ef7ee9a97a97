// ============================================================================
// SCANNER VIEW - Widget de escaneo (Rust puro)
// ============================================================================
// Solo DOM: el estado y las acciones vienen del ScannerViewModel.
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlVideoElement};
use crate::dom::{append_child, clear_children, create_video_element, ElementBuilder};
use crate::state::ScannerView;
use crate::utils::{error_message, t, SCANNER_MODAL_ID, SCANNER_OVERLAY_ID, SCANNER_VIDEO_ID};

/// Nodos del widget que la app necesita conservar
pub struct ScannerElements {
    pub modal: Element,
    pub video: HtmlVideoElement,
    pub overlay: Element,
}

/// Acciones de los botones del overlay
pub struct OverlayActions {
    pub on_retry: Rc<dyn Fn()>,
    pub on_cancel: Rc<dyn Fn()>,
    pub on_select: Rc<dyn Fn(usize)>,
}

/// Renderizar el contenedor del scanner con su <video>
pub fn render_scanner(lang: &str, on_close: Rc<dyn Fn()>) -> Result<ScannerElements, JsValue> {
    let close_btn = ElementBuilder::new("button")?
        .class("btn-close")
        .attr("type", "button")?
        .attr("aria-label", &t("close", lang))?
        .text("✕")
        .on_click(move |_e| on_close())?
        .build();

    let header = ElementBuilder::new("div")?
        .class("scanner-header")
        .child(&close_btn)?
        .build();

    let video = create_video_element(SCANNER_VIDEO_ID)?;
    video.set_class_name("scanner-video");

    let overlay = ElementBuilder::new("div")?
        .id(SCANNER_OVERLAY_ID)
        .class("scanner-overlay")
        .build();

    let content = ElementBuilder::new("div")?
        .class("scanner-content")
        .child(&header)?
        .child(&video)?
        .child(&overlay)?
        .build();

    let modal = ElementBuilder::new("aside")?
        .id(SCANNER_MODAL_ID)
        .class("scanner-modal active")
        .child(&content)?
        .build();

    Ok(ScannerElements { modal, video, overlay })
}

/// Re-renderizar el overlay según el estado del viewmodel
pub fn render_overlay(
    overlay: &Element,
    view: &ScannerView,
    lang: &str,
    actions: &OverlayActions,
) -> Result<(), JsValue> {
    clear_children(overlay);

    match view {
        ScannerView::Idle | ScannerView::Scanning => {
            let hint = ElementBuilder::new("p")?
                .class("scanner-hint")
                .text(&t("scanning", lang))
                .build();
            append_child(overlay, &hint)?;
        }
        ScannerView::Error(error) => {
            let message = ElementBuilder::new("div")?
                .class("scanner-error-message")
                .text(&error_message(error.kind, &error.message, lang))
                .build();

            let on_retry = actions.on_retry.clone();
            let retry = ElementBuilder::new("button")?
                .class("btn-retry")
                .attr("type", "button")?
                .text(&t("try_again", lang))
                .on_click(move |_e| on_retry())?
                .build();

            let on_cancel = actions.on_cancel.clone();
            let cancel = ElementBuilder::new("button")?
                .class("btn-cancel")
                .attr("type", "button")?
                .text(&t("no", lang))
                .on_click(move |_e| on_cancel())?
                .build();

            let panel = ElementBuilder::new("div")?
                .class("scanner-error")
                .child(&message)?
                .child(&retry)?
                .child(&cancel)?
                .build();
            append_child(overlay, &panel)?;
        }
        ScannerView::MultipleResults(barcodes) => {
            let list = ElementBuilder::new("ul")?.class("scanner-results").build();
            for (index, barcode) in barcodes.iter().enumerate() {
                let on_select = actions.on_select.clone();
                let button = ElementBuilder::new("button")?
                    .attr("type", "button")?
                    .attr("data-format", &barcode.format)?
                    .text(&barcode.raw_value)
                    .on_click(move |_e| on_select(index))?
                    .build();
                let item = ElementBuilder::new("li")?.child(&button)?.build();
                append_child(&list, &item)?;
            }

            let title = ElementBuilder::new("p")?
                .class("scanner-results-title")
                .text(&t("choose_barcode", lang))
                .build();
            append_child(overlay, &title)?;
            append_child(overlay, &list)?;
        }
        ScannerView::Closed => {}
    }

    Ok(())
}
