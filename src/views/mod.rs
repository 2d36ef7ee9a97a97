pub mod app;
pub mod scanner;

pub use app::render_app;
pub use scanner::{render_overlay, render_scanner, OverlayActions, ScannerElements};
