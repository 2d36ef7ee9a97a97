// Utils compartidos

pub mod constants;
pub mod barcode_ffi;
pub mod i18n;

pub use constants::*;
pub use i18n::*;
