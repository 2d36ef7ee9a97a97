pub mod scan_platform;
pub mod barcode_reader;
pub mod browser_platform;
#[cfg(test)]
pub mod testing;

pub use scan_platform::{CameraStream, ScanPlatform};
pub use barcode_reader::{BarcodeReader, SessionSnapshot};
pub use browser_platform::{BrowserPlatform, BrowserStream};
