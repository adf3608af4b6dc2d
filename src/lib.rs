//! WiFi QR code generator: a small web form that turns network credentials
//! into a downloadable `WIFI:` QR code.

pub mod cache;
pub mod config;
pub mod credential;
pub mod error;
pub mod form;
pub mod logging;
pub mod preview;
pub mod qr;
pub mod session;
pub mod web;

pub use credential::{Security, WifiCredential};
pub use error::{Error, Result};
pub use qr::{QrImage, QrStyle};
pub use session::QrSession;
