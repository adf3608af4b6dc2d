//! QR encoding and PNG rasterization.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::credential::{WifiCredential, validate_scale};
use crate::error::{Error, Result};

/// Foreground colour used for dark modules unless configured otherwise.
pub const DEFAULT_DARK: Rgba<u8> = Rgba([0x00, 0x00, 0x0b, 0xff]);
/// Light modules and the quiet zone stay fully transparent.
pub const LIGHT: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0x00]);
/// Quiet zone width in modules the renderer adds around a normal QR symbol.
pub const QUIET_ZONE_MODULES: u32 = 4;
/// Largest image side rendered by default. Version 8 symbols (192 bytes at
/// level L) still fit at scale 100; the RGBA canvas stays under 144 MB.
pub const DEFAULT_MAX_SIDE_PX: u32 = 6000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrStyle {
    pub dark: Rgba<u8>,
    pub quiet_zone: bool,
    pub max_side_px: u32,
}

impl QrStyle {
    /// Blank modules on each side of the symbol.
    pub fn border(&self) -> u32 {
        if self.quiet_zone { QUIET_ZONE_MODULES } else { 0 }
    }
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            dark: DEFAULT_DARK,
            quiet_zone: true,
            max_side_px: DEFAULT_MAX_SIDE_PX,
        }
    }
}

/// A rendered code together with the geometry it was rendered at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    pub png: Vec<u8>,
    /// Modules per side, quiet zone included.
    pub modules: u32,
    pub scale: u32,
}

impl QrImage {
    pub fn side_px(&self) -> u32 {
        self.modules * self.scale
    }
}

/// Encodes the payload in the smallest QR version that fits at level L and
/// then raises the error correction as far as that version allows.
pub fn build_code(payload: &str) -> Result<QrCode> {
    let base = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)?;
    let version = base.version();
    for level in [EcLevel::H, EcLevel::Q, EcLevel::M] {
        if let Ok(code) = QrCode::with_version(payload.as_bytes(), version, level) {
            return Ok(code);
        }
    }
    Ok(base)
}

/// Side length in pixels, or `TooLarge` when it exceeds the style's limit.
pub fn checked_side(code: &QrCode, scale: u32, style: &QrStyle) -> Result<u32> {
    let modules = code.width() as u64 + 2 * u64::from(style.border());
    let side = modules * u64::from(scale);
    if side > u64::from(style.max_side_px) {
        return Err(Error::TooLarge {
            side,
            limit: style.max_side_px,
        });
    }
    Ok(side as u32)
}

/// Renders `scale`×`scale` pixel modules on a transparent canvas.
pub fn rasterize(code: &QrCode, scale: u32, style: &QrStyle) -> Result<RgbaImage> {
    checked_side(code, scale, style)?;
    Ok(code
        .render::<Rgba<u8>>()
        .quiet_zone(style.quiet_zone)
        .module_dimensions(scale, scale)
        .dark_color(style.dark)
        .light_color(LIGHT)
        .build())
}

pub fn write_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Full pipeline: payload, QR symbol, raster, PNG bytes.
pub fn encode(credential: &WifiCredential, scale: u32, style: &QrStyle) -> Result<QrImage> {
    let scale = validate_scale(scale)?;
    let code = build_code(&credential.payload())?;
    let modules = code.width() as u32 + 2 * style.border();
    debug!(
        version = ?code.version(),
        ec_level = ?code.error_correction_level(),
        modules,
        scale,
        "encoded wifi qr code"
    );
    let image = rasterize(&code, scale, style)?;
    let png = write_png(&image)?;
    Ok(QrImage {
        png,
        modules,
        scale,
    })
}

/// Parses `#rrggbb` into an opaque pixel.
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>> {
    let invalid = || Error::InvalidColor(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 0xff]))
}
