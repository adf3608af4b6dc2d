//! Turning PNG bytes into what the page shows: a size label, an inline
//! image and a download action.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, ImageReader};

use crate::error::Result;

pub const DOWNLOAD_FILE_NAME: &str = "wifi-qr-code.png";
pub const PNG_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub data_uri: String,
}

impl Preview {
    pub fn size_label(&self) -> String {
        format!("Image size: {}x{}", self.width, self.height)
    }

    pub fn file_name(&self) -> &'static str {
        DOWNLOAD_FILE_NAME
    }

    pub fn mime(&self) -> &'static str {
        PNG_MIME
    }
}

/// Reads the PNG header for its dimensions and wraps the bytes as a data URI.
pub fn present(png: &[u8]) -> Result<Preview> {
    let mut reader = ImageReader::new(Cursor::new(png));
    reader.set_format(ImageFormat::Png);
    let (width, height) = reader.into_dimensions()?;
    Ok(Preview {
        width,
        height,
        data_uri: format!("data:{PNG_MIME};base64,{}", STANDARD.encode(png)),
    })
}

/// `Content-Disposition` value for the download response.
pub fn attachment_disposition() -> String {
    format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{Security, WifiCredential};
    use crate::qr::{QrStyle, encode};

    #[test]
    fn reports_rendered_dimensions() {
        let cred = WifiCredential::new("Guest", None, Security::None);
        let image = encode(&cred, 3, &QrStyle::default()).expect("encode");
        let preview = present(&image.png).expect("preview");
        assert_eq!(preview.width, image.side_px());
        assert_eq!(preview.height, image.side_px());
        assert_eq!(
            preview.size_label(),
            format!("Image size: {0}x{0}", image.side_px())
        );
        assert!(preview.data_uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn corrupt_bytes_fail() {
        assert!(present(b"definitely not a png").is_err());
    }

    #[test]
    fn download_metadata_is_fixed() {
        assert_eq!(
            attachment_disposition(),
            "attachment; filename=\"wifi-qr-code.png\""
        );
        assert_eq!(PNG_MIME, "image/png");
    }
}
