use thiserror::Error;

/// Library error type for QR generation and preview.
#[derive(Debug, Error)]
pub enum Error {
    /// The QR encoder rejected the payload (usually because it is too long).
    #[error("could not encode WiFi credentials as a QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// The rendered image would exceed the configured side limit.
    #[error("QR code would be {side}px wide, the limit is {limit}px; lower the scale")]
    TooLarge { side: u64, limit: u32 },

    /// The blocking render task failed to complete.
    #[error("render error: {0}")]
    Render(String),

    /// Scale outside the supported range.
    #[error("scale must be between {min} and {max}, got {value}")]
    InvalidScale { value: u32, min: u32, max: u32 },

    /// A form field that could not be parsed.
    #[error("invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// Unknown security label in a submitted form or CLI flag.
    #[error("unknown security type: {0}")]
    InvalidSecurity(String),

    /// Colour string that is not `#rrggbb`.
    #[error("invalid colour {0:?}, expected #rrggbb")]
    InvalidColor(String),

    /// PNG encode or decode failure.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
