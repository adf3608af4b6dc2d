use std::sync::Arc;

use tracing::debug;

use crate::cache::PreviewCache;
use crate::credential::{WifiCredential, redact_ssid};
use crate::error::Result;
use crate::qr::{self, QrImage, QrStyle};

/// Encoding front-end shared by the web handlers and the CLI.
#[derive(Debug)]
pub struct QrSession {
    style: QrStyle,
    cache: PreviewCache,
}

impl QrSession {
    pub fn new(style: QrStyle, cache_capacity: usize) -> Self {
        Self {
            style,
            cache: PreviewCache::new(cache_capacity),
        }
    }

    pub fn style(&self) -> &QrStyle {
        &self.style
    }

    pub fn encode(&self, credential: &WifiCredential, scale: u32) -> Result<Arc<QrImage>> {
        if let Some(hit) = self.cache.get(credential, scale) {
            debug!(ssid = %redact_ssid(&credential.ssid), scale, "qr cache hit");
            return Ok(hit);
        }
        let image = Arc::new(qr::encode(credential, scale, &self.style)?);
        self.cache
            .insert(credential.clone(), scale, Arc::clone(&image));
        Ok(image)
    }
}

impl Default for QrSession {
    fn default() -> Self {
        Self::new(QrStyle::default(), 0)
    }
}
