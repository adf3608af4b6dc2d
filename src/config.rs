use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use crate::credential::{DEFAULT_SCALE, validate_scale};
use crate::qr::{self, DEFAULT_MAX_SIDE_PX, QrStyle};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UiConfig {
    #[serde(default = "default_ui_bind")]
    pub bind_address: String,
    #[serde(default = "default_ui_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct QrConfig {
    #[serde(default = "default_scale")]
    pub default_scale: u32,
    #[serde(default = "default_quiet_zone")]
    pub quiet_zone: bool,
    #[serde(default = "default_max_side_px")]
    pub max_side_px: u32,
    #[serde(default = "default_dark_color")]
    pub dark_color: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

/// Accepted range for `qr.max-side-px`.
pub const MAX_SIDE_PX_RANGE: std::ops::RangeInclusive<u32> = 64..=16384;

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let cfg: Config = serde_yaml::from_slice(&data)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        Ok(cfg)
    }

    /// Loads `path` when given, otherwise falls back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_scale(self.qr.default_scale).context("qr.default-scale")?;
        qr::parse_hex_color(&self.qr.dark_color).context("qr.dark-color")?;
        if !MAX_SIDE_PX_RANGE.contains(&self.qr.max_side_px) {
            anyhow::bail!(
                "qr.max-side-px must be between {} and {}, got {}",
                MAX_SIDE_PX_RANGE.start(),
                MAX_SIDE_PX_RANGE.end(),
                self.qr.max_side_px
            );
        }
        self.ui.socket_addr()?;
        Ok(())
    }
}

impl UiConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("invalid ui.bind-address {:?}", self.bind_address))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl QrConfig {
    pub fn style(&self) -> Result<QrStyle> {
        Ok(QrStyle {
            dark: qr::parse_hex_color(&self.dark_color)?,
            quiet_zone: self.quiet_zone,
            max_side_px: self.max_side_px,
        })
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_ui_bind(),
            port: default_ui_port(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            default_scale: default_scale(),
            quiet_zone: default_quiet_zone(),
            max_side_px: default_max_side_px(),
            dark_color: default_dark_color(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

fn default_ui_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_ui_port() -> u16 {
    8080
}

fn default_scale() -> u32 {
    DEFAULT_SCALE
}

fn default_quiet_zone() -> bool {
    true
}

fn default_max_side_px() -> u32 {
    DEFAULT_MAX_SIDE_PX
}

fn default_dark_color() -> String {
    "#00000b".to_string()
}

fn default_cache_capacity() -> usize {
    32
}
