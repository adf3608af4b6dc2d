//! WiFi credentials and the `WIFI:` payload that QR-capable clients parse.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Smallest accepted scale (pixels per module).
pub const MIN_SCALE: u32 = 1;
/// Largest accepted scale (pixels per module).
pub const MAX_SCALE: u32 = 100;
/// Scale used when the form does not carry one.
pub const DEFAULT_SCALE: u32 = 5;

/// Network authentication offered in the form.
///
/// Serialized as its form value; deserialized through [`FromStr`], so JSON
/// bodies accept the same spellings as the form and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Security {
    Wep,
    #[default]
    Wpa,
    None,
}

impl Security {
    pub const ALL: [Security; 3] = [Security::Wep, Security::Wpa, Security::None];

    /// Value of the `T:` segment, `None` when the segment is omitted.
    pub fn payload_type(self) -> Option<&'static str> {
        match self {
            Security::Wep => Some("WEP"),
            Security::Wpa => Some("WPA"),
            Security::None => None,
        }
    }

    /// Form value used for `<option value=...>`.
    pub fn as_str(self) -> &'static str {
        match self {
            Security::Wep => "WEP",
            Security::Wpa => "WPA",
            Security::None => "none",
        }
    }

    /// Human label shown in the selector.
    pub fn label(self) -> &'static str {
        match self {
            Security::None => "No Password",
            other => other.as_str(),
        }
    }

    pub fn requires_password(self) -> bool {
        !matches!(self, Security::None)
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Security> for String {
    fn from(security: Security) -> Self {
        security.as_str().to_string()
    }
}

impl TryFrom<String> for Security {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Security {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wep" => Ok(Security::Wep),
            "wpa" | "wpa2" => Ok(Security::Wpa),
            "" | "none" | "nopass" => Ok(Security::None),
            _ => Err(Error::InvalidSecurity(s.to_string())),
        }
    }
}

/// The four form fields that make up one QR code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WifiCredential {
    pub ssid: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub security: Security,
    #[serde(default)]
    pub hidden: bool,
}

impl WifiCredential {
    pub fn new(ssid: impl Into<String>, password: Option<String>, security: Security) -> Self {
        Self {
            ssid: ssid.into(),
            password,
            security,
            hidden: false,
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Password that actually ends up in the payload.
    pub fn effective_password(&self) -> Option<&str> {
        if !self.security.requires_password() {
            return None;
        }
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Builds the `WIFI:` string.
    ///
    /// With a security type the segments are `S`, `T`, optional `P` and an
    /// explicit `H:true|false`. Open networks carry only `S` plus `H:true`
    /// when hidden. Both forms end with the `;;` terminator.
    pub fn payload(&self) -> String {
        let mut data = String::from("WIFI:");
        data.push_str("S:");
        data.push_str(&escape_field(&self.ssid));
        data.push(';');
        match self.security.payload_type() {
            Some(kind) => {
                data.push_str("T:");
                data.push_str(kind);
                data.push(';');
                if let Some(password) = self.effective_password() {
                    data.push_str("P:");
                    data.push_str(&escape_field(password));
                    data.push(';');
                }
                data.push_str(if self.hidden { "H:true;" } else { "H:false;" });
            }
            None => {
                if self.hidden {
                    data.push_str("H:true;");
                }
            }
        }
        data.push(';');
        data
    }
}

/// Checks the scale against the slider bounds.
pub fn validate_scale(scale: u32) -> Result<u32, Error> {
    if (MIN_SCALE..=MAX_SCALE).contains(&scale) {
        Ok(scale)
    } else {
        Err(Error::InvalidScale {
            value: scale,
            min: MIN_SCALE,
            max: MAX_SCALE,
        })
    }
}

/// Keeps only the first and last character of an SSID for log output.
pub fn redact_ssid(ssid: &str) -> String {
    let chars: Vec<char> = ssid.chars().collect();
    match chars.len() {
        0 => String::new(),
        1 | 2 => "*".repeat(chars.len()),
        n => format!("{}{}{}", chars[0], "*".repeat(n - 2), chars[n - 1]),
    }
}

// MECARD-style escaping of the reserved separators.
fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for ch in value.chars() {
        if matches!(ch, '\\' | ';' | ',' | '"' | ':') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
