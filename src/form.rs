//! The HTML form: its submitted fields and the controls that render them.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::credential::{
    DEFAULT_SCALE, MAX_SCALE, MIN_SCALE, Security, WifiCredential, validate_scale,
};
use crate::error::{Error, Result};

/// Raw form submission; every field is optional so a partial post still
/// re-renders the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QrForm {
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub security: Option<String>,
    #[serde(default)]
    pub hidden: Option<String>,
    #[serde(default)]
    pub scale: Option<String>,
}

/// Parsed form state: the credential plus the requested scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub credential: WifiCredential,
    pub scale: u32,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            credential: WifiCredential::default(),
            scale: DEFAULT_SCALE,
        }
    }
}

impl QrForm {
    pub fn collect(&self) -> Result<FormInput> {
        let security = self.parse_security()?;
        let scale = self.parse_scale()?;
        Ok(self.input(security, scale))
    }

    /// Like [`QrForm::collect`] but keeps every field that parses, falling
    /// back to defaults for the rest. Used to re-fill the form after a
    /// rejected submission.
    pub fn collect_lenient(&self, default_scale: u32) -> FormInput {
        let security = self.parse_security().unwrap_or_default();
        let scale = match self.scale.as_deref().map(str::trim) {
            None | Some("") => default_scale,
            Some(_) => self.parse_scale().unwrap_or(default_scale),
        };
        self.input(security, scale)
    }

    fn parse_security(&self) -> Result<Security> {
        match self.security.as_deref() {
            Some(value) => value.parse::<Security>(),
            None => Ok(Security::default()),
        }
    }

    fn parse_scale(&self) -> Result<u32> {
        match self.scale.as_deref().map(str::trim) {
            None | Some("") => Ok(DEFAULT_SCALE),
            Some(raw) => {
                let value = raw.parse::<u32>().map_err(|_| Error::InvalidField {
                    field: "scale",
                    value: raw.to_string(),
                })?;
                validate_scale(value)
            }
        }
    }

    fn input(&self, security: Security, scale: u32) -> FormInput {
        let password = if security.requires_password() {
            self.password.clone()
        } else {
            None
        };
        FormInput {
            credential: WifiCredential {
                ssid: self.ssid.clone().unwrap_or_default(),
                password,
                security,
                hidden: is_checked(self.hidden.as_deref()),
            },
            scale,
        }
    }
}

fn is_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}

/// Renders the controls prefilled with `input`. The passphrase is disabled
/// when no security is selected.
pub fn render_controls(input: &FormInput) -> String {
    let cred = &input.credential;
    let mut out = String::new();
    out.push_str("<form id=\"qr-form\" method=\"post\" action=\"/\">");
    out.push_str("<div class=\"columns\"><div class=\"column\">");
    let _ = write!(
        out,
        "<label>SSID<input name=\"ssid\" value=\"{}\" title=\"This is the name of your WiFi\" autocomplete=\"off\"></label>",
        escape_html(&cred.ssid)
    );
    out.push_str("<label>Encryption<select name=\"security\" title=\"If you have a password and do not know about this, it is most likely WPA\">");
    for option in Security::ALL {
        let selected = if option == cred.security { " selected" } else { "" };
        let _ = write!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            option.as_str(),
            selected,
            option.label()
        );
    }
    out.push_str("</select></label></div><div class=\"column\">");
    let disabled = if cred.security.requires_password() {
        ""
    } else {
        " disabled"
    };
    let _ = write!(
        out,
        "<label>Passphrase<input name=\"password\" type=\"password\" value=\"{}\" title=\"This is the password for the WiFi\" autocomplete=\"off\"{}></label>",
        escape_html(cred.password.as_deref().unwrap_or_default()),
        disabled
    );
    out.push_str("</div></div>");
    let checked = if cred.hidden { " checked" } else { "" };
    let _ = write!(
        out,
        "<label class=\"inline\"><input type=\"checkbox\" name=\"hidden\" value=\"true\"{checked}> Hidden WiFi</label>"
    );
    let _ = write!(
        out,
        "<label>Scales image <output id=\"scale-value\">{scale}</output>&times;<input type=\"range\" name=\"scale\" min=\"{MIN_SCALE}\" max=\"{MAX_SCALE}\" step=\"1\" value=\"{scale}\"></label>",
        scale = input.scale
    );
    out.push_str("<noscript><button type=\"submit\">Update QR code</button></noscript>");
    out.push_str("</form>");
    out.push_str(RERENDER_SCRIPT);
    out
}

// Re-submits on every change so the preview tracks the fields.
const RERENDER_SCRIPT: &str = "<script>(()=>{const f=document.getElementById('qr-form');const sec=f.elements['security'];const pw=f.elements['password'];const sc=f.elements['scale'];const out=document.getElementById('scale-value');sec.addEventListener('change',()=>{pw.disabled=sec.value==='none';});sc.addEventListener('input',()=>{out.textContent=sc.value;});f.addEventListener('change',()=>f.submit());})();</script>";

pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> QrForm {
        let mut form = QrForm::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "ssid" => form.ssid = value,
                "password" => form.password = value,
                "security" => form.security = value,
                "hidden" => form.hidden = value,
                "scale" => form.scale = value,
                _ => unreachable!(),
            }
        }
        form
    }

    #[test]
    fn empty_form_uses_defaults() {
        let input = QrForm::default().collect().expect("collect");
        assert_eq!(input.credential.ssid, "");
        assert_eq!(input.credential.security, Security::Wpa);
        assert!(!input.credential.hidden);
        assert_eq!(input.scale, 5);
    }

    #[test]
    fn collects_all_fields() {
        let input = form(&[
            ("ssid", "HomeNet"),
            ("password", "secret123"),
            ("security", "WEP"),
            ("hidden", "on"),
            ("scale", "12"),
        ])
        .collect()
        .expect("collect");
        assert_eq!(input.credential.ssid, "HomeNet");
        assert_eq!(input.credential.password.as_deref(), Some("secret123"));
        assert_eq!(input.credential.security, Security::Wep);
        assert!(input.credential.hidden);
        assert_eq!(input.scale, 12);
    }

    #[test]
    fn no_security_drops_password() {
        let input = form(&[("ssid", "Guest"), ("password", "x"), ("security", "none")])
            .collect()
            .expect("collect");
        assert_eq!(input.credential.password, None);
    }

    #[test]
    fn rejects_bad_scale_and_security() {
        assert!(matches!(
            form(&[("scale", "101")]).collect(),
            Err(Error::InvalidScale { value: 101, .. })
        ));
        assert!(matches!(
            form(&[("scale", "big")]).collect(),
            Err(Error::InvalidField { field: "scale", .. })
        ));
        assert!(matches!(
            form(&[("security", "WPA3-SAE")]).collect(),
            Err(Error::InvalidSecurity(_))
        ));
    }

    #[test]
    fn lenient_collect_keeps_parsable_fields() {
        let submitted = form(&[
            ("ssid", "HomeNet"),
            ("password", "secret123"),
            ("security", "WEP"),
            ("hidden", "on"),
            ("scale", "big"),
        ]);
        assert!(submitted.collect().is_err());
        let input = submitted.collect_lenient(7);
        assert_eq!(input.credential.ssid, "HomeNet");
        assert_eq!(input.credential.password.as_deref(), Some("secret123"));
        assert_eq!(input.credential.security, Security::Wep);
        assert!(input.credential.hidden);
        assert_eq!(input.scale, 7);

        let unknown = form(&[("ssid", "Lab"), ("security", "SAE"), ("scale", "12")]);
        let input = unknown.collect_lenient(5);
        assert_eq!(input.credential.security, Security::Wpa);
        assert_eq!(input.scale, 12);
    }

    #[test]
    fn password_input_disabled_without_security() {
        let input = FormInput {
            credential: WifiCredential::new("Guest", None, Security::None),
            scale: 5,
        };
        let html = render_controls(&input);
        assert!(html.contains("type=\"password\" value=\"\" title=\"This is the password for the WiFi\" autocomplete=\"off\" disabled>"));
        assert!(html.contains("<option value=\"none\" selected>No Password</option>"));
    }

    #[test]
    fn controls_escape_user_values() {
        let input = FormInput {
            credential: WifiCredential::new("<b>net</b>", Some("\"pw\"".into()), Security::Wpa),
            scale: 5,
        };
        let html = render_controls(&input);
        assert!(html.contains("value=\"&lt;b&gt;net&lt;/b&gt;\""));
        assert!(html.contains("value=\"&quot;pw&quot;\""));
        assert!(!html.contains("<b>net</b>"));
    }
}
