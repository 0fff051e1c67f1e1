//! Validation messages
//!
//! Human-readable message templates per rule tag, in every supported locale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locale used when rendering [`FieldError`](super::engine::FieldError) messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Bahasa Indonesia
    Id,
}

impl Locale {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Id => "id",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0} (expected `en` or `id`)")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "id" | "id-id" => Ok(Locale::Id),
            other => Err(UnsupportedLocale(other.to_string())),
        }
    }
}

/// Renders the message for a failed `tag` on `field`.
///
/// `param` is only used by tags whose template mentions it (`min`, `max`).
/// Unknown tags fall back to a generic "is invalid" message.
pub fn render(locale: Locale, tag: &str, field: &str, param: Option<&str>) -> String {
    let param = param.unwrap_or_default();
    match locale {
        Locale::En => match tag {
            "required" => format!("{field} is required"),
            "email" => format!("{field} must be a valid email address"),
            "min" => format!("{field} must be at least {param} characters"),
            "max" => format!("{field} must be at most {param} characters"),
            "password" => format!(
                "{field} must be ≥8 characters with uppercase, lowercase, digit, and special character"
            ),
            "phone" => format!("{field} must be a valid phone number"),
            "username" => format!(
                "{field} must be 3–30 alphanumeric/underscore/hyphen characters, not leading/trailing with underscore/hyphen"
            ),
            _ => format!("{field} is invalid"),
        },
        Locale::Id => match tag {
            "required" => format!("{field} wajib diisi"),
            "email" => format!("{field} harus berupa alamat email yang valid"),
            "min" => format!("{field} minimal harus {param} karakter"),
            "max" => format!("{field} maksimal harus {param} karakter"),
            "password" => format!(
                "{field} harus minimal 8 karakter dengan huruf besar, kecil, angka, dan karakter khusus"
            ),
            "phone" => format!("{field} harus berupa nomor telepon yang valid"),
            "username" => format!(
                "{field} harus 3-30 karakter, alfanumerik dengan underscore/hyphen (tidak di awal/akhir)"
            ),
            _ => format!("{field} tidak valid"),
        },
    }
}
