use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Zone type used when a record does not name one.
pub const DEFAULT_ZONE_TYPE: &str = "normal";

#[derive(Debug, Error, PartialEq)]
pub enum ZoneError {
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("color '{0}' is neither #rrggbb nor a color name")]
    InvalidColor(String),
    #[error("icon file '{0}' not found")]
    MissingIcon(String),
}

/// Outline/fill color of a zone, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneColor {
    Rgb(u8, u8, u8),
    Named(String),
}

impl Default for ZoneColor {
    fn default() -> Self {
        Self::Named("black".to_string())
    }
}

impl ZoneColor {
    /// Parse `#rrggbb` or a color name such as `"dark green"`.
    ///
    /// Names are only checked for shape; resolving them to RGB is left to
    /// whatever renders the flower.
    pub fn parse(input: &str) -> Result<ZoneColor, ZoneError> {
        let trimmed = input.trim();
        if let Some(digits) = trimmed.strip_prefix('#') {
            if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
                if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                    return Ok(ZoneColor::Rgb(r, g, b));
                }
            }
            return Err(ZoneError::InvalidColor(input.to_string()));
        }

        let is_name = !trimmed.is_empty()
            && trimmed.starts_with(|c: char| c.is_ascii_alphabetic())
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == ' ');
        if is_name {
            Ok(ZoneColor::Named(trimmed.to_ascii_lowercase()))
        } else {
            Err(ZoneError::InvalidColor(input.to_string()))
        }
    }
}

impl fmt::Display for ZoneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Descriptive payload of a hex: what landing on it means.
///
/// The zone type drives walk termination; the remaining fields are for
/// display and logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    label: String,
    zone_type: String,
    color: ZoneColor,
    icon: Option<PathBuf>,
    effect: Option<String>,
}

impl Zone {
    pub fn new(
        label: &str,
        zone_type: &str,
        color: Option<&str>,
        icon: Option<&str>,
        effect: Option<&str>,
    ) -> Result<Zone, ZoneError> {
        if label.trim().is_empty() {
            return Err(ZoneError::EmptyLabel);
        }

        let (color, icon, effect) = (present(color), present(icon), present(effect));

        let color = match color {
            Some(c) => ZoneColor::parse(c)?,
            None => ZoneColor::default(),
        };

        let icon = match icon {
            Some(path) if Path::new(path).is_file() => Some(PathBuf::from(path)),
            Some(path) => return Err(ZoneError::MissingIcon(path.to_string())),
            None => None,
        };

        Ok(Zone {
            label: label.to_string(),
            zone_type: zone_type.to_string(),
            color,
            icon,
            effect: effect.map(str::to_string),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn zone_type(&self) -> &str {
        &self.zone_type
    }

    pub fn color(&self) -> &ZoneColor {
        &self.color
    }

    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    pub fn effect(&self) -> Option<&str> {
        self.effect.as_deref()
    }
}

/// Loaders write an absent field as the text `null` or `None`.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| {
        let v = v.trim();
        !v.eq_ignore_ascii_case("null") && !v.eq_ignore_ascii_case("none")
    })
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {}]", self.label, self.zone_type, self.color)?;
        if let Some(effect) = &self.effect {
            write!(f, ": {}", effect)?;
        }
        Ok(())
    }
}
