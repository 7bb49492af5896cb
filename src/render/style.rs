//! Branding carried into the renderer at call time

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// An sRGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const GREY: Rgb = Rgb::new(128, 128, 128);
    pub const WHITE_SMOKE: Rgb = Rgb::new(245, 245, 245);
    pub const LIGHT_GREY: Rgb = Rgb::new(211, 211, 211);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to 0.0..=1.0 for PDF color operators
    pub fn components(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid color {0:?}, expected #RRGGBB")]
pub struct ColorParseError(pub String);

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const DEFAULT_BRAND_COLOR: Rgb = Rgb::new(0x2E, 0x86, 0xC1);
pub const DEFAULT_COMPANY_NAME: &str = "InvoicePro";
pub const DEFAULT_ADDRESS_LINE: &str = "123 Business Street, City, Country";
pub const DEFAULT_CONTACT_LINE: &str = "Email: you@company.com | Phone: +123456789";
pub const DEFAULT_BANK_DETAILS: &str = "Bank: Bank Name, Account #: 123456789, IBAN: PK00BANK000000";

/// Company text, bank details, brand color and logo used on every invoice
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStyle {
    /// Shown as the header wordmark when no logo is available
    pub company_name: String,
    pub address_line: String,
    pub contact_line: String,
    /// Body of the payment instructions section
    pub bank_details: String,
    pub brand_color: Rgb,
    pub logo_path: Option<PathBuf>,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            address_line: DEFAULT_ADDRESS_LINE.to_string(),
            contact_line: DEFAULT_CONTACT_LINE.to_string(),
            bank_details: DEFAULT_BANK_DETAILS.to_string(),
            brand_color: DEFAULT_BRAND_COLOR,
            logo_path: None,
        }
    }
}

impl DocumentStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = name.into();
        self
    }

    pub fn with_address_line(mut self, line: impl Into<String>) -> Self {
        self.address_line = line.into();
        self
    }

    pub fn with_contact_line(mut self, line: impl Into<String>) -> Self {
        self.contact_line = line.into();
        self
    }

    pub fn with_bank_details(mut self, details: impl Into<String>) -> Self {
        self.bank_details = details.into();
        self
    }

    pub fn with_brand_color(mut self, color: Rgb) -> Self {
        self.brand_color = color;
        self
    }

    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#2E86C1".parse::<Rgb>(), Ok(DEFAULT_BRAND_COLOR));
        assert_eq!("2e86c1".parse::<Rgb>(), Ok(DEFAULT_BRAND_COLOR));
        assert_eq!(DEFAULT_BRAND_COLOR.to_string(), "#2E86C1");
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!("#2E86C".parse::<Rgb>().is_err());
        assert!("#GG86C1".parse::<Rgb>().is_err());
        assert!("#2É86C1".parse::<Rgb>().is_err());
        assert!("#+1+2+3".parse::<Rgb>().is_err());
        assert!("#-1-2-3".parse::<Rgb>().is_err());
    }

    #[test]
    fn components_are_normalized() {
        assert_eq!(Rgb::WHITE.components(), (1.0, 1.0, 1.0));
        assert_eq!(Rgb::BLACK.components(), (0.0, 0.0, 0.0));
    }
}
