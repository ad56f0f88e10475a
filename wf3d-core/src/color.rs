/// CSS-style hex colors (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`)
use nom::{
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, map_res},
    multi::many1,
    sequence::preceded,
    IResult,
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color {0:?}")]
    Invalid(String),
}

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn parse_hex(input: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::Invalid(input.to_string());
        let (_, digits) = parse_digits(input.trim()).map_err(|_| invalid())?;

        let expand = |d: u8| d * 16 + d;
        match digits.as_slice() {
            [r, g, b] => Ok(Self::new(expand(*r), expand(*g), expand(*b), 255)),
            [r, g, b, a] => Ok(Self::new(expand(*r), expand(*g), expand(*b), expand(*a))),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::new(
                r1 * 16 + r0,
                g1 * 16 + g0,
                b1 * 16 + b0,
                255,
            )),
            [r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Self::new(
                r1 * 16 + r0,
                g1 * 16 + g0,
                b1 * 16 + b0,
                a1 * 16 + a0,
            )),
            _ => Err(invalid()),
        }
    }

    /// `rgba(r, g, b, a)` form accepted by canvas style setters
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

fn parse_digits(input: &str) -> IResult<&str, Vec<u8>> {
    all_consuming(preceded(tag("#"), many1(hex_digit)))(input)
}

fn hex_digit(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()),
        |s: &str| u8::from_str_radix(s, 16),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_forms() {
        assert_eq!(
            Rgba::parse_hex("#61e552ff").unwrap(),
            Rgba::new(0x61, 0xe5, 0x52, 0xff)
        );
        assert_eq!(
            Rgba::parse_hex("#101010").unwrap(),
            Rgba::new(0x10, 0x10, 0x10, 0xff)
        );
    }

    #[test]
    fn test_parse_short_forms() {
        assert_eq!(Rgba::parse_hex("#fff").unwrap(), Rgba::new(255, 255, 255, 255));
        assert_eq!(Rgba::parse_hex("#0a08").unwrap(), Rgba::new(0, 0xaa, 0, 0x88));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "#", "61e552", "#12345", "#zzzzzz", "#61e552ff00", "#61 e552"] {
            assert_eq!(
                Rgba::parse_hex(bad),
                Err(ColorError::Invalid(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_display_and_css() {
        let c: Rgba = "#61e552".parse().unwrap();
        assert_eq!(c.to_string(), "#61e552ff");
        assert_eq!(Rgba::new(16, 16, 16, 255).to_css(), "rgba(16, 16, 16, 1.000)");
    }
}
