//! 文字書式
//!
//! ツールバーから組み立てられる書式の組（サイズ・太字・斜体・下線・色）

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGB 色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` 形式の文字列
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #rrggbb, got {:?}", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("invalid hex color {:?}", s))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// 文字単位の書式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleState {
    /// フォントサイズ（ポイント、常に正）
    pub font_size_pt: u16,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Rgb,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            font_size_pt: 12,
            bold: false,
            italic: false,
            underline: false,
            color: Rgb::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#0000ff".parse::<Rgb>().unwrap(), Rgb::new(0, 0, 255));
        assert_eq!("FF8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert!("#00f".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn hex_round_trip_through_serde() {
        let json = serde_json::to_string(&Rgb::new(18, 52, 86)).unwrap();
        assert_eq!(json, "\"#123456\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(18, 52, 86));
    }
}
