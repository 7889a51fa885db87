//! Background colors

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Linear RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Create a color from float components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Parse a CSS-style color name or `#rrggbb` string
    pub fn parse(value: &str) -> Option<Self> {
        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 {
                return None;
            }
            return u32::from_str_radix(hex, 16).ok().map(Self::from_hex);
        }

        let hex = match value.to_ascii_lowercase().as_str() {
            "black" => 0x000000,
            "white" => 0xffffff,
            "red" => 0xff0000,
            "green" => 0x008000,
            "blue" => 0x0000ff,
            "gray" | "grey" => 0x808080,
            "lightblue" => 0xadd8e6,
            "skyblue" => 0x87ceeb,
            "darkblue" => 0x00008b,
            "orange" => 0xffa500,
            _ => return None,
        };
        Some(Self::from_hex(hex))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_hex(0xadd8e6)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.r, self.g, self.b].serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Named(String),
    Rgb([f32; 3]),
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Named(name) => Self::parse(&name)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown color '{}'", name))),
            ColorRepr::Rgb([r, g, b]) => Ok(Self::new(r, g, b)),
        }
    }
}
