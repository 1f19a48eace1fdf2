use serde::{de, Deserialize, Deserializer};

/// A colour, expressed in the RGB or Grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse a `#RRGGBB` (or `RRGGBB`) hex string. Equal channels collapse to
    /// a grey so that greys stay in the DeviceGray space.
    pub fn from_hex(hex: &str) -> Option<Colour> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
        if r == g && g == b {
            Some(Colour::Grey {
                g: r as f32 / 255.0,
            })
        } else {
            Some(Colour::new_rgb_bytes(r, g, b))
        }
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Colour::from_hex(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid colour `{s}`, expected #RRGGBB")))
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    /// `#CCCCCC`, used for fold marks and band rules
    pub const RULE_GREY: Colour = Colour::Grey { g: 0.8 };
    /// `#333333`, the default header text colour
    pub const HEADER_GREY: Colour = Colour::Grey { g: 0.2 };
    /// `#666666`, the default footer text colour
    pub const FOOTER_GREY: Colour = Colour::Grey { g: 0.4 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colours() {
        assert_eq!(Colour::from_hex("#CCCCCC"), Some(Colour::Grey { g: 0.8 }));
        assert_eq!(
            Colour::from_hex("ff0000"),
            Some(Colour::RGB {
                r: 1.0,
                g: 0.0,
                b: 0.0
            })
        );
        assert_eq!(Colour::from_hex("#12345"), None);
        assert_eq!(Colour::from_hex("#zzzzzz"), None);
    }
}
