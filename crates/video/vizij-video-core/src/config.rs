//! Player construction options.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PlayerError;

/// Tint used for the play affordance when none is configured.
pub const DEFAULT_PLAY_BUTTON_COLOR: Rgb = Rgb(0xC1C1C0);

/// Options recognized when constructing a [`crate::MediaPlayer`].
///
/// Field names match the JSON options accepted by web hosts, so a config can
/// be passed straight through from JS.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial media location; loaded as soon as construction completes.
    pub source: Option<String>,
    pub muted: bool,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    /// Initial volume, clamped into [0, 1]. `None` keeps the resource default.
    pub volume: Option<f32>,
    pub play_btn_color: Rgb,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            source: None,
            muted: false,
            autoplay: false,
            loop_playback: false,
            volume: None,
            play_btn_color: DEFAULT_PLAY_BUTTON_COLOR,
        }
    }
}

impl PlayerConfig {
    pub fn from_json(text: &str) -> Result<Self, PlayerError> {
        serde_json::from_str(text).map_err(|e| PlayerError::InvalidArgument {
            reason: format!("player config: {e}"),
        })
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// 0xRRGGBB colour.
///
/// Deserializes from either a number (`0x6EABDD`) or a hex string
/// (`"#6EABDD"` / `"6eabdd"`); serializes as a number.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Channels as sRGB floats in [0, 1].
    pub fn to_f32_array(self) -> [f32; 3] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        DEFAULT_PLAY_BUTTON_COLOR
    }
}

impl FromStr for Rgb {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);
        if digits.len() != 6 {
            return Err(PlayerError::InvalidArgument {
                reason: format!("colour '{s}' is not a 6-digit hex value"),
            });
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb)
            .map_err(|_| PlayerError::InvalidArgument {
                reason: format!("colour '{s}' is not valid hex"),
            })
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RgbVisitor;

        impl Visitor<'_> for RgbVisitor {
            type Value = Rgb;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a 0xRRGGBB number or a \"#RRGGBB\" string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rgb, E> {
                if v > 0xFF_FFFF {
                    return Err(E::custom(format!("colour {v:#x} exceeds 0xFFFFFF")));
                }
                Ok(Rgb(v as u32))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rgb, E> {
                if v < 0 {
                    return Err(E::custom("colour must be non-negative"));
                }
                self.visit_u64(v as u64)
            }

            // JS numbers arrive as f64 through serde-wasm-bindgen.
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Rgb, E> {
                if v.fract() != 0.0 || v < 0.0 {
                    return Err(E::custom(format!("colour {v} is not an integer")));
                }
                self.visit_u64(v as u64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Rgb, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RgbVisitor)
    }
}
