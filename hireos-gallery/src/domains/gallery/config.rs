//! Construction-time gallery configuration
//!
//! Every option is optional in serialized form; missing fields take the
//! defaults the landing page was designed around.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// One input card: an image URL plus a two-line caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub image: String,
    pub text: String,
    #[serde(default, alias = "quote")]
    pub caption: String,
}

impl GalleryItem {
    pub fn new(
        image: impl Into<String>,
        text: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            image: image.into(),
            text: text.into(),
            caption: caption.into(),
        }
    }

    /// Built-in item shown when the host supplies none.
    pub fn placeholder() -> Self {
        Self::new(
            "https://picsum.photos/seed/1/800/600",
            "Bridge",
            "Nature is waiting",
        )
    }
}

/// Label font description.
///
/// Serialized as a CSS-like font shorthand,
/// e.g. `"bold 30px Figtree"`. `path` pins an exact font file and skips
/// system lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FontSetting", into = "FontSetting")]
pub struct FontSpec {
    pub size_px: f32,
    pub bold: bool,
    pub family: String,
    pub path: Option<PathBuf>,
}

const DEFAULT_FONT_SIZE: f32 = 30.0;

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size_px: DEFAULT_FONT_SIZE,
            bold: true,
            family: "sans-serif".to_string(),
            path: None,
        }
    }
}

impl FontSpec {
    /// Parse the shorthand form. Unknown keywords become part of the family,
    /// a missing `<n>px` token keeps the default size.
    pub fn parse(shorthand: &str) -> Self {
        let mut size_px = None;
        let mut bold = false;
        let mut family = Vec::new();

        for token in shorthand.split_whitespace() {
            let lower = token.to_ascii_lowercase();
            if size_px.is_none()
                && let Some(number) = lower.strip_suffix("px")
                && let Ok(value) = number.parse::<f32>()
                && value.is_finite()
                && value > 0.0
            {
                size_px = Some(value);
                continue;
            }
            match lower.as_str() {
                "bold" | "bolder" | "700" | "800" | "900" => bold = true,
                "normal" | "italic" | "oblique" | "400" => {}
                _ => family.push(token.trim_matches(['"', '\'', ','])),
            }
        }

        let family = if family.is_empty() {
            "sans-serif".to_string()
        } else {
            family.join(" ")
        };

        Self {
            size_px: size_px.unwrap_or(DEFAULT_FONT_SIZE),
            bold,
            family,
            path: None,
        }
    }

    /// Shorthand used for serialization and logging.
    pub fn shorthand(&self) -> String {
        let weight = if self.bold { "bold " } else { "" };
        format!("{weight}{}px {}", self.size_px, self.family)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FontSetting {
    Shorthand(String),
    Detailed {
        #[serde(default = "default_font_size")]
        size_px: f32,
        #[serde(default)]
        bold: bool,
        #[serde(default = "default_font_family")]
        family: String,
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

impl From<FontSetting> for FontSpec {
    fn from(setting: FontSetting) -> Self {
        match setting {
            FontSetting::Shorthand(s) => FontSpec::parse(&s),
            FontSetting::Detailed {
                size_px,
                bold,
                family,
                path,
            } => FontSpec {
                size_px,
                bold,
                family,
                path,
            },
        }
    }
}

impl From<FontSpec> for FontSetting {
    fn from(spec: FontSpec) -> Self {
        match spec.path {
            None => FontSetting::Shorthand(spec.shorthand()),
            Some(path) => FontSetting::Detailed {
                size_px: spec.size_px,
                bold: spec.bold,
                family: spec.family,
                path: Some(path),
            },
        }
    }
}

/// Straight-alpha RGBA colour in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex colour `{0}`")]
pub struct ColorParseError(pub String);

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }

        let channel = |digits: &str| -> Result<f32, ColorParseError> {
            let value = u8::from_str_radix(digits, 16).map_err(|_| err())?;
            Ok(value as f32 / 255.0)
        };
        let short = |digit: &str| -> Result<f32, ColorParseError> {
            channel(&digit.repeat(2))
        };

        match hex.len() {
            3 => Ok(Rgba {
                r: short(&hex[0..1])?,
                g: short(&hex[1..2])?,
                b: short(&hex[2..3])?,
                a: 1.0,
            }),
            6 | 8 => Ok(Rgba {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: if hex.len() == 8 {
                    channel(&hex[6..8])?
                } else {
                    1.0
                },
            }),
            _ => Err(err()),
        }
    }
}

pub const DEFAULT_BEND_AMOUNT: f32 = 3.0;
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_CORNER_RADIUS: f32 = 0.05;
pub const DEFAULT_SCROLL_SPEED: f32 = 2.0;
pub const DEFAULT_SCROLL_EASING: f32 = 0.05;

/// Everything the carousel needs at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryConfig {
    pub items: Vec<GalleryItem>,
    #[serde(alias = "bend")]
    pub bend_amount: f32,
    pub text_color: String,
    #[serde(alias = "borderRadius")]
    pub card_corner_radius: f32,
    pub font: FontSpec,
    #[serde(alias = "scrollSpeed")]
    pub scroll_speed_multiplier: f32,
    #[serde(alias = "scrollEase")]
    pub scroll_easing: f32,
    #[serde(alias = "autoScroll")]
    pub auto_scroll_enabled: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            bend_amount: DEFAULT_BEND_AMOUNT,
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            card_corner_radius: DEFAULT_CORNER_RADIUS,
            font: FontSpec::default(),
            scroll_speed_multiplier: DEFAULT_SCROLL_SPEED,
            scroll_easing: DEFAULT_SCROLL_EASING,
            auto_scroll_enabled: true,
        }
    }
}

impl GalleryConfig {
    pub fn with_items(mut self, items: Vec<GalleryItem>) -> Self {
        self.items = items;
        self
    }

    /// Items actually shown: the configured list, or the placeholder.
    pub fn resolved_items(&self) -> Vec<GalleryItem> {
        if self.items.is_empty() {
            vec![GalleryItem::placeholder()]
        } else {
            self.items.clone()
        }
    }

    /// Parsed text colour, white when the configured value is invalid.
    pub fn text_rgba(&self) -> Rgba {
        match self.text_color.parse() {
            Ok(color) => color,
            Err(e) => {
                log::warn!("Gallery text colour rejected ({e}); using white");
                Rgba::WHITE
            }
        }
    }

    /// Clamp numeric options into the ranges the scene relies on.
    pub fn normalized(mut self) -> Self {
        if !self.scroll_easing.is_finite() || self.scroll_easing <= 0.0 {
            self.scroll_easing = DEFAULT_SCROLL_EASING;
        }
        self.scroll_easing = self.scroll_easing.min(1.0);

        if !self.bend_amount.is_finite() {
            self.bend_amount = DEFAULT_BEND_AMOUNT;
        }
        if !self.scroll_speed_multiplier.is_finite() {
            self.scroll_speed_multiplier = DEFAULT_SCROLL_SPEED;
        }
        if !self.card_corner_radius.is_finite() {
            self.card_corner_radius = DEFAULT_CORNER_RADIUS;
        }
        self.card_corner_radius = self.card_corner_radius.clamp(0.0, 0.5);

        if !self.font.size_px.is_finite() || self.font.size_px <= 0.0 {
            self.font.size_px = DEFAULT_FONT_SIZE;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = GalleryConfig::default();
        assert_eq!(config.bend_amount, 3.0);
        assert_eq!(config.text_color, "#ffffff");
        assert_eq!(config.card_corner_radius, 0.05);
        assert_eq!(config.scroll_speed_multiplier, 2.0);
        assert_eq!(config.scroll_easing, 0.05);
        assert!(config.auto_scroll_enabled);
        assert_eq!(config.font.size_px, 30.0);
        assert!(config.font.bold);
    }

    #[test]
    fn empty_items_resolve_to_placeholder() {
        let items = GalleryConfig::default().resolved_items();
        assert_eq!(items, vec![GalleryItem::placeholder()]);
    }

    #[test]
    fn font_shorthand_parsing() {
        let font = FontSpec::parse("bold 30px Figtree");
        assert_eq!(font.size_px, 30.0);
        assert!(font.bold);
        assert_eq!(font.family, "Figtree");

        let font = FontSpec::parse("18px \"Open Sans\"");
        assert_eq!(font.size_px, 18.0);
        assert!(!font.bold);
        assert_eq!(font.family, "Open Sans");

        let font = FontSpec::parse("monospace");
        assert_eq!(font.size_px, 30.0);
        assert_eq!(font.family, "monospace");
    }

    #[test]
    fn hex_colours() {
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::WHITE);
        let c: Rgba = "#ff000080".parse().unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert!("ffffff".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#gggggg".parse::<Rgba>().is_err());
    }

    #[test]
    fn invalid_text_colour_falls_back_to_white() {
        let config = GalleryConfig {
            text_color: "teal".into(),
            ..Default::default()
        };
        assert_eq!(config.text_rgba(), Rgba::WHITE);
    }

    #[test]
    fn normalization_clamps_easing_and_radius() {
        let config = GalleryConfig {
            scroll_easing: 4.0,
            card_corner_radius: 2.0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(config.scroll_easing, 1.0);
        assert_eq!(config.card_corner_radius, 0.5);

        let config = GalleryConfig {
            scroll_easing: 0.0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(config.scroll_easing, DEFAULT_SCROLL_EASING);
    }

    #[test]
    fn deserializes_short_option_aliases() {
        let json = r#"{
            "items": [{"image": "a.png", "text": "A", "quote": "first"}],
            "bend": 1.5,
            "borderRadius": 0.1,
            "font": "bold 24px Figtree",
            "scrollEase": 0.02,
            "autoScroll": false
        }"#;
        let config: GalleryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.items[0].caption, "first");
        assert_eq!(config.bend_amount, 1.5);
        assert_eq!(config.card_corner_radius, 0.1);
        assert_eq!(config.font.size_px, 24.0);
        assert_eq!(config.scroll_easing, 0.02);
        assert!(!config.auto_scroll_enabled);
        assert_eq!(config.scroll_speed_multiplier, 2.0);
    }
}
