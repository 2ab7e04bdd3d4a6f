use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A colour, either semantic (resolved by the display layer) or concrete.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// The display layer's main text colour.
    Primary,
    /// The display layer's de-emphasized text colour.
    Secondary,
    /// The display layer's accent colour; links default to this.
    Accent,
    Clear,
    Rgba { red: u8, green: u8, blue: u8, alpha: u8 },
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLUE: Self = Self::rgb(0, 122, 255);
    pub const PURPLE: Self = Self::rgb(175, 82, 222);
    pub const INDIGO: Self = Self::rgb(88, 86, 214);
    pub const TEAL: Self = Self::rgb(48, 176, 199);
    pub const RED: Self = Self::rgb(255, 59, 48);
    pub const ORANGE: Self = Self::rgb(255, 149, 0);
    pub const YELLOW: Self = Self::rgb(255, 204, 0);
    pub const GRAY: Self = Self::rgb(142, 142, 147);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::Rgba {
            red,
            green,
            blue,
            alpha: u8::MAX,
        }
    }

    /// Scales a concrete colour's alpha by `opacity`, clamped to `0.0..=1.0`. Semantic colours are unchanged.
    pub fn opacity(self, opacity: f32) -> Self {
        match self {
            Self::Rgba { red, green, blue, alpha } => {
                let scaled = f32::from(alpha) * opacity.clamp(0.0, 1.0);
                Self::Rgba {
                    red,
                    green,
                    blue,
                    alpha: scaled.round() as u8,
                }
            }
            semantic => semantic,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Regular,
    Medium,
    Semibold,
    Bold,
    Heavy,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    #[default]
    Body,
    Footnote,
    Caption,
}

/// How a citation badge (`[1]`) looks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationStyle {
    pub foreground_color: Option<Color>,
    pub background_color: Option<Color>,
    pub font_weight: Option<FontWeight>,
    pub corner_radius: f32,
    pub horizontal_padding: f32,
    pub vertical_padding: f32,
}

impl Default for CitationStyle {
    fn default() -> Self {
        Self {
            foreground_color: Some(Color::WHITE),
            background_color: Some(Color::BLUE.opacity(0.8)),
            font_weight: Some(FontWeight::Semibold),
            corner_radius: 4.0,
            horizontal_padding: 4.0,
            vertical_padding: 1.0,
        }
    }
}

/// How an artifact reference (`@[Title](artifact:id)`) looks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactReferenceStyle {
    pub foreground_color: Option<Color>,
    pub background_color: Option<Color>,
    pub font_weight: Option<FontWeight>,
    pub corner_radius: f32,
    pub horizontal_padding: f32,
    pub vertical_padding: f32,
    /// The icon shown before the title, as an identifier the display layer resolves.
    pub icon_name: String,
    /// Stands in for the icon in the run's text, for display layers that only show text.
    pub icon_glyph: String,
}

impl Default for ArtifactReferenceStyle {
    fn default() -> Self {
        Self {
            foreground_color: Some(Color::PURPLE),
            background_color: Some(Color::PURPLE.opacity(0.15)),
            font_weight: Some(FontWeight::Medium),
            corner_radius: 4.0,
            horizontal_padding: 4.0,
            vertical_padding: 1.0,
            icon_name: "link.circle.fill".to_string(),
            icon_glyph: "🔗".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
    /// Falls back to [`Color::Accent`].
    pub foreground_color: Option<Color>,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            foreground_color: Some(Color::Accent),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeStyle {
    pub foreground_color: Option<Color>,
    pub background_color: Option<Color>,
}

/// How an image placeholder (`[Image: cat.png]`) looks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageStyle {
    pub foreground_color: Option<Color>,
    pub font_size: FontSize,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            foreground_color: Some(Color::GRAY),
            font_size: FontSize::Caption,
        }
    }
}

/// All the injected styling the composer uses.
///
/// Every field is optional when deserializing, so a theme file only needs to mention what it changes:
///
/// ```
/// use mdcite::output::{Color, Theme};
///
/// let theme: Theme = serde_json::from_str(r#"{"citation": {"corner_radius": 8.0}}"#).unwrap();
/// assert_eq!(theme.citation.corner_radius, 8.0);
/// assert_eq!(theme.citation.foreground_color, Some(Color::WHITE));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub citation: CitationStyle,
    pub artifact_reference: ArtifactReferenceStyle,
    pub link: LinkStyle,
    pub code: CodeStyle,
    pub image: ImageStyle,
}

/// Built-in themes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum ThemePreset {
    /// White on blue citation badges, purple artifact references.
    #[default]
    Default,
    /// Indigo badges and teal artifact references, with rounder corners.
    Modern,
    /// Red badges and yellow-on-orange artifact references.
    Colorful,
    /// No backgrounds; badges and references blend in with the text.
    Minimal,
}

impl ThemePreset {
    pub fn theme(self) -> Theme {
        match self {
            ThemePreset::Default => Theme::default(),
            ThemePreset::Modern => Theme {
                citation: CitationStyle {
                    foreground_color: Some(Color::WHITE),
                    background_color: Some(Color::INDIGO),
                    font_weight: Some(FontWeight::Bold),
                    corner_radius: 6.0,
                    horizontal_padding: 6.0,
                    vertical_padding: 2.0,
                },
                artifact_reference: ArtifactReferenceStyle {
                    foreground_color: Some(Color::TEAL),
                    background_color: Some(Color::TEAL.opacity(0.15)),
                    font_weight: Some(FontWeight::Semibold),
                    corner_radius: 6.0,
                    horizontal_padding: 6.0,
                    vertical_padding: 2.0,
                    icon_name: "doc.badge".to_string(),
                    icon_glyph: "📄".to_string(),
                },
                ..Theme::default()
            },
            ThemePreset::Colorful => Theme {
                citation: CitationStyle {
                    foreground_color: Some(Color::WHITE),
                    background_color: Some(Color::RED.opacity(0.8)),
                    font_weight: Some(FontWeight::Heavy),
                    corner_radius: 8.0,
                    horizontal_padding: 8.0,
                    vertical_padding: 3.0,
                },
                artifact_reference: ArtifactReferenceStyle {
                    foreground_color: Some(Color::YELLOW),
                    background_color: Some(Color::ORANGE.opacity(0.2)),
                    font_weight: Some(FontWeight::Bold),
                    corner_radius: 8.0,
                    horizontal_padding: 8.0,
                    vertical_padding: 3.0,
                    icon_name: "star.fill".to_string(),
                    icon_glyph: "★".to_string(),
                },
                ..Theme::default()
            },
            ThemePreset::Minimal => Theme {
                citation: CitationStyle {
                    foreground_color: Some(Color::Primary),
                    background_color: Some(Color::Clear),
                    font_weight: Some(FontWeight::Regular),
                    corner_radius: 0.0,
                    horizontal_padding: 2.0,
                    vertical_padding: 0.0,
                },
                artifact_reference: ArtifactReferenceStyle {
                    foreground_color: Some(Color::Secondary),
                    background_color: Some(Color::Clear),
                    font_weight: Some(FontWeight::Regular),
                    corner_radius: 0.0,
                    horizontal_padding: 2.0,
                    vertical_padding: 0.0,
                    icon_name: "link".to_string(),
                    icon_glyph: "🔗".to_string(),
                },
                ..Theme::default()
            },
        }
    }
}
