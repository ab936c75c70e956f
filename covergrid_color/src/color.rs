// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

/// An explicit 8-bit sRGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a color from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a packed `0xRRGGBB` value.
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "each shift keeps the wanted byte in the low bits"
    )]
    pub const fn from_u32(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Perceived brightness on a 0–255 scale.
    ///
    /// Uses the weighted sum `0.299·R + 0.587·G + 0.114·B`.
    #[must_use]
    pub fn brightness(self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }

    /// Converts into a fully opaque Peniko color for rendering.
    #[must_use]
    pub fn to_peniko(self) -> peniko::Color {
        peniko::Color::from_rgb8(self.r, self.g, self.b)
    }

    /// Parses the `#rrggbb` form. Shorthand (`#rgb`) is rejected.
    fn parse_hex(s: &str) -> Result<Self, ParseColorError> {
        let digits = s.strip_prefix('#').ok_or(ParseColorError::MissingHash)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError::BadHex);
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| ParseColorError::BadHex)?;
        Ok(Self::from_u32(value))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A named color token.
///
/// The nine `*` background tokens make up the default tile palette; the two
/// text tokens are the readable tones chosen by the contrast rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// `bg-blue-200`
    Blue200,
    /// `bg-yellow-200`
    Yellow200,
    /// `bg-red-200`
    Red200,
    /// `bg-neutral-700`, the near-black palette entry.
    Neutral700,
    /// `bg-gray-70`
    Gray70,
    /// `bg-orange-200`
    Orange200,
    /// `bg-pink-200`
    Pink200,
    /// `bg-purple-200`
    Purple200,
    /// `bg-green-200`
    Green200,
    /// `text-dark`
    TextDark,
    /// `text-light`
    TextLight,
}

impl Token {
    /// All tokens, backgrounds first.
    pub const ALL: [Self; 11] = [
        Self::Blue200,
        Self::Yellow200,
        Self::Red200,
        Self::Neutral700,
        Self::Gray70,
        Self::Orange200,
        Self::Pink200,
        Self::Purple200,
        Self::Green200,
        Self::TextDark,
        Self::TextLight,
    ];

    /// The token's name as written in stored state.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blue200 => "bg-blue-200",
            Self::Yellow200 => "bg-yellow-200",
            Self::Red200 => "bg-red-200",
            Self::Neutral700 => "bg-neutral-700",
            Self::Gray70 => "bg-gray-70",
            Self::Orange200 => "bg-orange-200",
            Self::Pink200 => "bg-pink-200",
            Self::Purple200 => "bg-purple-200",
            Self::Green200 => "bg-green-200",
            Self::TextDark => "text-dark",
            Self::TextLight => "text-light",
        }
    }

    /// The concrete color this token stands for.
    #[must_use]
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Blue200 => Rgb::from_u32(0xbfdbfe),
            Self::Yellow200 => Rgb::from_u32(0xfef08a),
            Self::Red200 => Rgb::from_u32(0xfecaca),
            Self::Neutral700 => Rgb::from_u32(0x404040),
            Self::Gray70 => Rgb::from_u32(0xf3f4f6),
            Self::Orange200 => Rgb::from_u32(0xfed7aa),
            Self::Pink200 => Rgb::from_u32(0xfbcfe8),
            Self::Purple200 => Rgb::from_u32(0xe9d5ff),
            Self::Green200 => Rgb::from_u32(0xbbf7d0),
            Self::TextDark => Rgb::BLACK,
            Self::TextLight => Rgb::WHITE,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// A tile color: either a named token or an explicit RGB value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// A named token.
    Token(Token),
    /// An explicit, fully specified RGB value.
    Rgb(Rgb),
}

impl Color {
    /// The concrete RGB value.
    #[must_use]
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Token(token) => token.rgb(),
            Self::Rgb(rgb) => rgb,
        }
    }

    /// Returns `true` for explicit RGB values.
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, Self::Rgb(_))
    }

    /// Converts into a fully opaque Peniko color for rendering.
    #[must_use]
    pub fn to_peniko(self) -> peniko::Color {
        self.rgb().to_peniko()
    }
}

impl From<Token> for Color {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => f.write_str(token.name()),
            Self::Rgb(rgb) => fmt::Display::fmt(rgb, f),
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseColorError::Empty);
        }
        if s.starts_with('#') {
            return Rgb::parse_hex(s).map(Self::Rgb);
        }
        Token::from_name(s)
            .map(Self::Token)
            .ok_or(ParseColorError::UnknownToken)
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseColorError {
    /// The input was empty.
    Empty,
    /// A hex color without its leading `#`.
    MissingHash,
    /// A `#` value that is not exactly six hex digits.
    BadHex,
    /// A name that is not one of the known tokens.
    UnknownToken,
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty color"),
            Self::MissingHash => f.write_str("hex color must start with `#`"),
            Self::BadHex => f.write_str("hex color must be `#rrggbb`"),
            Self::UnknownToken => f.write_str("unknown color token"),
        }
    }
}

impl core::error::Error for ParseColorError {}
