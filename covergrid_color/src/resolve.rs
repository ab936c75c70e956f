// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Color, Token};

/// Default tile backgrounds, in tile index order.
pub const PALETTE: [Token; 9] = [
    Token::Blue200,
    Token::Yellow200,
    Token::Red200,
    Token::Neutral700,
    Token::Gray70,
    Token::Orange200,
    Token::Pink200,
    Token::Purple200,
    Token::Green200,
];

/// The palette entry that always takes light text, whatever its brightness.
pub const DARK_TOKEN: Token = Token::Neutral700;

/// Backgrounds strictly brighter than this take dark text.
pub const BRIGHTNESS_THRESHOLD: f64 = 140.0;

/// The effective colors of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedColors {
    /// Color painted behind the tile.
    pub background: Color,
    /// Color of the tile's label and content text.
    pub text: Color,
}

/// The palette background for a tile index.
#[must_use]
pub const fn default_background(index: usize) -> Token {
    PALETTE[index % PALETTE.len()]
}

/// Resolves the effective background and text colors of a tile.
///
/// Overrides win. Without a background override, the tile takes
/// [`default_background`] for its index. Without a text override, the text
/// is [`Token::TextLight`] on [`DARK_TOKEN`], and otherwise dark or light
/// depending on whether the background's [brightness](crate::Rgb::brightness)
/// exceeds [`BRIGHTNESS_THRESHOLD`].
///
/// This is pure and total.
#[must_use]
pub fn resolve(index: usize, background: Option<Color>, text: Option<Color>) -> ResolvedColors {
    let background = background.unwrap_or(Color::Token(default_background(index)));
    let text = text.unwrap_or_else(|| readable_text(background));
    ResolvedColors { background, text }
}

fn readable_text(background: Color) -> Color {
    if background == Color::Token(DARK_TOKEN) {
        return Color::Token(Token::TextLight);
    }
    if background.rgb().brightness() > BRIGHTNESS_THRESHOLD {
        Color::Token(Token::TextDark)
    } else {
        Color::Token(Token::TextLight)
    }
}

#[cfg(test)]
mod tests {
    use super::{DARK_TOKEN, PALETTE, resolve};
    use crate::{Color, Rgb, Token};

    #[test]
    fn palette_is_nine_distinct_backgrounds() {
        for (i, a) in PALETTE.iter().enumerate() {
            for b in &PALETTE[i + 1..] {
                assert_ne!(a, b, "palette entries must be distinct");
            }
            assert!(a.name().starts_with("bg-"), "{} is not a background", a.name());
        }
    }

    #[test]
    fn index_wraps_around_the_palette() {
        assert_eq!(resolve(9, None, None), resolve(0, None, None));
        assert_eq!(resolve(12, None, None).background, Color::Token(DARK_TOKEN));
    }

    #[test]
    fn dark_token_takes_light_text() {
        let colors = resolve(3, None, None);
        assert_eq!(colors.background, Color::Token(Token::Neutral700));
        assert_eq!(colors.text, Color::Token(Token::TextLight));
    }

    #[test]
    fn near_white_palette_entry_takes_dark_text() {
        let colors = resolve(4, None, None);
        assert!(colors.background.rgb().brightness() > 240.0, "gray-70 is near white");
        assert_eq!(colors.text, Color::Token(Token::TextDark));
    }

    #[test]
    fn explicit_background_goes_through_luminance() {
        let navy = Color::Rgb(Rgb::new(0, 0, 128));
        assert_eq!(resolve(4, Some(navy), None).text, Color::Token(Token::TextLight));
        let cream = Color::Rgb(Rgb::new(0xff, 0xf8, 0xe7));
        assert_eq!(resolve(3, Some(cream), None).text, Color::Token(Token::TextDark));
    }

    #[test]
    fn threshold_is_exclusive() {
        // 0.299·140 + 0.587·140 + 0.114·140 == 140.
        let gray = Color::Rgb(Rgb::new(140, 140, 140));
        assert_eq!(resolve(0, Some(gray), None).text, Color::Token(Token::TextLight));
        let lighter = Color::Rgb(Rgb::new(141, 141, 141));
        assert_eq!(resolve(0, Some(lighter), None).text, Color::Token(Token::TextDark));
    }

    #[test]
    fn text_override_is_returned_verbatim() {
        let pink = Color::Rgb(Rgb::new(0xff, 0x00, 0xaa));
        let colors = resolve(3, None, Some(pink));
        assert_eq!(colors.text, pink);
        assert_eq!(colors.background, Color::Token(DARK_TOKEN));
    }
}
