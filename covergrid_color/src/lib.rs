// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Covergrid Color: palette tokens, explicit RGB values, and contrast resolution.
//!
//! Every tile of a Covergrid cover is painted with an *effective* background
//! and text color. Those are derived from the tile's optional overrides and
//! its index:
//!
//! - The background falls back to a fixed, ordered palette of nine tokens
//!   ([`PALETTE`]), chosen by `index % 9`.
//! - The text color falls back to a readable tone picked from the
//!   background's brightness, with a hard-coded exception for the palette's
//!   dark token ([`DARK_TOKEN`]).
//!
//! ```rust
//! use covergrid_color::{Color, Rgb, Token, resolve};
//!
//! // No overrides: tile 0 uses the first palette token and dark text.
//! let colors = resolve(0, None, None);
//! assert_eq!(colors.background, Color::Token(Token::Blue200));
//! assert_eq!(colors.text, Color::Token(Token::TextDark));
//!
//! // An explicit navy background yields light text.
//! let navy: Color = "#000080".parse().unwrap();
//! let colors = resolve(0, Some(navy), None);
//! assert_eq!(colors.text, Color::Token(Token::TextLight));
//! assert_eq!(navy, Color::Rgb(Rgb::new(0, 0, 128)));
//! ```
//!
//! Colors have a textual form that distinguishes the two kinds by syntax:
//! explicit values are always `#rrggbb`, tokens are names such as
//! `bg-blue-200` or `text-light`.
//!
//! This crate is `no_std`.

#![no_std]

mod color;
mod resolve;
#[cfg(feature = "serde")]
mod serde_impl;

pub use color::{Color, ParseColorError, Rgb, Token};
pub use resolve::{
    BRIGHTNESS_THRESHOLD, DARK_TOKEN, PALETTE, ResolvedColors, default_background, resolve,
};
