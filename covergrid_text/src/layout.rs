// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

/// Marker appended to text that was shortened to fit.
pub const ELLIPSIS: &str = "…";

/// Horizontal placement of a line inside its box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Align {
    /// Flush with the left edge.
    #[default]
    Start,
    /// Centered.
    Center,
}

impl Align {
    pub(crate) fn start_x(self, rect: Rect, width: f64) -> f64 {
        match self {
            Self::Start => rect.x0,
            Self::Center => rect.center().x - width / 2.0,
        }
    }
}

/// Shortens `text` to fit `max_width`, ending it with [`ELLIPSIS`] if cut.
///
/// Returns the text unchanged when it fits, and an empty string when not
/// even the ellipsis fits.
pub fn ellipsize(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> String {
    if measure(text) <= max_width {
        return String::from(text);
    }
    let mut body = String::from(text);
    while !body.is_empty() {
        body.pop();
        let trimmed = body.trim_end();
        let mut candidate = String::with_capacity(trimmed.len() + ELLIPSIS.len());
        candidate.push_str(trimmed);
        candidate.push_str(ELLIPSIS);
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }
    if measure(ELLIPSIS) <= max_width {
        String::from(ELLIPSIS)
    } else {
        String::new()
    }
}

/// Greedily wraps `text` into lines no wider than `max_width`.
///
/// Explicit newlines start new lines. Words wider than a line are broken
/// between characters, which also covers scripts written without spaces.
pub fn wrap(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut candidate = current.clone();
            if !candidate.is_empty() {
                candidate.push(' ');
            }
            candidate.push_str(word);
            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(core::mem::take(&mut current));
            }
            if measure(word) <= max_width {
                current.push_str(word);
                continue;
            }
            for ch in word.chars() {
                current.push(ch);
                if measure(&current) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(core::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}
