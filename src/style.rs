//! Text styling
//!
//! Colors and attribute flags carried by every cell, plus the combined
//! `Style` the interpreter maintains as its current pen.

use serde::{Deserialize, Serialize};

/// Color representation supporting indexed and RGB colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// Default terminal color (foreground or background)
    #[default]
    Default,
    /// Palette color (0-255)
    Indexed(u8),
    /// 24-bit RGB color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Standard ANSI colors (0-7)
    pub const BLACK: Color = Color::Indexed(0);
    pub const RED: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const YELLOW: Color = Color::Indexed(3);
    pub const BLUE: Color = Color::Indexed(4);
    pub const MAGENTA: Color = Color::Indexed(5);
    pub const CYAN: Color = Color::Indexed(6);
    pub const WHITE: Color = Color::Indexed(7);

    /// Bright ANSI colors (8-15)
    pub const BRIGHT_BLACK: Color = Color::Indexed(8);
    pub const BRIGHT_RED: Color = Color::Indexed(9);
    pub const BRIGHT_GREEN: Color = Color::Indexed(10);
    pub const BRIGHT_YELLOW: Color = Color::Indexed(11);
    pub const BRIGHT_BLUE: Color = Color::Indexed(12);
    pub const BRIGHT_MAGENTA: Color = Color::Indexed(13);
    pub const BRIGHT_CYAN: Color = Color::Indexed(14);
    pub const BRIGHT_WHITE: Color = Color::Indexed(15);
}

/// Text attribute flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attrs {
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub inverse: bool,
    pub hidden: bool,
    pub strikethrough: bool,
}

impl Attrs {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A complete cell style: colors plus attributes.
///
/// `Style::default()` is what blank cells carry. The interpreter keeps a
/// separate "pen" `Style` that SGR sequences mutate; freshly exposed cells
/// (resize padding, new rows) always get the default, never the pen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Attribute flags
    pub attrs: Attrs,
}

impl Style {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_default() {
        let style = Style::default();
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.bg, Color::Default);
        assert!(!style.attrs.bold);
    }

    #[test]
    fn test_style_reset() {
        let mut style = Style::default();
        style.fg = Color::RED;
        style.attrs.bold = true;
        style.reset();
        assert_eq!(style, Style::default());
    }

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::RED, Color::Indexed(1));
        assert_eq!(Color::BRIGHT_WHITE, Color::Indexed(15));
    }
}
