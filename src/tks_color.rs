// Terminal palette
// Number colors for revealed cells and cross-terminal matching of the basic ANSI colors

use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Color depth detected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    TrueColor,
    Indexed256,
    Basic,
}

impl Depth {
    pub fn detect() -> Self {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Indexed256
        } else {
            Depth::Basic
        }
    }
}

/// Resolves named colors to something that looks the same on every terminal,
/// using the Windows Terminal "Campbell" scheme as reference
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    depth: Depth,
}

impl Palette {
    pub fn new(depth: Depth) -> Self {
        Palette { depth }
    }

    /// ((R, G, B), ANSI 256 index) for each of the 16 named colors
    fn campbell(c: Color) -> Option<((u8, u8, u8), u8)> {
        Some(match c {
            Color::Black => ((12, 12, 12), 232),
            Color::Red => ((197, 15, 31), 160),
            Color::Green => ((19, 161, 14), 28),
            Color::Yellow => ((193, 156, 0), 178),
            Color::Blue => ((0, 55, 218), 20),
            Color::Magenta => ((136, 23, 152), 90),
            Color::Cyan => ((58, 150, 221), 38),
            Color::Gray => ((204, 204, 204), 250),
            Color::DarkGray => ((118, 118, 118), 243),
            Color::LightRed => ((231, 72, 86), 203),
            Color::LightGreen => ((22, 198, 12), 46),
            Color::LightYellow => ((249, 241, 165), 229),
            Color::LightBlue => ((59, 120, 255), 63),
            Color::LightMagenta => ((180, 0, 158), 163),
            Color::LightCyan => ((97, 214, 214), 116),
            Color::White => ((242, 242, 242), 255),
            _ => return None,
        })
    }

    pub fn tone(&self, c: Color) -> Color {
        match (Self::campbell(c), self.depth) {
            (Some(((r, g, b), _)), Depth::TrueColor) => Color::Rgb(r, g, b),
            (Some((_, idx)), Depth::Indexed256) => Color::Indexed(idx),
            _ => c,
        }
    }

    /// Color for an adjacent-mine count of 1..=8
    pub fn number(&self, n: u8) -> Color {
        match n {
            1 => self.tone(Color::Blue),
            2 => self.tone(Color::Green),
            3 => self.tone(Color::Red),
            4 => self.tone(Color::Magenta),
            5 => self.rgb((128, 0, 0), 88, Color::Red),
            6 => self.rgb((0, 128, 128), 30, Color::Cyan),
            7 => self.tone(Color::Black),
            _ => self.tone(Color::DarkGray),
        }
    }

    fn rgb(&self, (r, g, b): (u8, u8, u8), idx: u8, basic: Color) -> Color {
        match self.depth {
            Depth::TrueColor => Color::Rgb(r, g, b),
            Depth::Indexed256 => Color::Indexed(idx),
            Depth::Basic => basic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_by_depth() {
        assert_eq!(Palette::new(Depth::TrueColor).tone(Color::Red), Color::Rgb(197, 15, 31));
        assert_eq!(Palette::new(Depth::Indexed256).tone(Color::Red), Color::Indexed(160));
        assert_eq!(Palette::new(Depth::Basic).tone(Color::Red), Color::Red);
        // custom colors pass through
        assert_eq!(Palette::new(Depth::TrueColor).tone(Color::Rgb(1, 2, 3)), Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_number_colors_are_distinct() {
        let p = Palette::new(Depth::TrueColor);
        let colors: Vec<Color> = (1..=8).map(|n| p.number(n)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(Palette::new(Depth::Basic).number(5), Color::Red);
    }
}
