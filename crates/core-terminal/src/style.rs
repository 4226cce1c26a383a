//! Cell styling independent of the terminal library.

use crossterm::style::{Attribute, Color as CColor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Reset,
    Black,
    White,
    Gray,
    LightGray,
    DarkRed,
    DarkGreen,
    RoyalBlue,
    Purple,
    Yellow,
    LightBlue,
    Rgb(u8, u8, u8),
}

impl Color {
    pub(crate) fn to_crossterm(self) -> CColor {
        match self {
            Color::Reset => CColor::Reset,
            Color::Black => CColor::Black,
            Color::White => CColor::White,
            Color::Gray => CColor::Grey,
            Color::LightGray => CColor::Rgb {
                r: 0xd3,
                g: 0xd3,
                b: 0xd3,
            },
            Color::DarkRed => CColor::DarkRed,
            Color::DarkGreen => CColor::DarkGreen,
            Color::RoyalBlue => CColor::Rgb {
                r: 0x41,
                g: 0x69,
                b: 0xe1,
            },
            Color::Purple => CColor::Rgb {
                r: 0x66,
                g: 0x33,
                b: 0x99,
            },
            Color::Yellow => CColor::Yellow,
            Color::LightBlue => CColor::Rgb {
                r: 0xad,
                g: 0xd8,
                b: 0xe6,
            },
            Color::Rgb(r, g, b) => CColor::Rgb { r, g, b },
        }
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u8 {
        const BOLD    = 0b0000_0001;
        const ITALIC  = 0b0000_0010;
        const REVERSE = 0b0000_0100;
    }
}

impl Attrs {
    pub(crate) fn crossterm_attributes(self) -> impl Iterator<Item = Attribute> {
        [
            (Attrs::BOLD, Attribute::Bold),
            (Attrs::ITALIC, Attribute::Italic),
            (Attrs::REVERSE, Attribute::Reverse),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, attr)| attr)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl CellStyle {
    pub const fn new() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
            attrs: Attrs::empty(),
        }
    }

    pub const fn fg(mut self, c: Color) -> Self {
        self.fg = c;
        self
    }

    pub const fn bg(mut self, c: Color) -> Self {
        self.bg = c;
        self
    }

    pub fn italic(mut self) -> Self {
        self.attrs |= Attrs::ITALIC;
        self
    }

    pub fn bold(mut self) -> Self {
        self.attrs |= Attrs::BOLD;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_composes() {
        let s = CellStyle::new().fg(Color::Gray).bg(Color::Yellow).italic();
        assert_eq!(s.fg, Color::Gray);
        assert_eq!(s.bg, Color::Yellow);
        assert!(s.attrs.contains(Attrs::ITALIC));
        assert!(!s.attrs.contains(Attrs::BOLD));
    }

    #[test]
    fn attributes_map_in_fixed_order() {
        let attrs: Vec<_> = (Attrs::REVERSE | Attrs::BOLD).crossterm_attributes().collect();
        assert_eq!(attrs, vec![Attribute::Bold, Attribute::Reverse]);
    }
}
