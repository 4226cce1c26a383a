//! Colors for every surface in one place.
//!
//! Token colors apply to the foreground only; overlays (search matches,
//! selection) replace the background and keep the token color.

use core_syntax::TokenClass;
use core_terminal::{CellStyle, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub text: CellStyle,
    pub gutter: CellStyle,
    pub keyword: Color,
    pub type_name: Color,
    pub operator: Color,
    pub number: Color,
    pub rune: Color,
    pub string: Color,
    pub call: Color,
    pub comment: Color,
    pub search_match: Color,
    pub search_current: Color,
    pub selection: Color,
    pub popup: CellStyle,
    pub popup_selected: CellStyle,
    pub status: CellStyle,
    pub title: CellStyle,
    pub tab_active: CellStyle,
    pub find_prompt: CellStyle,
    pub prompt: CellStyle,
    pub prompt_error: CellStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: CellStyle::new(),
            gutter: CellStyle::new().fg(Color::Gray),
            keyword: Color::Purple,
            type_name: Color::RoyalBlue,
            operator: Color::DarkRed,
            number: Color::DarkRed,
            rune: Color::Purple,
            string: Color::DarkGreen,
            call: Color::RoyalBlue,
            comment: Color::Gray,
            search_match: Color::LightGray,
            search_current: Color::Yellow,
            selection: Color::LightGray,
            popup: CellStyle::new().fg(Color::Black).bg(Color::LightGray),
            popup_selected: CellStyle::new().fg(Color::Black).bg(Color::LightBlue),
            status: CellStyle::new().fg(Color::White).bg(Color::Gray),
            title: CellStyle::new(),
            tab_active: CellStyle::new().bg(Color::LightGray).italic(),
            find_prompt: CellStyle::new()
                .fg(Color::Black)
                .bg(Color::Rgb(0xff, 0xff, 0xe0)),
            prompt: CellStyle::new().fg(Color::Black).bg(Color::LightGray),
            prompt_error: CellStyle::new().fg(Color::DarkRed).bg(Color::LightGray),
        }
    }
}

impl Theme {
    /// Text style for a token of `class`.
    pub fn token(&self, class: TokenClass) -> CellStyle {
        let fg = match class {
            TokenClass::Keyword => self.keyword,
            TokenClass::Type => self.type_name,
            TokenClass::Operator => self.operator,
            TokenClass::Int => self.number,
            TokenClass::Rune => self.rune,
            TokenClass::Str => self.string,
            TokenClass::Call => self.call,
            TokenClass::Comment => self.comment,
            TokenClass::Plain => return self.text,
        };
        self.text.fg(fg)
    }
}
