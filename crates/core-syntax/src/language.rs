//! Per-language classification tables.
//!
//! A [`Language`] only carries word lists; the scanning rules (delimiters,
//! quotes, `//` comments) are shared by every table and live in the lexer.

use std::path::Path;

#[derive(Debug, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    /// Whether the editing surface should color tokens for this language.
    pub highlight: bool,
}

/// Operators recognised as standalone tokens in every language.
pub const OPERATORS: &[&str] = &["=", "+", "-", "*", "/", ">", "<", "|", "&", "!"];

pub static GO: Language = Language {
    name: "go",
    keywords: &[
        "break",
        "case",
        "chan",
        "const",
        "continue",
        "default",
        "defer",
        "else",
        "fallthrough",
        "for",
        "func",
        "go",
        "goto",
        "if",
        "import",
        "interface",
        "map",
        "package",
        "range",
        "return",
        "select",
        "struct",
        "switch",
        "type",
        "var",
    ],
    types: &["nil", "int", "string", "rune", "map"],
    highlight: true,
};

pub static RUST: Language = Language {
    name: "rust",
    keywords: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while",
    ],
    types: &[
        "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32",
        "i64", "i128", "isize", "f32", "f64", "String", "Vec", "Option", "Result", "Box",
    ],
    highlight: true,
};

/// Fallback for unknown extensions: no keywords, no coloring. Identifiers
/// still feed the completion index.
pub static PLAIN: Language = Language {
    name: "plain",
    keywords: &[],
    types: &[],
    highlight: false,
};

impl Language {
    /// Table for a file path, chosen by extension.
    pub fn for_path(path: Option<&Path>) -> &'static Language {
        match path.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
            Some("go") => &GO,
            Some("rs") => &RUST,
            _ => &PLAIN,
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(&word)
    }

    pub fn is_type(&self, word: &str) -> bool {
        self.types.contains(&word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn picks_table_by_extension() {
        assert_eq!(Language::for_path(Some(&PathBuf::from("main.go"))).name, "go");
        assert_eq!(Language::for_path(Some(&PathBuf::from("src/lib.rs"))).name, "rust");
        assert_eq!(Language::for_path(Some(&PathBuf::from("notes.txt"))).name, "plain");
        assert_eq!(Language::for_path(None).name, "plain");
    }

    #[test]
    fn go_map_is_both_keyword_and_type() {
        // keyword precedence wins during classification
        assert!(GO.is_keyword("map"));
        assert!(GO.is_type("map"));
    }
}
