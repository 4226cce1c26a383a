//! Single-pass line lexer used for highlighting and completion indexing.
//!
//! Tokens never cross a line. Delimiters end the word in front of them and
//! are emitted as one-wide tokens of their own; quotes open a literal that
//! runs to the next unescaped copy of the same quote; `//` outside a literal
//! turns the rest of the line into one comment token.

use crate::language::{Language, OPERATORS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Type,
    Operator,
    Int,
    Rune,
    Str,
    Call,
    Comment,
    Plain,
}

/// A classified span `[offset, offset + len)` of code points within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub offset: usize,
    pub len: usize,
}

impl Token {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn contains(&self, col: usize) -> bool {
        self.offset <= col && col < self.end()
    }
}

const DELIMITERS: &[char] = &[
    ' ', '\'', '[', ']', '{', '}', '"', '\t', '\n', '.', ',', '`', '(', ')', '-', '+', '*', '&',
    '|', '=', '!', ':', '<', '>', ';', '/',
];

pub fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '`' | '\'')
}

fn classify(word: &[char], next: Option<char>, lang: &Language) -> TokenClass {
    if next == Some('(') {
        return TokenClass::Call;
    }
    let text: String = word.iter().collect();
    if lang.is_keyword(&text) {
        TokenClass::Keyword
    } else if lang.is_type(&text) {
        TokenClass::Type
    } else if text.parse::<i64>().is_ok() {
        TokenClass::Int
    } else if OPERATORS.contains(&text.as_str()) {
        TokenClass::Operator
    } else {
        TokenClass::Plain
    }
}

/// Split one line into classified tokens. An empty line yields no tokens.
pub fn tokenize(line: &[char], lang: &Language) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(line.len());
    let mut word_start = 0;
    let mut quote: Option<char> = None;

    for (i, &c) in line.iter().enumerate() {
        if let Some(q) = quote {
            if c == q && line[i - 1] != '\\' {
                if let Some(open) = out.last_mut() {
                    open.class = literal_class(q);
                    open.len = i - open.offset + 1;
                }
                quote = None;
                word_start = i + 1;
            }
            continue;
        }

        if c == '/' && line.get(i + 1) == Some(&'/') {
            if word_start < i {
                out.push(Token {
                    class: classify(&line[word_start..i], None, lang),
                    offset: word_start,
                    len: i - word_start,
                });
            }
            out.push(Token {
                class: TokenClass::Comment,
                offset: i,
                len: line.len() - i,
            });
            return out;
        }

        if !is_delimiter(c) {
            if i == line.len() - 1 {
                out.push(Token {
                    class: classify(&line[word_start..], None, lang),
                    offset: word_start,
                    len: line.len() - word_start,
                });
            }
            continue;
        }

        if word_start < i {
            out.push(Token {
                class: classify(&line[word_start..i], Some(c), lang),
                offset: word_start,
                len: i - word_start,
            });
        }
        out.push(Token {
            class: classify(&line[i..=i], None, lang),
            offset: i,
            len: 1,
        });
        word_start = i + 1;
        if is_quote(c) {
            quote = Some(c);
        }
    }

    // unterminated literal runs to the end of the line
    if let Some(q) = quote
        && let Some(open) = out.last_mut()
    {
        open.class = literal_class(q);
        open.len = line.len() - open.offset;
    }
    out
}

fn literal_class(quote: char) -> TokenClass {
    if quote == '\'' {
        TokenClass::Rune
    } else {
        TokenClass::Str
    }
}

/// Identifier syntax: a letter or `_`, then letters, digits or `_`.
pub fn is_identifier(word: &[char]) -> bool {
    match word.split_first() {
        Some((first, rest)) => {
            (first.is_alphabetic() || *first == '_')
                && rest.iter().all(|c| c.is_alphanumeric() || *c == '_')
        }
        None => false,
    }
}

/// The token covering `col`, if any.
pub fn token_at(tokens: &[Token], col: usize) -> Option<Token> {
    tokens.iter().copied().find(|t| t.contains(col))
}

/// Start column of the identifier that ends right before `col`
/// (the word being typed). `None` when the character left of `col` is not
/// part of an identifier.
pub fn identifier_prefix_start(line: &[char], col: usize, lang: &Language) -> Option<usize> {
    if col == 0 || col > line.len() {
        return None;
    }
    let tokens = tokenize(line, lang);
    let tok = token_at(&tokens, col - 1)?;
    let start = tok.offset;
    if matches!(tok.class, TokenClass::Str | TokenClass::Rune | TokenClass::Comment) {
        return None;
    }
    is_identifier(&line[start..col]).then_some(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{GO, PLAIN};
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn spans(line: &str) -> Vec<(String, TokenClass)> {
        let cs = chars(line);
        tokenize(&cs, &GO)
            .into_iter()
            .map(|t| (cs[t.offset..t.end()].iter().collect(), t.class))
            .collect()
    }

    #[test]
    fn empty_line_has_no_tokens() {
        assert!(tokenize(&[], &GO).is_empty());
    }

    #[test]
    fn classifies_call_keyword_type_int_operator() {
        use TokenClass::*;
        assert_eq!(
            spans("func f(x int) = 42"),
            vec![
                ("func".into(), Keyword),
                (" ".into(), Plain),
                ("f".into(), Call),
                ("(".into(), Plain),
                ("x".into(), Plain),
                (" ".into(), Plain),
                ("int".into(), Type),
                (")".into(), Plain),
                (" ".into(), Plain),
                ("=".into(), Operator),
                (" ".into(), Plain),
                ("42".into(), Int),
            ]
        );
    }

    #[test]
    fn call_takes_precedence_over_keyword() {
        let s = spans("if(");
        assert_eq!(s[0], ("if".to_string(), TokenClass::Call));
    }

    #[test]
    fn string_with_escaped_quote_is_one_token() {
        let s = spans(r#"i := "h\"i""#);
        assert_eq!(s.last(), Some(&(r#""h\"i""#.to_string(), TokenClass::Str)));
    }

    #[test]
    fn rune_and_raw_string_literals() {
        let s = spans("c := 'x' + `raw`");
        assert!(s.contains(&("'x'".to_string(), TokenClass::Rune)));
        assert!(s.contains(&("`raw`".to_string(), TokenClass::Str)));
    }

    #[test]
    fn comment_swallows_rest_of_line() {
        let s = spans("x = 1 // note \"q\"");
        assert_eq!(s.last(), Some(&("// note \"q\"".to_string(), TokenClass::Comment)));
    }

    #[test]
    fn comment_marker_inside_string_is_not_a_comment() {
        let s = spans(r#"s := "a // b""#);
        assert_eq!(s.last(), Some(&(r#""a // b""#.to_string(), TokenClass::Str)));
    }

    #[test]
    fn unterminated_string_runs_to_end_of_line() {
        let s = spans(r#"x := "abc"#);
        assert_eq!(s.last(), Some(&(r#""abc"#.to_string(), TokenClass::Str)));
    }

    #[test]
    fn tokens_tile_the_line_without_overlap() {
        let line = chars("for i := range xs { fmt.Println(i) }");
        let toks = tokenize(&line, &GO);
        let mut next = 0;
        for t in &toks {
            assert_eq!(t.offset, next);
            next = t.end();
        }
        assert_eq!(next, line.len());
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier(&chars("_foo1")));
        assert!(is_identifier(&chars("héllo")));
        assert!(!is_identifier(&chars("1abc")));
        assert!(!is_identifier(&[]));
    }

    #[test]
    fn prefix_start_finds_word_being_typed() {
        let line = chars("\tfmt.Pri");
        assert_eq!(identifier_prefix_start(&line, 8, &PLAIN), Some(5));
        assert_eq!(identifier_prefix_start(&line, 5, &PLAIN), None);
        assert_eq!(identifier_prefix_start(&line, 0, &PLAIN), None);
        let quoted = chars("\"abc");
        assert_eq!(identifier_prefix_start(&quoted, 4, &GO), None);
    }
}
