//! Lexing, language tables and the completion index.

pub mod index;
pub mod language;
pub mod lexer;
pub mod trie;

pub use index::{CompletionIndex, DEFAULT_MAX_CANDIDATES};
pub use language::{GO, Language, PLAIN, RUST};
pub use lexer::{Token, TokenClass, identifier_prefix_start, is_identifier, token_at, tokenize};
pub use trie::Trie;
