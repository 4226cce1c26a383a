//! Process-wide completion index.
//!
//! Every open buffer feeds the same [`Trie`]. The index is insert-only: words
//! are added whenever a buffer is loaded or saved and are never removed for
//! the lifetime of the process. Mutation takes the write half of an
//! `RwLock`; lookups share the read half.

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::debug;

use crate::language::Language;
use crate::lexer::{TokenClass, is_identifier, tokenize};
use crate::trie::Trie;

/// Default number of candidates shown to the user.
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

static GLOBAL: LazyLock<Arc<RwLock<Trie>>> = LazyLock::new(|| Arc::new(RwLock::new(Trie::new())));

/// Cloneable handle to a shared trie.
#[derive(Clone, Debug)]
pub struct CompletionIndex {
    trie: Arc<RwLock<Trie>>,
}

impl CompletionIndex {
    /// Handle to the index shared by the whole process.
    pub fn global() -> Self {
        Self {
            trie: Arc::clone(&GLOBAL),
        }
    }

    /// A private index not shared with [`CompletionIndex::global`].
    pub fn isolated() -> Self {
        Self {
            trie: Arc::new(RwLock::new(Trie::new())),
        }
    }

    pub fn insert_word(&self, word: &str) {
        self.trie
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(word);
    }

    /// Tokenize every line and insert each keyword or identifier token.
    /// Returns the number of words inserted (duplicates included).
    pub fn index_lines<'a, I>(&self, lines: I, lang: &Language) -> usize
    where
        I: IntoIterator<Item = &'a [char]>,
    {
        let mut trie = self.trie.write().unwrap_or_else(PoisonError::into_inner);
        let before = trie.node_count();
        let mut words = 0usize;
        for line in lines {
            for tok in tokenize(line, lang) {
                let text = &line[tok.offset..tok.end()];
                if tok.class == TokenClass::Keyword || is_identifier(text) {
                    let word: String = text.iter().collect();
                    trie.insert(&word);
                    words += 1;
                }
            }
        }
        debug!(
            target: "syntax.index",
            language = lang.name,
            words,
            new_nodes = trie.node_count() - before,
            "index_lines"
        );
        words
    }

    /// Candidates for `prefix`, truncated to `max` (`0` means the default cap).
    pub fn lookup(&self, prefix: &str, max: usize) -> Vec<String> {
        let cap = if max == 0 { DEFAULT_MAX_CANDIDATES } else { max };
        let mut found = self
            .trie
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup(prefix);
        found.truncate(cap);
        found
    }

    pub fn is_empty(&self) -> bool {
        self.trie
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}
