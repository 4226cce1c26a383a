//! Prefix tree over identifiers seen in buffers.
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by index.
//! Storage is case-sensitive; lookup is case-insensitive in one direction: a
//! prefix character `c` matches a stored character `v` when `v == c` or
//! `lowercase(v) == c`, so a lowercase prefix finds both `Println` and
//! `println` while `P` only finds `Println`.
//!
//! Words are the leaves. Lookup returns the leaves strictly below the
//! matched prefix, so a prefix that is itself a complete word yields
//! nothing for that word. Results come back in discovery order.

#[derive(Debug)]
struct Node {
    value: char,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug)]
pub struct Trie {
    nodes: Vec<Node>,
}

const ROOT: usize = 0;

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                value: '\0',
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Number of stored code points (nodes excluding the root).
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].children.is_empty()
    }

    /// Walk or extend one node per code point of `word`.
    pub fn insert(&mut self, word: &str) {
        let mut at = ROOT;
        for c in word.chars() {
            let existing = self.nodes[at]
                .children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].value == c);
            at = match existing {
                Some(child) => child,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(Node {
                        value: c,
                        parent: Some(at),
                        children: Vec::new(),
                    });
                    self.nodes[at].children.push(id);
                    id
                }
            };
        }
    }

    /// Candidate completions for `prefix`. Empty prefix or no match yields
    /// an empty list. No cap is applied here.
    pub fn lookup(&self, prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let mut frontier: Vec<usize> = self.nodes[ROOT].children.clone();
        for c in prefix.chars() {
            let next: Vec<usize> = frontier
                .iter()
                .filter(|&&id| matches_char(self.nodes[id].value, c))
                .flat_map(|&id| self.nodes[id].children.iter().copied())
                .collect();
            if next.is_empty() {
                return Vec::new();
            }
            frontier = next;
        }

        let mut words = Vec::new();
        for id in frontier {
            self.collect_leaves(id, &mut words);
        }
        words
    }

    fn collect_leaves(&self, from: usize, out: &mut Vec<String>) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.children.is_empty() {
                out.push(self.word_of(id));
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
    }

    fn word_of(&self, leaf: usize) -> String {
        let mut rev = Vec::new();
        let mut at = Some(leaf);
        while let Some(id) = at {
            if id == ROOT {
                break;
            }
            rev.push(self.nodes[id].value);
            at = self.nodes[id].parent;
        }
        rev.iter().rev().collect()
    }
}

fn matches_char(stored: char, typed: char) -> bool {
    if stored == typed {
        return true;
    }
    let mut lower = stored.to_lowercase();
    lower.next() == Some(typed) && lower.next().is_none()
}
