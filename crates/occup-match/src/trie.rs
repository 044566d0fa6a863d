//! Position-indexed phrase trie.
//!
//! Level `i` holds the identities of every word seen at position `i` of
//! some phrase, and every registered key (sequence of word ids) of length
//! `i + 1`. Word identity is per level, so the same literal at two
//! positions gets two unrelated ids and lookups hash integer sequences only.

use std::collections::HashMap;
use std::num::NonZeroU32;

use serde::Serialize;
use tracing::trace;

use occup_core::{Error, Result};

/// Identity of a literal word at one trie level.
pub type WordId = u32;

/// Owner of a complete phrase: a dictionary id or a template variant id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TagId(NonZeroU32);

impl TagId {
    /// Returns `None` for zero, which is never a valid tag.
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Tag for a 0-based index into a table of owners.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index + 1).ok().and_then(Self::new)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// 0-based index matching [`TagId::from_index`].
    pub fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a registered key stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A proper prefix of at least one phrase.
    Prefix,
    /// A complete phrase (possibly also a prefix of longer ones).
    Terminal(TagId),
}

#[derive(Debug, Default)]
struct Level {
    word_ids: HashMap<String, WordId>,
    prefixes: HashMap<Vec<WordId>, Node>,
}

/// Read-only after construction; share it by reference between finders.
#[derive(Debug, Default)]
pub struct PhraseTrie {
    levels: Vec<Level>,
    phrases: usize,
}

impl PhraseTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Length of the longest registered phrase.
    pub fn max_len(&self) -> usize {
        self.levels.len()
    }

    /// Number of distinct complete phrases.
    pub fn phrase_count(&self) -> usize {
        self.phrases
    }

    /// Register `words` as a phrase owned by `tag`.
    ///
    /// Re-registering the same phrase with the same tag is a no-op; with a
    /// different tag it fails with [`Error::DuplicatePhrase`].
    pub fn add_phrase<S: AsRef<str>>(&mut self, words: &[S], tag: TagId) -> Result<()> {
        if words.is_empty() {
            return Err(Error::EmptyPhrase);
        }
        if self.levels.len() < words.len() {
            self.levels.resize_with(words.len(), Level::default);
        }

        let last = words.len() - 1;
        let mut key: Vec<WordId> = Vec::with_capacity(words.len());
        for (depth, word) in words.iter().enumerate() {
            let level = &mut self.levels[depth];
            let next_id = level.word_ids.len() as WordId;
            let id = *level
                .word_ids
                .entry(word.as_ref().to_string())
                .or_insert(next_id);
            key.push(id);

            let node = level.prefixes.entry(key.clone()).or_insert(Node::Prefix);
            if depth == last {
                match *node {
                    Node::Terminal(existing) if existing != tag => {
                        return Err(Error::DuplicatePhrase {
                            phrase: join_words(words),
                            existing: existing.get(),
                            requested: tag.get(),
                        });
                    }
                    Node::Terminal(_) => {}
                    Node::Prefix => {
                        *node = Node::Terminal(tag);
                        self.phrases += 1;
                    }
                }
            }
        }
        trace!("Registered phrase `{}` as {}", join_words(words), tag);
        Ok(())
    }

    /// Register a whitespace-separated line. Blank lines are skipped and
    /// reported as `Ok(false)`.
    pub fn add_line(&mut self, line: &str, tag: TagId) -> Result<bool> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(false);
        }
        self.add_phrase(&words, tag)?;
        Ok(true)
    }

    /// Identity of `word` at position `level`, if any phrase has it there.
    pub fn resolve(&self, level: usize, word: &str) -> Option<WordId> {
        self.levels.get(level)?.word_ids.get(word).copied()
    }

    /// Look up a full key; its length selects the level.
    pub fn lookup(&self, key: &[WordId]) -> Option<Node> {
        let depth = key.len().checked_sub(1)?;
        self.levels.get(depth)?.prefixes.get(key).copied()
    }

    /// Resolve and look up a literal phrase in one go.
    pub fn get<S: AsRef<str>>(&self, words: &[S]) -> Option<Node> {
        let key = words
            .iter()
            .enumerate()
            .map(|(depth, word)| self.resolve(depth, word.as_ref()))
            .collect::<Option<Vec<_>>>()?;
        self.lookup(&key)
    }
}

fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}
