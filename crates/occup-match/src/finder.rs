//! Streaming leftmost-longest phrase finder.
//!
//! The finder buffers the tokens of a phrase in progress (the window) and
//! keeps extending it while the buffered lexemes form a registered prefix.
//! When the next lexeme cannot extend the window it either emits the
//! longest complete phrase seen so far or gives up on the window's first
//! token, then re-scans whatever was buffered behind that point.

use serde::Serialize;
use tracing::trace;

use occup_core::Interval;

use crate::trie::{Node, PhraseTrie, TagId, WordId};

/// A phrase occurrence: token index range plus the owning tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    pub range: Interval,
    pub tag: TagId,
}

impl Match {
    pub fn begin(&self) -> usize {
        self.range.begin
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Longest complete phrase found in the current window.
#[derive(Debug, Clone, Copy)]
struct Best {
    len: usize,
    tag: TagId,
}

/// One scan over a token stream. Create one per document.
pub struct Finder<'t> {
    trie: &'t PhraseTrie,
    /// Lexemes buffered since `origin`, not yet emitted or skipped.
    window: Vec<String>,
    /// Word ids of `window`, resolved at their depth in the window.
    key: Vec<WordId>,
    /// Stream index of `window[0]`.
    origin: usize,
    best: Option<Best>,
    matches: Vec<Match>,
}

impl<'t> Finder<'t> {
    pub fn new(trie: &'t PhraseTrie) -> Self {
        Self {
            trie,
            window: Vec::new(),
            key: Vec::new(),
            origin: 0,
            best: None,
            matches: Vec::new(),
        }
    }

    /// Forget all state, including matches, to scan a new stream.
    pub fn reset(&mut self) {
        self.window.clear();
        self.key.clear();
        self.origin = 0;
        self.best = None;
        self.matches.clear();
    }

    /// Feed the next token's lexeme.
    pub fn push(&mut self, lexeme: &str) {
        // Every failed round either emits, shrinks the window or skips the token.
        while !self.extend(lexeme) {
            if self.window.is_empty() {
                trace!("No phrase starts at token {}", self.origin);
                self.origin += 1;
                return;
            }
            match self.best.take() {
                Some(best) => self.emit(best),
                None => self.restart(1),
            }
        }
    }

    /// Flush everything still buffered. Call once after the last `push`.
    pub fn finish(&mut self) {
        loop {
            if let Some(best) = self.best.take() {
                self.emit(best);
            } else if !self.window.is_empty() {
                self.restart(1);
            } else {
                break;
            }
        }
    }

    /// Matches found so far, ordered and non-overlapping.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }

    /// Try to append `lexeme` to the window. Returns `false` if the result
    /// would not be a registered prefix.
    fn extend(&mut self, lexeme: &str) -> bool {
        let Some(id) = self.trie.resolve(self.key.len(), lexeme) else {
            return false;
        };
        self.key.push(id);
        match self.trie.lookup(&self.key) {
            None => {
                self.key.pop();
                false
            }
            Some(Node::Prefix) => {
                self.window.push(lexeme.to_string());
                true
            }
            Some(Node::Terminal(tag)) => {
                self.window.push(lexeme.to_string());
                let best = Best {
                    len: self.key.len(),
                    tag,
                };
                if best.len == self.trie.max_len() {
                    // Nothing deeper exists in the trie.
                    self.emit(best);
                } else {
                    self.best = Some(best);
                }
                true
            }
        }
    }

    fn emit(&mut self, best: Best) {
        let range = Interval::new(self.origin, self.origin + best.len);
        trace!("Match {} tagged {}", range, best.tag);
        self.matches.push(Match {
            range,
            tag: best.tag,
        });
        self.restart(best.len);
    }

    /// Drop the first `skip` buffered tokens and re-scan the rest from the
    /// root, since their word ids were resolved at deeper levels.
    fn restart(&mut self, skip: usize) {
        let pending: Vec<String> = self.window.drain(..).skip(skip).collect();
        self.key.clear();
        self.best = None;
        self.origin += skip;
        for lexeme in &pending {
            self.push(lexeme);
        }
    }
}

/// Scan a whole lexeme stream in one call.
pub fn find_matches<I, S>(trie: &PhraseTrie, lexemes: I) -> Vec<Match>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut finder = Finder::new(trie);
    for lexeme in lexemes {
        finder.push(lexeme.as_ref());
    }
    finder.finish();
    finder.into_matches()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn tag(id: u32) -> TagId {
        TagId::new(id).unwrap()
    }

    fn trie(phrases: &[(&str, u32)]) -> PhraseTrie {
        let mut trie = PhraseTrie::new();
        for (line, id) in phrases {
            trie.add_line(line, tag(*id)).unwrap();
        }
        trie
    }

    fn spans(matches: &[Match]) -> Vec<(usize, usize, u32)> {
        matches
            .iter()
            .map(|m| (m.begin(), m.end(), m.tag.get()))
            .collect()
    }

    fn scan(trie: &PhraseTrie, text: &str) -> Vec<(usize, usize, u32)> {
        spans(&find_matches(trie, text.split_whitespace()))
    }

    #[test]
    fn test_greedy_longest() {
        let t = trie(&[("a b", 1), ("a b c", 2)]);
        assert_eq!(scan(&t, "a b c"), vec![(0, 3, 2)]);
    }

    #[test]
    fn test_falls_back_to_shorter_phrase() {
        let t = trie(&[("a b", 1), ("a b c d", 2)]);
        assert_eq!(scan(&t, "a b c e"), vec![(0, 2, 1)]);
        assert_eq!(scan(&t, "a b c"), vec![(0, 2, 1)]);
    }

    #[test]
    fn test_backtrack_skips_unknown_token() {
        let t = trie(&[("a b", 1)]);
        assert_eq!(scan(&t, "x a b"), vec![(1, 3, 1)]);
    }

    #[test]
    fn test_failed_prefix_rescans_from_next_token() {
        // "a b" is only a prefix; the match hides behind its first token.
        let t = trie(&[("a b c", 1), ("b d", 2)]);
        assert_eq!(scan(&t, "a b d"), vec![(1, 3, 2)]);
    }

    #[test]
    fn test_tokens_after_match_are_rescanned() {
        let t = trie(&[("a", 1), ("a b c", 2), ("b", 3)]);
        assert_eq!(scan(&t, "a b x"), vec![(0, 1, 1), (1, 2, 3)]);
    }

    #[test]
    fn test_adjacent_matches() {
        let t = trie(&[("a b", 1), ("c", 2)]);
        assert_eq!(scan(&t, "a b c a b"), vec![(0, 2, 1), (2, 3, 2), (3, 5, 1)]);
    }

    #[test]
    fn test_empty_trie_matches_nothing() {
        let t = PhraseTrie::new();
        assert!(scan(&t, "a b c").is_empty());
    }

    #[test]
    fn test_finish_flushes_pending_prefix() {
        let t = trie(&[("a b c", 1), ("b", 2)]);
        assert_eq!(scan(&t, "a b"), vec![(1, 2, 2)]);
    }

    #[test]
    fn test_reset_allows_reuse() {
        let t = trie(&[("a", 1)]);
        let mut finder = Finder::new(&t);
        finder.push("a");
        finder.finish();
        assert_eq!(finder.matches().len(), 1);

        finder.reset();
        finder.push("x");
        finder.push("a");
        finder.finish();
        assert_eq!(spans(finder.matches()), vec![(1, 2, 1)]);
    }

    /// Leftmost-longest by brute force.
    fn reference(phrases: &BTreeMap<Vec<String>, u32>, stream: &[String]) -> Vec<(usize, usize, u32)> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < stream.len() {
            let longest = phrases
                .iter()
                .filter(|(p, _)| stream[i..].starts_with(p))
                .max_by_key(|(p, _)| p.len());
            match longest {
                Some((p, id)) => {
                    out.push((i, i + p.len(), *id));
                    i += p.len();
                }
                None => i += 1,
            }
        }
        out
    }

    fn word() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(str::to_string)
    }

    proptest! {
        #[test]
        fn finder_agrees_with_leftmost_longest(
            phrase_list in prop::collection::vec(prop::collection::vec(word(), 1..5), 1..8),
            stream in prop::collection::vec(
                prop::sample::select(vec!["a", "b", "c", "d", "x"]).prop_map(str::to_string),
                0..40,
            ),
        ) {
            let mut phrases = BTreeMap::new();
            for phrase in phrase_list {
                let next = phrases.len() as u32 + 1;
                phrases.entry(phrase).or_insert(next);
            }
            let mut t = PhraseTrie::new();
            for (phrase, id) in &phrases {
                t.add_phrase(phrase.as_slice(), tag(*id)).unwrap();
            }

            let found = spans(&find_matches(&t, &stream));
            prop_assert_eq!(&found, &reference(&phrases, &stream));

            let mut last_end = 0;
            for (begin, end, _) in &found {
                prop_assert!(*begin >= last_end);
                prop_assert!(end > begin);
                prop_assert!(end - begin <= t.max_len());
                last_end = *end;
            }
        }
    }
}
