//! Phrase dictionaries: multi-word terms collapsed into `@<id>` tokens
//! before templates run.

use std::path::Path;

use tracing::{info, trace};

use occup_core::{Error, Result};
use occup_match::{find_matches, Match, PhraseTrie, TagId};

use crate::text::fold_case;
use crate::token::{dictionary_lexeme, Token};

/// All dictionaries of a run in one trie; a phrase belongs to at most one.
#[derive(Debug, Default)]
pub struct Dictionaries {
    trie: PhraseTrie,
    names: Vec<String>,
}

impl Dictionaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of dictionaries added.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Name a dictionary was added under.
    pub fn name(&self, tag: TagId) -> Option<&str> {
        self.names.get(tag.index()).map(String::as_str)
    }

    /// Add one dictionary from its text, one phrase per line.
    /// Returns the id its phrases collapse to.
    pub fn add_text(&mut self, name: &str, text: &str) -> Result<TagId> {
        let tag = TagId::from_index(self.names.len())
            .ok_or_else(|| Error::internal("too many dictionaries"))?;
        let before = self.trie.phrase_count();
        for (index, line) in text.lines().enumerate() {
            self.trie
                .add_line(&fold_case(line), tag)
                .map_err(|e| e.at(name, index + 1))?;
        }
        self.names.push(name.to_string());
        info!(
            "Loaded dictionary {} as @{} ({} phrases)",
            name,
            tag,
            self.trie.phrase_count() - before
        );
        Ok(tag)
    }

    pub fn add_file(&mut self, path: &Path) -> Result<TagId> {
        let name = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: name.clone(),
            source,
        })?;
        self.add_text(&name, &text)
    }

    /// Replace every dictionary phrase in `tokens` by one `@<id>` token.
    pub fn normalize(&self, tokens: Vec<Token>) -> Vec<Token> {
        if self.trie.is_empty() {
            return tokens;
        }
        let matches = find_matches(&self.trie, tokens.iter().map(|t| t.lexeme.as_str()));
        for m in &matches {
            trace!(
                "Tokens {} collapse into {}",
                m.range,
                self.name(m.tag).unwrap_or("?")
            );
        }
        collapse(tokens, &matches)
    }
}

/// Collapse each matched token range into its first token.
fn collapse(tokens: Vec<Token>, matches: &[Match]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut matches = matches.iter().peekable();
    let mut tokens = tokens.into_iter().enumerate();

    while let Some((index, mut token)) = tokens.next() {
        let Some(m) = matches.next_if(|m| m.begin() == index) else {
            out.push(token);
            continue;
        };
        token.lexeme = dictionary_lexeme(m.tag);
        for _ in 1..m.len() {
            if let Some((_, next)) = tokens.next() {
                token.absorb(&next);
            }
        }
        out.push(token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use occup_core::Interval;

    fn words(text: &str) -> Vec<Token> {
        let mut offset = 0;
        text.split(' ')
            .map(|w| {
                let token = Token::word(offset, w);
                offset = token.span.end + 1;
                token
            })
            .collect()
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut dicts = Dictionaries::new();
        assert!(dicts.is_empty());
        let first = dicts.add_text("jobs", "engineer\n").unwrap();
        let second = dicts.add_text("ranks", "senior\n").unwrap();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_eq!(dicts.len(), 2);
        assert_eq!(dicts.name(second), Some("ranks"));
    }

    #[test]
    fn test_normalize_collapses_phrases() {
        let mut dicts = Dictionaries::new();
        dicts.add_text("jobs", "Chief  Executive Officer\n\nengineer\n").unwrap();

        let tokens = dicts.normalize(words("the chief executive officer and engineer"));
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["the", "@1", "and", "@1"]);
        assert_eq!(tokens[1].text, "chief executive officer");
        assert_eq!(tokens[1].span, Interval::new(4, 27));
    }

    #[test]
    fn test_duplicate_across_dictionaries_is_located() {
        let mut dicts = Dictionaries::new();
        dicts.add_text("a.txt", "engineer\n").unwrap();
        let err = dicts.add_text("b.txt", "doctor\nEngineer\n").unwrap_err();
        match err {
            Error::Located { origin, line, source } => {
                assert_eq!(origin, "b.txt");
                assert_eq!(line, 2);
                assert!(matches!(*source, Error::DuplicatePhrase { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_dictionaries_pass_tokens_through() {
        let dicts = Dictionaries::new();
        let tokens = words("a b");
        assert_eq!(dicts.normalize(tokens.clone()), tokens);
    }

    #[test]
    fn test_missing_file() {
        let mut dicts = Dictionaries::new();
        let err = dicts.add_file(Path::new("/nonexistent/dict.txt")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
