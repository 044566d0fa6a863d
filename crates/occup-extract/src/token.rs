//! Tokens and the lexeme vocabulary shared by every matching pass.

use serde::{Deserialize, Serialize};

use occup_core::Interval;
use occup_match::TagId;

/// Lexeme standing for any all-digit word.
pub const DIGITS_LEXEME: &str = "#";

/// Lexeme of a token collapsed by dictionary `tag`.
pub fn dictionary_lexeme(tag: TagId) -> String {
    format!("@{}", tag)
}

/// Lexeme for a plain word: the word itself, or [`DIGITS_LEXEME`] for numbers.
pub fn word_lexeme(word: &str) -> String {
    if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
        DIGITS_LEXEME.to_string()
    } else {
        word.to_string()
    }
}

/// One token of a document: char span, surface text and matching key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub span: Interval,
    pub text: String,
    pub lexeme: String,
}

impl Token {
    pub fn new(begin: usize, end: usize, text: impl Into<String>, lexeme: impl Into<String>) -> Self {
        Self {
            span: Interval::new(begin, end),
            text: text.into(),
            lexeme: lexeme.into(),
        }
    }

    /// A word starting at `begin`, spanning its char count.
    pub fn word(begin: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let end = begin + text.chars().count();
        let lexeme = word_lexeme(&text);
        Self::new(begin, end, text, lexeme)
    }

    /// Merge a following token into this one, keeping this lexeme.
    pub fn absorb(&mut self, next: &Token) {
        self.text.push(' ');
        self.text.push_str(&next.text);
        self.span.end = next.span.end;
    }
}
