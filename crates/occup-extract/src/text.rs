//! Source text addressed by character offset, and the case folding shared
//! by the tagger input and dictionary lines.

use std::path::Path;

use occup_core::{Error, Interval, Result};

/// Punctuation the tagger sees as-is; every other non-alphanumeric becomes a space.
const KEPT_PUNCTUATION: &[char] = &['!', '(', ')', ',', '-', '.', ':', ';', '?'];

/// Fold one character without changing the character count.
pub fn fold_char(c: char) -> char {
    match c {
        '\n' => '\n',
        'ё' | 'Ё' => 'е',
        '\u{2013}' | '\u{2014}' | '\u{00AD}' => '-',
        '\u{2026}' => '.',
        '\u{201A}' => ',',
        c if KEPT_PUNCTUATION.contains(&c) => c,
        c if c.is_alphanumeric() => {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        }
        _ => ' ',
    }
}

pub fn fold_case(line: &str) -> String {
    line.chars().map(fold_char).collect()
}

/// A document as a sequence of characters.
///
/// Lines are split on `\n`, a trailing `\r` is dropped and every line is
/// terminated by `\n`, so offsets agree with the tagger's view of the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceText {
    chars: Vec<char>,
}

impl SourceText {
    pub fn new(raw: &str) -> Self {
        let mut chars = Vec::with_capacity(raw.len() + 1);
        for line in raw.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            chars.extend(line.chars());
            chars.push('\n');
        }
        Self { chars }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(&raw))
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Text covered by a defined, in-range interval.
    pub fn slice(&self, span: Interval) -> Result<String> {
        if !span.is_defined() || span.end > self.chars.len() {
            return Err(Error::internal(format!(
                "span {} outside source text of {} chars",
                span,
                self.chars.len()
            )));
        }
        Ok(self.chars[span.as_range()].iter().collect())
    }

    /// Case-folded copy handed to the tagger.
    pub fn prepared(&self) -> String {
        self.chars.iter().copied().map(fold_char).collect()
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_normalized() {
        let text = SourceText::new("ab\r\ncd");
        assert_eq!(text.as_string(), "ab\ncd\n");
        assert_eq!(text.len(), 6);
    }

    #[test]
    fn test_slice_by_char_offset() {
        let text = SourceText::new("Иван — врач");
        assert_eq!(text.slice(Interval::new(0, 4)).unwrap(), "Иван");
        assert_eq!(text.slice(Interval::new(7, 11)).unwrap(), "врач");
        assert!(text.slice(Interval::new(7, 100)).is_err());
        assert!(text.slice(Interval::undefined()).is_err());
    }

    #[test]
    fn test_prepared_keeps_length() {
        let text = SourceText::new("Ёлка, \"ООО\" & Co.\tX");
        let prepared = text.prepared();
        assert_eq!(prepared.chars().count(), text.len());
        assert_eq!(prepared, "елка,  ооо    co. x\n");
    }

    #[test]
    fn test_fold_case() {
        assert_eq!(fold_case("Senior Engineer"), "senior engineer");
        assert_eq!(fold_case("вице–президент"), "вице-президент");
    }
}
