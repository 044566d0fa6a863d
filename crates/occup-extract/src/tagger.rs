//! External morphological tagger: invocation and output parsing.
//!
//! The tagger prints one item per line. A word line looks like
//! `Text{lemma?...}`; anything else is escaped plain text (`_` for space,
//! `\n` for a line break) that is split into words and punctuation here.

use std::io::Write;
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use occup_core::{Error, Result, TaggerConfig};

use crate::text::SourceText;
use crate::token::Token;

static TAGGED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^{]*)\{([^?|}]*)[?|}]").unwrap());

/// Runs the configured tagger over a document.
pub struct Tagger {
    config: TaggerConfig,
}

impl Tagger {
    pub fn new(config: TaggerConfig) -> Self {
        Self { config }
    }

    /// Tag `source` and return its tokens with char offsets into it.
    pub fn run(&self, source: &SourceText) -> Result<Vec<Token>> {
        let mut input = tempfile::NamedTempFile::new()?;
        input.write_all(source.prepared().as_bytes())?;
        input.flush()?;
        let output = tempfile::NamedTempFile::new()?;

        let program = self.config.program.display().to_string();
        debug!("Running tagger {} {}", program, self.config.args.join(" "));
        let status = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(input.path())
            .arg(output.path())
            .status()
            .map_err(|e| Error::Tagger(format!("cannot run `{}`: {}", program, e)))?;
        if !status.success() {
            return Err(Error::Tagger(format!("`{}` failed: {}", program, status)));
        }

        let tagged = std::fs::read_to_string(output.path())?;
        let tokens = parse_tagged(&tagged, &program)?;
        info!("Tagger produced {} tokens", tokens.len());
        Ok(tokens)
    }
}

/// Parse tagger output. `origin` names the output in error messages.
pub fn parse_tagged(output: &str, origin: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    for (index, line) in output.lines().enumerate() {
        if line.contains('{') {
            let caps = TAGGED_WORD.captures(line).ok_or_else(|| {
                Error::format(origin, Some(index + 1), "unterminated lemma in tagged word")
            })?;
            let text = &caps[1];
            let begin = offset;
            offset += text.chars().count();
            let lemma = &caps[2];
            // `word{}` carries no lemma; match on the surface form instead.
            let lexeme = if lemma.is_empty() { text } else { lemma };
            tokens.push(Token::new(begin, offset, text, lexeme));
        } else {
            offset = split_plain(&unescape(line), offset, &mut tokens);
        }
    }
    Ok(tokens)
}

/// Undo the tagger's escaping of untagged text.
fn unescape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '_' => out.push(' '),
            '\\' => match chars.next() {
                Some('n') | Some('r') => out.push('\n'),
                Some(other) => out.push(other),
                None => {}
            },
            c => out.push(c),
        }
    }
    out
}

/// Split plain text into word runs and single punctuation tokens.
/// Returns the offset just past the text.
fn split_plain(text: &str, offset: usize, tokens: &mut Vec<Token>) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_alphanumeric() {
            let start = i;
            while i < chars.len() && chars[i].is_alphanumeric() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            tokens.push(Token::word(offset + start, word));
        } else if c == ' ' || c == '\n' {
            i += 1;
        } else {
            tokens.push(Token::new(offset + i, offset + i + 1, c, c));
            i += 1;
        }
    }
    offset + chars.len()
}
