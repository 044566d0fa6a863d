//! On-disk cache of annotated tokens, keyed by a fingerprint of the source.
//!
//! Layout: a `sha256\t<hex>` header line, then one `begin\tend\ttext\tlexeme`
//! line per token.

use std::io::{BufWriter, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use occup_core::{Error, Result};

use crate::text::SourceText;
use crate::token::Token;

const HEADER_KEY: &str = "sha256";

/// SHA-256 of the source text, hex encoded.
pub fn fingerprint(source: &SourceText) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_string().as_bytes());
    hex::encode(hasher.finalize())
}

pub fn save(path: &Path, fingerprint: &str, tokens: &[Token]) -> Result<()> {
    let mut out = BufWriter::new(std::fs::File::create(path)?);
    writeln!(out, "{}\t{}", HEADER_KEY, fingerprint)?;
    for token in tokens {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            token.span.begin, token.span.end, token.text, token.lexeme
        )?;
    }
    out.flush()?;
    debug!("Cached {} tokens in {}", tokens.len(), path.display());
    Ok(())
}

/// Load cached tokens. Returns `None` if there is no cache or it was made
/// for a different source text.
pub fn load(path: &Path, fingerprint: &str) -> Result<Option<Vec<Token>>> {
    if !path.exists() {
        return Ok(None);
    }
    let origin = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: origin.clone(),
        source,
    })?;

    let mut lines = content.lines();
    let stored = lines
        .next()
        .and_then(|header| header.strip_prefix(HEADER_KEY))
        .and_then(|rest| rest.strip_prefix('\t'))
        .ok_or_else(|| Error::format(&origin, Some(1), "missing fingerprint header"))?;
    if stored != fingerprint {
        warn!("Token cache {} is stale, ignoring it", origin);
        return Ok(None);
    }

    let mut tokens = Vec::new();
    for (index, line) in lines.enumerate() {
        tokens.push(parse_line(line).map_err(|message| {
            Error::format(&origin, Some(index + 2), message)
        })?);
    }
    debug!("Loaded {} cached tokens from {}", tokens.len(), origin);
    Ok(Some(tokens))
}

fn parse_line(line: &str) -> std::result::Result<Token, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    let [begin, end, text, lexeme] = fields[..] else {
        return Err(format!("expected 4 tab-separated fields, found {}", fields.len()));
    };
    let begin: usize = begin
        .parse()
        .map_err(|_| format!("bad begin offset `{}`", begin))?;
    let end: usize = end.parse().map_err(|_| format!("bad end offset `{}`", end))?;
    if begin >= end {
        return Err(format!("empty token span [{}, {})", begin, end));
    }
    Ok(Token::new(begin, end, text, lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![
            Token::new(0, 10, "John Smith", "$P"),
            Token::word(11, "works"),
            Token::new(17, 18, ",", ","),
        ]
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.tokens");
        let source = SourceText::new("John Smith works, ok");
        let fp = fingerprint(&source);

        save(&path, &fp, &tokens()).unwrap();
        assert_eq!(load(&path, &fp).unwrap(), Some(tokens()));
    }

    #[test]
    fn test_save_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("doc.tokens");
        assert!(matches!(save(&path, "abc", &tokens()), Err(Error::Io(_))));
    }

    #[test]
    fn test_missing_and_stale_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.tokens");
        assert_eq!(load(&path, "abc").unwrap(), None);

        save(&path, "abc", &tokens()).unwrap();
        assert_eq!(load(&path, "def").unwrap(), None);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = fingerprint(&SourceText::new("one"));
        assert_eq!(a.len(), 64);
        assert_eq!(a, fingerprint(&SourceText::new("one\r")));
        assert_ne!(a, fingerprint(&SourceText::new("two")));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.tokens");
        std::fs::write(&path, "sha256\tabc\n0\t4\tJohn\tjohn\n5\tx\tSmith\tsmith\n").unwrap();
        let err = load(&path, "abc").unwrap_err();
        assert!(matches!(err, Error::Format { line: Some(3), .. }));
    }

    #[test]
    fn test_missing_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.tokens");
        std::fs::write(&path, "0\t4\tJohn\tjohn\n").unwrap();
        assert!(matches!(
            load(&path, "abc").unwrap_err(),
            Error::Format { line: Some(1), .. }
        ));
    }
}
