//! Configuration and per-document file layout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Default tagger executable name.
pub const DEFAULT_TAGGER: &str = "mystem";
/// Default tagger flags: one word per line, copy input, disambiguate, English grammar tags.
pub const DEFAULT_TAGGER_ARGS: &[&str] = &["-ncwd", "--eng-gr"];

/// Paths to all files belonging to one document, derived from its base name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPaths {
    /// Base name without extension (e.g., `corpus/Book_100`).
    pub base: PathBuf,
    /// Source text (`<base>.txt`).
    pub text: PathBuf,
    /// Span annotation (`<base>.spans`).
    pub spans: PathBuf,
    /// Object annotation referencing spans (`<base>.objects`).
    pub objects: PathBuf,
    /// Annotated token cache (`<base>.tokens`).
    pub tokens: PathBuf,
    /// Extracted occupations (`<base>.occupations`).
    pub output: PathBuf,
}

impl DocumentPaths {
    pub fn from_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref().to_path_buf();
        Self {
            text: with_suffix(&base, "txt"),
            spans: with_suffix(&base, "spans"),
            objects: with_suffix(&base, "objects"),
            tokens: with_suffix(&base, "tokens"),
            output: with_suffix(&base, "occupations"),
            base,
        }
    }
}

// `Path::with_extension` would clobber dots inside the base name.
fn with_suffix(base: &Path, ext: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// External morphological tagger invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggerConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            program: default_tagger_path(),
            args: DEFAULT_TAGGER_ARGS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Look for the tagger next to the running executable, else rely on `PATH`.
fn default_tagger_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_TAGGER)))
        .filter(|candidate| candidate.exists())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TAGGER))
}

/// How extracted occupations are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Occupation` / `who:` / `where:` / `job:` blocks.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!("unknown output format `{}`", other))),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupConfig {
    pub tagger: TaggerConfig,
    /// Reuse `<base>.tokens` when its fingerprint matches the source text.
    pub use_token_cache: bool,
    pub output_format: OutputFormat,
}

impl Default for OccupConfig {
    fn default() -> Self {
        Self {
            tagger: TaggerConfig::default(),
            use_token_cache: true,
            output_format: OutputFormat::default(),
        }
    }
}

impl OccupConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        let mut tagger = TaggerConfig::default();
        if let Ok(program) = std::env::var("OCCUP_TAGGER") {
            tagger.program = PathBuf::from(program);
        }
        if let Ok(args) = std::env::var("OCCUP_TAGGER_ARGS") {
            tagger.args = args.split_whitespace().map(str::to_string).collect();
        }

        let use_token_cache = match std::env::var("OCCUP_TOKEN_CACHE") {
            Ok(v) => parse_flag(&v)?,
            Err(_) => true,
        };

        let output_format = match std::env::var("OCCUP_OUTPUT_FORMAT") {
            Ok(v) => v.parse()?,
            Err(_) => OutputFormat::default(),
        };

        debug!(
            "Tagger: {} {}",
            tagger.program.display(),
            tagger.args.join(" ")
        );

        Ok(Self {
            tagger,
            use_token_cache,
            output_format,
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("expected a boolean, got `{}`", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_paths_keep_dots_in_base() {
        let paths = DocumentPaths::from_base("corpus/Book.v2");
        assert_eq!(paths.text, PathBuf::from("corpus/Book.v2.txt"));
        assert_eq!(paths.objects, PathBuf::from("corpus/Book.v2.objects"));
        assert_eq!(paths.output, PathBuf::from("corpus/Book.v2.occupations"));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag(" off ").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_default_config_uses_cache() {
        let config = OccupConfig::default();
        assert!(config.use_token_cache);
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_default_tagger_args() {
        let tagger = TaggerConfig::default();
        assert_eq!(tagger.args, vec!["-ncwd".to_string(), "--eng-gr".to_string()]);
    }
}
