//! Document pipeline: text → tokens → entities → dictionaries → occupations.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use occup_core::{DocumentPaths, Error, OccupConfig, Result};

use crate::annotation::load_entities;
use crate::cache;
use crate::dictionary::Dictionaries;
use crate::entity::stamp_entities;
use crate::output::{write_records, OccupationRecord};
use crate::slots::{extract_occupations, Occupation};
use crate::tagger::Tagger;
use crate::template::TemplateSet;
use crate::text::SourceText;
use crate::token::Token;

/// Extracts occupations from documents with one set of templates and
/// dictionaries.
pub struct Extractor {
    templates: TemplateSet,
    dictionaries: Dictionaries,
    config: OccupConfig,
}

impl Extractor {
    pub fn new(templates: TemplateSet, dictionaries: Dictionaries, config: OccupConfig) -> Self {
        Self {
            templates,
            dictionaries,
            config,
        }
    }

    /// Load templates and dictionaries; dictionary ids follow `dictionary_paths` order.
    pub fn load(
        templates_path: &Path,
        dictionary_paths: &[PathBuf],
        config: OccupConfig,
    ) -> Result<Self> {
        let mut dictionaries = Dictionaries::new();
        for path in dictionary_paths {
            dictionaries.add_file(path)?;
        }
        let templates = TemplateSet::load_file(templates_path)?;
        if templates.is_empty() {
            return Err(Error::format(
                templates_path.display().to_string(),
                None,
                "no templates defined",
            ));
        }
        Ok(Self::new(templates, dictionaries, config))
    }

    /// Occupations in an already annotated token stream.
    pub fn process_tokens(&self, tokens: Vec<Token>) -> Result<Vec<Occupation>> {
        let tokens = self.dictionaries.normalize(tokens);
        extract_occupations(&tokens, &self.templates)
    }

    /// Tokens with named entities stamped in, from the cache when it is fresh.
    pub fn annotate(&self, paths: &DocumentPaths, source: &SourceText) -> Result<Vec<Token>> {
        let fingerprint = cache::fingerprint(source);
        if self.config.use_token_cache {
            if let Some(tokens) = cache::load(&paths.tokens, &fingerprint)? {
                debug!("Using cached tokens for {}", paths.base.display());
                return Ok(tokens);
            }
        }

        let tokens = Tagger::new(self.config.tagger.clone()).run(source)?;
        let entities = load_entities(paths)?;
        let tokens = stamp_entities(&entities, tokens)?;
        if self.config.use_token_cache {
            cache::save(&paths.tokens, &fingerprint, &tokens)?;
        }
        Ok(tokens)
    }

    /// Extract and render every occupation of one document.
    pub fn process(&self, paths: &DocumentPaths) -> Result<Vec<OccupationRecord>> {
        let source = SourceText::load(&paths.text)?;
        let tokens = self.annotate(paths, &source)?;
        let occupations = self.process_tokens(tokens)?;
        occupations
            .iter()
            .map(|occupation| OccupationRecord::render(occupation, &source))
            .collect()
    }

    /// Process one document and write its output file. Returns the number of
    /// occupations written.
    pub fn run(&self, paths: &DocumentPaths) -> Result<usize> {
        let records = self.process(paths)?;
        let file = std::fs::File::create(&paths.output)?;
        let mut out = BufWriter::new(file);
        write_records(&records, self.config.output_format, &mut out)?;
        std::io::Write::flush(&mut out)?;
        info!(
            "Wrote {} occupations to {}",
            records.len(),
            paths.output.display()
        );
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(templates: &str, dictionary: &str) -> Extractor {
        let templates = TemplateSet::parse(templates, "templates").unwrap();
        let mut dictionaries = Dictionaries::new();
        dictionaries.add_text("jobs", dictionary).unwrap();
        Extractor::new(templates, dictionaries, OccupConfig::default())
    }

    #[test]
    fn test_process_tokens_uses_dictionaries() {
        let extractor = extractor("$P , @1~job $O\n", "chief executive\n");
        let tokens = vec![
            Token::new(0, 3, "Ann", "$P"),
            Token::new(3, 4, ",", ","),
            Token::word(5, "chief"),
            Token::word(11, "executive"),
            Token::new(21, 24, "IBM", "$O"),
        ];
        let found = extractor.process_tokens(tokens).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].job, occup_core::Interval::new(5, 20));
    }

    #[test]
    fn test_load_rejects_empty_templates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.txt");
        std::fs::write(&path, "\n\n").unwrap();
        let err = Extractor::load(&path, &[], OccupConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Format { .. }));
    }
}
