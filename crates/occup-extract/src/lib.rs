//! From tagged text to occupation facts.
//!
//! Pipeline: source text → tagger tokens → named entities stamped onto
//! tokens → dictionary normalization → template matching → occupations
//! resolved to character offsets and rendered against the source.

pub mod annotation;
pub mod cache;
pub mod dictionary;
pub mod entity;
pub mod output;
pub mod pipeline;
pub mod slots;
pub mod tagger;
pub mod template;
pub mod text;
pub mod token;

pub use dictionary::Dictionaries;
pub use entity::{merge_entities, stamp_entities, EntityKind, NamedEntity};
pub use output::OccupationRecord;
pub use pipeline::Extractor;
pub use slots::{extract_occupations, Occupation};
pub use tagger::Tagger;
pub use template::{make_all_variants, Role, RoleSpans, TemplateSet, TemplateVariant};
pub use text::SourceText;
pub use token::Token;
