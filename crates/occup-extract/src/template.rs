//! Template compilation.
//!
//! A template line is a whitespace-separated word sequence with optional
//! `[a|b|c]` alternations. Each expanded variant becomes one phrase of the
//! template trie, plus the positions of the `who` / `where` / `job` roles.
//!
//! Role markers:
//! - `$P` fills `who`; `$O` and `$L` fill `where`.
//! - `word~who`, `word~where`, `word~job` match `word` and fill that role.
//! - `word~` matches `word` with no role.

use std::path::Path;

use tracing::{debug, info};

use occup_core::{Error, Interval, Result};
use occup_match::{PhraseTrie, TagId};

use crate::entity::EntityKind;

/// Expand `[..|..]` alternations into every literal variant.
///
/// A group with a single alternative is optional: `[x]` means `x` or
/// nothing. Variants vary fastest in the first group.
pub fn make_all_variants(line: &str) -> Result<Vec<String>> {
    let Some(open) = line.find('[') else {
        return Ok(vec![line.to_string()]);
    };
    let close = line[open..]
        .find(']')
        .map(|i| open + i)
        .ok_or_else(|| Error::UnterminatedBracket(line.to_string()))?;

    let prefix = &line[..open];
    let mut alternatives: Vec<&str> = line[open + 1..close].split('|').collect();
    if alternatives.len() == 1 {
        alternatives.push("");
    }
    let suffixes = make_all_variants(&line[close + 1..])?;

    let mut variants = Vec::with_capacity(alternatives.len() * suffixes.len());
    for suffix in &suffixes {
        for alternative in &alternatives {
            variants.push(format!("{}{}{}", prefix, alternative, suffix));
        }
    }
    Ok(variants)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Who,
    Where,
    Job,
}

/// Role positions inside a template variant, or char offsets once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSpans {
    pub who: Interval,
    pub r#where: Interval,
    pub job: Interval,
}

impl RoleSpans {
    pub fn get(&self, role: Role) -> Interval {
        match role {
            Role::Who => self.who,
            Role::Where => self.r#where,
            Role::Job => self.job,
        }
    }

    fn get_mut(&mut self, role: Role) -> &mut Interval {
        match role {
            Role::Who => &mut self.who,
            Role::Where => &mut self.r#where,
            Role::Job => &mut self.job,
        }
    }

    /// `who` and `where` are mandatory.
    pub fn is_valid(&self) -> bool {
        self.who.is_defined() && self.r#where.is_defined()
    }
}

/// One compiled variant: the literal words it matches and its roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariant {
    pub words: Vec<String>,
    pub roles: RoleSpans,
}

/// Split a template token into its literal word and role.
fn classify_token(token: &str) -> std::result::Result<(&str, Option<Role>), String> {
    if let Some(kind) = EntityKind::from_marker(token) {
        let role = match kind {
            EntityKind::Person => Role::Who,
            EntityKind::Org | EntityKind::Location => Role::Where,
        };
        return Ok((token, Some(role)));
    }
    let Some(tilde) = token.find('~') else {
        return Ok((token, None));
    };
    if tilde == 0 {
        return Err(format!("`{}` has no word before `~`", token));
    }
    let role = match &token[tilde..] {
        "~" => None,
        "~who" => Some(Role::Who),
        "~where" => Some(Role::Where),
        "~job" => Some(Role::Job),
        other => return Err(format!("unknown role `{}`", other)),
    };
    Ok((&token[..tilde], role))
}

/// Compile one expanded variant.
pub fn compile_variant(variant: &str) -> Result<TemplateVariant> {
    let mut words = Vec::new();
    let mut roles = RoleSpans::default();

    for (position, token) in variant.split_whitespace().enumerate() {
        let (word, role) =
            classify_token(token).map_err(|reason| Error::invalid_template(variant, reason))?;
        if let Some(role) = role {
            if !roles.get_mut(role).adjoin(Interval::unit(position)) {
                return Err(Error::invalid_template(
                    variant,
                    format!("{:?} span is not contiguous at `{}`", role, token),
                ));
            }
        }
        words.push(word.to_string());
    }

    if !roles.is_valid() {
        return Err(Error::invalid_template(variant, "both who and where are required"));
    }
    Ok(TemplateVariant { words, roles })
}

/// Compiled templates: a phrase trie over variant words, tagged by variant.
#[derive(Debug, Default)]
pub struct TemplateSet {
    trie: PhraseTrie,
    variants: Vec<TemplateVariant>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn trie(&self) -> &PhraseTrie {
        &self.trie
    }

    pub fn variant(&self, tag: TagId) -> Option<&TemplateVariant> {
        self.variants.get(tag.index())
    }

    /// Compile every variant of one template line. Returns how many were added;
    /// a blank line adds none.
    pub fn add_line(&mut self, line: &str) -> Result<usize> {
        if line.trim().is_empty() {
            return Ok(0);
        }
        let variants = make_all_variants(line)?;
        for variant in &variants {
            let compiled = compile_variant(variant)?;
            let tag = TagId::from_index(self.variants.len())
                .ok_or_else(|| Error::internal("too many template variants"))?;
            self.trie.add_phrase(compiled.words.as_slice(), tag)?;
            debug!("Template variant {}: {}", tag, compiled.words.join(" "));
            self.variants.push(compiled);
        }
        Ok(variants.len())
    }

    /// Compile a whole template file's text; `origin` locates errors.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let mut set = Self::new();
        for (index, line) in text.lines().enumerate() {
            set.add_line(line).map_err(|e| e.at(origin, index + 1))?;
        }
        info!("Compiled {} template variants from {}", set.len(), origin);
        Ok(set)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: origin.clone(),
            source,
        })?;
        Self::parse(&text, &origin)
    }
}
