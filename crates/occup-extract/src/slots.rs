//! Slot extraction: template matches resolved to character offsets.

use serde::Serialize;
use tracing::debug;

use occup_core::{Error, Interval, Result};
use occup_match::find_matches;

use crate::template::{RoleSpans, TemplateSet};
use crate::token::Token;

/// One occupation fact as char intervals into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupation {
    pub who: Interval,
    pub r#where: Interval,
    /// Undefined when the template has no job role.
    pub job: Interval,
}

impl Occupation {
    pub fn is_valid(&self) -> bool {
        self.who.is_defined() && self.r#where.is_defined()
    }
}

/// Map a role span over match positions to the chars of those tokens.
fn resolve(span: Interval, matched: &[Token]) -> Result<Interval> {
    if !span.is_defined() {
        return Ok(Interval::undefined());
    }
    match (matched.get(span.begin), matched.get(span.end - 1)) {
        (Some(first), Some(last)) => Ok(Interval::new(first.span.begin, last.span.end)),
        _ => Err(Error::internal(format!(
            "role span {} outside a match of {} tokens",
            span,
            matched.len()
        ))),
    }
}

/// Find every template occurrence in `tokens` and resolve its roles.
pub fn extract_occupations(tokens: &[Token], templates: &TemplateSet) -> Result<Vec<Occupation>> {
    let matches = find_matches(templates.trie(), tokens.iter().map(|t| t.lexeme.as_str()));

    let mut occupations = Vec::with_capacity(matches.len());
    for m in &matches {
        let variant = templates
            .variant(m.tag)
            .ok_or_else(|| Error::internal(format!("match refers to unknown variant {}", m.tag)))?;
        let matched = tokens.get(m.range.as_range()).ok_or_else(|| {
            Error::internal(format!("match {} outside {} tokens", m.range, tokens.len()))
        })?;

        let RoleSpans { who, r#where, job } = variant.roles;
        let occupation = Occupation {
            who: resolve(who, matched)?,
            r#where: resolve(r#where, matched)?,
            job: resolve(job, matched)?,
        };
        if !occupation.is_valid() {
            return Err(Error::internal(format!(
                "variant {} resolved without who or where",
                m.tag
            )));
        }
        occupations.push(occupation);
    }
    debug!("Found {} occupations", occupations.len());
    Ok(occupations)
}
