//! Named entities: overlap resolution and stamping onto the token stream.

use serde::{Deserialize, Serialize};
use tracing::debug;

use occup_core::{Error, Interval, Result};

use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Person,
    Org,
    Location,
}

impl EntityKind {
    /// Parse an annotation label. `LocOrg` counts as an organization.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Person" => Some(Self::Person),
            "Org" | "LocOrg" => Some(Self::Org),
            "Location" => Some(Self::Location),
            _ => None,
        }
    }

    /// Lexeme a stamped entity token carries.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Person => "$P",
            Self::Org => "$O",
            Self::Location => "$L",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "$P" => Some(Self::Person),
            "$O" => Some(Self::Org),
            "$L" => Some(Self::Location),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Person => "Person",
            Self::Org => "Org",
            Self::Location => "Location",
        };
        f.write_str(label)
    }
}

/// An entity over character offsets of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub span: Interval,
    pub kind: EntityKind,
}

impl NamedEntity {
    pub fn new(begin: usize, end: usize, kind: EntityKind) -> Self {
        Self {
            span: Interval::new(begin, end),
            kind,
        }
    }
}

/// Resolve overlapping entities: of two intersecting entities the strictly
/// longer one wins, on a tie the earlier one stays.
pub fn merge_entities(mut entities: Vec<NamedEntity>) -> Vec<NamedEntity> {
    entities.sort_by_key(|e| (e.span.begin, e.span.end));

    let mut merged: Vec<NamedEntity> = Vec::with_capacity(entities.len());
    for entity in entities {
        match merged.last_mut() {
            Some(last) if last.span.intersects(&entity.span) => {
                if entity.span.len() > last.span.len() {
                    *last = entity;
                }
            }
            _ => merged.push(entity),
        }
    }
    merged
}

/// Fails unless entities are defined, ordered and pairwise disjoint.
pub fn check_ordered(entities: &[NamedEntity], origin: &str) -> Result<()> {
    for (index, entity) in entities.iter().enumerate() {
        if !entity.span.is_defined() {
            return Err(Error::format(
                origin,
                None,
                format!("empty {} entity at {}", entity.kind, entity.span),
            ));
        }
        if let Some(prev) = index.checked_sub(1).map(|i| &entities[i]) {
            if entity.span.begin < prev.span.end {
                return Err(Error::format(
                    origin,
                    None,
                    format!("entity {} overlaps {}", entity.span, prev.span),
                ));
            }
        }
    }
    Ok(())
}

/// Collapse the tokens under each entity into one token whose lexeme is the
/// entity marker. `entities` must be ordered and disjoint.
pub fn stamp_entities(entities: &[NamedEntity], tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter().peekable();

    for entity in entities {
        while let Some(token) = tokens.next_if(|t| t.span.end <= entity.span.begin) {
            out.push(token);
        }
        let Some(mut head) = tokens.next_if(|t| t.span.intersects(&entity.span)) else {
            return Err(Error::EntityMismatch(format!(
                "{} entity at {} covers no token",
                entity.kind, entity.span
            )));
        };
        head.lexeme = entity.kind.marker().to_string();
        while let Some(token) = tokens.next_if(|t| t.span.intersects(&entity.span)) {
            head.absorb(&token);
        }
        out.push(head);
    }
    out.extend(tokens);
    debug!("Stamped {} entities", entities.len());
    Ok(out)
}
