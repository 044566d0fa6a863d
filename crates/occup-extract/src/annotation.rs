//! Readers for the `.spans` / `.objects` named-entity annotation files.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use occup_core::{DocumentPaths, Error, Interval, Result};

use crate::entity::{check_ordered, merge_entities, EntityKind, NamedEntity};

/// Parse `id kind offset length ...` lines into char intervals by span id.
/// The first definition of an id wins.
pub fn read_spans(text: &str, origin: &str) -> Result<HashMap<usize, Interval>> {
    let mut spans = HashMap::new();
    for (index, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 4 {
            return Err(Error::format(
                origin,
                Some(index + 1),
                format!("expected `id kind offset length`, found {} fields", fields.len()),
            ));
        }
        let number = |field: &str| {
            field
                .parse::<usize>()
                .map_err(|_| Error::format(origin, Some(index + 1), format!("bad number `{}`", field)))
        };
        let id = number(fields[0])?;
        let offset = number(fields[2])?;
        let length = number(fields[3])?;
        let end = offset
            .checked_add(length)
            .ok_or_else(|| Error::format(origin, Some(index + 1), "span end overflows"))?;
        spans.entry(id).or_insert(Interval::new(offset, end));
    }
    Ok(spans)
}

/// Parse `id Type spanId spanId ... [rest]` lines into entities.
///
/// Objects of unrecognized types are skipped. Span ids are the run of
/// numeric fields right after the type.
pub fn read_objects(
    text: &str,
    spans: &HashMap<usize, Interval>,
    origin: &str,
) -> Result<Vec<NamedEntity>> {
    let mut entities = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace().skip(1);
        let Some(label) = fields.next() else {
            continue;
        };
        let Some(kind) = EntityKind::from_label(label) else {
            debug!("Skipping object of type {}", label);
            continue;
        };

        let mut span = Interval::undefined();
        for field in fields.take_while(|f| f.starts_with(|c: char| c.is_ascii_digit())) {
            let found = field
                .parse::<usize>()
                .ok()
                .and_then(|id| spans.get(&id))
                .ok_or_else(|| {
                    Error::format(origin, Some(index + 1), format!("unknown span `{}`", field))
                })?;
            span.cover(*found);
        }
        if !span.is_defined() {
            return Err(Error::format(
                origin,
                Some(index + 1),
                format!("{} object has no spans", kind),
            ));
        }
        entities.push(NamedEntity { span, kind });
    }
    Ok(entities)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Read, merge and validate the named entities of one document.
pub fn load_entities(paths: &DocumentPaths) -> Result<Vec<NamedEntity>> {
    let spans_origin = paths.spans.display().to_string();
    let objects_origin = paths.objects.display().to_string();

    let spans = read_spans(&read_file(&paths.spans)?, &spans_origin)?;
    let entities = read_objects(&read_file(&paths.objects)?, &spans, &objects_origin)?;
    let read = entities.len();
    let entities = merge_entities(entities);
    check_ordered(&entities, &objects_origin)?;
    info!("Loaded {} named entities ({} before merging)", entities.len(), read);
    Ok(entities)
}
