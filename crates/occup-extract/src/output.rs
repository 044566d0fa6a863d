//! Rendering occupation facts against the source text.

use std::io::Write;

use serde::Serialize;

use occup_core::{OutputFormat, Result};

use crate::slots::Occupation;
use crate::text::SourceText;

/// An occupation with its text filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupationRecord {
    pub who: String,
    pub r#where: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    pub offsets: Occupation,
}

impl OccupationRecord {
    pub fn render(occupation: &Occupation, source: &SourceText) -> Result<Self> {
        let job = if occupation.job.is_defined() {
            Some(source.slice(occupation.job)?)
        } else {
            None
        };
        Ok(Self {
            who: source.slice(occupation.who)?,
            r#where: source.slice(occupation.r#where)?,
            job,
            offsets: *occupation,
        })
    }
}

/// `Occupation` / `who:` / `where:` / `job:` blocks separated by blank lines.
pub fn write_text<W: Write>(records: &[OccupationRecord], out: &mut W) -> Result<()> {
    for record in records {
        writeln!(out, "Occupation")?;
        writeln!(out, "who:{}", record.who)?;
        writeln!(out, "where:{}", record.r#where)?;
        if let Some(job) = &record.job {
            writeln!(out, "job:{}", job)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_json<W: Write>(records: &[OccupationRecord], out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_records<W: Write>(
    records: &[OccupationRecord],
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(records, out),
        OutputFormat::Json => write_json(records, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use occup_core::Interval;

    fn records() -> Vec<OccupationRecord> {
        let source = SourceText::new("Иван Петров, директор ООО Ромашка");
        let with_job = Occupation {
            who: Interval::new(0, 11),
            r#where: Interval::new(22, 33),
            job: Interval::new(13, 21),
        };
        let without_job = Occupation {
            job: Interval::undefined(),
            ..with_job
        };
        vec![
            OccupationRecord::render(&with_job, &source).unwrap(),
            OccupationRecord::render(&without_job, &source).unwrap(),
        ]
    }

    #[test]
    fn test_render() {
        let records = records();
        assert_eq!(records[0].who, "Иван Петров");
        assert_eq!(records[0].r#where, "ООО Ромашка");
        assert_eq!(records[0].job.as_deref(), Some("директор"));
        assert_eq!(records[1].job, None);
    }

    #[test]
    fn test_write_text() {
        let mut out = Vec::new();
        write_records(&records(), OutputFormat::Text, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Occupation\nwho:Иван Петров\nwhere:ООО Ромашка\njob:директор\n\n\
             Occupation\nwho:Иван Петров\nwhere:ООО Ромашка\n\n"
        );
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_records(&records(), OutputFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["job"], "директор");
        assert_eq!(value[0]["where"], "ООО Ромашка");
        assert_eq!(value[0]["offsets"]["who"]["end"], 11);
        assert!(value[1].get("job").is_none());
    }
}
