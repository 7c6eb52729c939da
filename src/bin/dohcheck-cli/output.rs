#[cfg(feature = "with-csv")]
use anyhow::Context;
use anyhow::{Result, bail};
use serde::Serialize;

use crate::args::Cli;
use dohcheck_lib::{Classification, DnsQuery};

#[derive(Debug, Clone, Serialize)]
pub struct RecordRow {
    pub domain: String,
    pub record_type: String,
    pub result: String,
    pub failed: bool,
}

impl RecordRow {
    pub fn new(query: &DnsQuery, result: String, failed: bool) -> Self {
        Self {
            domain: query.domain.to_string(),
            record_type: query.record_type.to_string(),
            result,
            failed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailRow {
    pub input: String,
    #[serde(flatten)]
    pub classification: Classification,
    pub google: bool,
}

impl EmailRow {
    pub fn new(input: impl Into<String>, classification: Classification) -> Self {
        let google = classification.is_provider();
        Self {
            input: input.into(),
            classification,
            google,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutputRow {
    Record(RecordRow),
    Email(EmailRow),
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows, cli),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

/// Record rows whose lookup did not produce an answer.
pub fn any_failed(rows: &[OutputRow]) -> bool {
    rows.iter()
        .any(|row| matches!(row, OutputRow::Record(record) if record.failed))
}

pub fn render_human(rows: &[OutputRow]) -> String {
    rows.iter()
        .map(|row| match row {
            OutputRow::Record(r) => {
                let tag = if r.failed { "[FAIL]" } else { "[OK]  " };
                format!("{tag}  {} {} :: {}", r.domain, r.record_type, r.result)
            }
            OutputRow::Email(e) => {
                let tag = if e.google { "[GOOGLE]" } else { "[OTHER] " };
                format!("{tag} {} ({})", e.input, e.classification.mode)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_human(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let mut text = render_human(rows);
    if text.is_empty() {
        return Ok(());
    }
    text.push('\n');
    if let Some(path) = &cli.out {
        write_all_atomically(path, text.as_bytes())
    } else {
        print!("{text}");
        Ok(())
    }
}

fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())
    } else {
        println!("{s}");
        Ok(())
    }
}

fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let mut buf = Vec::new();
    for row in rows {
        serde_json::to_writer(&mut buf, row)?;
        buf.push(b'\n');
    }
    if let Some(path) = &cli.out {
        write_all_atomically(path, &buf)
    } else {
        print!("{}", String::from_utf8_lossy(&buf));
        Ok(())
    }
}

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        match row {
            OutputRow::Record(r) => wtr.write_record([
                "record",
                r.domain.as_str(),
                r.record_type.as_str(),
                r.result.as_str(),
                if r.failed { "false" } else { "true" },
            ])?,
            OutputRow::Email(e) => wtr.write_record([
                "is-google",
                e.input.as_str(),
                e.classification.mode.as_str(),
                e.classification.mx.as_str(),
                if e.google { "true" } else { "false" },
            ])?,
        }
    }
    let data = wtr.into_inner().context("flush CSV writer")?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, &data)
    } else {
        print!("{}", String::from_utf8_lossy(&data));
        Ok(())
    }
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_rows: &[OutputRow], _cli: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    let tmp = format!("{}.tmp", path);
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
