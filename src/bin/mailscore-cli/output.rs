use anyhow::{Context, Result, bail};

use crate::args::Cli;
use mailscore_lib::{MAX_SCORE, RecordResult, ScanResult};

pub fn write_report(result: &ScanResult, cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(result, cli),
        "json" => write_json(result, cli),
        "csv" => write_csv(result, cli),
        other => bail!("unknown --format '{other}', use: human|json|csv"),
    }
}

/// Every check of the report, records first, as `(key, weight, result)`.
fn rows(result: &ScanResult) -> Vec<(&'static str, u32, &RecordResult)> {
    let records = result
        .records()
        .iter()
        .map(|(kind, record)| (kind.key(), kind.weight(), record));
    let services = result
        .services()
        .iter()
        .map(|(kind, service)| (kind.key(), kind.weight(), service));
    records.chain(services).collect()
}

pub fn human_lines(result: &ScanResult) -> Vec<String> {
    let mut lines = vec![format!("domain={}", result.domain())];
    for (key, weight, row) in rows(result) {
        lines.push(format!("{key:<6} {}/{weight}  {}", row.score(), row.detail()));
        for entry in row.data().unwrap_or_default() {
            lines.push(format!("        {entry}"));
        }
    }
    lines.push(format!("total_score={}/{MAX_SCORE}", result.total_score()));
    lines
}

fn write_human(result: &ScanResult, cli: &Cli) -> Result<()> {
    let text = human_lines(result).join("\n");
    match &cli.out {
        Some(path) => write_all_atomically(path, format!("{text}\n").as_bytes()),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

#[cfg(feature = "with-serde")]
fn write_json(result: &ScanResult, cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(result)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &ScanResult, _: &Cli) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
fn write_csv(result: &ScanResult, cli: &Cli) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["check", "score", "weight", "detail", "record_data"])?;
    for (key, weight, row) in rows(result) {
        let data = row.data().map(|data| data.join("|")).unwrap_or_default();
        wtr.write_record([
            key.to_string(),
            row.score().to_string(),
            weight.to_string(),
            row.detail().to_string(),
            data,
        ])?;
    }
    wtr.write_record([
        "total".to_string(),
        result.total_score().to_string(),
        MAX_SCORE.to_string(),
        String::new(),
        String::new(),
    ])?;
    let data = wtr.into_inner().context("flush csv")?;
    match &cli.out {
        Some(path) => write_all_atomically(path, &data),
        None => {
            use std::io::Write;
            std::io::stdout().write_all(&data)?;
            Ok(())
        }
    }
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &ScanResult, _: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
