use crate::stats::{DataPoint, Mode};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::info;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The header row of every series CSV.
const CSV_HEADER: &str = "Index,Checked,Unchecked,Total,Completion";

/// Works out where the CSV for the given metric keyword and mode should go, stamped with the
/// time the run started so repeated runs don't overwrite each other.
pub fn series_path(dir: &Path, keyword: &str, mode: Mode, started: NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "{}_{mode}_{}.csv",
        sanitize_filename(keyword),
        started.format("%Y%m%d%H%M%S")
    ))
}

/// Writes the given series to a new CSV file at `path`, one row per point.
pub fn write_series_file(path: &Path, series: &[DataPoint]) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_series(&mut writer, series)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write series to {}", path.display()))?;
    info!("wrote {} points to {}", series.len(), path.display());

    Ok(())
}

/// Writes the given series as CSV (header included) to any writer.
pub fn write_series(writer: &mut impl Write, series: &[DataPoint]) -> std::io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for point in series {
        writeln!(
            writer,
            "{},{},{},{},{}",
            csv_escape(point.id()),
            point.checked(),
            point.unchecked(),
            point.total(),
            point.completion()
        )?;
    }

    Ok(())
}

/// Describes a single point for verbose output.
pub fn describe_point(point: &DataPoint) -> String {
    format!(
        "Point \"{}\": {} checked, {} unchecked, {} total, completion {}%",
        point.id(),
        point.checked(),
        point.unchecked(),
        point.total(),
        percent(point.completion())
    )
}

/// Describes a metric's all-time totals.
pub fn describe_total(keyword: &str, total: &DataPoint) -> String {
    format!(
        "Keyword: {keyword}\nChecked: {}\nUnchecked: {}\nCompletion rate: {}%",
        total.checked(),
        total.unchecked(),
        percent(total.completion())
    )
}

fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn sanitize_filename(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
