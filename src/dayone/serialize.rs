use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::config::OutputConfig;
use crate::dayone::types::DayOneExport;

pub fn serialize_export(export: &DayOneExport) -> Result<Vec<u8>> {
    serde_json::to_vec(export).context("failed to serialize Day One export")
}

pub fn write_zip<W: Write + Seek>(writer: W, journal_name: &str, json: &[u8]) -> Result<W> {
    let mut zw = zip::ZipWriter::new(writer);
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zw.start_file(format!("{journal_name}.json"), opts)
        .context("failed to start zip member")?;
    zw.write_all(json).context("failed to write zip member")?;
    zw.finish().context("failed to finish zip archive")
}

/// Stem shared by every archive of one run. Later runs on the same day get
/// `_2`, `_3`, ... so earlier archives are never replaced.
pub fn export_base_name(day: NaiveDate, run: usize) -> String {
    let stamp = day.format("%Y%m%d").to_string();
    if run <= 1 {
        format!("export-{stamp}")
    } else {
        format!("export-{stamp}_{run}")
    }
}

pub fn export_file_names(base: &str, pages: usize) -> Vec<String> {
    if pages == 1 {
        return vec![format!("{base}.zip")];
    }
    let width = pages.to_string().len().max(2);
    (1..=pages)
        .map(|n| format!("{base}-{n:0width$}.zip"))
        .collect()
}

fn base_in_use(existing: &[String], base: &str) -> bool {
    let single = format!("{base}.zip");
    let numbered = format!("{base}-");
    existing
        .iter()
        .any(|name| *name == single || name.starts_with(&numbered))
}

pub fn free_base_name(existing: &[String], day: NaiveDate) -> String {
    let mut run = 1;
    loop {
        let base = export_base_name(day, run);
        if !base_in_use(existing, &base) {
            return base;
        }
        run += 1;
    }
}

fn existing_names(dir: &Path) -> Result<Vec<String>> {
    let read_dir = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Serializes every page, stages each archive next to its destination, and
/// only then moves them into place. A failure on any page leaves nothing
/// behind in the export directory, and archives from earlier runs are kept.
pub fn write_exports(
    exports: &[DayOneExport],
    output: &OutputConfig,
    day: NaiveDate,
) -> Result<Vec<PathBuf>> {
    let payloads = exports
        .iter()
        .enumerate()
        .map(|(idx, export)| {
            serialize_export(export).with_context(|| format!("failed to serialize page {}", idx + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    if payloads.is_empty() {
        return Ok(Vec::new());
    }

    let dir = &output.export_dir;
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let base = free_base_name(&existing_names(dir)?, day);
    if base != export_base_name(day, 1) {
        tracing::info!(base = %base, "keeping archives exported earlier today");
    }
    let names = export_file_names(&base, payloads.len());
    let mut staged = Vec::with_capacity(payloads.len());
    for (name, json) in names.iter().zip(&payloads) {
        let tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to stage archive in {}", dir.display()))?;
        let tmp = write_zip(tmp, &output.journal_name, json)
            .with_context(|| format!("failed to write {name}"))?;
        staged.push((tmp, dir.join(name)));
    }

    persist_all(staged)
}

fn persist_all(staged: Vec<(NamedTempFile, PathBuf)>) -> Result<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (tmp, dest) in staged {
        if let Err(err) = tmp.persist_noclobber(&dest) {
            remove_written(&written);
            return Err(err.error).with_context(|| format!("failed to write {}", dest.display()));
        }
        tracing::info!(path = %dest.display(), "wrote Day One import archive");
        written.push(dest);
    }
    Ok(written)
}

fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove partial export");
        }
    }
}
