use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

use crate::commands::CommandReport;
use crate::config::ExportConfig;
use crate::daylio;
use crate::dayone::generators::Generators;
use crate::dayone::paginate::paginate;
use crate::dayone::serialize::write_exports;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub source: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub source: PathBuf,
    pub entries: usize,
    pub written: Vec<PathBuf>,
}

pub fn convert(
    source: &Path,
    cfg: &ExportConfig,
    generators: &Generators,
    day: NaiveDate,
) -> Result<ConvertOutcome> {
    let source = daylio::resolve_source_path(source)?;
    let entries = daylio::read_entries(&source)?;
    let pages = paginate(
        &entries,
        cfg.output.page_size,
        generators,
        &cfg.transform,
    )?;

    let written = write_exports(&pages, &cfg.output, day)?;

    Ok(ConvertOutcome {
        source,
        entries: entries.len(),
        written,
    })
}

pub fn run(opts: &ConvertOptions, cfg: &ExportConfig) -> Result<CommandReport> {
    let mut report = CommandReport::new("convert");
    let generators = Generators::with_stable_ids(cfg.stable_ids);
    let outcome = convert(&opts.source, cfg, &generators, Local::now().date_naive())?;

    report.detail(format!("source={}", outcome.source.display()));
    report.detail(format!("entries={}", outcome.entries));
    if outcome.written.is_empty() {
        report.issue("source contains no entries; nothing was written");
    }
    for path in outcome.written {
        report.output(path);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dayone::transform::test_support::sequence_generators;
    use std::fs;
    use tempfile::tempdir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 12, 20).expect("date")
    }

    fn config_in(dir: &Path) -> ExportConfig {
        let mut cfg = ExportConfig::default();
        cfg.output.export_dir = dir.join("exports");
        cfg
    }

    #[test]
    fn converts_a_csv_file() {
        let tmp = tempdir().expect("tempdir");
        let csv = tmp.path().join("daylio_export.csv");
        fs::write(
            &csv,
            "full_date,date,weekday,time,mood,activities,note_title,note\n\
             2023-12-17,Dec 17,Sunday,08:00,good,activity 1 | home,,note text 1\n\
             2023-12-16,Dec 16,Saturday,20:15,rad,,title,note text 2\n",
        )
        .expect("write csv");

        let cfg = config_in(tmp.path());
        let outcome = convert(&csv, &cfg, &sequence_generators(), day()).expect("convert");
        assert_eq!(outcome.entries, 2);
        assert_eq!(
            outcome.written,
            vec![tmp.path().join("exports/export-20231220.zip")]
        );
    }

    #[test]
    fn rerun_on_the_same_day_keeps_the_first_archive() {
        let tmp = tempdir().expect("tempdir");
        let csv = tmp.path().join("daylio_export.csv");
        fs::write(
            &csv,
            "full_date,date,weekday,time,mood,activities,note_title,note\n\
             2023-12-17,Dec 17,Sunday,08:00,good,,,note text 1\n",
        )
        .expect("write csv");

        let cfg = config_in(tmp.path());
        let first = convert(&csv, &cfg, &sequence_generators(), day()).expect("first run");
        let second = convert(&csv, &cfg, &sequence_generators(), day()).expect("second run");
        assert_eq!(
            first.written,
            vec![tmp.path().join("exports/export-20231220.zip")]
        );
        assert_eq!(
            second.written,
            vec![tmp.path().join("exports/export-20231220_2.zip")]
        );
        assert!(first.written[0].exists());
    }

    #[test]
    fn failing_entry_writes_nothing() {
        let tmp = tempdir().expect("tempdir");
        let csv = tmp.path().join("daylio_export.csv");
        fs::write(
            &csv,
            "full_date,date,weekday,time,mood,activities,note_title,note\n\
             2023-12-17,Dec 17,Sunday,08:00,good,,,ok\n\
             2023-12-16,Dec 16,Saturday,late,rad,,,broken\n",
        )
        .expect("write csv");

        let cfg = config_in(tmp.path());
        let err = convert(&csv, &cfg, &sequence_generators(), day()).unwrap_err();
        assert_eq!(err.to_string(), "failed to convert entry 2 (2023-12-16 late)");
        assert!(!cfg.output.export_dir.exists());
    }

    #[test]
    fn missing_source_is_reported_with_its_path() {
        let tmp = tempdir().expect("tempdir");
        let missing = tmp.path().join("nope.csv");
        let cfg = config_in(tmp.path());
        let err = convert(&missing, &cfg, &sequence_generators(), day()).unwrap_err();
        assert_eq!(err.to_string(), format!("failed to open {}", missing.display()));
    }
}
