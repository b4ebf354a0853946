use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use predicates::prelude::*;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn cmd_in(workdir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("daylio-export");
    cmd.current_dir(workdir)
        .env("DAYLIO_EXPORT_HOME", workdir)
        .env("DAYLIO_EXPORT_DIR", workdir.join("exports"))
        .env("TZ", "America/Chicago")
        .env("LOG_LEVEL", "warn")
        .env_remove("NO_ALONE_TIME_SCORING")
        .env_remove("NO_AUTO_HOME_LOCATION")
        .env_remove("HOME_ADDRESS_JSON")
        .env_remove("DAYONE_JOURNAL_NAME")
        .env_remove("DAYONE_PAGE_SIZE")
        .env_remove("DAYONE_STABLE_IDS");
    cmd
}

fn exported_archives(dir: &Path) -> Vec<PathBuf> {
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<_> = read.map(|e| e.expect("dir entry").path()).collect();
    paths.sort();
    paths
}

fn read_journal(archive: &Path, journal: &str) -> serde_json::Value {
    let file = fs::File::open(archive).expect("open archive");
    let mut zip = zip::ZipArchive::new(file).expect("zip");
    assert_eq!(zip.len(), 1);
    let mut member = zip.by_name(&format!("{journal}.json")).expect("journal member");
    let mut raw = String::new();
    member.read_to_string(&mut raw).expect("read member");
    serde_json::from_str(&raw).expect("journal json")
}

fn write_backup(path: &Path, json: &str) {
    let encoded = STANDARD.encode(json);
    let wrapped = encoded
        .as_bytes()
        .chunks(76)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join("\r\n");
    let mut zw = zip::ZipWriter::new(fs::File::create(path).expect("create backup"));
    zw.start_file("backup.daylio", SimpleFileOptions::default())
        .expect("start member");
    zw.write_all(wrapped.as_bytes()).expect("write member");
    zw.finish().expect("finish backup");
}

#[test]
fn converts_csv_export_into_a_day_one_archive() {
    let tmp = tempdir().expect("tempdir");
    let home = fs::read_to_string(Path::new(FIXTURES).join("home_location.json"))
        .expect("home fixture");

    cmd_in(tmp.path())
        .env("HOME_ADDRESS_JSON", home)
        .arg(Path::new(FIXTURES).join("daylio.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("export-").and(predicate::str::contains(".zip")));

    let archives = exported_archives(&tmp.path().join("exports"));
    assert_eq!(archives.len(), 1);
    let journal = read_journal(&archives[0], "From Daylio");
    assert_eq!(journal["metadata"]["Version"], "1.0");

    let entries = journal["Entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["creationDate"], "2023-12-17T08:00Z");
    assert_eq!(entries[0]["text"], "note title\n\nnote text 1");
    assert_eq!(entries[0]["timeZone"], "America/Chicago");
    assert_eq!(
        entries[0]["tags"],
        serde_json::json!(["activity 1", "home", "alone score: 2"])
    );
    assert_eq!(entries[0]["location"]["placeName"], "Home");
    assert_eq!(entries[1]["text"], "Note\n\nnote text 2");
    assert_eq!(
        entries[1]["tags"],
        serde_json::json!(["activity 2", "alone score: 1"])
    );
    assert!(entries[1].get("location").is_none());
    assert_eq!(entries[2]["tags"], serde_json::json!([]));

    let id = entries[0]["uuid"].as_str().expect("uuid");
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
}

#[test]
fn quirk_switches_are_honored() {
    let tmp = tempdir().expect("tempdir");
    cmd_in(tmp.path())
        .env("NO_ALONE_TIME_SCORING", "1")
        .env("NO_AUTO_HOME_LOCATION", "1")
        .env("DAYONE_JOURNAL_NAME", "Mood Log")
        .arg(Path::new(FIXTURES).join("daylio.csv"))
        .assert()
        .success();

    let archives = exported_archives(&tmp.path().join("exports"));
    let journal = read_journal(&archives[0], "Mood Log");
    let first = &journal["Entries"][0];
    assert_eq!(first["tags"], serde_json::json!(["activity 1", "home", "Yes!"]));
    assert!(first.get("location").is_none());
}

#[test]
fn converts_a_daylio_backup_archive() {
    let tmp = tempdir().expect("tempdir");
    let backup = tmp.path().join("2023_12_20_ios_backup.daylio");
    write_backup(
        &backup,
        r#"{
            "tags": [{"id": 1, "name": "reading"}, {"id": 2, "name": "home"}],
            "dayEntries": [
                {"note": "quiet day", "note_title": "", "datetime": 1702800000, "tags": [2, 1], "mood": 1}
            ]
        }"#,
    );

    cmd_in(tmp.path()).arg(&backup).assert().success();

    let archives = exported_archives(&tmp.path().join("exports"));
    assert_eq!(archives.len(), 1);
    let journal = read_journal(&archives[0], "From Daylio");
    let entry = &journal["Entries"][0];
    assert_eq!(entry["creationDate"], "2023-12-17T08:00Z");
    assert_eq!(entry["tags"], serde_json::json!(["home", "reading"]));
    assert_eq!(entry["text"], "Note\n\nquiet day");
}

#[test]
fn directory_argument_picks_the_newest_backup() {
    let tmp = tempdir().expect("tempdir");
    let backups = tmp.path().join("Downloads");
    fs::create_dir_all(&backups).expect("mkdir");
    write_backup(
        &backups.join("2023_12_20_ios_backup.daylio"),
        r#"{"tags": [], "dayEntries": [{"note": "only", "datetime": 1702800000, "mood": 2}]}"#,
    );
    fs::write(backups.join("notes.txt"), "not a backup").expect("write decoy");

    cmd_in(tmp.path()).arg(&backups).assert().success();
    let archives = exported_archives(&tmp.path().join("exports"));
    let journal = read_journal(&archives[0], "From Daylio");
    assert_eq!(journal["Entries"][0]["text"], "Note\n\nonly");
}

#[test]
fn invalid_mood_code_leaves_no_output() {
    let tmp = tempdir().expect("tempdir");
    let backup = tmp.path().join("broken_ios_backup.daylio");
    write_backup(
        &backup,
        r#"{"tags": [], "dayEntries": [
            {"note": "fine", "datetime": 1702800000, "mood": 1},
            {"note": "broken", "datetime": 1702713600, "mood": 6}
        ]}"#,
    );

    cmd_in(tmp.path())
        .arg(&backup)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: not a valid Daylio mood ID: 6"));
    assert!(exported_archives(&tmp.path().join("exports")).is_empty());
}

#[test]
fn empty_csv_reports_nothing_written() {
    let tmp = tempdir().expect("tempdir");
    let csv = tmp.path().join("empty.csv");
    fs::write(
        &csv,
        "full_date,date,weekday,time,mood,activities,note_title,note\n",
    )
    .expect("write csv");

    cmd_in(tmp.path())
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing was written"));
    assert!(exported_archives(&tmp.path().join("exports")).is_empty());
}

#[test]
fn version_flag_prints_version_and_commit() {
    let tmp = tempdir().expect("tempdir");
    for flag in ["-v", "--version"] {
        cmd_in(tmp.path())
            .arg(flag)
            .assert()
            .success()
            .stdout(
                predicate::str::starts_with(format!(
                    "daylio-export version {}",
                    env!("CARGO_PKG_VERSION")
                ))
                .and(predicate::str::contains(", commit ")),
            );
    }
}

#[test]
fn missing_argument_prints_usage() {
    let tmp = tempdir().expect("tempdir");
    cmd_in(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_source_names_the_path() {
    let tmp = tempdir().expect("tempdir");
    cmd_in(tmp.path())
        .arg("does-not-exist.csv")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to open does-not-exist.csv"));
}
