use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("not a valid Daylio mood ID: {0}")]
    InvalidMood(i64),
    #[error("tag ID not in Daylio backup: {0}")]
    UnknownTag(i64),
    #[error("no Daylio backup JSON found in file: {0}")]
    MissingBackupMember(String),
    #[error("no Daylio backups found in '{0}'")]
    NoBackupsFound(String),
    #[error("invalid entry timestamp `{0}`: expected YYYY-MM-DD and HH:MM")]
    InvalidTimestamp(String),
    #[error("entry ID generated twice in one export: {0}")]
    DuplicateEntryId(String),
    #[error("invalid page size {0}: require 1 <= page size <= {1}")]
    InvalidPageSize(usize, usize),
    #[error("HOME_ADDRESS_JSON is not a valid location: {0}")]
    InvalidHomeAddress(String),
}
