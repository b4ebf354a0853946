use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::ExportError;

/// Day One's minute-precision timestamp layout. There is no seconds field.
pub const DAYONE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

pub const EXPORT_VERSION: &str = "1.0";

pub const RICH_TEXT_PLATFORM: &str = "com.bloombuilt.dayone-mac";
pub const RICH_TEXT_PLATFORM_VERSION: u32 = 1527;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOneDateTime(pub DateTime<Utc>);

impl DayOneDateTime {
    pub fn parse(raw: &str) -> Result<Self, ExportError> {
        NaiveDateTime::parse_from_str(raw, DAYONE_TIME_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| ExportError::InvalidTimestamp(raw.to_string()))
    }

    pub fn format(&self) -> String {
        self.0.format(DAYONE_TIME_FORMAT).to_string()
    }
}

impl From<DateTime<Utc>> for DayOneDateTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl Serialize for DayOneDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for DayOneDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOneExport {
    pub metadata: DayOneMetadata,
    #[serde(rename = "Entries")]
    pub entries: Vec<DayOneEntry>,
}

impl DayOneExport {
    pub fn new(entries: Vec<DayOneEntry>) -> Self {
        Self {
            metadata: DayOneMetadata::default(),
            entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOneMetadata {
    #[serde(rename = "Version")]
    pub version: String,
}

impl Default for DayOneMetadata {
    fn default() -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOneEntry {
    pub starred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationBlock>,
    pub creation_device_type: String,
    #[serde(rename = "creationOSName")]
    pub creation_os_name: String,
    #[serde(rename = "creationOSVersion")]
    pub creation_os_version: String,
    pub creation_date: DayOneDateTime,
    pub time_zone: String,
    pub tags: Vec<String>,
    pub duration: u32,
    pub creation_device_model: String,
    /// Opaque entry ID. Day One accepts any fixed-length token here, it does
    /// not have to be a UUID.
    pub uuid: String,
    pub is_all_day: bool,
    pub weather: BTreeMap<String, serde_json::Value>,
    pub modified_date: DayOneDateTime,
    pub rich_text: String,
    pub text: String,
    pub is_pinned: bool,
    pub creation_device: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocationBlock {
    pub location: LocationDetails,
    pub locality_name: String,
    pub country: String,
    pub time_zone_name: String,
    pub administrative_area: String,
    pub longitude: f64,
    pub place_name: String,
    pub latitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationDetails {
    pub region: LocationRegion,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRegion {
    pub radius: f64,
    pub center: Coordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextDocument {
    pub contents: Vec<RichTextBlock>,
    pub meta: RichTextMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextMeta {
    pub version: u32,
    #[serde(rename = "small-lines-removed")]
    pub small_lines_removed: bool,
    pub created: RichTextCreated,
}

impl Default for RichTextMeta {
    fn default() -> Self {
        Self {
            version: 1,
            small_lines_removed: false,
            created: RichTextCreated {
                platform: RICH_TEXT_PLATFORM.to_string(),
                version: RICH_TEXT_PLATFORM_VERSION,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextCreated {
    pub platform: String,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    pub text: String,
    pub attributes: RichTextAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextAttributes {
    pub line: RichTextLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextLine {
    pub header: u32,
    pub identifier: Uuid,
}
