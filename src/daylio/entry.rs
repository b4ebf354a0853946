use serde::{Deserialize, Serialize};

pub const MOOD_RAD: &str = "rad";
pub const MOOD_GOOD: &str = "good";
pub const MOOD_OK: &str = "ok";
pub const MOOD_BAD: &str = "bad";
pub const MOOD_AWFUL: &str = "awful";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub full_date: String,
    pub date: String,
    pub weekday: String,
    pub time: String,
    pub mood: String,
    pub activities: Vec<String>,
    pub note_title: String,
    pub note: String,
}
