use crate::config::QuirkConfig;
use crate::dayone::types::LocationBlock;

pub const HOME_TAG: &str = "home";

/// Maps the answers of a "time alone?" activity group onto a numeric tag.
pub fn resolve_alone_time_score(tag: &str, quirks: &QuirkConfig) -> Option<String> {
    if !quirks.alone_time_scoring {
        return None;
    }
    let score = match tag.to_lowercase().as_str() {
        "no" => 0,
        "a little bit" => 1,
        "yes!" => 2,
        _ => return None,
    };
    Some(format!("alone score: {score}"))
}

pub fn resolve_tag(tag: &str, quirks: &QuirkConfig) -> String {
    let trimmed = tag.trim();
    resolve_alone_time_score(trimmed, quirks).unwrap_or_else(|| trimmed.to_string())
}

pub fn resolve_home_location<S: AsRef<str>>(
    tags: &[S],
    quirks: &QuirkConfig,
) -> Option<LocationBlock> {
    if !quirks.auto_home_location {
        return None;
    }
    let Some(home) = &quirks.home_address else {
        tracing::warn!("auto home location is on but HOME_ADDRESS_JSON is empty");
        return None;
    };
    tags.iter()
        .any(|t| t.as_ref().trim() == HOME_TAG)
        .then(|| home.clone())
}
