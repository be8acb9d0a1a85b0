use std::sync::LazyLock;

use regex::Regex;

/// Tried in order; the first capture wins.
const VIDEO_ID_PATTERNS: &[&str] = &[
    r"youtube\.com/watch\?v=([^&?#/\s]+)",
    r"youtu\.be/([^&?#/\s]+)",
    r"youtube\.com/embed/([^&?#/\s]+)",
];

/// `hqdefault` exists for every video; `maxresdefault` is sometimes missing.
const THUMBNAIL_URL: &str = "https://img.youtube.com/vi/{id}/hqdefault.jpg";

static VIDEO_ID_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    VIDEO_ID_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

pub fn video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    VIDEO_ID_RES
        .iter()
        .find_map(|re| re.captures(url))
        .map(|c| c[1].to_string())
}

pub fn thumbnail(url: &str) -> Option<String> {
    let id = video_id(url)?;
    Some(THUMBNAIL_URL.replace("{id}", &id))
}
