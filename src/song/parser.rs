//! Block parser for three-block model replies.
//!
//! Parsing never fails loudly: a reply without style and lyrics simply has
//! no song, while a missing title or voice falls back to a placeholder.

use super::{split_tags, ParsedSong, DEFAULT_TITLE, DEFAULT_VOICE};
use lazy_static::lazy_static;
use regex::Regex;

pub const META_MARKER: &str = "--- BLOCK 1: META ---";
pub const META_END_MARKER: &str = "--- BLOCK 2";
pub const STYLE_MARKER: &str = "--- BLOCK 2: STYLE PROMPT ---";
pub const STYLE_END_MARKER: &str = "--- BLOCK 3";
pub const LYRICS_MARKER: &str = "--- BLOCK 3: LYRICS ---";

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"\*\*Title:\*\*\s*(.+)").unwrap();
    static ref VOICE_RE: Regex = Regex::new(r"\*\*Voice Description:\*\*\s*(.+)").unwrap();
}

/// Text between the first `start` marker and the next repeat of it (or the
/// end of text), cut at the first `end` marker if given, trimmed. Empty when
/// `start` does not occur.
pub fn extract<'a>(text: &'a str, start: &str, end: Option<&str>) -> &'a str {
    let Some((_, after)) = text.split_once(start) else {
        return "";
    };
    let after = after.split_once(start).map_or(after, |(piece, _)| piece);
    let body = match end {
        Some(end) => after.split_once(end).map_or(after, |(body, _)| body),
        None => after,
    };
    body.trim()
}

fn capture_line(re: &Regex, section: &str) -> Option<String> {
    re.captures(section)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Decode a reply into a song, or `None` when both style and lyrics are empty.
pub fn parse_song(text: &str) -> Option<ParsedSong> {
    if text.is_empty() {
        return None;
    }

    let meta = extract(text, META_MARKER, Some(META_END_MARKER));
    let style = extract(text, STYLE_MARKER, Some(STYLE_END_MARKER));
    let lyrics = extract(text, LYRICS_MARKER, None);

    if style.is_empty() && lyrics.is_empty() {
        return None;
    }

    Some(ParsedSong {
        title: capture_line(&TITLE_RE, meta).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        voice: capture_line(&VOICE_RE, meta).unwrap_or_else(|| DEFAULT_VOICE.to_string()),
        style: style.to_string(),
        tags: split_tags(style),
        lyrics: lyrics.to_string(),
        video_prompt: None,
    })
}
