//! Structured songs decoded from model replies.

mod parser;

pub use parser::{
    extract, parse_song, LYRICS_MARKER, META_END_MARKER, META_MARKER, STYLE_END_MARKER,
    STYLE_MARKER,
};

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_VOICE: &str = "Not specified";

/// A song decoded from a three-block model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSong {
    pub title: String,
    pub voice: String,
    /// Raw style string as written by the model.
    pub style: String,
    /// `style` split on commas, trimmed, empty pieces dropped.
    pub tags: Vec<String>,
    pub lyrics: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_prompt: Option<String>,
}

impl ParsedSong {
    /// Parse an optional reply; a missing reply has no song.
    pub fn from_reply(reply: Option<&str>) -> Option<Self> {
        reply.and_then(parse_song)
    }

    /// Attach a video prompt produced after the song itself.
    pub fn with_video_prompt(mut self, video_prompt: impl Into<String>) -> Self {
        self.video_prompt = Some(video_prompt.into());
        self
    }
}

/// Split a style string into tags.
pub fn split_tags(style: &str) -> Vec<String> {
    style
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
