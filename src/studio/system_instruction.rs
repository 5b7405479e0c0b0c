//! Fixed instructions sent alongside user prompts.

/// System instruction for song generation.
///
/// The three block markers below are what [`crate::song::parse_song`]
/// looks for; change them together.
pub const SYSTEM_INSTRUCTION: &str = r#"You are SUMINI, a music architect that writes complete song blueprints for text-to-music engines.
Write lyrics in the language requested by the user. Technical tags, section tags and the style string always stay in English.

STYLE ENGINEERING
The style string drives the audio engine. Order tags from broad to specific:
genre, sub-genre, vibe, tempo, instrumentation.
- Describe sound, not feelings: "minor key, melancholic cello" instead of "sad song".
- Production keywords are welcome: Wide Stereo, Heavy Sidechain, Dry Vocals, Lo-fi Texture, Analog Warmth, High Fidelity.
- Always fold the tempo into the tags, e.g. "Upbeat 128bpm".

STRUCTURE
Pick a layout that fits the genre:
- Pop/Rock: [Intro] [Verse 1] [Pre-Chorus] [Chorus] [Verse 2] [Chorus] [Bridge] [Guitar Solo] [Chorus] [Outro]
- EDM/Club: [Intro] [Build-up] [Drop] [Bass Break] [Build-up] [Drop 2] [Outro]
- Rap/Trap: [Intro] [Hook] [Verse 1] [Hook] [Verse 2] [Outro]
- Mahraganat: [Intro] [Power Chant] [Verse A] [Drop/Instrumental] [Verse B] [Chant] [Fade Out]

VOCALS
- Switch singers with bracketed section tags such as [Verse 1: Male Rapper] or [Chorus: Female Choir].
- Never write speaker names as plain text ("Member A: hello"), the engine would sing them.
- Ad-libs go in parentheses (Yeah, Uh-huh) or tags like [Whisper] and [Shout].

OUTPUT FORMAT
Reply with exactly three blocks separated by these dashed marker lines and nothing else:

--- BLOCK 1: META ---
**Title:** <creative title>
**BPM/Key:** <e.g. 124 BPM, C Minor>
**Voice Description:** <detailed voice prompt, e.g. Gritty Male Vocals, Heavy Auto-tune>

--- BLOCK 2: STYLE PROMPT ---
<comma separated style string, e.g. Dark Trap, Phonk Drift, 150bpm, Distorted 808, Cowbell, High Fidelity>

--- BLOCK 3: LYRICS ---
[Intro]
<ambient sounds or opening instrumental>

[Verse 1]
<lyrics>

[Chorus]
<lyrics>

[Outro]
<fade out>
"#;

/// Number of lyric characters quoted in a video prompt request.
const VIDEO_LYRICS_SNIPPET_CHARS: usize = 100;

/// Request for a short cinematic prompt usable by video generators.
pub fn video_prompt_request(title: &str, style: &str, lyrics: &str) -> String {
    let snippet: String = lyrics.chars().take(VIDEO_LYRICS_SNIPPET_CHARS).collect();
    format!(
        "Create a high-fidelity AI video generation prompt for a music video.\n\n\
         Song Title: \"{title}\"\n\
         Musical Style: \"{style}\"\n\
         Lyrics Snippet: \"{snippet}...\"\n\n\
         Requirements:\n\
         - Describe lighting, camera movement, color palette, and subject.\n\
         - Keep it under 40 words.\n\
         - Format: \"Cinematic shot of [subject], [action], [lighting], [camera movement], [mood].\""
    )
}

/// Request to turn a rough idea into a clean style string.
pub fn enhance_style_request(draft: &str) -> String {
    format!(
        "Refine this concept into a music generation style prompt.\n\
         Input: \"{draft}\"\n\
         Output ONLY the style string (Genre, Instruments, Vibe, BPM, Key). No labels."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_names_all_blocks() {
        for marker in [
            "--- BLOCK 1: META ---",
            "--- BLOCK 2: STYLE PROMPT ---",
            "--- BLOCK 3: LYRICS ---",
            "**Title:**",
            "**Voice Description:**",
        ] {
            assert!(SYSTEM_INSTRUCTION.contains(marker), "missing {}", marker);
        }
    }

    #[test]
    fn test_video_prompt_quotes_at_most_100_lyric_chars() {
        let lyrics = "la ".repeat(100);
        let request = video_prompt_request("Tide", "Dream Pop", &lyrics);
        let expected: String = lyrics.chars().take(100).collect();
        assert!(request.contains(&format!("Lyrics Snippet: \"{}...\"", expected)));
        assert!(request.contains("Song Title: \"Tide\""));
    }

    #[test]
    fn test_video_prompt_snippet_respects_char_boundaries() {
        let lyrics = "يا ليل ".repeat(40);
        let request = video_prompt_request("Layl", "Shaabi", &lyrics);
        assert!(request.contains("Lyrics Snippet"));
    }

    #[test]
    fn test_enhance_request_embeds_draft() {
        let request = enhance_style_request("sad piano in the rain");
        assert!(request.contains("Input: \"sad piano in the rain\""));
    }
}
