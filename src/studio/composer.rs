//! Turns a user prompt plus studio knobs into the final model instruction.

use super::{
    GeneratorMode, LyricsLanguage, Mood, SongStructure, StudioSettings, Vocal, VocalGender,
    VocalTexture, MOOD_HIGH_THRESHOLD, MOOD_LOW_THRESHOLD,
};

const DARK: &str = "Dark, Moody, Minor Key";
const BRIGHT: &str = "Bright, Uplifting, Major Key";
const CLEAN: &str = "Clean, Polished, High-Fidelity";
const GRITTY: &str = "Gritty, Lo-fi, Distorted, Saturated";
const CHILL: &str = "Chill, Laid-back, Ambient";
const HYPE: &str = "High Energy, Hype, Aggressive, Banger";

/// Tone line used when every slider sits in the neutral band.
pub const BALANCED_TONE: &str = "Balanced";

const SETTINGS_HEADER: &str = "=== STUDIO SETTINGS ===";
const INTRO_LINE: &str = "Start with [Instrumental Intro]";
const RADIO_EDIT_LINE: &str = "Keep length under 3:00 (Radio Edit)";

/// Everything the composer needs for one request.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    /// Free-text prompt typed by the user. Replaced by the mode's base
    /// instruction for every mode except `Normal`.
    pub prompt: &'a str,
    pub mode: GeneratorMode,
    pub studio: &'a StudioSettings,
    pub language: LyricsLanguage,
    pub has_intro: bool,
    pub radio_edit: bool,
}

/// The instruction sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub text: String,
    /// Whether the request should enable web search grounding.
    pub web_search: bool,
}

/// Maps one slider to the phrase for its side, or nothing inside the
/// neutral band.
fn slider_phrase(value: u8, low: &'static str, high: &'static str) -> Option<&'static str> {
    if value < MOOD_LOW_THRESHOLD {
        Some(low)
    } else if value > MOOD_HIGH_THRESHOLD {
        Some(high)
    } else {
        None
    }
}

/// Descriptor phrases fired by the mood sliders, in fixed axis order.
pub fn mood_descriptors(mood: &Mood) -> Vec<&'static str> {
    [
        slider_phrase(mood.dark_bright, DARK, BRIGHT),
        slider_phrase(mood.clean_gritty, CLEAN, GRITTY),
        slider_phrase(mood.energy, CHILL, HYPE),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn tone_line(mood: &Mood) -> String {
    let phrases = mood_descriptors(mood);
    if phrases.is_empty() {
        BALANCED_TONE.to_string()
    } else {
        phrases.join(", ")
    }
}

fn vocal_constraint(vocal: &Vocal) -> Option<String> {
    if vocal.gender == VocalGender::Any && vocal.texture == VocalTexture::Any {
        return None;
    }
    let words: Vec<&str> = [
        (vocal.texture != VocalTexture::Any).then(|| vocal.texture.label()),
        (vocal.gender != VocalGender::Any).then(|| vocal.gender.label()),
    ]
    .into_iter()
    .flatten()
    .collect();
    Some(format!("[CONSTRAINT: Voice must be {}]", words.join(" ")))
}

fn structure_constraint(structure: SongStructure) -> Option<String> {
    if structure == SongStructure::Auto {
        return None;
    }
    Some(format!(
        "[CONSTRAINT: Use strict {} structure template]",
        structure.label()
    ))
}

/// Build the final prompt.
///
/// Line order is fixed: base instruction, tone, vocal constraint, structure
/// constraint, language, intro, radio edit. Optional lines are omitted
/// entirely when they do not apply.
pub fn compose_prompt(inputs: &PromptInputs<'_>) -> ComposedPrompt {
    let base = inputs
        .mode
        .base_instruction()
        .unwrap_or(inputs.prompt)
        .trim_end();

    let mut lines: Vec<String> = vec![
        SETTINGS_HEADER.to_string(),
        format!("Tone: {}", tone_line(&inputs.studio.mood)),
    ];
    lines.extend(vocal_constraint(&inputs.studio.vocal));
    lines.extend(structure_constraint(inputs.studio.structure));
    lines.push(format!("Language: {}", inputs.language.directive()));
    if inputs.has_intro {
        lines.push(INTRO_LINE.to_string());
    }
    if inputs.radio_edit {
        lines.push(RADIO_EDIT_LINE.to_string());
    }

    ComposedPrompt {
        text: format!("{}\n\n{}\n", base, lines.join("\n")),
        web_search: inputs.mode.uses_web_search(),
    }
}
