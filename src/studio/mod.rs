//! Studio parameters: the musical knobs a user turns before generating.

mod composer;
pub mod system_instruction;

pub use composer::{compose_prompt, mood_descriptors, ComposedPrompt, PromptInputs};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the neutral band of a mood slider.
pub const MOOD_LOW_THRESHOLD: u8 = 30;
/// Upper bound of the neutral band of a mood slider.
pub const MOOD_HIGH_THRESHOLD: u8 = 70;

/// Mood sliders, each from 0 to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    /// 0 = dark, 100 = bright.
    pub dark_bright: u8,
    /// 0 = clean, 100 = gritty.
    pub clean_gritty: u8,
    /// 0 = chill, 100 = hype.
    pub energy: u8,
}

impl Default for Mood {
    fn default() -> Self {
        Self {
            dark_bright: 50,
            clean_gritty: 50,
            energy: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum VocalGender {
    #[default]
    Any,
    Male,
    Female,
    Duet,
    Choir,
    #[serde(rename = "AI/Robotic")]
    #[value(name = "ai-robotic")]
    AiRobotic,
}

impl VocalGender {
    pub fn label(&self) -> &'static str {
        match self {
            VocalGender::Any => "Any",
            VocalGender::Male => "Male",
            VocalGender::Female => "Female",
            VocalGender::Duet => "Duet",
            VocalGender::Choir => "Choir",
            VocalGender::AiRobotic => "AI/Robotic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum VocalTexture {
    #[default]
    Any,
    Airy,
    Raspy,
    #[serde(rename = "Auto-Tuned")]
    AutoTuned,
    Operatic,
    Screaming,
    Whisper,
    Robotic,
}

impl VocalTexture {
    pub fn label(&self) -> &'static str {
        match self {
            VocalTexture::Any => "Any",
            VocalTexture::Airy => "Airy",
            VocalTexture::Raspy => "Raspy",
            VocalTexture::AutoTuned => "Auto-Tuned",
            VocalTexture::Operatic => "Operatic",
            VocalTexture::Screaming => "Screaming",
            VocalTexture::Whisper => "Whisper",
            VocalTexture::Robotic => "Robotic",
        }
    }
}

/// Vocal constraints. `Any` on both fields means no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vocal {
    pub gender: VocalGender,
    pub texture: VocalTexture,
}

/// Song structure template. `Auto` lets the model decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum SongStructure {
    #[default]
    Auto,
    #[serde(rename = "Pop Standard")]
    PopStandard,
    #[serde(rename = "Rap/Trap")]
    RapTrap,
    #[serde(rename = "EDM/Club")]
    EdmClub,
    #[serde(rename = "Rock/Metal")]
    RockMetal,
    #[serde(rename = "Linear/Prog")]
    LinearProg,
    Mahraganat,
    #[serde(rename = "Lo-fi Loop")]
    LofiLoop,
}

impl SongStructure {
    pub fn label(&self) -> &'static str {
        match self {
            SongStructure::Auto => "Auto",
            SongStructure::PopStandard => "Pop Standard",
            SongStructure::RapTrap => "Rap/Trap",
            SongStructure::EdmClub => "EDM/Club",
            SongStructure::RockMetal => "Rock/Metal",
            SongStructure::LinearProg => "Linear/Prog",
            SongStructure::Mahraganat => "Mahraganat",
            SongStructure::LofiLoop => "Lo-fi Loop",
        }
    }
}

/// The full set of studio knobs for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudioSettings {
    pub mood: Mood,
    pub vocal: Vocal,
    pub structure: SongStructure,
}

/// Generation strategy, selecting the base instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneratorMode {
    /// Use the caller's own prompt.
    #[default]
    Normal,
    Random,
    #[value(name = "experimental-hybrid")]
    ExperimentalHybrid,
    #[value(name = "k-pop-random")]
    KpopRandom,
    #[value(name = "k-pop-trio")]
    KpopTrio,
    Trending,
}

impl GeneratorMode {
    /// Base instruction replacing the user prompt, if this mode has one.
    pub fn base_instruction(&self) -> Option<&'static str> {
        match self {
            GeneratorMode::Normal => None,
            GeneratorMode::Random => Some(
                "Create a random commercially-strong hit in any coherent genre. Extremely catchy hooks.",
            ),
            GeneratorMode::ExperimentalHybrid => Some(
                "Create an experimental hybrid song combining incompatible genres (e.g., Opera + Dubstep).",
            ),
            GeneratorMode::KpopRandom => {
                Some("Create a top-tier K-Pop track with strong English hooks.")
            }
            GeneratorMode::KpopTrio => Some(
                "Create a K-Pop trio track. In 'Voice Description', list 3 distinct styles. In 'Lyrics', STRICTLY use tags like [Member A], [Member B].",
            ),
            GeneratorMode::Trending => Some(
                "Search for current viral music trends (2024-2025). Write a hit song referencing the trend.",
            ),
        }
    }

    /// Whether requests in this mode should be grounded with web search.
    pub fn uses_web_search(&self) -> bool {
        matches!(self, GeneratorMode::Trending)
    }
}

/// Target language of the lyrics. Structural tags always stay English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum LyricsLanguage {
    #[default]
    English,
    Arabic,
    #[serde(rename = "Mixed (Arabic/English)")]
    Mixed,
}

impl LyricsLanguage {
    /// Language directive added to every prompt.
    pub fn directive(&self) -> &'static str {
        match self {
            LyricsLanguage::English => {
                "Write lyrics in English only. Style & Tags must remain ENGLISH."
            }
            LyricsLanguage::Arabic => {
                "Write lyrics strictly in ARABIC (Egyptian/Gulf dialect). Style & Tags must remain ENGLISH."
            }
            LyricsLanguage::Mixed => {
                "Write lyrics in mixed Arabic + English. Style & Tags remain ENGLISH."
            }
        }
    }
}

impl fmt::Display for LyricsLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LyricsLanguage::English => "English",
            LyricsLanguage::Arabic => "Arabic",
            LyricsLanguage::Mixed => "Mixed (Arabic/English)",
        };
        f.write_str(label)
    }
}
