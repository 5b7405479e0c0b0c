//! Sumini Studio Library
//!
//! Songwriting assistant core: prompt composition, generation sessions
//! against hosted language models, response parsing and user settings.

pub mod config;
pub mod llm;
pub mod session;
pub mod settings;
pub mod song;
pub mod songwriter;
pub mod studio;
pub mod ui;

// Re-export commonly used types for convenience
pub use llm::{GeminiProvider, LlmError, LlmProvider};
pub use session::{GenerationSession, ModelTier, ModelTiers};
pub use settings::{AppSettings, SettingsStore, SettingsUpdate};
pub use song::{parse_song, ParsedSong};
pub use songwriter::{SongDraft, SongRequest, Songwriter};
pub use studio::{compose_prompt, ComposedPrompt, GeneratorMode, LyricsLanguage, StudioSettings};
