//! Interface helpers that do not depend on a particular front-end.

pub mod help;
pub mod sound;

pub use help::{help_topic, HelpLanguage, HelpSection, HelpTopic};
pub use sound::{render_cue, AudioContext, AudioSink, SoundBoard, UiCue};
