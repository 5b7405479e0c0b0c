//! High level songwriting flow: compose, send, parse.

use crate::llm::{CompletionOptions, LlmError, LlmProvider, Message};
use crate::session::{GenerationSession, ModelTier};
use crate::settings::AppSettings;
use crate::song::{parse_song, ParsedSong};
use crate::studio::system_instruction::{enhance_style_request, video_prompt_request};
use crate::studio::{compose_prompt, GeneratorMode, LyricsLanguage, PromptInputs, StudioSettings};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Temperature used for short helper requests (video prompt, style polish).
const HELPER_TEMPERATURE: f32 = 1.0;

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct SongRequest {
    pub prompt: String,
    pub mode: GeneratorMode,
    pub studio: StudioSettings,
    pub language: LyricsLanguage,
    pub has_intro: bool,
    pub radio_edit: bool,
}

/// Result of one generation turn.
#[derive(Debug, Clone)]
pub struct SongDraft {
    /// The exact prompt that was sent.
    pub prompt: String,
    /// The model's raw reply.
    pub raw_text: String,
    /// Parsed song, absent when the reply did not follow the block format.
    pub song: Option<ParsedSong>,
    pub tier: ModelTier,
    pub model: String,
    pub fell_back: bool,
}

pub struct Songwriter {
    session: GenerationSession,
}

impl Songwriter {
    pub fn new(session: GenerationSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GenerationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GenerationSession {
        &mut self.session
    }

    /// Generate a song for `request` using the current settings.
    pub async fn write_song(
        &mut self,
        request: &SongRequest,
        settings: &AppSettings,
        cancel: &CancellationToken,
    ) -> Result<SongDraft, LlmError> {
        let composed = compose_prompt(&PromptInputs {
            prompt: &request.prompt,
            mode: request.mode,
            studio: &request.studio,
            language: request.language,
            has_intro: request.has_intro,
            radio_edit: request.radio_edit,
        });

        let reply = self
            .session
            .send(&composed, &settings.generation, cancel)
            .await?;

        let raw_text = reply.text().to_string();
        let song = parse_song(&raw_text);
        info!(
            model = %reply.model,
            fell_back = reply.fell_back,
            parsed = song.is_some(),
            "Generation turn finished"
        );

        Ok(SongDraft {
            prompt: composed.text,
            raw_text,
            song,
            tier: reply.tier,
            model: reply.model,
            fell_back: reply.fell_back,
        })
    }

    /// Ask the speed tier for a short music video prompt. Failures are
    /// logged and yield `None`.
    pub async fn video_prompt(&self, song: &ParsedSong) -> Option<String> {
        let request = video_prompt_request(&song.title, &song.style, &song.lyrics);
        match self.helper_completion(request).await {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                error!(error = %e, "Video prompt generation failed");
                None
            }
        }
    }

    /// Refine a rough idea into a style string.
    pub async fn enhance_style(&self, draft: &str) -> Result<String, LlmError> {
        self.helper_completion(enhance_style_request(draft))
            .await
            .inspect_err(|e| error!(error = %e, "Style enhancement failed"))
    }

    /// Check that the preferred tier is reachable and report latency.
    pub async fn ping(&self, settings: &AppSettings) -> Result<Duration, LlmError> {
        let tier = ModelTier::from(settings.generation.model_preference);
        let provider = self.session.tiers().provider(tier);
        let start = Instant::now();
        provider.health_check().await?;
        Ok(start.elapsed())
    }

    async fn helper_completion(&self, request: String) -> Result<String, LlmError> {
        let provider: &dyn LlmProvider = self.session.tiers().provider(ModelTier::Speed).as_ref();
        let options = CompletionOptions {
            temperature: HELPER_TEMPERATURE,
            ..Default::default()
        };
        let response = provider
            .complete(&[Message::user(request)], &options)
            .await?;
        Ok(response.text().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{ScriptedProvider, Step};
    use crate::session::ModelTiers;
    use crate::studio::VocalGender;

    const REPLY: &str = "--- BLOCK 1: META ---\n**Title:** Sand Kings\n\
        --- BLOCK 2: STYLE PROMPT ---\nMahraganat, Autotune, 100bpm\n\
        --- BLOCK 3: LYRICS ---\n[Intro]\nYalla";

    type Scripted = std::sync::Arc<ScriptedProvider>;

    fn songwriter(quality: Vec<Step>, speed: Vec<Step>) -> (Songwriter, Scripted, Scripted) {
        let quality = ScriptedProvider::new("pro", quality);
        let speed = ScriptedProvider::new("flash", speed);
        let session = GenerationSession::new(ModelTiers::new(quality.clone(), speed.clone()));
        (Songwriter::new(session), quality, speed)
    }

    #[tokio::test]
    async fn test_write_song_parses_reply() {
        let (mut writer, quality, _) = songwriter(vec![Step::Reply(REPLY.into())], vec![]);
        let mut request = SongRequest {
            prompt: "street anthem".to_string(),
            ..Default::default()
        };
        request.studio.vocal.gender = VocalGender::Male;

        let draft = writer
            .write_song(&request, &AppSettings::default(), &CancellationToken::new())
            .await
            .unwrap();

        let song = draft.song.unwrap();
        assert_eq!(song.title, "Sand Kings");
        assert_eq!(song.tags, vec!["Mahraganat", "Autotune", "100bpm"]);
        assert_eq!(draft.tier, ModelTier::Quality);
        assert!(draft.prompt.contains("street anthem"));
        assert!(draft.prompt.contains("Voice must be Male"));

        let sent = &quality.calls()[0].messages;
        assert_eq!(sent.last().unwrap().content, draft.prompt);
    }

    #[tokio::test]
    async fn test_unparseable_reply_keeps_raw_text() {
        let (mut writer, _, _) = songwriter(vec![Step::Reply("I'd rather not.".into())], vec![]);

        let draft = writer
            .write_song(
                &SongRequest::default(),
                &AppSettings::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(draft.song.is_none());
        assert_eq!(draft.raw_text, "I'd rather not.");
    }

    #[tokio::test]
    async fn test_trending_request_searches_on_primary_only() {
        let (mut writer, quality, speed) = songwriter(
            vec![Step::Fail(LlmError::RateLimited)],
            vec![Step::Reply(REPLY.into())],
        );
        let request = SongRequest {
            mode: GeneratorMode::Trending,
            ..Default::default()
        };

        let draft = writer
            .write_song(&request, &AppSettings::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(draft.fell_back);
        assert!(quality.calls()[0].web_search);
        assert!(!speed.calls()[0].web_search);
    }

    #[tokio::test]
    async fn test_video_prompt_uses_speed_tier() {
        let (writer, quality, speed) = songwriter(
            vec![],
            vec![Step::Reply("  Cinematic shot of a desert rave.  ".into())],
        );
        let song = parse_song(REPLY).unwrap();

        let prompt = writer.video_prompt(&song).await;
        assert_eq!(prompt.as_deref(), Some("Cinematic shot of a desert rave."));
        assert!(quality.calls().is_empty());
        assert!(speed.calls()[0].messages[0].content.contains("Sand Kings"));
    }

    #[tokio::test]
    async fn test_video_prompt_failure_is_none() {
        let (writer, _, _) = songwriter(vec![], vec![Step::Fail(LlmError::Timeout)]);
        let song = parse_song(REPLY).unwrap();
        assert!(writer.video_prompt(&song).await.is_none());
    }

    #[tokio::test]
    async fn test_enhance_style_propagates_errors() {
        let (writer, _, _) = songwriter(
            vec![],
            vec![
                Step::Reply("Lo-fi Hip Hop, Rain, 80bpm\n".into()),
                Step::Fail(LlmError::RateLimited),
            ],
        );

        assert_eq!(
            writer.enhance_style("rainy beats").await.unwrap(),
            "Lo-fi Hip Hop, Rain, 80bpm"
        );
        assert!(matches!(
            writer.enhance_style("again").await,
            Err(LlmError::RateLimited)
        ));
    }
}
