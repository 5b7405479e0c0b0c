//! End-to-end tests for song generation against a mock generation API
//!
//! Drives the real HTTP provider, session fallback and reply parsing.

mod common;

use common::{MockGemini, MockReply, QUALITY_MODEL, SONG_REPLY, SPEED_MODEL, TEST_API_KEY};
use std::sync::Arc;
use std::time::Duration;
use sumini_studio::settings::{
    GenerationUpdate, JsonFilePersistence, MemoryPersistence, ModelPreference,
};
use sumini_studio::{
    AppSettings, GenerationSession, GeneratorMode, LlmError, ModelTier, SettingsStore,
    SettingsUpdate, SongRequest, Songwriter,
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn songwriter(server: &MockGemini) -> Songwriter {
    Songwriter::new(GenerationSession::new(server.model_tiers()).with_timeout(Duration::from_secs(5)))
}

fn request(prompt: &str) -> SongRequest {
    SongRequest {
        prompt: prompt.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_generate_song_on_quality_tier() {
    let server = MockGemini::spawn().await;
    server.script(QUALITY_MODEL, vec![MockReply::text(SONG_REPLY)]);
    let mut writer = songwriter(&server);

    let draft = writer
        .write_song(
            &request("caravan under neon"),
            &AppSettings::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(draft.tier, ModelTier::Quality);
    assert_eq!(draft.model, QUALITY_MODEL);
    assert!(!draft.fell_back);

    let song = draft.song.unwrap();
    assert_eq!(song.title, "Neon Caravan");
    assert_eq!(song.voice, "Raspy male lead with a whispered hook");
    assert_eq!(song.tags, vec!["Mahraganat", "Synthwave", "Autotune", "128bpm"]);
    assert!(song.lyrics.starts_with("[Intro]"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent.api_key.as_deref(), Some(TEST_API_KEY));
    assert!(!sent.uses_search());
    assert!(sent.last_user_text().contains("caravan under neon"));
    assert!(sent
        .system_instruction()
        .unwrap()
        .contains("--- BLOCK 3: LYRICS ---"));
}

#[tokio::test]
async fn test_server_error_falls_back_to_speed_tier_without_search() {
    let server = MockGemini::spawn().await;
    server.script(QUALITY_MODEL, vec![MockReply::Status(500)]);
    server.script(SPEED_MODEL, vec![MockReply::text(SONG_REPLY)]);
    let mut writer = songwriter(&server);
    let trending = SongRequest {
        mode: GeneratorMode::Trending,
        ..Default::default()
    };

    let draft = writer
        .write_song(&trending, &AppSettings::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(draft.fell_back);
    assert_eq!(draft.tier, ModelTier::Speed);
    assert!(draft.song.is_some());

    let primary = server.requests_for(QUALITY_MODEL);
    let fallback = server.requests_for(SPEED_MODEL);
    assert_eq!(primary.len(), 1);
    assert_eq!(fallback.len(), 1);
    assert!(primary[0].uses_search());
    assert!(!fallback[0].uses_search());
    assert_eq!(primary[0].last_user_text(), fallback[0].last_user_text());
}

#[tokio::test]
async fn test_both_tiers_failing_surfaces_second_error() {
    let server = MockGemini::spawn().await;
    server.script(QUALITY_MODEL, vec![MockReply::Status(503)]);
    server.script(SPEED_MODEL, vec![MockReply::Status(429)]);
    let mut writer = songwriter(&server);

    let result = writer
        .write_song(&request("x"), &AppSettings::default(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(LlmError::RateLimited)));
    assert_eq!(server.requests().len(), 2);
    assert!(writer.session().history().is_empty());
}

#[tokio::test]
async fn test_cancellation_skips_fallback() {
    let server = MockGemini::spawn().await;
    server.script(QUALITY_MODEL, vec![MockReply::Hang]);
    server.script(SPEED_MODEL, vec![MockReply::text(SONG_REPLY)]);
    let mut writer = songwriter(&server);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let result = writer
        .write_song(&request("x"), &AppSettings::default(), &cancel)
        .await;

    assert!(matches!(result, Err(LlmError::Cancelled)));
    assert!(server.requests_for(SPEED_MODEL).is_empty());
}

#[tokio::test]
async fn test_speed_preference_and_temperature_are_sent() {
    let server = MockGemini::spawn().await;
    server.script(SPEED_MODEL, vec![MockReply::text(SONG_REPLY)]);
    let mut writer = songwriter(&server);

    let mut store = SettingsStore::open(Arc::new(MemoryPersistence::new()));
    store.update(&SettingsUpdate::generation(GenerationUpdate {
        model_preference: Some(ModelPreference::Speed),
        temperature: Some(0.5),
    }));

    let draft = writer
        .write_song(&request("x"), store.settings(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(draft.tier, ModelTier::Speed);
    assert!(!draft.fell_back);
    let sent = server.requests_for(SPEED_MODEL);
    assert_eq!(sent.len(), 1);
    assert!((sent[0].temperature() - 0.5).abs() < 1e-6);
    assert!(server.requests_for(QUALITY_MODEL).is_empty());
}

#[tokio::test]
async fn test_second_turn_carries_history() {
    let server = MockGemini::spawn().await;
    server.script(
        QUALITY_MODEL,
        vec![MockReply::text(SONG_REPLY), MockReply::text(SONG_REPLY)],
    );
    let mut writer = songwriter(&server);
    let settings = AppSettings::default();
    let cancel = CancellationToken::new();

    writer
        .write_song(&request("first idea"), &settings, &cancel)
        .await
        .unwrap();
    writer
        .write_song(&request("make it darker"), &settings, &cancel)
        .await
        .unwrap();

    let requests = server.requests();
    let contents = requests[1].body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(writer.session().history().len(), 4);
}

#[tokio::test]
async fn test_unformatted_reply_keeps_raw_text() {
    let server = MockGemini::spawn().await;
    server.script(
        QUALITY_MODEL,
        vec![MockReply::text("Sorry, I can only write songs about cats.")],
    );
    let mut writer = songwriter(&server);

    let draft = writer
        .write_song(&request("x"), &AppSettings::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(draft.song.is_none());
    assert_eq!(draft.raw_text, "Sorry, I can only write songs about cats.");
}

#[tokio::test]
async fn test_video_prompt_and_ping() {
    let server = MockGemini::spawn().await;
    server.script(QUALITY_MODEL, vec![MockReply::text(SONG_REPLY)]);
    server.script(
        SPEED_MODEL,
        vec![MockReply::text("Drone shot over glowing dunes at night.\n")],
    );
    let mut writer = songwriter(&server);
    let settings = AppSettings::default();

    let draft = writer
        .write_song(&request("x"), &settings, &CancellationToken::new())
        .await
        .unwrap();
    let song = draft.song.unwrap();
    let video = writer.video_prompt(&song).await.unwrap();
    let song = song.with_video_prompt(video);

    assert_eq!(
        song.video_prompt.as_deref(),
        Some("Drone shot over glowing dunes at night.")
    );
    let helper = &server.requests_for(SPEED_MODEL)[0];
    assert!(helper.last_user_text().contains("Neon Caravan"));

    assert!(writer.ping(&settings).await.is_ok());
}

#[test]
fn test_settings_file_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs/sumini_settings.json");

    {
        let mut store = SettingsStore::open(Arc::new(JsonFilePersistence::new(&path)));
        store.update(&SettingsUpdate::generation(GenerationUpdate {
            model_preference: Some(ModelPreference::Speed),
            temperature: Some(1.4),
        }));
    }

    let store = SettingsStore::open(Arc::new(JsonFilePersistence::new(&path)));
    assert_eq!(
        store.settings().generation.model_preference,
        ModelPreference::Speed
    );
    assert!((store.settings().generation.temperature - 1.4).abs() < 1e-6);
    assert!(store.settings().ui.sound_enabled);
}

#[test]
fn test_corrupt_settings_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sumini_settings.json");
    std::fs::write(&path, "{\"generation\": ").unwrap();

    let store = SettingsStore::open(Arc::new(JsonFilePersistence::new(&path)));
    assert_eq!(store.settings(), &AppSettings::default());
}
