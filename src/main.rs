use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sumini_studio::config::{AppConfig, CliConfig, FileConfig};
use sumini_studio::settings::{
    export_file_name, DeveloperUpdate, GenerationUpdate, JsonFilePersistence, ModelPreference,
    SettingsUpdate, UiUpdate,
};
use sumini_studio::studio::{
    GeneratorMode, LyricsLanguage, Mood, SongStructure, StudioSettings, Vocal, VocalGender,
    VocalTexture,
};
use sumini_studio::ui::sound::{write_wav, DEFAULT_SAMPLE_RATE};
use sumini_studio::ui::{
    help_topic, render_cue, AudioContext, AudioSink, HelpLanguage, HelpSection, SoundBoard, UiCue,
};
use sumini_studio::{GenerationSession, SettingsStore, SongRequest, Songwriter};

mod cli_style;

fn parse_slider(s: &str) -> Result<u8, String> {
    let value: u8 = s.parse().map_err(|_| format!("not a number: {}", s))?;
    if value > 100 {
        return Err(format!("must be between 0 and 100, got {}", value));
    }
    Ok(value)
}

#[derive(Parser, Debug)]
#[command(name = "sumini", version, about = "AI songwriting studio", styles = cli_style::get_styles())]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the generation API.
    #[clap(long, global = true)]
    pub api_base_url: Option<String>,

    /// Model used for the quality tier.
    #[clap(long, global = true)]
    pub quality_model: Option<String>,

    /// Model used for the speed tier and helper requests.
    #[clap(long, global = true)]
    pub speed_model: Option<String>,

    /// Timeout in seconds for each model request.
    #[clap(long, global = true)]
    pub timeout_sec: Option<u64>,

    /// Path to the settings JSON file.
    #[clap(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a song.
    Generate(GenerateArgs),
    /// Turn a rough idea into a style prompt.
    Enhance {
        /// Draft description, e.g. "sad rainy night beats".
        draft: String,
    },
    /// Check that the preferred model tier answers.
    Ping,
    /// Inspect or change saved preferences.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Explain one group of studio controls.
    HelpTopic {
        section: HelpSection,
        #[clap(long, value_enum, default_value = "en")]
        lang: HelpLanguage,
    },
    /// Render an interface cue to a WAV file.
    Sound {
        cue: UiCue,
        #[clap(long)]
        out: PathBuf,
        #[clap(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Free-text idea for the song. Ignored by modes with their own brief.
    #[clap(default_value = "")]
    pub prompt: String,

    #[clap(long, value_enum, default_value = "normal")]
    pub mode: GeneratorMode,

    #[clap(long, value_enum, default_value = "english")]
    pub language: LyricsLanguage,

    /// 0 = dark, 100 = bright.
    #[clap(long, default_value_t = 50, value_parser = parse_slider)]
    pub dark_bright: u8,

    /// 0 = clean, 100 = gritty.
    #[clap(long, default_value_t = 50, value_parser = parse_slider)]
    pub clean_gritty: u8,

    /// 0 = chill, 100 = hype.
    #[clap(long, default_value_t = 50, value_parser = parse_slider)]
    pub energy: u8,

    #[clap(long, value_enum, default_value = "any")]
    pub gender: VocalGender,

    #[clap(long, value_enum, default_value = "any")]
    pub texture: VocalTexture,

    #[clap(long, value_enum, default_value = "auto")]
    pub structure: SongStructure,

    /// Start with an instrumental intro.
    #[clap(long)]
    pub intro: bool,

    /// Keep the song under three minutes.
    #[clap(long)]
    pub radio_edit: bool,

    /// Also ask for a music video prompt.
    #[clap(long)]
    pub video: bool,
}

impl GenerateArgs {
    fn to_request(&self) -> SongRequest {
        SongRequest {
            prompt: self.prompt.clone(),
            mode: self.mode,
            studio: StudioSettings {
                mood: Mood {
                    dark_bright: self.dark_bright,
                    clean_gritty: self.clean_gritty,
                    energy: self.energy,
                },
                vocal: Vocal {
                    gender: self.gender,
                    texture: self.texture,
                },
                structure: self.structure,
            },
            language: self.language,
            has_intro: self.intro,
            radio_edit: self.radio_edit,
        }
    }
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print the current settings as JSON.
    Show,
    /// Change individual preferences.
    Set(SetArgs),
    /// Restore the defaults.
    Reset,
    /// Write the settings to a JSON file.
    Export {
        /// Output path. Defaults to a timestamped file in the working directory.
        #[clap(long)]
        out: Option<PathBuf>,
    },
    /// Replace the settings with a JSON file, missing keys default-filled.
    Import { file: PathBuf },
}

#[derive(Args, Debug)]
struct SetArgs {
    #[clap(long, value_enum)]
    pub model_preference: Option<ModelPreference>,
    #[clap(long)]
    pub temperature: Option<f32>,
    #[clap(long)]
    pub sound_enabled: Option<bool>,
    #[clap(long)]
    pub reduced_motion: Option<bool>,
    #[clap(long)]
    pub high_contrast: Option<bool>,
    #[clap(long)]
    pub show_debug: Option<bool>,
    #[clap(long)]
    pub show_system_prompt: Option<bool>,
}

impl SetArgs {
    fn to_update(&self) -> SettingsUpdate {
        let generation = GenerationUpdate {
            model_preference: self.model_preference,
            temperature: self.temperature,
        };
        let ui = UiUpdate {
            sound_enabled: self.sound_enabled,
            reduced_motion: self.reduced_motion,
            high_contrast: self.high_contrast,
        };
        let developer = DeveloperUpdate {
            show_debug: self.show_debug,
            show_system_prompt: self.show_system_prompt,
        };
        SettingsUpdate {
            generation: (generation != GenerationUpdate::default()).then_some(generation),
            ui: (ui != UiUpdate::default()).then_some(ui),
            developer: (developer != DeveloperUpdate::default()).then_some(developer),
        }
    }
}

/// Rings the terminal bell in place of real audio output.
struct TerminalBell;

impl AudioSink for TerminalBell {
    fn play(&self, samples: &[f32], _sample_rate: u32) {
        if samples.is_empty() {
            return;
        }
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Commands that need neither config nor settings
    match &cli_args.command {
        Command::HelpTopic { section, lang } => {
            cli_style::print_help_topic(help_topic(*section, *lang), lang.is_right_to_left());
            return Ok(());
        }
        Command::Sound {
            cue,
            out,
            sample_rate,
        } => {
            if *sample_rate == 0 {
                bail!("sample rate must be greater than zero");
            }
            let samples = render_cue(*cue, *sample_rate);
            write_wav(out, &samples, *sample_rate)?;
            cli_style::print_success(&format!("Wrote {:?} to {:?}", cue, out));
            return Ok(());
        }
        _ => {}
    }

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        api_base_url: cli_args.api_base_url.clone(),
        api_key: CliConfig::api_key_from_env(),
        quality_model: cli_args.quality_model.clone(),
        speed_model: cli_args.speed_model.clone(),
        request_timeout_sec: cli_args.timeout_sec,
        settings_path: cli_args.settings.clone(),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;
    debug!(settings_path = ?config.settings_path, "Resolved configuration");

    let mut store = SettingsStore::open(Arc::new(JsonFilePersistence::new(
        config.settings_path.clone(),
    )));

    match cli_args.command {
        Command::Settings { action } => run_settings(&mut store, action),
        Command::Generate(args) => run_generate(&config, &store, &args).await,
        Command::Enhance { draft } => {
            let writer = songwriter(&config);
            let style = writer.enhance_style(&draft).await?;
            println!("{}", style);
            Ok(())
        }
        Command::Ping => {
            let writer = songwriter(&config);
            let elapsed = writer.ping(store.settings()).await?;
            cli_style::print_success(&format!("Model reachable in {} ms", elapsed.as_millis()));
            Ok(())
        }
        Command::HelpTopic { .. } | Command::Sound { .. } => Ok(()),
    }
}

fn songwriter(config: &AppConfig) -> Songwriter {
    Songwriter::new(GenerationSession::new(config.model_tiers()).with_timeout(config.request_timeout))
}

async fn run_generate(config: &AppConfig, store: &SettingsStore, args: &GenerateArgs) -> Result<()> {
    let settings = store.settings();
    let mut writer = songwriter(config);
    let sounds = SoundBoard::new(settings.ui.sound_enabled, || {
        AudioContext::new(DEFAULT_SAMPLE_RATE, Box::new(TerminalBell))
    });

    if settings.developer.show_system_prompt {
        cli_style::print_block("System Instruction", writer.session().system_instruction());
    }

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Cancelling generation");
                cancel.cancel();
            }
        })
    };

    let result = writer.write_song(&args.to_request(), settings, &cancel).await;
    ctrl_c.abort();
    let draft = result?;

    if settings.developer.show_debug {
        cli_style::print_block("Prompt", &draft.prompt);
        cli_style::print_key_value("Model", &draft.model);
        cli_style::print_key_value("Fallback", &draft.fell_back.to_string());
    }

    match draft.song {
        Some(mut song) => {
            if args.video {
                if let Some(video) = writer.video_prompt(&song).await {
                    song = song.with_video_prompt(video);
                }
            }
            cli_style::print_song(&song);
            sounds.play(UiCue::Success);
        }
        None => {
            cli_style::print_warning("The reply did not follow the song format, showing it as is");
            println!("{}", draft.raw_text);
        }
    }
    Ok(())
}

fn run_settings(store: &mut SettingsStore, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => println!("{}", store.export()),
        SettingsAction::Set(args) => {
            let update = args.to_update();
            if update == SettingsUpdate::default() {
                bail!("Nothing to change, pass at least one option");
            }
            store.update(&update);
            println!("{}", store.export());
        }
        SettingsAction::Reset => {
            store.reset();
            cli_style::print_success("Settings restored to defaults");
        }
        SettingsAction::Export { out } => {
            let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(chrono::Utc::now())));
            std::fs::write(&path, store.export())
                .with_context(|| format!("Failed to write settings to {:?}", path))?;
            cli_style::print_success(&format!("Settings exported to {:?}", path));
        }
        SettingsAction::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            if !store.import(&content) {
                bail!("{:?} does not contain valid JSON", file);
            }
            cli_style::print_success("Settings imported");
        }
    }
    Ok(())
}
