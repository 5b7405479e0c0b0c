//! Synthesized interface cues.
//!
//! Cues are rendered offline to mono PCM and handed to an [`AudioSink`].
//! The [`AudioContext`] holding the sink is created on first use and then
//! kept for the lifetime of the [`SoundBoard`].

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::f32::consts::TAU;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use tracing::debug;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Floor used by exponential ramps, which cannot reach zero.
const EXP_RAMP_FLOOR: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UiCue {
    Click,
    Tick,
    Woosh,
    Success,
    Pop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    /// Sample at `phase` in cycles.
    fn sample(&self, phase: f32) -> f32 {
        let frac = phase.fract();
        match self {
            Waveform::Sine => (TAU * frac).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (frac - 0.5).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Envelope {
    /// Exponential decay from the voice gain to the ramp floor.
    Exponential,
    /// Linear fade from the voice gain to silence.
    Linear,
}

/// One oscillator inside a cue.
#[derive(Debug, Clone, Copy)]
struct Voice {
    waveform: Waveform,
    start_hz: f32,
    /// Exponential sweep target, reached at `sweep_secs`.
    end_hz: Option<f32>,
    sweep_secs: f32,
    gain: f32,
    envelope: Envelope,
    /// Time the envelope takes to finish.
    decay_secs: f32,
    offset_secs: f32,
    stop_secs: f32,
}

impl Voice {
    fn tone(waveform: Waveform, hz: f32, secs: f32, gain: f32) -> Self {
        Self {
            waveform,
            start_hz: hz,
            end_hz: None,
            sweep_secs: secs,
            gain,
            envelope: Envelope::Exponential,
            decay_secs: secs,
            offset_secs: 0.0,
            stop_secs: secs,
        }
    }

    fn frequency_at(&self, t: f32) -> f32 {
        match self.end_hz {
            Some(end) => {
                let progress = (t / self.sweep_secs).min(1.0);
                self.start_hz * (end / self.start_hz).powf(progress)
            }
            None => self.start_hz,
        }
    }

    fn gain_at(&self, t: f32) -> f32 {
        let progress = (t / self.decay_secs).min(1.0);
        match self.envelope {
            Envelope::Exponential => self.gain * (EXP_RAMP_FLOOR / self.gain).powf(progress),
            Envelope::Linear => self.gain * (1.0 - progress),
        }
    }

    fn end_secs(&self) -> f32 {
        self.offset_secs + self.stop_secs
    }
}

impl UiCue {
    fn voices(&self) -> Vec<Voice> {
        match self {
            UiCue::Click => vec![Voice::tone(Waveform::Sine, 800.0, 0.05, 0.05)],
            UiCue::Tick => vec![Voice::tone(Waveform::Triangle, 1200.0, 0.03, 0.015)],
            UiCue::Pop => vec![Voice::tone(Waveform::Sine, 600.0, 0.1, 0.03)],
            UiCue::Woosh => vec![Voice {
                end_hz: Some(40.0),
                envelope: Envelope::Linear,
                ..Voice::tone(Waveform::Sine, 180.0, 0.25, 0.08)
            }],
            UiCue::Success => [440.0, 554.37, 659.25]
                .iter()
                .enumerate()
                .map(|(i, &hz)| Voice {
                    decay_secs: 0.5,
                    offset_secs: i as f32 * 0.05,
                    stop_secs: 0.6,
                    ..Voice::tone(Waveform::Sine, hz, 0.6, 0.03)
                })
                .collect(),
        }
    }

    /// Length of the rendered cue in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.voices()
            .iter()
            .map(Voice::end_secs)
            .fold(0.0, f32::max)
    }
}

/// Render a cue to mono samples in `-1.0..=1.0`.
pub fn render_cue(cue: UiCue, sample_rate: u32) -> Vec<f32> {
    let rate = sample_rate as f32;
    let total = (cue.duration_secs() * rate).ceil() as usize;
    let mut buffer = vec![0.0f32; total];

    for voice in cue.voices() {
        let first = (voice.offset_secs * rate).round() as usize;
        let count = (voice.stop_secs * rate).round() as usize;
        let mut phase = 0.0f32;
        for (n, slot) in buffer.iter_mut().skip(first).take(count).enumerate() {
            let t = n as f32 / rate;
            *slot += voice.waveform.sample(phase) * voice.gain_at(t);
            phase += voice.frequency_at(t) / rate;
        }
    }

    buffer
}

/// Write rendered samples as a 16-bit mono WAV file.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {:?}", path))?;
    for &s in samples {
        let value = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {:?}", path))
}

/// Destination for rendered cues.
pub trait AudioSink: Send + Sync {
    fn play(&self, samples: &[f32], sample_rate: u32);
}

/// Output resources shared by every cue.
pub struct AudioContext {
    sample_rate: u32,
    sink: Box<dyn AudioSink>,
}

impl AudioContext {
    pub fn new(sample_rate: u32, sink: Box<dyn AudioSink>) -> Self {
        Self { sample_rate, sink }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

type ContextFactory = Box<dyn Fn() -> AudioContext + Send + Sync>;

/// Plays cues when sound is enabled, creating the audio context on the
/// first cue that is actually played.
pub struct SoundBoard {
    enabled: AtomicBool,
    context: OnceLock<AudioContext>,
    factory: ContextFactory,
}

impl SoundBoard {
    pub fn new(
        enabled: bool,
        factory: impl Fn() -> AudioContext + Send + Sync + 'static,
    ) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            context: OnceLock::new(),
            factory: Box::new(factory),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Whether the audio context has been created.
    pub fn is_initialized(&self) -> bool {
        self.context.get().is_some()
    }

    pub fn play(&self, cue: UiCue) {
        if !self.is_enabled() {
            return;
        }
        let context = self.context.get_or_init(|| {
            debug!("Initializing audio context");
            (self.factory)()
        });
        let samples = render_cue(cue, context.sample_rate);
        context.sink.play(&samples, context.sample_rate);
    }
}
