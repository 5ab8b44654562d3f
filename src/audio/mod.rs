//! Audio collaborator: turns engine events into sound cues.
//!
//! The engine never touches an audio device. The front end owns an
//! [`AudioDirector`] wrapping whatever [`AudioSink`] is available and feeds it
//! the events drained from the engine each frame. With no usable device the
//! game runs with [`SilentAudio`].

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::game::{AudioSettings, GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Eat,
    GameOver,
    Move,
}

/// Something that can play cues and background music
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue) -> Result<()>;
    fn set_music(&mut self, playing: bool) -> Result<()>;
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn play(&mut self, cue: SoundCue) -> Result<()> {
        (**self).play(cue)
    }

    fn set_music(&mut self, playing: bool) -> Result<()> {
        (**self).set_music(playing)
    }
}

/// No-op sink used when no audio output is available
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: SoundCue) -> Result<()> {
        Ok(())
    }

    fn set_music(&mut self, _playing: bool) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell for eat and game over cues. There is no music.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) -> Result<()> {
        match cue {
            SoundCue::Eat | SoundCue::GameOver => {
                self.out.write_all(b"\x07").context("Failed to ring bell")?;
                self.out.flush().context("Failed to flush bell")?;
            }
            SoundCue::Move => {}
        }
        Ok(())
    }

    fn set_music(&mut self, _playing: bool) -> Result<()> {
        Ok(())
    }
}

/// Forwards engine events to a sink, honouring the sound and music switches.
///
/// Sink failures are logged and otherwise ignored; the game keeps running
/// without sound.
pub struct AudioDirector<S: AudioSink> {
    sink: S,
    sound_enabled: bool,
    music_enabled: bool,
}

impl<S: AudioSink> AudioDirector<S> {
    pub fn new(sink: S, settings: AudioSettings) -> Self {
        Self {
            sink,
            sound_enabled: settings.sound_enabled,
            music_enabled: settings.music_enabled,
        }
    }

    /// Start background music if it is enabled
    pub fn start(&mut self) {
        if self.music_enabled {
            self.set_music(true);
        }
    }

    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::TurnRequested { .. } => self.play(SoundCue::Move),
                GameEvent::FruitEaten { .. } => self.play(SoundCue::Eat),
                GameEvent::GameOver { .. } => self.play(SoundCue::GameOver),
                GameEvent::SoundToggled { enabled } => {
                    debug!(enabled, "sound toggled");
                    self.sound_enabled = *enabled;
                }
                GameEvent::MusicToggled { enabled } => {
                    self.music_enabled = *enabled;
                    self.set_music(*enabled);
                }
                GameEvent::PhaseChanged { .. } | GameEvent::QuitRequested => {}
            }
        }
    }

    /// Silence music before shutdown
    pub fn stop(&mut self) {
        if self.music_enabled {
            self.set_music(false);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn play(&mut self, cue: SoundCue) {
        if !self.sound_enabled {
            return;
        }
        if let Err(e) = self.sink.play(cue) {
            warn!(?cue, "audio playback failed: {e:#}");
        }
    }

    fn set_music(&mut self, playing: bool) {
        if let Err(e) = self.sink.set_music(playing) {
            warn!(playing, "music control failed: {e:#}");
        }
    }
}
