use log::{debug, info, warn};
use rand::Rng;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::AudioConfig;
use crate::game::{AttackKind, GameEvent};

pub const MUSIC_FILE: &str = "goblin_theme.wav";

type Sound = Buffered<Decoder<BufReader<File>>>;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output available")]
    Stream(#[from] rodio::StreamError),
    #[error("could not create a playback sink")]
    Play(#[from] rodio::PlayError),
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Hit,
    Damage1,
    Damage2,
    Damage3,
    EmptyGun,
    Reload,
    BulletHit,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 7] = [
        SoundEffect::Hit,
        SoundEffect::Damage1,
        SoundEffect::Damage2,
        SoundEffect::Damage3,
        SoundEffect::EmptyGun,
        SoundEffect::Reload,
        SoundEffect::BulletHit,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Hit => "hit.wav",
            SoundEffect::Damage1 => "damage.wav",
            SoundEffect::Damage2 => "damage2.wav",
            SoundEffect::Damage3 => "damage3.wav",
            SoundEffect::EmptyGun => "empty.mp3",
            SoundEffect::Reload => "reload.mp3",
            SoundEffect::BulletHit => "bullet_hit.mp3",
        }
    }
}

/// Sound to play for a game event. `variant` picks one of the three
/// player damage sounds.
pub fn sound_for(event: &GameEvent, variant: usize) -> Option<SoundEffect> {
    match event {
        GameEvent::EnemyHit {
            kind: AttackKind::Ranged,
        }
        | GameEvent::ProjectileBlocked => Some(SoundEffect::BulletHit),
        GameEvent::EnemyHit { .. } => Some(SoundEffect::Hit),
        GameEvent::PlayerHurt { .. } => Some(
            [
                SoundEffect::Damage1,
                SoundEffect::Damage2,
                SoundEffect::Damage3,
            ][variant % 3],
        ),
        GameEvent::GunEmpty => Some(SoundEffect::EmptyGun),
        GameEvent::ReloadStarted => Some(SoundEffect::Reload),
        _ => None,
    }
}

fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Decodes a sound once so it can be replayed cheaply
pub fn load_sound(path: &Path) -> Result<Sound, AudioError> {
    Ok(open_source(path)?.buffered())
}

struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Audio manager for sound effects and background music. Without an output
/// device every call is a no-op.
pub struct AudioManager {
    output: Option<Output>,
    sounds: HashMap<SoundEffect, Sound>,
    music: Option<Sink>,
    sound_dir: PathBuf,
    music_volume: f32,
    effects_volume: f32,
}

impl AudioManager {
    /// Opens the default output and pre-loads every effect, falling back to
    /// a silent manager when audio is disabled or unavailable
    pub fn from_config(config: &AudioConfig) -> Self {
        if !config.enabled {
            info!("audio disabled by configuration");
            return Self::disabled(config);
        }

        match Self::new(config) {
            Ok(manager) => manager,
            Err(err) => {
                warn!("continuing without audio: {err}");
                Self::disabled(config)
            }
        }
    }

    pub fn new(config: &AudioConfig) -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        let sound_dir = config.asset_dir.join("sounds");

        let mut sounds = HashMap::new();
        for effect in SoundEffect::ALL {
            match load_sound(&sound_dir.join(effect.file_name())) {
                Ok(sound) => {
                    sounds.insert(effect, sound);
                }
                Err(err) => warn!("skipping sound {:?}: {err}", effect),
            }
        }
        debug!("loaded {} of {} sounds", sounds.len(), SoundEffect::ALL.len());

        Ok(Self {
            output: Some(Output {
                _stream: stream,
                handle,
            }),
            sounds,
            music: None,
            sound_dir,
            music_volume: config.music_volume,
            effects_volume: config.effects_volume,
        })
    }

    pub fn disabled(config: &AudioConfig) -> Self {
        Self {
            output: None,
            sounds: HashMap::new(),
            music: None,
            sound_dir: config.asset_dir.join("sounds"),
            music_volume: config.music_volume,
            effects_volume: config.effects_volume,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn is_music_playing(&self) -> bool {
        self.music.is_some()
    }

    pub fn play(&self, effect: SoundEffect) {
        let (Some(output), Some(sound)) = (&self.output, self.sounds.get(&effect)) else {
            return;
        };
        // Playback errors never interrupt the game
        match Sink::try_new(&output.handle) {
            Ok(sink) => {
                sink.set_volume(self.effects_volume);
                // Clone the buffered source (fast - just clones references)
                sink.append(sound.clone());
                sink.detach();
            }
            Err(err) => debug!("dropped {:?}: {err}", effect),
        }
    }

    pub fn play_event(&self, event: &GameEvent) {
        let variant = rand::rng().random_range(0..3);
        if let Some(effect) = sound_for(event, variant) {
            self.play(effect);
        }
    }

    /// Starts the looping background track, replacing any current one
    pub fn start_music(&mut self) {
        self.stop_music();
        let Some(output) = &self.output else {
            return;
        };

        let path = self.sound_dir.join(MUSIC_FILE);
        let started = open_source(&path).and_then(|source| {
            let sink = Sink::try_new(&output.handle)?;
            sink.set_volume(self.music_volume);
            sink.append(source.repeat_infinite());
            Ok(sink)
        });

        match started {
            Ok(sink) => self.music = Some(sink),
            Err(err) => warn!("no background music: {err}"),
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PickupKind;

    #[test]
    fn test_sound_for_events() {
        assert_eq!(
            sound_for(&GameEvent::EnemyHit { kind: AttackKind::Melee }, 0),
            Some(SoundEffect::Hit)
        );
        assert_eq!(
            sound_for(&GameEvent::EnemyHit { kind: AttackKind::Slash }, 0),
            Some(SoundEffect::Hit)
        );
        assert_eq!(
            sound_for(&GameEvent::EnemyHit { kind: AttackKind::Ranged }, 0),
            Some(SoundEffect::BulletHit)
        );
        assert_eq!(sound_for(&GameEvent::GunEmpty, 0), Some(SoundEffect::EmptyGun));
        assert_eq!(sound_for(&GameEvent::ReloadStarted, 0), Some(SoundEffect::Reload));
        assert_eq!(sound_for(&GameEvent::ShotFired, 0), None);
        assert_eq!(sound_for(&GameEvent::PickupCollected(PickupKind::Ammo), 0), None);
    }

    #[test]
    fn test_damage_sound_variants() {
        let hurt = GameEvent::PlayerHurt { health: 3 };
        assert_eq!(sound_for(&hurt, 0), Some(SoundEffect::Damage1));
        assert_eq!(sound_for(&hurt, 1), Some(SoundEffect::Damage2));
        assert_eq!(sound_for(&hurt, 2), Some(SoundEffect::Damage3));
        assert_eq!(sound_for(&hurt, 5), Some(SoundEffect::Damage3));
    }

    #[test]
    fn test_every_effect_has_a_file() {
        for effect in SoundEffect::ALL {
            let name = effect.file_name();
            assert!(name.ends_with(".wav") || name.ends_with(".mp3"));
        }
    }

    #[test]
    fn test_missing_sound_reports_path() {
        let err = load_sound(Path::new("no/such/dir/hit.wav")).err().expect("missing file");
        assert!(matches!(err, AudioError::Open { .. }));
        assert!(err.to_string().contains("no/such/dir/hit.wav"));
    }

    #[test]
    fn test_disabled_manager_is_silent() {
        let config = AudioConfig {
            enabled: false,
            ..AudioConfig::default()
        };
        let mut audio = AudioManager::from_config(&config);
        assert!(!audio.is_enabled());

        audio.play(SoundEffect::Hit);
        audio.play_event(&GameEvent::GunEmpty);
        audio.start_music();
        assert!(!audio.is_music_playing());
        audio.stop_music();
    }
}
