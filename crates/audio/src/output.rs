//! Sound outputs: Kira playback and a silent stand-in.

use anyhow::{anyhow, Result};
use engine_core::WeatherKind;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
};
use std::collections::HashMap;
use std::path::Path;

use crate::director::track_file;

/// Something that can play one looping weather track at a time.
pub trait SoundOutput {
    /// Start (or restart) the loop for `kind` at `volume`, `start_offset_secs`
    /// into the track. Any other track stops.
    fn start(&mut self, kind: WeatherKind, volume: f64, start_offset_secs: f64) -> Result<()>;
    /// Change the volume of the loop that is already playing.
    fn set_volume(&mut self, volume: f64);
    fn stop_all(&mut self);
}

/// Output used when no audio device is available or audio is disabled.
#[derive(Debug, Default)]
pub struct NullOutput;

impl SoundOutput for NullOutput {
    fn start(&mut self, kind: WeatherKind, volume: f64, _start_offset_secs: f64) -> Result<()> {
        log::debug!("Audio disabled: would play {} at {:.2}", kind, volume);
        Ok(())
    }

    fn set_volume(&mut self, _volume: f64) {}

    fn stop_all(&mut self) {}
}

/// Weather ambience played through Kira.
pub struct KiraOutput {
    manager: AudioManager,
    tracks: HashMap<WeatherKind, StaticSoundData>,
    playing: Option<StaticSoundHandle>,
}

impl KiraOutput {
    /// Open the default audio device and load every track found in `dir`.
    /// Missing files are logged and that kind stays silent.
    pub fn new(dir: &Path) -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;

        let mut tracks = HashMap::new();
        for kind in WeatherKind::ALL {
            let Some(file) = track_file(kind) else {
                continue;
            };
            let path = dir.join(file);
            match StaticSoundData::from_file(&path) {
                Ok(data) => {
                    tracks.insert(kind, data);
                }
                Err(e) => log::warn!("Audio: could not load {:?}: {}", path, e),
            }
        }
        log::info!("Audio: loaded {} weather tracks from {:?}", tracks.len(), dir);

        Ok(Self {
            manager,
            tracks,
            playing: None,
        })
    }
}

impl SoundOutput for KiraOutput {
    fn start(&mut self, kind: WeatherKind, volume: f64, start_offset_secs: f64) -> Result<()> {
        self.stop_all();
        let data = self
            .tracks
            .get(&kind)
            .ok_or_else(|| anyhow!("no track loaded for {}", kind))?;
        let settings = StaticSoundSettings::new()
            .volume(volume)
            .loop_region(..)
            .start_position(start_offset_secs);
        let handle = self.manager.play(data.clone().with_settings(settings))?;
        self.playing = Some(handle);
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) {
        if let Some(handle) = &mut self.playing {
            let _ = handle.set_volume(volume, Tween::default());
        }
    }

    fn stop_all(&mut self) {
        if let Some(mut handle) = self.playing.take() {
            let _ = handle.stop(Tween::default());
        }
    }
}
