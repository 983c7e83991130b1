//! Fogbound - a house floating in fog, under whatever weather you give it.

mod animate;
mod app;
mod clouds;
mod commands;
mod config;
mod controller;
mod effects;
mod lightning;
mod particles;
mod system;

use anyhow::Result;
use audio::{KiraOutput, NullOutput, SoundDirector, SoundOutput};
use engine_core::{Time, Vec3};
use forecast::{ArchiveSource, WeatherService};
use rand::rngs::StdRng;
use rand::SeedableRng;
use renderer::{Bounds, HeadlessScene};
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

use app::App;
use config::AppConfig;
use system::{SystemSettings, WeatherSystem};

/// Model-space bounds the headless scene reports for the two models.
const HOUSE_BOUNDS: (Vec3, Vec3) = (Vec3::new(-2.0, 0.0, -3.0), Vec3::new(2.0, 4.5, 3.0));
const CLOUD_BOUNDS: (Vec3, Vec3) = (Vec3::new(-1.5, -0.5, -1.0), Vec3::new(1.5, 0.5, 1.0));

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                            Fogbound                              ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  A house floats in the fog. Type a weather or a city:            ║");
    println!("║    rain | snow | fog | windy | cloudy | clear | thunderstorm     ║");
    println!("║    intensity <0-100>   city <name>   suggest <text>              ║");
    println!("║    fav add | fav list | fav <n>   status   help   quit           ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    let config = AppConfig::load();
    config.save_if_missing();
    log::info!("Starting Fogbound at {} Hz", config.tick_rate_hz);

    let mut scene = HeadlessScene::new();
    scene.register_model(&config.house_model, Bounds::new(HOUSE_BOUNDS.0, HOUSE_BOUNDS.1));
    scene.register_model(&config.cloud_model, Bounds::new(CLOUD_BOUNDS.0, CLOUD_BOUNDS.1));

    let mut system = WeatherSystem::new(
        scene,
        SoundDirector::new(sound_output(&config)),
        SystemSettings::from(&config),
        StdRng::from_entropy(),
    );
    system.set_weather(config.initial_weather, config.initial_intensity);

    let archive = ArchiveSource::new(&config.reports_dir);
    let mut app = App::new(
        system,
        WeatherService::new(archive.clone(), archive),
        config.favorites_path.clone(),
    );

    run(&mut app, &config, spawn_input_reader())?;

    let frames = app.system.scene().frames_rendered();
    log::info!("Rendered {} frames, {} lightning strikes", frames, app.system.stats().strikes);
    Ok(())
}

fn sound_output(config: &AppConfig) -> Box<dyn SoundOutput> {
    if !config.audio {
        return Box::new(NullOutput);
    }
    match KiraOutput::new(&config.sounds_dir) {
        Ok(output) => Box::new(output),
        Err(e) => {
            log::warn!("Audio unavailable ({}), continuing silently", e);
            Box::new(NullOutput)
        }
    }
}

/// Read stdin on a helper thread; lines are applied on the frame thread.
fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Fixed-rate frame loop until `quit`, end of input, or the configured run time.
fn run<G, F>(
    app: &mut App<HeadlessScene, G, F>,
    config: &AppConfig,
    input: Receiver<String>,
) -> Result<()>
where
    G: forecast::Geocoder,
    F: forecast::ForecastSource,
{
    let mut time = Time::new();
    time.set_fixed_rate(config.tick_rate_hz);
    let frame = time.fixed_timestep();
    let mut input_open = true;

    loop {
        let frame_start = Instant::now();

        while input_open {
            match input.try_recv() {
                Ok(line) => {
                    let reply = app.handle_line(&line);
                    for text in &reply.lines {
                        println!("{}", text);
                    }
                    if reply.quit {
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => input_open = false,
            }
        }
        if !input_open && config.run_seconds <= 0.0 {
            return Ok(());
        }

        time.update();
        app.system.tick(&time)?;

        if config.run_seconds > 0.0 && time.elapsed().as_secs_f64() >= config.run_seconds {
            return Ok(());
        }
        let spent = frame_start.elapsed();
        if spent < frame {
            std::thread::sleep(frame - spent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_audio_uses_silent_output() {
        let config = AppConfig {
            audio: false,
            ..AppConfig::default()
        };
        let mut output = sound_output(&config);
        assert!(output.start(engine_core::WeatherKind::Rain, 0.5, 0.0).is_ok());
    }

    #[test]
    fn bounded_run_stops_on_its_own() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            audio: false,
            run_seconds: 0.05,
            tick_rate_hz: 200.0,
            favorites_path: dir.path().join("favorites.ron"),
            ..AppConfig::default()
        };
        let mut scene = HeadlessScene::new();
        scene.register_model(&config.house_model, Bounds::new(HOUSE_BOUNDS.0, HOUSE_BOUNDS.1));
        let system = WeatherSystem::new(
            scene,
            SoundDirector::new(Box::new(NullOutput)),
            SystemSettings::from(&config),
            StdRng::seed_from_u64(1),
        );
        let archive = ArchiveSource::new(dir.path());
        let mut app = App::new(
            system,
            WeatherService::new(archive.clone(), archive),
            config.favorites_path.clone(),
        );

        let (tx, rx) = mpsc::channel();
        tx.send("fog".to_string()).unwrap();
        run(&mut app, &config, rx).unwrap();
        assert_eq!(app.system.kind(), Some(engine_core::WeatherKind::Fog));
        assert!(app.system.scene().frames_rendered() > 0);
        drop(tx);
    }
}
