use arc_swap::ArcSwap;
use howl::formant::Corner;
use howl::{EngineCommand, EngineUpdate, Position, VocoderSettings, compute_formants, spawn_engine};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::env;
use std::io::{BufRead, stdin};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SETTINGS_PATH: &str = "howl.ron";

enum Input {
    Touch(Position),
    Release,
    Hold,
    Play,
    Stop,
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut parts = line.split_whitespace();
    let first = parts.next().ok_or("empty command")?;
    let input = match first {
        "release" => Input::Release,
        "hold" => Input::Hold,
        "play" => Input::Play,
        "stop" => Input::Stop,
        "quit" | "q" => Input::Quit,
        x => {
            let x: f64 = x.parse().map_err(|_| format!("unknown command '{x}'"))?;
            let y: f64 = parts
                .next()
                .ok_or("missing y coordinate")?
                .parse()
                .map_err(|_| "invalid y coordinate")?;
            Input::Touch(Position::new(x, y).clamped())
        }
    };
    Ok(input)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

    let settings = match VocoderSettings::load_or_create(&settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            error!(path = %settings_path.display(), error = %e, "failed to load settings");
            std::process::exit(1);
        }
    };

    let mut location = settings.location;
    let engine = spawn_engine(settings.clone());
    // Latest accepted settings, shared with the file watcher.
    let current = Arc::new(ArcSwap::from_pointee(settings));

    let update_rx = engine.update_rx.clone();
    std::thread::spawn(move || {
        for update in update_rx.iter() {
            match update {
                EngineUpdate::PlaybackState { playing } => info!(playing, "playback"),
                EngineUpdate::Location { position: Some(p) } => info!(x = p.x, y = p.y, "vocoder on"),
                EngineUpdate::Location { position: None } => info!("vocoder off"),
                EngineUpdate::Error { message } => error!("{}", message),
            }
        }
    });

    let watcher_tx = engine.command_tx.clone();
    let watched_path = settings_path.clone();
    let watched_settings = current.clone();
    let watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) if event.kind.is_modify() => match VocoderSettings::load(&watched_path) {
                Ok(settings) => {
                    watched_settings.store(Arc::new(settings.clone()));
                    let _ = watcher_tx.send(EngineCommand::UpdateSettings(settings));
                }
                Err(e) => warn!(error = %e, "ignoring settings edit"),
            },
            Ok(_) => {}
            Err(e) => warn!(error = %e, "settings watch error"),
        },
        Config::default(),
    );
    let _watcher = match watcher {
        Ok(mut watcher) => match watcher.watch(&settings_path, RecursiveMode::NonRecursive) {
            Ok(()) => Some(watcher),
            Err(e) => {
                warn!(error = %e, "not watching settings file");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, "failed to create settings watcher");
            None
        }
    };

    let _ = engine.command_tx.send(EngineCommand::Play);
    info!(
        path = %settings_path.display(),
        "enter `x y` to touch the pad, `release`, `hold`, `play`, `stop` or `quit`"
    );

    for line in stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_input(&line) {
            Ok(Input::Quit) => break,
            Ok(Input::Touch(position)) => {
                location = position;
                let vowel = Corner::nearest(position.x, position.y).ipa();
                info!(x = position.x, y = position.y, nearest = vowel, "touch");
                let bank = compute_formants(position, &current.load().modulation(), 0.0);
                for (slot, formant) in bank.iter().enumerate() {
                    info!(
                        slot,
                        frequency = formant.frequency,
                        bandwidth = formant.bandwidth,
                        "formant"
                    );
                }
                EngineCommand::Touch(position)
            }
            Ok(Input::Release) => EngineCommand::Release,
            Ok(Input::Hold) => {
                let mut next = VocoderSettings::clone(&current.load());
                next.sustain = !next.sustain;
                info!(sustain = next.sustain, "hold");
                current.store(Arc::new(next.clone()));
                if let Err(e) = next.save(&settings_path) {
                    warn!(error = %e, "failed to persist hold");
                }
                EngineCommand::UpdateSettings(next)
            }
            Ok(Input::Play) => EngineCommand::Play,
            Ok(Input::Stop) => EngineCommand::Stop,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        if engine.command_tx.send(command).is_err() {
            error!("engine stopped");
            break;
        }
    }

    let mut persisted = VocoderSettings::clone(&current.load());
    persisted.location = location;
    if let Err(e) = persisted.save(&settings_path) {
        error!(error = %e, "failed to persist settings");
    }
}
