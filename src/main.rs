//! tiktik - interval workout and meditation timer
//!
//! Runs one session in the terminal:
//! - Interval workouts (work / rest rounds) announced with chimes and voice cues
//! - Guided, ambient or silent meditation with spoken prompts
//! - Keyboard controls on stdin while the session runs

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use tiktik::cli::{parse_control, AudioArgs, Cli, Commands, Control, Display, LoopState};
use tiktik::config::AppConfig;
use tiktik::preset::{all_presets, Preset, SessionConfigurator};
use tiktik::session::{EngineOptions, SessionCommand, SessionEngine, SessionEvent};
use tiktik::sound::{
    try_create_player, AssetLibrary, AudioSubsystem, SilentSoundPlayer, SoundPlayer,
};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins; otherwise warnings only, or debug output with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Workout(args)) => {
            let preset = args.to_preset()?;
            run_session(cli.config.as_deref(), preset, &args.audio).await?;
        }
        Some(Commands::Meditate(args)) => {
            let preset = args.to_preset()?;
            run_session(cli.config.as_deref(), preset, &args.audio).await?;
        }
        Some(Commands::Presets { json }) => {
            let presets = all_presets();
            if json {
                println!("{}", serde_json::to_string_pretty(&presets)?);
            } else {
                Display::show_presets(&presets);
            }
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Builds the audio backend: rodio when available and wanted, silence otherwise.
fn create_player(no_sound: bool) -> Arc<dyn SoundPlayer> {
    if no_sound {
        debug!("Sound disabled by --no-sound");
        return Arc::new(SilentSoundPlayer);
    }
    match try_create_player() {
        Some(player) => player as Arc<dyn SoundPlayer>,
        None => Arc::new(SilentSoundPlayer),
    }
}

/// Runs a session until the user quits.
///
/// A finished session can be started again with `s`. Without stdin the
/// program exits once the session completes.
async fn run_session(
    config_path: Option<&std::path::Path>,
    preset: Preset,
    audio_args: &AudioArgs,
) -> Result<()> {
    let mut config = AppConfig::load(config_path)?;
    config.voice_muted |= audio_args.mute_voice;
    config.music_muted |= audio_args.mute_music;

    let audio = AudioSubsystem::new(
        create_player(audio_args.no_sound),
        AssetLibrary::new(config.asset_root.clone()),
        config.audio_settings(),
    );
    Display::show_session_start(&preset);
    let configurator = SessionConfigurator::new(preset)?;

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut engine = SessionEngine::new(configurator, audio, EngineOptions::from(&config), event_tx);
    let engine_task = tokio::spawn(async move { engine.run(command_rx).await });

    command_tx
        .send(SessionCommand::Start)
        .context("Failed to send start command")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state = LoopState::default();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line(), if state.stdin_open() => {
                match line.context("Failed to read from stdin")? {
                    Some(line) => match parse_control(&line) {
                        Ok(Some(Control::Command(command))) => {
                            command_tx
                                .send(command)
                                .context("Failed to send session command")?;
                        }
                        Ok(Some(Control::Quit)) => break,
                        Ok(Some(Control::Help)) => Display::show_controls(),
                        Ok(None) => {}
                        Err(e) => Display::show_error(&e.to_string()),
                    },
                    None => {
                        debug!("stdin closed, controls disabled");
                        if state.on_stdin_closed() {
                            break;
                        }
                    }
                }
            }
            event = event_rx.recv() => {
                match event {
                    Some(event) => {
                        Display::show_event(&event);
                        if state.on_event(&event) {
                            break;
                        }
                        if matches!(event, SessionEvent::Completed(_)) {
                            Display::show_finished_hint();
                        }
                    }
                    None => break,
                }
            }
            _ = &mut ctrl_c => {
                println!();
                info!("Interrupted");
                break;
            }
        }
    }

    // The engine may already have stopped; a closed channel is fine here.
    let _ = command_tx.send(SessionCommand::Shutdown);
    engine_task.await.context("Session engine task failed")??;
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
