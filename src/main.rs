//! DAW OSC GW
//!
//! Mirror a DAW's mixer and transport over OSC, or fire single commands at it.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use rosc::OscPacket;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daw_osc_gw::cli;
use daw_osc_gw::command::{parse_switch, SurfaceCommand, TrackAction};
use daw_osc_gw::config::AppConfig;
use daw_osc_gw::link::UdpLink;
use daw_osc_gw::osc::{ConsoleSender, OscSender};
use daw_osc_gw::paths::AppPaths;
use daw_osc_gw::surface::Surface;

/// DAW OSC Gateway - mirror mixer and transport state of a DAW over OSC
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to ./config.yaml or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Log outbound messages instead of sending them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mirror the DAW until Ctrl+C (default)
    Serve {
        /// Read commands from an interactive prompt
        #[arg(short, long)]
        interactive: bool,
    },
    /// Pulse record
    Record,
    /// Pulse play
    Play,
    /// Pulse pause
    Pause,
    /// Pulse stop
    Stop,
    /// Switch the metronome on or off
    Metronome {
        #[arg(value_parser = parse_switch, action = clap::ArgAction::Set)]
        state: bool,
    },
    /// Switch loop playback on or off
    Repeat {
        #[arg(value_parser = parse_switch, action = clap::ArgAction::Set)]
        state: bool,
    },
    /// Page the visible tracks
    #[command(group(ArgGroup::new("page").required(true).args(["next", "prev", "id"])))]
    Bank {
        #[arg(long)]
        next: bool,
        #[arg(long)]
        prev: bool,
        #[arg(long, allow_negative_numbers = true)]
        id: Option<i32>,
    },
    /// Announce the track count
    Count,
    /// Change one attribute of a track, e.g. `track 2 volume 0.5`
    Track {
        id: u32,
        /// volume, pan, mute, solo, recarm or monitor
        attribute: String,
        value: String,
    },
}

impl Command {
    /// One-shot command, or `None` for a session
    fn into_surface_command(self) -> Result<Option<SurfaceCommand>> {
        let cmd = match self {
            Command::Serve { .. } => return Ok(None),
            Command::Record => SurfaceCommand::Record,
            Command::Play => SurfaceCommand::Play,
            Command::Pause => SurfaceCommand::Pause,
            Command::Stop => SurfaceCommand::Stop,
            Command::Metronome { state } => SurfaceCommand::Metronome(state),
            Command::Repeat { state } => SurfaceCommand::Repeat(state),
            Command::Bank { next: true, .. } => SurfaceCommand::BankNext,
            Command::Bank { prev: true, .. } => SurfaceCommand::BankPrev,
            Command::Bank { id: Some(n), .. } => SurfaceCommand::BankSelect(n),
            Command::Bank { .. } => anyhow::bail!("bank needs one of --next, --prev or --id"),
            Command::Count => SurfaceCommand::TrackCount,
            Command::Track {
                id,
                attribute,
                value,
            } => SurfaceCommand::Track {
                id,
                action: TrackAction::parse(&[attribute.as_str(), value.as_str()]).map_err(anyhow::Error::msg)?,
            },
        };
        Ok(Some(cmd))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let paths = AppPaths::detect();
    let config_path = args.config.clone().unwrap_or_else(|| paths.config.clone());
    let config = AppConfig::load_or_default(&config_path).await?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&args.log_level, config.logging.dir.as_deref())?;

    info!("Starting DAW OSC GW v{}...", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", config_path.display());

    let command = args
        .command
        .unwrap_or(Command::Serve { interactive: false });
    let interactive = matches!(command, Command::Serve { interactive: true });

    match command.into_surface_command()? {
        Some(cmd) => send_once(&config, args.dry_run, cmd).await?,
        None => serve(&config, args.dry_run, interactive).await?,
    }

    info!("DAW OSC GW shutdown complete");
    Ok(())
}

/// Mirror the DAW until Ctrl+C or the operator quits
async fn serve(config: &AppConfig, dry_run: bool, interactive: bool) -> Result<()> {
    let link = if dry_run {
        info!("Dry run: outbound messages are logged, nothing is received");
        None
    } else {
        Some(Arc::new(
            UdpLink::open(&config.osc)
                .await
                .context("Failed to open OSC link")?,
        ))
    };
    let sender: Arc<dyn OscSender> = match &link {
        Some(link) => Arc::clone(link) as Arc<dyn OscSender>,
        None => Arc::new(ConsoleSender::new("dry-run")),
    };

    let surface = Surface::new(&config.surface, config.mirroring, sender);
    surface.listen()?;
    info!(
        "Mirroring {} track(s), policy {:?}",
        config.surface.tracks_count, config.mirroring
    );

    let (repl_tx, mut repl_rx) = mpsc::channel::<SurfaceCommand>(32);
    if interactive {
        cli::spawn_repl(repl_tx);
    } else {
        drop(repl_tx);
    }

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // Feedback from the DAW
            packet = recv_packet(link.as_deref()) => match packet {
                Ok(packet) => {
                    let fired = surface.handle_packet(&packet);
                    debug!("Packet handled by {} listener(s)", fired);
                }
                Err(e) => warn!("⚠️  Dropping datagram: {}", e),
            },

            // Operator commands
            cmd = repl_rx.recv(), if interactive => match cmd {
                Some(cmd) => match cmd.execute(&surface) {
                    Ok(output) => cli::print_output(&output),
                    Err(e) => warn!("⚠️  Command failed: {}", e),
                },
                None => {
                    info!("Interactive session closed");
                    break;
                }
            },

            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    info!("Shutting down...");
    surface.shutdown();
    if let Some(link) = &link {
        link.close();
    }

    Ok(())
}

/// Send one command from an ephemeral port, leaving a running session undisturbed
async fn send_once(config: &AppConfig, dry_run: bool, cmd: SurfaceCommand) -> Result<()> {
    let sender: Arc<dyn OscSender> = if dry_run {
        Arc::new(ConsoleSender::new("dry-run"))
    } else {
        Arc::new(
            UdpLink::ephemeral(&config.osc)
                .await
                .context("Failed to open OSC link")?,
        )
    };

    let surface = Surface::new(&config.surface, config.mirroring, sender);
    let output = cmd.execute(&surface)?;
    cli::print_output(&output);
    Ok(())
}

async fn recv_packet(link: Option<&UdpLink>) -> daw_osc_gw::Result<OscPacket> {
    match link {
        Some(link) => link.recv().await,
        None => std::future::pending().await,
    }
}

fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "daw-osc-gw.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
