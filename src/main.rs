pub mod cli;
pub mod config;
pub mod controller;
pub mod input;
pub mod mapping;
pub mod session;

use crate::cli::{register_controller_commands, CommandRegistry, ControllerCli};
use crate::config::AppConfig;
use crate::controller::{spawn_report_logger, VirtualController};
use crate::input::{FeederHandle, LineReader, RawModeWriter, TerminalKeySource};
use crate::mapping::{KeyMapping, KeyboardTranslator};
use crate::session::{Session, SessionEnd};
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Drive a virtual game controller from the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Translate live key presses instead of reading command lines
    #[arg(long)]
    live: bool,

    /// Config file, defaults to <config dir>/padconsole/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup(args.verbose)?;

    let config = AppConfig::load(args.config).await?;
    debug!("Using config {:?}", config);

    // Controller und Report-Logger starten
    let (report_sender, report_receiver) = mpsc::channel(config.session.report_buffer);
    let report_logger = spawn_report_logger(report_receiver);
    let controller = VirtualController::new(report_sender);

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, shutting down");
                ctrl_c_token.cancel();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let mut registry = CommandRegistry::new();
    register_controller_commands(&mut registry)?;
    let translator =
        KeyboardTranslator::new(KeyMapping::default_layout(), config.translator_settings());

    let end = if args.live {
        let (feeder, events) = FeederHandle::spawn(
            Box::new(TerminalKeySource::with_cancellation(token.clone())),
            config.session.event_buffer,
        );
        let out = RawModeWriter::new(std::io::stdout());
        let cli = ControllerCli::new(controller, registry, config.button_timing(), out);
        let mut session = Session::new(
            cli,
            translator,
            config.session.prompt.clone(),
            config.mash_args(),
        );

        // Mit dem Ende der Session fällt der Receiver weg, das beendet den Feeder
        let end = session.run_live(events, token).await;
        feeder.join().await;
        end
    } else {
        // Eigener Thread, ein wartendes stdin-Lesen würde sonst das Beenden blockieren
        let lines = LineReader::spawn(
            std::io::BufReader::new(std::io::stdin()),
            config.session.event_buffer,
        )?;
        let cli =
            ControllerCli::new(controller, registry, config.button_timing(), std::io::stdout());
        let mut session = Session::new(
            cli,
            translator,
            config.session.prompt.clone(),
            config.mash_args(),
        );
        let end = session.run_console(lines, token).await;
        end
    };

    info!("Session ended: {:?}", end);
    if end == SessionEnd::ConnectionLost {
        error!("Controller connection was lost");
    }
    // Alle Report-Sender sind mit der Session freigegeben
    report_logger.await?;
    Ok(())
}

fn setup(verbose: bool) -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env(if verbose { Level::DEBUG } else { Level::INFO });
    Ok(())
}

fn setup_logging_env(level: Level) {
    // stderr, damit der Konsolen-Prompt lesbar bleibt
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .pretty()
        .init();
}
