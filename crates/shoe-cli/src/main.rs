//! `shoe-monitor`: relay cards dealt by a card shoe to the card server.
//!
//! ```text
//! shoe-monitor run [--device PATH] [--baud N] [--host H] [--port P] [--path URL]
//! shoe-monitor config show
//! shoe-monitor config set [--host H] [--port P] [--path URL]
//! ```
//!
//! While `run` is monitoring, typing `history` lists the cards of the
//! session and `clear` empties it.
//!
//! Logs go to stderr and follow `RUST_LOG` (default `info`).

mod history;
mod status;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use history::SessionHistory;
use shoe_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_CONFIG_FILE, DEFAULT_SERIAL_DEVICE};
use shoe_core::{ConfigStore, MonitorConfig, SerialConfig, ServerConfig};
use shoe_hardware::{AnyShoeLink, ShoeMonitor};
use shoe_network::{HttpDispatcher, endpoint_url};
use status::StatusLine;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shoe-monitor", version, about = "Relay cards dealt by a card shoe to the card server")]
struct Cli {
    /// Server configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Monitor the shoe until Ctrl-C
    Run(RunArgs),

    /// Show or change the stored server configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Serial device of the shoe
    #[arg(long, default_value = DEFAULT_SERIAL_DEVICE)]
    device: String,

    /// Serial baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    #[command(flatten)]
    server: ServerArgs,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the stored configuration
    Show,

    /// Validate and store new values
    Set(ServerArgs),
}

/// Server fields; anything omitted keeps the stored value.
#[derive(Debug, Clone, Default, Args)]
struct ServerArgs {
    /// Card server host
    #[arg(long)]
    host: Option<String>,

    /// Card server port
    #[arg(long)]
    port: Option<String>,

    /// Card endpoint path
    #[arg(long)]
    path: Option<String>,
}

impl ServerArgs {
    /// Overlay these fields on `base`, validating the result.
    fn apply(&self, base: &ServerConfig) -> shoe_core::Result<ServerConfig> {
        let port = base.port.to_string();
        ServerConfig::from_fields(
            self.host.as_deref().unwrap_or(&base.host),
            self.port.as_deref().unwrap_or(&port),
            self.path.as_deref().unwrap_or(&base.path),
        )
    }

    fn is_empty(&self) -> bool {
        self.host.is_none() && self.port.is_none() && self.path.is_none()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let store = ConfigStore::new(&cli.config);

    match cli.command {
        Command::Run(args) => run(args, &store).await,
        Command::Config(ConfigCommand::Show) => show_config(&store),
        Command::Config(ConfigCommand::Set(args)) => set_config(&args, &store),
    }
}

async fn run(args: RunArgs, store: &ConfigStore) -> Result<()> {
    let server = args
        .server
        .apply(&store.load_or_default())
        .context("Invalid server configuration")?;
    let serial = SerialConfig::new(args.device).baud_rate(args.baud);
    let status = StatusLine::new(&serial);

    println!("Sending cards to {}", endpoint_url(&server));
    let config = MonitorConfig::new(serial, server);
    let dispatcher = HttpDispatcher::new()?;
    let mut handle = ShoeMonitor::new(config, AnyShoeLink::serial(), dispatcher).start();
    let mut history = SessionHistory::new();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            event = handle.recv() => {
                let Some(event) = event else { break };
                if let Some(line) = status.describe(&event) {
                    println!("{}", line);
                }
                if let Some(entry) = history.record(&event) {
                    println!("{} {}", entry.status.symbol(), entry.text);
                }
            }
            line = input.next_line(), if input_open => match line {
                Ok(Some(line)) => print_history_command(&line, &mut history),
                Ok(None) | Err(_) => input_open = false,
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    handle.shutdown().await;
    println!("{}", status::STOPPED);
    println!("Session: {}", history.summary());
    info!(entries = history.len(), "Stopped monitoring");
    Ok(())
}

/// Operator commands typed while monitoring.
fn print_history_command(line: &str, history: &mut SessionHistory) {
    match line.trim() {
        "history" if history.is_empty() => println!("No cards this session"),
        "history" => {
            for entry in history.entries() {
                println!("{} {}", entry.status.symbol(), entry.text);
            }
            println!("Session: {}", history.summary());
        }
        "clear" => {
            history.clear();
            println!("History cleared");
        }
        "" => {}
        other => println!("Unknown command: {} (try history or clear)", other),
    }
}

fn show_config(store: &ConfigStore) -> Result<()> {
    let config = store.load_or_default();
    println!("{}", serde_json::to_string_pretty(&config)?);
    println!("Endpoint: {}", endpoint_url(&config));
    Ok(())
}

fn set_config(args: &ServerArgs, store: &ConfigStore) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Nothing to set: pass --host, --port or --path");
    }

    let config = args
        .apply(&store.load_or_default())
        .context("Invalid server configuration")?;
    store
        .save(&config)
        .with_context(|| format!("Failed to save {}", store.path().display()))?;

    println!("Configuration saved");
    println!("Endpoint: {}", endpoint_url(&config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::parse_from(["shoe-monitor", "run"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.device, "/dev/ttyUSB0");
        assert_eq!(args.baud, 9600);
        assert!(args.server.is_empty());
        assert_eq!(cli.config, PathBuf::from("shoe.json"));
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::parse_from([
            "shoe-monitor",
            "run",
            "--device",
            "COM3",
            "--port",
            "9100",
            "--config",
            "other.json",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.device, "COM3");
        assert_eq!(cli.config, PathBuf::from("other.json"));

        let server = args.server.apply(&ServerConfig::default()).unwrap();
        assert_eq!(server.port, 9100);
        assert_eq!(server.host, "192.168.1.140");
    }

    #[test]
    fn test_apply_rejects_invalid_port() {
        let args = ServerArgs {
            port: Some("70000".to_string()),
            ..Default::default()
        };
        assert!(args.apply(&ServerConfig::default()).is_err());

        let args = ServerArgs {
            host: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(args.apply(&ServerConfig::default()).is_err());
    }

    #[test]
    fn test_history_commands() {
        let mut history = SessionHistory::new();
        history.record(&shoe_hardware::MonitorEvent::Card {
            text: "S4".to_string(),
            success: true,
        });

        print_history_command("history", &mut history);
        print_history_command("bogus", &mut history);
        assert_eq!(history.len(), 1);

        print_history_command(" clear\n", &mut history);
        assert!(history.is_empty());
        assert_eq!(history.summary(), "0 cards read, 0 failed reads");
    }

    #[test]
    fn test_config_set_parses() {
        let cli = Cli::parse_from(["shoe-monitor", "config", "set", "--host", "10.0.0.9"]);
        let Command::Config(ConfigCommand::Set(args)) = cli.command else {
            panic!("expected config set");
        };
        assert_eq!(args.host.as_deref(), Some("10.0.0.9"));
        assert!(args.port.is_none());
    }
}
