//! y2m: command-line front end for a yandex2mqtt configuration file.
//!
//! Opens a [`ConfigStore`] over the files in the base directory, runs one
//! command against it and prints the result as pretty JSON on stdout.  Logs
//! go to stderr so the output can be piped.
//!
//! # Usage
//!
//! ```text
//! y2m [--base-dir <DIR>] <COMMAND>
//!
//! Commands:
//!   devices list
//!   devices get <ID>
//!   devices create [--room <ROOM>] [--field KEY=VALUE]...
//!   devices update <ID> [--room <ROOM>] [--field KEY=VALUE]...
//!   devices delete <ID>
//!   rooms
//!   config show
//!   config save
//!   settings show
//!   settings set-path <PATH>
//! ```
//!
//! `--field` values are read as object-literal values when they parse
//! (`brightness=40`, `on=true`, `meta={ min: 1 }`) and as plain strings
//! otherwise (`name=Hall lamp`).
//!
//! # Environment variable overrides
//!
//! | Variable       | Default | Description                                   |
//! |----------------|---------|-----------------------------------------------|
//! | `Y2M_BASE_DIR` | `.`     | Directory holding `app-settings.json`         |
//! | `RUST_LOG`     | `info`  | `tracing` filter                              |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use y2m_core::{parse_literal, render_configuration, DeviceFields};
use y2m_manager::{ConfigStore, FileRepository, StorePaths};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Manage the devices of a yandex2mqtt configuration file.
#[derive(Debug, Parser)]
#[command(name = "y2m", about = "Device manager for yandex2mqtt config files", version)]
struct Cli {
    /// Directory holding `app-settings.json` and `attached_assets/`.
    #[arg(long, default_value = ".", env = "Y2M_BASE_DIR", global = true)]
    base_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List, inspect and edit devices.
    #[command(subcommand)]
    Devices(DevicesCommand),
    /// Print the distinct rooms, sorted.
    Rooms,
    /// Show or rewrite the configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Show or change the app settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Subcommand)]
enum DevicesCommand {
    List,
    Get { id: String },
    Create(FieldArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the configuration as `module.exports` text.
    Show,
    /// Write the loaded configuration back to its file.
    Save,
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    Show,
    /// Point the store at another configuration file.
    SetPath { path: String },
}

/// Device fields given on the command line.
#[derive(Debug, Args)]
struct FieldArgs {
    #[arg(long)]
    room: Option<String>,

    /// `KEY=VALUE`; repeatable.
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<FieldAssignment>,
}

#[derive(Debug, Clone, PartialEq)]
struct FieldAssignment {
    key: String,
    value: Value,
}

/// Parses `KEY=VALUE`.  The value is a literal when it parses, else a string.
fn parse_field(raw: &str) -> Result<FieldAssignment, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = parse_literal(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok(FieldAssignment {
        key: key.to_string(),
        value,
    })
}

impl FieldArgs {
    fn into_fields(self) -> DeviceFields {
        let mut fields: DeviceFields = self
            .fields
            .into_iter()
            .map(|field| (field.key, field.value))
            .collect();
        if let Some(room) = self.room {
            fields.insert("room".to_string(), Value::String(room));
        }
        fields
    }
}

// ── Command execution ─────────────────────────────────────────────────────────

/// What a command prints.
#[derive(Debug)]
enum Output {
    Json(Value),
    Text(String),
}

/// Writes the configuration as it stands in memory back to disk.
async fn persist(store: &mut ConfigStore) -> anyhow::Result<()> {
    let config = store.get_configuration().await;
    store
        .save_configuration(config)
        .await
        .with_context(|| format!("failed to save {}", store.config_path().display()))
}

async fn execute(store: &mut ConfigStore, command: Command) -> anyhow::Result<Output> {
    let output = match command {
        Command::Devices(DevicesCommand::List) => Output::Json(serde_json::to_value(store.get_devices())?),
        Command::Devices(DevicesCommand::Get { id }) => match store.get_device(&id) {
            Some(device) => Output::Json(serde_json::to_value(device)?),
            None => bail!("no device with id '{id}'"),
        },
        Command::Devices(DevicesCommand::Create(fields)) => {
            let device = store.create_device(fields.into_fields());
            persist(store).await?;
            info!("created device {}", device.id);
            Output::Json(serde_json::to_value(device)?)
        }
        Command::Devices(DevicesCommand::Update { id, fields }) => {
            let Some(device) = store.update_device(&id, fields.into_fields()) else {
                bail!("no device with id '{id}'");
            };
            persist(store).await?;
            Output::Json(serde_json::to_value(device)?)
        }
        Command::Devices(DevicesCommand::Delete { id }) => {
            if !store.delete_device(&id) {
                bail!("no device with id '{id}'");
            }
            persist(store).await?;
            Output::Json(serde_json::json!({ "deleted": id }))
        }
        Command::Rooms => Output::Json(serde_json::to_value(store.get_rooms())?),
        Command::Config(ConfigCommand::Show) => {
            let config = store.get_configuration().await;
            Output::Text(render_configuration(&config)?)
        }
        Command::Config(ConfigCommand::Save) => {
            persist(store).await?;
            Output::Json(serde_json::json!({ "saved": store.get_devices_file_path() }))
        }
        Command::Settings(SettingsCommand::Show) => {
            Output::Json(serde_json::to_value(store.get_app_settings())?)
        }
        Command::Settings(SettingsCommand::SetPath { path }) => {
            store.set_devices_file_path(path).await;
            Output::Json(serde_json::to_value(store.get_app_settings())?)
        }
    };
    Ok(output)
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Level is overridden by `RUST_LOG`; stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let repository = Arc::new(FileRepository::new(StorePaths::in_dir(&cli.base_dir)));
    let mut store = ConfigStore::open(repository).await;

    match execute(&mut store, cli.command).await? {
        Output::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Output::Text(text) => print!("{text}"),
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
