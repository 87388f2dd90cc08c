mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cloudapi::disk::{
    DiskCreate, DiskDelete, DiskGet, DiskItem, DiskList, DiskListResult, DiskMetrics, DiskUpdate,
};
use cloudapi::service_account::{
    ServiceAccountCreate, ServiceAccountCreateKey, ServiceAccountDelete, ServiceAccountDeleteKey,
    ServiceAccountGet, ServiceAccountGetResult, ServiceAccountList, ServiceAccountListResult,
    ServiceAccountUpdate,
};
use cloudapi::{Empty, Table, Validate};
use config::Config;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Validate disk and service-account requests and render results
#[derive(Parser, Debug)]
#[command(name = "cloudapi", version, about, long_about = None)]
struct Args {
    /// Project to use when a request leaves it empty
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Location to use when a request leaves it empty
    #[arg(short, long, global = true)]
    location: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a request document (JSON or YAML) and print it normalized
    Validate {
        kind: RequestKind,
        /// Request file, stdin when omitted
        file: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "yaml")]
        output: OutputFormat,
    },
    /// Render a result document (JSON or YAML) as a table
    Table {
        kind: ResultKind,
        /// Result file, stdin when omitted
        file: Option<PathBuf>,
        /// Table width in columns
        #[arg(short, long, default_value_t = 120)]
        width: u16,
    },
    /// Show or change stored defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    SetProject { project: String },
    SetLocation { location: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RequestKind {
    DiskCreate,
    DiskGet,
    DiskList,
    DiskUpdate,
    DiskDelete,
    DiskMetrics,
    ServiceAccountCreate,
    ServiceAccountGet,
    ServiceAccountList,
    ServiceAccountUpdate,
    ServiceAccountDelete,
    ServiceAccountCreateKey,
    ServiceAccountDeleteKey,
}

impl RequestKind {
    /// Kinds that need a location; a disk listing spans every location unless narrowed
    fn has_location(self) -> bool {
        matches!(
            self,
            RequestKind::DiskCreate
                | RequestKind::DiskGet
                | RequestKind::DiskUpdate
                | RequestKind::DiskDelete
                | RequestKind::DiskMetrics
        )
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResultKind {
    Empty,
    Disk,
    DiskList,
    ServiceAccount,
    ServiceAccountList,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cloudapi started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cloudapi").join("cloudapi.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cloudapi").join("cloudapi.log");
    }
    PathBuf::from("cloudapi.log")
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();

    match args.command {
        Command::Validate { kind, ref file, output } => {
            let mut doc = read_document(file.as_deref())?;
            apply_defaults(&mut doc, kind, &config, &args);
            validate_document(kind, doc, output)
        }
        Command::Table {
            kind,
            ref file,
            width,
        } => {
            let doc = read_document(file.as_deref())?;
            render_document(kind, doc, width)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { ref action } => {
            match action {
                ConfigAction::Show => println!("{}", serde_yaml::to_string(&config)?),
                ConfigAction::SetProject { project } => config.set_project(project)?,
                ConfigAction::SetLocation { location } => config.set_location(location)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Read a JSON or YAML document from a file or stdin
fn read_document(file: Option<&Path>) -> Result<Value> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let trimmed = content.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(&content).context("Failed to parse JSON document")
    } else {
        serde_yaml::from_str(&content).context("Failed to parse YAML document")
    }
}

/// Fill an empty project/location from flags, config or environment
fn apply_defaults(doc: &mut Value, kind: RequestKind, config: &Config, args: &Args) {
    let Value::Object(map) = doc else {
        return;
    };

    let mut fill = |key: &str, value: Option<String>| {
        let missing = map
            .get(key)
            .map(|v| v.is_null() || v.as_str() == Some(""))
            .unwrap_or(true);
        if let (true, Some(value)) = (missing, value) {
            tracing::debug!("Defaulting {} to {}", key, value);
            map.insert(key.to_string(), Value::String(value));
        }
    };

    fill("project", config.effective_project(args.project.as_deref()));
    if kind.has_location() {
        fill("location", config.effective_location(args.location.as_deref()));
    }
}

fn validate_document(kind: RequestKind, doc: Value, output: OutputFormat) -> Result<ExitCode> {
    match kind {
        RequestKind::DiskCreate => check::<DiskCreate>(doc, output),
        RequestKind::DiskGet => check::<DiskGet>(doc, output),
        RequestKind::DiskList => check::<DiskList>(doc, output),
        RequestKind::DiskUpdate => check::<DiskUpdate>(doc, output),
        RequestKind::DiskDelete => check::<DiskDelete>(doc, output),
        RequestKind::DiskMetrics => check::<DiskMetrics>(doc, output),
        RequestKind::ServiceAccountCreate => check::<ServiceAccountCreate>(doc, output),
        RequestKind::ServiceAccountGet => check::<ServiceAccountGet>(doc, output),
        RequestKind::ServiceAccountList => check::<ServiceAccountList>(doc, output),
        RequestKind::ServiceAccountUpdate => check::<ServiceAccountUpdate>(doc, output),
        RequestKind::ServiceAccountDelete => check::<ServiceAccountDelete>(doc, output),
        RequestKind::ServiceAccountCreateKey => check::<ServiceAccountCreateKey>(doc, output),
        RequestKind::ServiceAccountDeleteKey => check::<ServiceAccountDeleteKey>(doc, output),
    }
}

fn check<M>(doc: Value, output: OutputFormat) -> Result<ExitCode>
where
    M: Validate + DeserializeOwned + Serialize,
{
    let mut m: M = serde_json::from_value(doc).context("Request does not match the expected shape")?;

    match m.validate() {
        Ok(()) => {
            let out = match output {
                OutputFormat::Json => serde_json::to_string_pretty(&m)?,
                OutputFormat::Yaml => serde_yaml::to_string(&m)?,
            };
            println!("{}", out.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Err(cloudapi::Error::Validation(errs)) => {
            for err in errs.iter() {
                eprintln!("{}: {}", err.field, err.message);
            }
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            eprintln!("{}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn render_document(kind: ResultKind, doc: Value, width: u16) -> Result<()> {
    match kind {
        ResultKind::Empty => show::<Empty>(doc, width),
        ResultKind::Disk => show::<DiskItem>(doc, width),
        ResultKind::DiskList => show::<DiskListResult>(doc, width),
        ResultKind::ServiceAccount => show::<ServiceAccountGetResult>(doc, width),
        ResultKind::ServiceAccountList => show::<ServiceAccountListResult>(doc, width),
    }
}

fn show<R: Table + DeserializeOwned>(doc: Value, width: u16) -> Result<()> {
    let result: R = serde_json::from_value(doc).context("Result does not match the expected shape")?;
    println!("{}", cloudapi::table::render(&result, width));
    Ok(())
}
