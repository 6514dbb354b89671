use anyhow::{Context, Result};
use clap::Parser;
use savepoint_radio::config::{AppConfig, CliConfig, FileConfig};
use savepoint_radio::{run_server, RequestsLoggingLevel, ServerConfig, SqliteRadioStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite radio database file, created if missing.
    #[clap(value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file, its values override the arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Rows per page on paginated listings.
    #[clap(long)]
    pub page_size: Option<usize>,

    /// Name of the radio, used for jingles.
    #[clap(long)]
    pub radio_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = FileConfig::load_optional(cli_args.config.as_deref())?;
    let cli = CliConfig {
        db_path: cli_args.db_path,
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        page_size: cli_args.page_size,
        radio_name: cli_args.radio_name,
    };
    let app_config = AppConfig::resolve(&cli, file_config)?;

    info!("Opening SQLite radio database at {:?}...", app_config.db_path);
    let store = Arc::new(SqliteRadioStore::new(&app_config.db_path)?);

    info!("Ready to serve at port {}!", app_config.port);
    run_server(
        ServerConfig {
            requests_logging_level: app_config.logging_level,
            port: app_config.port,
            page_size: app_config.page_size,
            radio_name: app_config.radio_name,
        },
        store,
    )
    .await
}
