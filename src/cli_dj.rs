use anyhow::Result;
use clap::{Parser, Subcommand};
use savepoint_radio::config::{DjCliConfig, DjSettings, FileConfig};
use savepoint_radio::dj::{annotate, DjClient};
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::get_styles;

/// Lets the DJ control the radio.
#[derive(Parser, Debug)]
#[command(styles = get_styles())]
struct CliArgs {
    /// Path to a TOML config file with a [dj] section.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the radio API, e.g. https://radio.example.com/api/
    #[clap(long)]
    pub api_url: Option<String>,

    /// The DJ's session token.
    #[clap(long)]
    pub token: Option<String>,

    /// Seconds before a request is abandoned.
    #[clap(long)]
    pub timeout_sec: Option<u64>,

    /// Name shown as artist and game of jingles.
    #[clap(long)]
    pub radio_name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Gets the next song from the radio.
    Next,

    /// Tells the radio which song just played.
    Played {
        /// Song request ID number.
        request: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // Logs go to stderr, stdout belongs to the annotate line.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = FileConfig::load_optional(cli_args.config.as_deref())?;
    let cli = DjCliConfig {
        api_url: cli_args.api_url,
        token: cli_args.token,
        timeout_sec: cli_args.timeout_sec,
        radio_name: cli_args.radio_name,
    };
    let settings = DjSettings::resolve(&cli, file_config)?;
    let client = DjClient::new(&settings)?;

    // Failures are printed, the exit status stays zero.
    match cli_args.command {
        Command::Next => match client.next().await {
            Ok(queued) => {
                info!("Next request {}", queued.id);
                println!("{}", annotate(&queued, &settings.radio_name));
            }
            Err(err) => {
                error!("Could not get the next song: {}", err);
                println!("{}", err);
            }
        },
        Command::Played { request } => match client.played(request).await {
            Ok(()) => info!("Reported request {} as played", request),
            Err(err) => {
                error!("Could not report request {}: {}", request, err);
                println!("{}", err);
            }
        },
    }
    Ok(())
}
