use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use savepoint_radio::config::{FileConfig, S3Settings, DEFAULT_RADIO_NAME};
use savepoint_radio::object_store::{download_object, upload_playlist, S3Client};
use savepoint_radio::playlist::{read_playlist, write_playlist};
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::{get_styles, print_error, print_success};

/// Uploads playlist audio to S3-compatible storage and fetches single objects.
#[derive(Parser, Debug)]
#[command(styles = get_styles())]
struct CliArgs {
    /// Path to a TOML config file with an [s3] section.
    #[clap(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Uploads every song of a playlist and writes the playlist with s3:// paths.
    Upload {
        playlist: PathBuf,

        #[clap(long, short, default_value = "playlist_s3.json")]
        output: PathBuf,
    },

    /// Downloads one object.
    Download {
        /// Object path, s3://bucket/key
        s3_path: String,

        /// Where to place the downloaded file.
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = FileConfig::load_optional(cli_args.config.as_deref())?;
    let settings = S3Settings::from_env(file_config.as_ref())?;
    let client = S3Client::new(&settings)?;

    match cli_args.command {
        Command::Upload { playlist, output } => {
            let Some(bucket) = settings.bucket.as_deref() else {
                bail!("S3 bucket missing, set [s3] bucket or S3_BUCKET");
            };
            let radio_name = file_config
                .as_ref()
                .and_then(|f| f.radio_name.clone())
                .unwrap_or_else(|| DEFAULT_RADIO_NAME.to_string());

            let mut parsed = read_playlist(&playlist)?;
            let totals = upload_playlist(&client, bucket, &mut parsed, &radio_name).await;
            println!("{}", totals);

            info!("Exporting new playlist file to {:?}", output);
            write_playlist(&output, &parsed)?;
        }
        Command::Download { s3_path, path } => {
            match download_object(&client, &s3_path, &path).await {
                Ok(_) => print_success(&format!("Downloaded {} to {}", s3_path, path.display())),
                Err(err) => {
                    error!("Download failed for: {} -- {:#}", s3_path, err);
                    print_error(&format!("Download failed: {:#}", err));
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
