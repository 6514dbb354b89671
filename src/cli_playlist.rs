use anyhow::Result;
use clap::{Parser, Subcommand};
use savepoint_radio::playlist::{export_legacy, import_playlist, read_playlist, write_playlist};
use savepoint_radio::store::SqliteRadioStore;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::{get_styles, print_success};

/// Moves playlists between the legacy database, JSON and the radio database.
#[derive(Parser, Debug)]
#[command(styles = get_styles())]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exports a legacy playlist database to JSON.
    Export {
        /// Legacy SQLite database.
        legacy_db: PathBuf,

        #[clap(long, short, default_value = "playlist.json")]
        output: PathBuf,
    },

    /// Imports a JSON playlist into the radio database.
    Import {
        playlist: PathBuf,

        /// Radio database, created if missing.
        #[clap(long)]
        db: PathBuf,

        /// Publish every imported object right away.
        #[clap(long)]
        publish: bool,
    },
}

fn main() -> Result<()> {
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

    match cli_args.command {
        Command::Export { legacy_db, output } => {
            info!("Exporting {:?}", legacy_db);
            let (playlist, totals) = export_legacy(&legacy_db)?;
            for line in totals.report("Exported") {
                println!("{}", line);
            }
            write_playlist(&output, &playlist)?;
            print_success(&format!("Playlist written to {}", output.display()));
        }
        Command::Import {
            playlist,
            db,
            publish,
        } => {
            let parsed = read_playlist(&playlist)?;
            let store = SqliteRadioStore::new(&db)?;
            let totals = import_playlist(&store, &parsed, publish)?;
            for line in totals.report("Imported") {
                println!("{}", line);
            }
            print_success(&format!("Playlist imported into {}", db.display()));
        }
    }
    Ok(())
}
