use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use savepoint_radio::catalog::{CatalogEntity, CatalogStore};
use savepoint_radio::radio::{SettingType, SettingsStore};
use savepoint_radio::store::SqliteRadioStore;
use savepoint_radio::user::{NewUser, UserManager, UserRole};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::{get_styles, print_key_value, print_success, TableBuilder};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Administers users, settings and the catalog of a radio database.
#[derive(Parser, Debug)]
#[command(styles = get_styles())]
struct CliArgs {
    /// Path to the radio database.
    #[clap(long, value_parser = parse_path)]
    pub db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EntityKind {
    Album,
    Artist,
    Game,
    Song,
}

impl EntityKind {
    fn entity(self, id: i64) -> CatalogEntity {
        match self {
            EntityKind::Album => CatalogEntity::Album(id),
            EntityKind::Artist => CatalogEntity::Artist(id),
            EntityKind::Game => CatalogEntity::Game(id),
            EntityKind::Song => CatalogEntity::Song(id),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Creates a user together with its radio profile.
    AddUser {
        handle: String,
        #[clap(long, default_value = "")]
        name: String,
        #[clap(long, default_value = "")]
        email: String,
        #[clap(long)]
        staff: bool,
        #[clap(long)]
        dj: bool,
    },

    /// Sets or replaces the password of a user.
    SetPassword { handle: String, password: String },

    /// Prints a fresh session token, e.g. for the DJ client.
    IssueToken { handle: String },

    /// Changes the staff and DJ flags of a user.
    SetFlags {
        handle: String,
        #[clap(long)]
        staff: Option<bool>,
        #[clap(long)]
        dj: Option<bool>,
    },

    /// Shows all users.
    ListUsers,

    /// Shows all radio settings.
    Settings,

    /// Changes a setting. New settings need a --type.
    SetSetting {
        name: String,
        value: String,
        /// Integer, Float, String or Bool
        #[clap(long = "type")]
        setting_type: Option<String>,
    },

    /// Disables a catalog object and the objects depending on it.
    Disable {
        kind: EntityKind,
        id: i64,
        #[clap(long)]
        reason: Option<String>,
    },

    /// Enables a catalog object, songs also re-enable what they belong to.
    Enable { kind: EntityKind, id: i64 },

    /// Publishes a catalog object, now unless a date is given.
    Publish {
        kind: EntityKind,
        id: i64,
        /// RFC 3339 date, e.g. 2024-01-31T12:00:00Z
        #[clap(long)]
        date: Option<DateTime<Utc>>,
    },
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn set_enabled(
    store: &SqliteRadioStore,
    entity: CatalogEntity,
    enabled: bool,
    reason: Option<&str>,
) -> Result<()> {
    let Some(outcome) = store.set_enabled(entity, enabled, reason)? else {
        bail!("{:?} not found", entity);
    };
    let verb = if enabled { "Enabled" } else { "Disabled" };
    print_success(&format!("{} {:?}", verb, entity));
    print_key_value("Songs", &outcome.songs.to_string());
    print_key_value("Albums", &outcome.albums.to_string());
    print_key_value("Artists", &outcome.artists.to_string());
    print_key_value("Games", &outcome.games.to_string());
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let store = SqliteRadioStore::new(&cli_args.db)
        .with_context(|| format!("Failed to open {:?}", cli_args.db))?;
    let user_manager = UserManager::new(Arc::new(store.clone()));

    match cli_args.command {
        Command::AddUser {
            handle,
            name,
            email,
            staff,
            dj,
        } => {
            let id = user_manager.add_user(&NewUser {
                handle: handle.clone(),
                name,
                email,
                is_staff: staff,
                is_dj: dj,
            })?;
            print_success(&format!("Created user {} with id {}", handle, id));
        }
        Command::SetPassword { handle, password } => {
            user_manager.set_password(&handle, &password)?;
            print_success(&format!("Password set for {}", handle));
        }
        Command::IssueToken { handle } => {
            let token = user_manager.issue_token_for_handle(&handle)?;
            println!("{}", token.value.0);
        }
        Command::SetFlags { handle, staff, dj } => {
            let user = user_manager.set_user_flags(&handle, staff, dj)?;
            print_key_value("Staff", &yes_no(user.is_staff));
            print_key_value("DJ", &yes_no(user.is_dj));
            print_key_value(
                "Role",
                &format!("{:?}", UserRole::from_flags(user.is_staff, user.is_dj)),
            );
        }
        Command::ListUsers => {
            let mut table = TableBuilder::new(vec!["ID", "Handle", "Role", "Active", "Last login"]);
            for user in user_manager.list_users()? {
                table.add_row(vec![
                    user.id.to_string(),
                    user.handle.clone(),
                    format!("{:?}", UserRole::from_flags(user.is_staff, user.is_dj)),
                    yes_no(user.is_active),
                    user.last_login
                        .map(|d| d.to_rfc3339())
                        .unwrap_or_else(|| "never".to_string()),
                ]);
            }
            table.print();
        }
        Command::Settings => {
            let mut table = TableBuilder::new(vec!["Name", "Type", "Value", "Description"]);
            for setting in store.list_settings()? {
                table.add_row(vec![
                    setting.name,
                    setting.setting_type.to_string(),
                    setting.data,
                    setting.description,
                ]);
            }
            table.print();
        }
        Command::SetSetting {
            name,
            value,
            setting_type,
        } => {
            let setting_type = setting_type
                .map(|t| t.parse::<SettingType>())
                .transpose()?;
            let setting = store.set_setting(&name, &value, setting_type)?;
            print_success(&format!(
                "{} = {} ({})",
                setting.name, setting.data, setting.setting_type
            ));
        }
        Command::Disable { kind, id, reason } => {
            set_enabled(&store, kind.entity(id), false, reason.as_deref())?;
        }
        Command::Enable { kind, id } => {
            set_enabled(&store, kind.entity(id), true, None)?;
        }
        Command::Publish { kind, id, date } => {
            let entity = kind.entity(id);
            let date = date.unwrap_or_else(Utc::now);
            if !store.set_published(entity, Some(date))? {
                bail!("{:?} not found", entity);
            }
            print_success(&format!("Published {:?} on {}", entity, date.to_rfc3339()));
        }
    }
    Ok(())
}
