//! vetclinic - command-line console for the VetClinic REST backend.

mod commands;
mod console;
mod output;

use clap::{Parser, Subcommand};
use clinic_config::{init_logging, Config, Paths};
use commands::resources::Payload;
use console::Console;
use std::path::PathBuf;
use tracing::debug;

/// VetClinic console - manage the session and clinic records from a terminal.
#[derive(Parser)]
#[command(name = "vetclinic")]
#[command(about = "VetClinic console for sessions, clinic records and access checks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error). Defaults to the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Base directory for tokens, config and logs. Defaults to ~/.vetclinic
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// REST API root, e.g. http://localhost:8081/api
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with username and password
    Login {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Status,

    /// Create a staff account (password is prompted)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "")]
        email: String,
        /// Specialization id, see `vetclinic specializations`
        #[arg(long)]
        specialization: i64,
    },

    /// List the specializations offered at registration
    Specializations,

    /// List one page of a collection
    List {
        /// Collection name, e.g. owners, patients, medications
        resource: String,
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size. Defaults to the configured size
        #[arg(long)]
        size: Option<u32>,
        /// Only show rows matching this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one record
    Get { resource: String, id: i64 },

    /// Create a record
    Create {
        resource: String,
        #[command(flatten)]
        payload: Payload,
    },

    /// Replace a record
    Update {
        resource: String,
        id: i64,
        #[command(flatten)]
        payload: Payload,
    },

    /// Delete a record
    Delete { resource: String, id: i64 },

    /// List the diagnoses recorded for a patient
    Diagnoses {
        /// Patient id
        #[arg(long)]
        patient: i64,
    },

    /// Check whether the current session may open a console route
    CanOpen {
        /// Route path, e.g. /owners
        route: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let mut config = Config::load(&paths)?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
        config.validate()?;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logging(&config.log_level, &paths);
    debug!(api = %config.api_base_url, "Starting vetclinic");

    let console = Console::new(paths, config)?;
    let format = cli.format;

    let result = match cli.command {
        Commands::Login { username } => commands::auth::login(&console, username, &format).await,
        Commands::Logout => commands::auth::logout(&console, &format),
        Commands::Status => commands::auth::status(&console, &format).await,
        Commands::Register {
            username,
            first_name,
            last_name,
            email,
            specialization,
        } => {
            let form = commands::auth::RegisterArgs {
                username,
                first_name,
                last_name,
                email,
                specialization,
            };
            commands::auth::register(&console, form, &format).await
        }
        Commands::Specializations => commands::auth::specializations(&console, &format).await,
        Commands::List {
            resource,
            page,
            size,
            search,
        } => commands::resources::list(&console, &resource, page, size, search, &format).await,
        Commands::Get { resource, id } => commands::resources::get(&console, &resource, id).await,
        Commands::Create { resource, payload } => {
            commands::resources::create(&console, &resource, &payload, &format).await
        }
        Commands::Update {
            resource,
            id,
            payload,
        } => commands::resources::update(&console, &resource, id, &payload, &format).await,
        Commands::Delete { resource, id } => {
            commands::resources::delete(&console, &resource, id, &format).await
        }
        Commands::Diagnoses { patient } => {
            commands::resources::diagnoses(&console, patient, &format).await
        }
        Commands::CanOpen { route } => commands::routes::can_open(&console, &route, &format).await,
    };

    if let Err(err) = result {
        output::print_error(&format!("{:#}", err), &format);
        std::process::exit(1);
    }

    Ok(())
}
