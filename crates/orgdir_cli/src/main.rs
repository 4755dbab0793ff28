//! Command-line front end for the organization directory.
//!
//! # Responsibility
//! - Map subcommands onto the core query services and print JSON results.
//!
//! # Invariants
//! - Exit code 0 on success, 2 on not-found, 1 on any other failure.

use clap::{Parser, Subcommand};
use log::error;
use orgdir_core::{
    init_logging, open_db, DirectoryConfig, GeoSearchService, OrganizationService, QueryError,
    SqliteActivityRepository, SqliteBuildingRepository, SqliteOrganizationRepository,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "orgdir", version, about = "Query the organization directory")]
struct Cli {
    /// Database file; overrides ORGDIR_DB_PATH. Logging still follows
    /// ORGDIR_LOG_LEVEL and ORGDIR_LOG_DIR.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one organization by id
    Get { id: String },
    /// Organizations whose title contains a fragment
    ByName { fragment: String },
    /// Organizations located in a building
    ByBuilding { building_id: String },
    /// Organizations linked to an activity by exact name
    ByActivity { name: String },
    /// Organizations linked to an activity, its parents or its children
    ByActivityTree { name: String },
    /// Organizations and buildings within a radius in meters
    Radius {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        radius: f64,
    },
    /// Organizations and buildings inside a lat/lon rectangle
    Rectangle {
        #[arg(allow_negative_numbers = true)]
        min_latitude: f64,
        #[arg(allow_negative_numbers = true)]
        min_longitude: f64,
        #[arg(allow_negative_numbers = true)]
        max_latitude: f64,
        #[arg(allow_negative_numbers = true)]
        max_longitude: f64,
    },
    /// Check core linkage
    Ping,
}

enum Failure {
    NotFound(String),
    Other(String),
}

impl From<QueryError> for Failure {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotFound(message) => Self::NotFound(message),
            other => Self::Other(other.to_string()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(Failure::NotFound(message)) => {
            eprintln!("not found: {message}");
            ExitCode::from(2)
        }
        Err(Failure::Other(message)) => {
            error!("event=cli_run module=cli status=error error={}", message);
            eprintln!("error: {message}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<String, Failure> {
    if let Commands::Ping = cli.command {
        return Ok(ping_line());
    }

    let config = DirectoryConfig::from_env_with_db(cli.db).map_err(other)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, &log_dir.to_string_lossy()).map_err(Failure::Other)?;
    }

    let conn = open_db(&config.db_path).map_err(other)?;
    let organizations = SqliteOrganizationRepository::try_new(&conn).map_err(other)?;
    let buildings = SqliteBuildingRepository::try_new(&conn).map_err(other)?;

    match cli.command {
        Commands::Radius {
            latitude,
            longitude,
            radius,
        } => {
            let service = GeoSearchService::new(organizations, buildings);
            render(&service.search_by_radius(latitude, longitude, radius)?)
        }
        Commands::Rectangle {
            min_latitude,
            min_longitude,
            max_latitude,
            max_longitude,
        } => {
            let service = GeoSearchService::new(organizations, buildings);
            render(&service.search_by_rectangle(
                min_latitude,
                min_longitude,
                max_latitude,
                max_longitude,
            )?)
        }
        Commands::Ping => Ok(ping_line()),
        lookup => {
            let activities = SqliteActivityRepository::try_new(&conn).map_err(other)?;
            let service = OrganizationService::new(organizations, buildings, activities);
            match lookup {
                Commands::Get { id } => render(&service.get_by_id(&id)?),
                Commands::ByName { fragment } => render(&service.get_by_name(&fragment)?),
                Commands::ByBuilding { building_id } => {
                    render(&service.list_by_building(&building_id)?)
                }
                Commands::ByActivity { name } => render(&service.list_by_activity_exact(&name)?),
                Commands::ByActivityTree { name } => {
                    render(&service.list_by_activity_tree(&name)?)
                }
                Commands::Radius { .. } | Commands::Rectangle { .. } | Commands::Ping => Err(
                    Failure::Other("command dispatched to the lookup service".to_string()),
                ),
            }
        }
    }
}

fn ping_line() -> String {
    format!(
        "orgdir_core ping={} version={}",
        orgdir_core::ping(),
        orgdir_core::core_version()
    )
}

fn other(err: impl std::fmt::Display) -> Failure {
    Failure::Other(err.to_string())
}

fn render<T: Serialize>(value: &T) -> Result<String, Failure> {
    serde_json::to_string_pretty(value).map_err(other)
}
