//! Command-line surface of the operator console.
//!
//! One subcommand per configuration screen of the admin client, plus
//! the estimation workflow and roadway-network helpers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tetres-console",
    version,
    about = "Operator console for the TeTRES travel-time-reliability server"
)]
pub struct Cli {
    /// Analysis server base URL (overrides `TETRES_SERVER_URL`).
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Travel-time reliability routes
    Route {
        #[command(subcommand)]
        command: RouteCommand,
    },
    /// Work zone groups
    WzGroup {
        #[command(subcommand)]
        command: EntityCommand,
    },
    /// Work zones
    Workzone {
        #[command(subcommand)]
        command: EntityCommand,
    },
    /// Special events
    SpecialEvent {
        #[command(subcommand)]
        command: SpecialEventCommand,
    },
    /// Snow (plow truck) routes
    SnowRoute {
        #[command(subcommand)]
        command: EntityCommand,
    },
    /// Snow events
    SnowEvent {
        #[command(subcommand)]
        command: EntityCommand,
    },
    /// Snow management entries
    SnowMgmt {
        #[command(subcommand)]
        command: EntityCommand,
    },
    /// Administrative action log
    ActionLog {
        #[command(subcommand)]
        command: ActionLogCommand,
    },
    /// System configuration record
    Sysconfig {
        #[command(subcommand)]
        command: SysconfigCommand,
    },
    /// Estimation jobs
    Estimate {
        #[command(subcommand)]
        command: EstimateCommand,
    },
    /// Roadway network
    Infra {
        #[command(subcommand)]
        command: InfraCommand,
    },
}

/// The generic CRUD surface shared by every entity screen.
#[derive(Subcommand)]
pub enum EntityCommand {
    /// List records, optionally filtered to one year
    List {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show one record as JSON
    Show { id: i64 },
    /// Insert a record from a JSON file
    Add {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace a record from a JSON file
    Update {
        id: i64,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete records by id
    Delete { ids: Vec<i64> },
    /// List the years the server has records for
    Years,
}

#[derive(Subcommand)]
pub enum SpecialEventCommand {
    #[command(flatten)]
    Entity(EntityCommand),
    /// Bulk-import events from a CSV export
    /// (`Date,Start,End,Title,Type,Attendance,Lat,Lon`)
    ImportCsv { file: PathBuf },
}

#[derive(Subcommand)]
pub enum RouteCommand {
    #[command(flatten)]
    Entity(EntityCommand),
    /// Fetch the opposite-direction counterpart of a route
    Opposite { id: i64 },
    /// Resolve a route against the roadway network and print its
    /// polyline extent
    Path {
        id: i64,
        #[arg(long, default_value_t = 12)]
        zoom: u8,
    },
}

#[derive(Subcommand)]
pub enum ActionLogCommand {
    /// List log entries with their processing status
    List,
    /// Ask the server to re-run post-processing for unhandled changes
    Proceed,
}

#[derive(Subcommand)]
pub enum SysconfigCommand {
    /// Show the current configuration
    Show,
    /// Replace the configuration from a JSON file
    Set {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum EstimateCommand {
    /// Submit a job, wait for the result and download it
    Run {
        /// Reliability route ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        routes: Vec<i64>,
        /// Estimation request JSON file
        #[arg(long)]
        request: PathBuf,
    },
    /// Download the result archive of an already-finished job
    Download { uid: String },
}

#[derive(Subcommand)]
pub enum InfraCommand {
    /// Fetch the roadway-network snapshot and refresh the disk cache
    Sync,
    /// List corridors
    Corridors,
    /// Show one station with its map tile
    Station {
        station_id: String,
        #[arg(long, default_value_t = 14)]
        zoom: u8,
    },
}
