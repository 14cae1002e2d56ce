mod cli;
mod commands;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tetres_client::{
    ensure_envelope_success, ApiUrls, ClientConfig, EntityClient, EstimationClient, FormData,
    HttpGateway, InfraLoader, InfraSource, JobEvent, ReliabilityRouteClient, SystemConfigClient,
};
use tetres_core::actionlog::ActionLogInfo;
use tetres_core::estimation::EstimationRequestInfo;
use tetres_core::snow::{SnowEventInfo, SnowManagementInfo, SnowRouteInfo};
use tetres_core::specialevent::SpecialEventInfo;
use tetres_core::sysconfig::SystemConfigInfo;
use tetres_core::workzone::{WorkZoneGroupInfo, WorkZoneInfo};
use tetres_map::{osm_tile_url, RoutePath, TileCoord, OSM_TILE_URL};

use cli::{
    ActionLogCommand, Cli, Command, EstimateCommand, InfraCommand, RouteCommand,
    SpecialEventCommand, SysconfigCommand,
};
use commands::{read_json, run_entity};

/// Shared handles every command needs.
struct App {
    config: ClientConfig,
    gateway: Arc<HttpGateway>,
    urls: ApiUrls,
}

impl App {
    fn new(server_override: Option<String>) -> anyhow::Result<Self> {
        let mut config = ClientConfig::from_env();
        if let Some(server) = server_override {
            config.server_url = server;
        }
        let gateway = Arc::new(HttpGateway::new(&config)?);
        let urls = ApiUrls::new(&config.server_url);
        Ok(Self {
            config,
            gateway,
            urls,
        })
    }

    fn infra_loader(&self) -> InfraLoader {
        InfraLoader::new(
            Arc::clone(&self.gateway),
            &self.urls,
            self.config.cache_dir(),
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tetres=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let app = App::new(cli.server.clone())?;
    tracing::debug!(server = %app.config.server_url, "Console configured");

    match cli.command {
        Command::Route { command } => run_route(&app, command).await,
        Command::WzGroup { command } => {
            let client = EntityClient::<WorkZoneGroupInfo>::new(
                Arc::clone(&app.gateway),
                app.urls.workzone_group(),
            );
            run_entity(client, command).await
        }
        Command::Workzone { command } => {
            let client =
                EntityClient::<WorkZoneInfo>::new(Arc::clone(&app.gateway), app.urls.workzone());
            run_entity(client, command).await
        }
        Command::SpecialEvent { command } => run_special_event(&app, command).await,
        Command::SnowRoute { command } => {
            let client =
                EntityClient::<SnowRouteInfo>::new(Arc::clone(&app.gateway), app.urls.snow_route());
            run_entity(client, command).await
        }
        Command::SnowEvent { command } => {
            let client =
                EntityClient::<SnowEventInfo>::new(Arc::clone(&app.gateway), app.urls.snow_event());
            run_entity(client, command).await
        }
        Command::SnowMgmt { command } => {
            let client = EntityClient::<SnowManagementInfo>::new(
                Arc::clone(&app.gateway),
                app.urls.snow_management(),
            );
            run_entity(client, command).await
        }
        Command::ActionLog { command } => run_action_log(&app, command).await,
        Command::Sysconfig { command } => run_sysconfig(&app, command).await,
        Command::Estimate { command } => run_estimate(&app, command).await,
        Command::Infra { command } => run_infra(&app, command).await,
    }
}

async fn run_route(app: &App, command: RouteCommand) -> anyhow::Result<()> {
    let client = ReliabilityRouteClient::new(Arc::clone(&app.gateway), &app.urls);
    match command {
        RouteCommand::Entity(command) => run_entity(Arc::clone(client.entities()), command).await,
        RouteCommand::Opposite { id } => {
            let opposite = client.opposite_route(id).await?;
            println!("{}", serde_json::to_string_pretty(&opposite)?);
            Ok(())
        }
        RouteCommand::Path { id, zoom } => {
            let record = client.entities().get(id).await?;
            let route = record
                .route
                .ok_or_else(|| anyhow::anyhow!("route #{id} carries no rnode list"))?;

            let (infra, _) = app.infra_loader().load().await?;
            let path = RoutePath::from_route(&infra, &route)?;
            println!("{} waypoint(s)", path.waypoints.len());
            if let Some(bbox) = path.bounding_box() {
                let (lat, lon) = bbox.center();
                println!(
                    "extent: ({:.4}, {:.4}) .. ({:.4}, {:.4})",
                    bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
                );
                println!(
                    "center tile: {}",
                    osm_tile_url(OSM_TILE_URL, TileCoord::containing(lat, lon, zoom))
                );
            }
            Ok(())
        }
    }
}

async fn run_special_event(app: &App, command: SpecialEventCommand) -> anyhow::Result<()> {
    let client =
        EntityClient::<SpecialEventInfo>::new(Arc::clone(&app.gateway), app.urls.special_event());
    match command {
        SpecialEventCommand::Entity(command) => run_entity(client, command).await,
        SpecialEventCommand::ImportCsv { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let mut events = Vec::new();
            for (lineno, line) in raw.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() || (lineno == 0 && line.starts_with("Date")) {
                    continue;
                }
                let fields: Vec<&str> = line.split(',').map(str::trim).collect();
                let event = SpecialEventInfo::from_csv_row(&fields)
                    .map_err(|e| anyhow::anyhow!("line {}: {e}", lineno + 1))?;
                events.push(event);
            }
            anyhow::ensure!(!events.is_empty(), "no events found in {}", file.display());

            client.insert_all(&events).await?;
            println!("imported {} special event(s)", events.len());
            Ok(())
        }
    }
}

async fn run_action_log(app: &App, command: ActionLogCommand) -> anyhow::Result<()> {
    match command {
        ActionLogCommand::List => {
            let client =
                EntityClient::<ActionLogInfo>::new(Arc::clone(&app.gateway), app.urls.action_log());
            client.refresh().await?;
            let entries = client.cached().await;
            println!("{} log entries", entries.len());
            for entry in &entries {
                println!(
                    "{:>8}  {:8} {:16} {}",
                    entry.id.unwrap_or_default(),
                    entry.action_type.as_deref().unwrap_or("-"),
                    entry.target_datatype.as_deref().unwrap_or("-"),
                    entry.status_label(),
                );
            }
            Ok(())
        }
        ActionLogCommand::Proceed => {
            let envelope = app
                .gateway
                .post_form::<serde_json::Value>(&app.urls.action_log_proceed(), &FormData::new())
                .await?;
            ensure_envelope_success(&envelope)?;
            println!("post-processing triggered");
            Ok(())
        }
    }
}

async fn run_sysconfig(app: &App, command: SysconfigCommand) -> anyhow::Result<()> {
    let client = SystemConfigClient::new(Arc::clone(&app.gateway), &app.urls);
    match command {
        SysconfigCommand::Show => {
            let config = client.get().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        SysconfigCommand::Set { file } => {
            let config: SystemConfigInfo = read_json(&file)?;
            config.check()?;
            client.update(&config).await?;
            println!("system configuration updated");
        }
    }
    Ok(())
}

async fn run_estimate(app: &App, command: EstimateCommand) -> anyhow::Result<()> {
    let client = EstimationClient::new(Arc::clone(&app.gateway), app.urls.clone(), &app.config);
    match command {
        EstimateCommand::Run { routes, request } => {
            let request: EstimationRequestInfo = read_json(&request)?;

            // Ctrl-C stops the wait, not the server-side job.
            let cancel = CancellationToken::new();
            let ctrlc = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrlc.cancel();
                }
            });

            let mut events = client.subscribe();
            tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    match event {
                        JobEvent::Submitted { uid } => println!("job {uid} submitted"),
                        JobEvent::Polled { attempt, .. } => {
                            println!("  still running (poll {attempt})")
                        }
                        JobEvent::Ready { uid } => println!("job {uid} finished, downloading"),
                        _ => {}
                    }
                }
            });

            let output_dir = client.estimate(&routes, &request, &cancel).await?;
            println!("results extracted to {}", output_dir.display());
        }
        EstimateCommand::Download { uid } => {
            let output_dir = client.download(&uid).await?;
            println!("results extracted to {}", output_dir.display());
        }
    }
    Ok(())
}

async fn run_infra(app: &App, command: InfraCommand) -> anyhow::Result<()> {
    let loader = app.infra_loader();
    let (infra, source) = loader.load().await?;
    if source == InfraSource::Cache {
        eprintln!("warning: server unreachable, using cached roadway network");
    }

    match command {
        InfraCommand::Sync => {
            println!(
                "roadway network loaded: {} corridor(s), stamp {}",
                infra.corridors().len(),
                infra.config_stamp().unwrap_or("unknown"),
            );
        }
        InfraCommand::Corridors => {
            for corridor in infra.corridors() {
                println!(
                    "{:20} {:4} {:5} station(s)",
                    corridor.name,
                    corridor.dir,
                    corridor.stations.len()
                );
            }
        }
        InfraCommand::Station { station_id, zoom } => {
            let rnode = infra
                .rnode_by_station_id(&station_id)
                .ok_or_else(|| anyhow::anyhow!("unknown station {station_id}"))?;
            println!("{}", rnode.display_label());
            println!("  corridor: {}", rnode.corridor);
            println!("  position: ({:.5}, {:.5})", rnode.lat, rnode.lon);
            if let Some(lanes) = rnode.lanes {
                println!("  lanes: {lanes}");
            }
            if let Some(s_limit) = rnode.s_limit {
                println!("  speed limit: {s_limit}");
            }
            if !rnode.detectors.is_empty() {
                println!("  detectors: {}", rnode.detectors.join(", "));
            }
            println!(
                "  tile: {}",
                osm_tile_url(OSM_TILE_URL, TileCoord::containing(rnode.lat, rnode.lon, zoom))
            );
        }
    }
    Ok(())
}
