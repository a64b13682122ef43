//! WMATA CLI
//!
//! Command-line interface for encoding geographic queries and calling the
//! WMATA radius endpoints.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod settings;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use domain::{Coordinates, QueryItems, RadiusAtCoordinates};
use integration_wmata::{HttpWmataClient, RadiusEndpoint, WmataClient};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// WMATA CLI
#[derive(Parser)]
#[command(name = "wmata-cli")]
#[command(author, version, about = "WMATA transit API client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./wmata.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API subscription key
    #[arg(long, global = true, env = "WMATA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the query parameters for a point or search area
    Encode {
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in meters
        #[arg(long)]
        radius: Option<u32>,

        /// Print the pairs as JSON instead of a query string
        #[arg(long)]
        json: bool,
    },

    /// Query a radius endpoint around a point
    Nearby {
        /// What to search for
        #[arg(value_enum)]
        kind: NearbyKind,

        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in meters
        #[arg(long, default_value_t = 500)]
        radius: u32,
    },

    /// Report whether a point lies within a search area
    ///
    /// Exits with status 1 when the point is outside the radius.
    Within {
        /// Latitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in meters
        #[arg(long, default_value_t = 500)]
        radius: u32,

        /// Latitude of the point to test
        #[arg(long, allow_negative_numbers = true)]
        point_lat: f64,

        /// Longitude of the point to test
        #[arg(long, allow_negative_numbers = true)]
        point_lon: f64,
    },

    /// Check whether the API is reachable
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NearbyKind {
    /// Rail station entrances
    Entrances,
    /// Bus stops
    BusStops,
    /// Live bus positions
    BusPositions,
}

impl From<NearbyKind> for RadiusEndpoint {
    fn from(kind: NearbyKind) -> Self {
        match kind {
            NearbyKind::Entrances => Self::StationEntrances,
            NearbyKind::BusStops => Self::BusStops,
            NearbyKind::BusPositions => Self::BusPositions,
        }
    }
}

impl Cli {
    fn overrides(&self) -> settings::Overrides {
        settings::Overrides {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Get log filter string from verbosity level
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Encode query items as a URL query string
fn query_string(items: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(items)
        .finish()
}

/// Query items for a point, with an optional radius
fn encode(lat: f64, lon: f64, radius: Option<u32>) -> Vec<(String, String)> {
    let coordinates = Coordinates::new(lat, lon);
    match radius {
        Some(radius) => RadiusAtCoordinates::new(radius, coordinates).query_items(),
        None => coordinates.query_items(),
    }
}

/// Query a radius endpoint and print the JSON body
///
/// On failure the `{statusCode, message}` envelope goes to `err_out` and the
/// exit code is `FAILURE`.
async fn run_nearby(
    client: &impl WmataClient,
    endpoint: RadiusEndpoint,
    area: &RadiusAtCoordinates,
    out: &mut impl Write,
    err_out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    info!(%area, %endpoint, "Querying nearby");

    match client.get_near(endpoint, area).await {
        Ok(body) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
            Ok(ExitCode::SUCCESS)
        },
        Err(e) => {
            error!(error = %e, transient = e.is_transient(), "Request failed");
            writeln!(err_out, "{}", serde_json::to_string(&e)?)?;
            Ok(ExitCode::FAILURE)
        },
    }
}

async fn run_health(
    client: &impl WmataClient,
    base_url: &str,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    if client.is_healthy().await {
        writeln!(out, "✅ {base_url} is reachable")?;
        Ok(ExitCode::SUCCESS)
    } else {
        writeln!(out, "❌ {base_url} is not reachable")?;
        Ok(ExitCode::FAILURE)
    }
}

/// Print the distance from the area's center to `point`
fn run_within(
    area: &RadiusAtCoordinates,
    point: &Coordinates,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let distance = area.coordinates().distance_m(point);
    let inside = area.contains(point);
    let verdict = if inside { "within" } else { "outside" };
    writeln!(out, "{point} is {distance:.1}m from the center, {verdict} {area}")?;

    Ok(if inside {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(cli.verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = cli.overrides();
    let config_path = cli.config.clone();

    match cli.command {
        Commands::Encode {
            lat,
            lon,
            radius,
            json,
        } => {
            let items = encode(lat, lon, radius);
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                println!("{}", query_string(&items));
            }
            Ok(ExitCode::SUCCESS)
        },

        Commands::Nearby {
            kind,
            lat,
            lon,
            radius,
        } => {
            let config = settings::load(config_path.as_deref(), &overrides)?;
            debug!(?config, "Loaded configuration");
            let client = HttpWmataClient::new(&config)?;

            let area = RadiusAtCoordinates::from_lat_lon(radius, lat, lon);
            run_nearby(
                &client,
                kind.into(),
                &area,
                &mut std::io::stdout(),
                &mut std::io::stderr(),
            )
            .await
        },

        Commands::Within {
            lat,
            lon,
            radius,
            point_lat,
            point_lon,
        } => {
            let area = RadiusAtCoordinates::from_lat_lon(radius, lat, lon);
            run_within(
                &area,
                &Coordinates::new(point_lat, point_lon),
                &mut std::io::stdout(),
            )
        },

        Commands::Health => {
            let config = settings::load(config_path.as_deref(), &overrides)?;
            let client = HttpWmataClient::new(&config)?;
            run_health(&client, &config.base_url, &mut std::io::stdout()).await
        },
    }
}
