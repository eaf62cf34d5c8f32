use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use weathercard::{
    Coordinates, FixedPosition, IpGeolocation, LocationQuery, LocationResolver, PositionProvider,
    RequestOutcome, WeatherApiClient, WeatherCardConfig, WeatherCardError, WeatherSession,
    logging, render,
};

/// Current weather and a daily forecast for your location
#[derive(Debug, Parser)]
#[command(name = "weathercard", version, about)]
struct Cli {
    /// City name, or "lat,lon"
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    city: Option<String>,

    /// Latitude; requires --lon
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude; requires --lat
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Keep reading city names from stdin after the first card
    #[arg(short, long)]
    interactive: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file (TOML)
    #[arg(short, long, env = "WEATHERCARD_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

struct App {
    client: WeatherApiClient,
    session: Arc<WeatherSession>,
    tz: Option<Tz>,
    days: usize,
    json: bool,
}

impl App {
    /// Fetch `query` under a fresh ticket and print the card if it was applied
    async fn show(&self, query: LocationQuery) -> RequestOutcome {
        let ticket = self.session.begin();
        let outcome = self
            .session
            .run(ticket, self.client.fetch_report(&query, self.tz))
            .await;

        if outcome.is_applied() {
            self.print();
        }
        outcome
    }

    fn print(&self) {
        let Some(report) = self.session.snapshot().report else {
            return;
        };

        if self.json {
            match render::render_json(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => error!("Failed to serialize report: {}", e),
            }
        } else {
            print!("{}", render::render_card(&report, self.days));
        }
    }
}

fn position_provider(
    cli: &Cli,
    config: &WeatherCardConfig,
    client: &WeatherApiClient,
) -> Result<Box<dyn PositionProvider>> {
    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        return Ok(Box::new(FixedPosition(Coordinates::new(lat, lon)?)));
    }
    if let Some(coords) = config.location.fixed_coordinates()? {
        return Ok(Box::new(FixedPosition(coords)));
    }
    Ok(Box::new(IpGeolocation::new(
        config.location.geolocation_url.clone(),
        client.timeout(),
    )?))
}

async fn interactive(app: Arc<App>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<JoinHandle<RequestOutcome>> = None;

    eprintln!("Enter a city and press Enter (Ctrl-D to quit)");
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let city = line.trim();
        if city.is_empty() {
            continue;
        }

        let query = match weathercard::LocationParser::parse(city) {
            Ok(query) => query,
            Err(e) => {
                error!("{}", e);
                continue;
            }
        };

        if let Some(previous) = in_flight.take() {
            previous.abort();
        }

        info!("Fetching weather for: {}", query);
        let app = Arc::clone(&app);
        in_flight = Some(tokio::spawn(async move { app.show(query).await }));
    }

    if let Some(last) = in_flight {
        let _ = last.await;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = WeatherCardConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose);
    debug!("Configuration loaded: {:?}", config.display);

    let client = WeatherApiClient::new(config.weather.clone())?;
    let provider = position_provider(&cli, &config, &client)?;
    let session = Arc::new(WeatherSession::new(client.timeout()));

    let app = Arc::new(App {
        client,
        session,
        tz: config.display.time_zone()?,
        days: config.display.forecast_days as usize,
        json: cli.json,
    });

    let input = cli.city.clone().or(config.location.default_city.clone());
    let mut displayed = false;
    let mut failure: Option<WeatherCardError> = None;

    match LocationResolver::resolve(input.as_deref(), provider.as_ref()).await {
        Ok(query) => match app.show(query).await {
            RequestOutcome::Applied => displayed = true,
            RequestOutcome::Failed(e) => failure = Some(e),
            RequestOutcome::TimedOut | RequestOutcome::Superseded => {}
        },
        Err(e) => {
            error!("Error getting location: {}", e);
            failure = Some(e);
        }
    }

    if cli.interactive {
        return interactive(app).await;
    }

    if !displayed {
        if let Some(e) = failure {
            eprintln!("{}", e.user_message());
        }
        std::process::exit(1);
    }

    Ok(())
}
