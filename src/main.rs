use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use kanadia_border::config::AppConfig;
use kanadia_border::error::AppError;
use kanadia_border::telemetry;
use kanadia_border::workflows::entry::{
    entry_router, parse_date, DecisionEngine, EngineConfig, EntryDataLoader, EntryDecision,
    EntryDecisionState, VisaCodeFormat,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: Arc<PrometheusHandle>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Kanadia Border Entry",
    about = "Classify arrivals into Kanadia as accepted, rejected, or quarantined",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Decide a batch of applicants from JSON files and print one disposition per line
    Decide(DecideArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Country table to serve requests that do not carry their own
    #[arg(long)]
    countries: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecideArgs {
    /// JSON array of applicant records
    #[arg(long)]
    applicants: PathBuf,
    /// JSON object mapping country codes to entry requirements
    #[arg(long)]
    countries: PathBuf,
    /// Evaluation date for visa validity (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Visa code layout required by the visitor visa rule
    #[arg(long, value_parser = parse_visa_code_format)]
    visa_code_format: Option<VisaCodeFormat>,
    /// Print the rule behind each disposition
    #[arg(long)]
    explain: bool,
}

fn parse_visa_code_format(raw: &str) -> Result<VisaCodeFormat, String> {
    VisaCodeFormat::parse(raw)
        .ok_or_else(|| format!("expected 'two-group' or 'five-group', got '{raw}'"))
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Decide(args) => run_decide(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.countries.take() {
        config.decisions.countries_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let countries = match &config.decisions.countries_path {
        Some(path) => {
            let table = EntryDataLoader::countries_from_path(path)?;
            info!(path = %path.display(), countries = table.len(), "country table loaded");
            Some(Arc::new(table))
        }
        None => None,
    };

    let entry_state = Arc::new(EntryDecisionState {
        engine: DecisionEngine::new(EngineConfig::with_visa_code_format(
            config.decisions.visa_code_format,
        )),
        countries,
    });

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_service_routes(entry_router(entry_state))
        .layer(Extension(state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "border entry service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn with_service_routes(router: Router) -> Router {
    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn run_decide(args: DecideArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let DecideArgs {
        applicants,
        countries,
        today,
        visa_code_format,
        explain,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let visa_code_format = visa_code_format.unwrap_or(config.decisions.visa_code_format);

    let countries = EntryDataLoader::countries_from_path(&countries)?;
    let applicants = EntryDataLoader::applicants_from_path(&applicants)?;

    let engine = DecisionEngine::new(EngineConfig::with_visa_code_format(visa_code_format));
    let decisions = engine.evaluate_batch(&applicants, &countries, today)?;

    for line in render_decisions(&decisions, explain) {
        println!("{line}");
    }

    Ok(())
}

fn render_decisions(decisions: &[EntryDecision], explain: bool) -> Vec<String> {
    decisions
        .iter()
        .map(|decision| {
            if explain {
                format!("{}\t{}", decision.disposition, decision.summary())
            } else {
                decision.disposition.to_string()
            }
        })
        .collect()
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
