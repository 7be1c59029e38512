use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tender_core::config::AppConfig;
use tender_core::error::AppError;
use tender_core::telemetry;
use tender_core::workflows::criteria::{
    criteria_router, CriteriaValidator, InMemoryCriteriaRepository, TenderCriteriaRequest,
    TenderCriteriaService,
};
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Tender Criteria Service",
    about = "Validate and construct evaluation criteria for procurement tenders",
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
    /// Inspect criteria payloads from the command line
    Criteria {
        #[command(subcommand)]
        command: CriteriaCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum CriteriaCommand {
    /// Run the full validation sequence over a JSON payload
    Validate(CriteriaValidateArgs),
}

#[derive(Args, Debug)]
struct CriteriaValidateArgs {
    /// Path to a JSON file holding the tender criteria request
    #[arg(long)]
    file: PathBuf,
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
        Command::Criteria {
            command: CriteriaCommand::Validate(args),
        } => run_criteria_validate(args),
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let repository = Arc::new(InMemoryCriteriaRepository::default());
    let service = Arc::new(TenderCriteriaService::new(repository));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(criteria_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "tender criteria service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_criteria_validate(args: CriteriaValidateArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.file)?;
    let request: TenderCriteriaRequest = serde_json::from_str(&raw)?;

    println!(
        "Validating criteria for awardCriteria '{}' over {} item(s)",
        request.award_criteria,
        request.items.len()
    );

    match CriteriaValidator::new().validate(&request) {
        Ok(()) => {
            let criteria = request.criteria.as_deref().unwrap_or_default();
            let conversions = request.conversions.as_deref().unwrap_or_default();
            println!(
                "Criteria tree is valid: {} criteria, {} conversions",
                criteria.len(),
                conversions.len()
            );
        }
        Err(violation) => {
            println!("Criteria tree rejected: {violation}");
        }
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
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

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
