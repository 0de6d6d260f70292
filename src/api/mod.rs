use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    EngineError, FamilySituation, GeographyPreference, InvestmentInputs, Locale, MAX_AMOUNT,
    MAX_PROJECTION_YEARS, MAX_RISK_TOLERANCE, PortfolioAllocation, SectorPreference,
    SimulationReport, calculate_portfolio, simulate,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 100;
const MAX_MANAGEMENT_PREFERENCE: u8 = 5;
/// Seeds travel as JSON numbers; browsers keep integers exact only below 2^53.
const SEED_LIMIT: u64 = 1 << 53;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFamilySituation {
    Single,
    Couple,
    Family,
    SingleParent,
}

impl From<CliFamilySituation> for FamilySituation {
    fn from(value: CliFamilySituation) -> Self {
        match value {
            CliFamilySituation::Single => FamilySituation::Single,
            CliFamilySituation::Couple => FamilySituation::Couple,
            CliFamilySituation::Family => FamilySituation::Family,
            CliFamilySituation::SingleParent => FamilySituation::SingleParent,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliSectorPreference {
    General,
    Technology,
    Healthcare,
    Energy,
    Automotive,
    RealEstate,
    #[value(skip)]
    Unlisted,
}

impl From<CliSectorPreference> for SectorPreference {
    fn from(value: CliSectorPreference) -> Self {
        match value {
            CliSectorPreference::General => SectorPreference::General,
            CliSectorPreference::Technology => SectorPreference::Technology,
            CliSectorPreference::Healthcare => SectorPreference::Healthcare,
            CliSectorPreference::Energy => SectorPreference::Energy,
            CliSectorPreference::Automotive => SectorPreference::Automotive,
            CliSectorPreference::RealEstate => SectorPreference::RealEstate,
            CliSectorPreference::Unlisted => SectorPreference::Unlisted,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliGeographyPreference {
    Global,
    Europe,
    Emerging,
    #[value(skip)]
    Unlisted,
}

impl From<CliGeographyPreference> for GeographyPreference {
    fn from(value: CliGeographyPreference) -> Self {
        match value {
            CliGeographyPreference::Global => GeographyPreference::Global,
            CliGeographyPreference::Europe => GeographyPreference::Europe,
            CliGeographyPreference::Emerging => GeographyPreference::Emerging,
            CliGeographyPreference::Unlisted => GeographyPreference::Unlisted,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliLocale {
    Lt,
    En,
}

impl From<CliLocale> for Locale {
    fn from(value: CliLocale) -> Self {
        match value {
            CliLocale::Lt => Locale::Lt,
            CliLocale::En => Locale::En,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiFamilySituation {
    Single,
    Couple,
    Family,
    #[serde(alias = "singleParent", alias = "single_parent")]
    SingleParent,
}

impl From<ApiFamilySituation> for CliFamilySituation {
    fn from(value: ApiFamilySituation) -> Self {
        match value {
            ApiFamilySituation::Single => CliFamilySituation::Single,
            ApiFamilySituation::Couple => CliFamilySituation::Couple,
            ApiFamilySituation::Family => CliFamilySituation::Family,
            ApiFamilySituation::SingleParent => CliFamilySituation::SingleParent,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiSectorPreference {
    General,
    #[serde(alias = "tech")]
    Technology,
    Healthcare,
    Energy,
    Automotive,
    #[serde(alias = "realEstate", alias = "real_estate", alias = "realestate")]
    RealEstate,
    #[serde(other)]
    Unlisted,
}

impl From<ApiSectorPreference> for CliSectorPreference {
    fn from(value: ApiSectorPreference) -> Self {
        match value {
            ApiSectorPreference::General => CliSectorPreference::General,
            ApiSectorPreference::Technology => CliSectorPreference::Technology,
            ApiSectorPreference::Healthcare => CliSectorPreference::Healthcare,
            ApiSectorPreference::Energy => CliSectorPreference::Energy,
            ApiSectorPreference::Automotive => CliSectorPreference::Automotive,
            ApiSectorPreference::RealEstate => CliSectorPreference::RealEstate,
            ApiSectorPreference::Unlisted => CliSectorPreference::Unlisted,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiGeographyPreference {
    Global,
    Europe,
    Emerging,
    #[serde(other)]
    Unlisted,
}

impl From<ApiGeographyPreference> for CliGeographyPreference {
    fn from(value: ApiGeographyPreference) -> Self {
        match value {
            ApiGeographyPreference::Global => CliGeographyPreference::Global,
            ApiGeographyPreference::Europe => CliGeographyPreference::Europe,
            ApiGeographyPreference::Emerging => CliGeographyPreference::Emerging,
            ApiGeographyPreference::Unlisted => CliGeographyPreference::Unlisted,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiLocale {
    #[serde(alias = "LT", alias = "lt-LT")]
    Lt,
    #[serde(alias = "EN", alias = "en-US", alias = "en-GB")]
    En,
}

impl From<ApiLocale> for CliLocale {
    fn from(value: ApiLocale) -> Self {
        match value {
            ApiLocale::Lt => CliLocale::Lt,
            ApiLocale::En => CliLocale::En,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    age: Option<u32>,
    family_situation: Option<ApiFamilySituation>,
    initial_sum: Option<f64>,
    monthly_contribution: Option<f64>,
    time_horizon: Option<u32>,
    risk_tolerance: Option<u8>,
    management_preference: Option<u8>,
    sector_preference: Option<ApiSectorPreference>,
    geography_preference: Option<ApiGeographyPreference>,

    period: Option<u32>,
    seed: Option<u64>,
    locale: Option<ApiLocale>,
}

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-estimator",
    about = "Investment allocation estimator with stochastic crash/correction projections"
)]
struct Cli {
    #[arg(long, default_value_t = 25)]
    age: u32,
    #[arg(long, value_enum, default_value_t = CliFamilySituation::Single)]
    family_situation: CliFamilySituation,
    #[arg(long, default_value_t = 1000.0, help = "Lump sum invested at year 0")]
    initial_sum: f64,
    #[arg(long, default_value_t = 200.0)]
    monthly_contribution: f64,
    #[arg(long, default_value_t = 10, help = "Investment horizon in years")]
    time_horizon: u32,
    #[arg(long, default_value_t = 0, help = "0 (minimal) to 5 (ultra)")]
    risk_tolerance: u8,
    #[arg(long, default_value_t = 0)]
    management_preference: u8,
    #[arg(long, value_enum, default_value_t = CliSectorPreference::General)]
    sector_preference: CliSectorPreference,
    #[arg(
        long,
        value_enum,
        default_value_t = CliGeographyPreference::Global,
        help = "Only used when sector-preference is general"
    )]
    geography_preference: CliGeographyPreference,
    #[arg(long, help = "Years to project, defaults to time-horizon")]
    period: Option<u32>,
    #[arg(
        long,
        help = "RNG seed below 2^53; a random one is drawn and reported when omitted"
    )]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = CliLocale::Lt)]
    locale: CliLocale,
}

#[derive(Copy, Clone, Debug)]
struct ApiOptions {
    period: u32,
    seed: Option<u64>,
    locale: Locale,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: InvestmentInputs,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationResponse {
    locale: Locale,
    inputs: InvestmentInputs,
    allocation: PortfolioAllocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    seed: u64,
    locale: Locale,
    inputs: InvestmentInputs,
    #[serde(flatten)]
    report: SimulationReport,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<InvestmentInputs, String> {
    if !(MIN_AGE..=MAX_AGE).contains(&cli.age) {
        return Err(format!("--age must be between {MIN_AGE} and {MAX_AGE}"));
    }

    if !(0.0..=MAX_AMOUNT).contains(&cli.initial_sum) {
        return Err(format!("--initial-sum must be between 0 and {MAX_AMOUNT:e}"));
    }

    if !(0.0..=MAX_AMOUNT).contains(&cli.monthly_contribution) {
        return Err(format!(
            "--monthly-contribution must be between 0 and {MAX_AMOUNT:e}"
        ));
    }

    if !(1..=MAX_PROJECTION_YEARS).contains(&cli.time_horizon) {
        return Err(format!(
            "--time-horizon must be between 1 and {MAX_PROJECTION_YEARS}"
        ));
    }

    if cli.risk_tolerance > MAX_RISK_TOLERANCE {
        return Err(format!(
            "--risk-tolerance must be between 0 and {MAX_RISK_TOLERANCE}"
        ));
    }

    if cli.management_preference > MAX_MANAGEMENT_PREFERENCE {
        return Err(format!(
            "--management-preference must be between 0 and {MAX_MANAGEMENT_PREFERENCE}"
        ));
    }

    Ok(InvestmentInputs {
        age: cli.age,
        family_situation: cli.family_situation.into(),
        initial_sum: cli.initial_sum,
        monthly_contribution: cli.monthly_contribution,
        time_horizon: cli.time_horizon,
        risk_tolerance: cli.risk_tolerance,
        management_preference: cli.management_preference,
        sector_preference: cli.sector_preference.into(),
        geography_preference: cli.geography_preference.into(),
    })
}

fn build_request(cli: Cli) -> Result<ApiRequest, String> {
    let inputs = build_inputs(&cli)?;

    let period = cli.period.unwrap_or(cli.time_horizon);
    if !(1..=MAX_PROJECTION_YEARS).contains(&period) {
        return Err(format!(
            "--period must be between 1 and {MAX_PROJECTION_YEARS}"
        ));
    }

    if cli.seed.is_some_and(|seed| seed >= SEED_LIMIT) {
        return Err("--seed must be below 2^53".to_string());
    }

    Ok(ApiRequest {
        inputs,
        options: ApiOptions {
            period,
            seed: cli.seed,
            locale: cli.locale.into(),
        },
    })
}

/// One-shot run: parse flags, simulate, print the report as JSON.
pub fn run_cli() -> Result<(), String> {
    let request = build_request(Cli::parse())?;
    let response = run_simulation(&request).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("failed to serialize report: {e}"))?;
    println!("{json}");
    Ok(())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/allocation",
            get(allocation_get_handler).post(allocation_post_handler),
        )
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "portfolio estimator HTTP API listening");
    tracing::info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn allocation_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    allocation_handler_impl(payload).await
}

async fn allocation_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    allocation_handler_impl(payload).await
}

async fn allocation_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            tracing::warn!(error = %msg, "rejected allocation request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match calculate_portfolio(&request.inputs, request.options.locale) {
        Ok(allocation) => json_response(
            StatusCode::OK,
            AllocationResponse {
                locale: request.options.locale,
                inputs: request.inputs,
                allocation,
            },
        ),
        Err(e) => engine_error_response(&e),
    }
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            tracing::warn!(error = %msg, "rejected simulate request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match run_simulation(&request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(e) => engine_error_response(&e),
    }
}

fn run_simulation(request: &ApiRequest) -> Result<SimulateResponse, EngineError> {
    let options = request.options;
    let seed = options
        .seed
        .unwrap_or_else(|| rand::rng().random_range(0..SEED_LIMIT));
    let mut rng = StdRng::seed_from_u64(seed);

    tracing::info!(
        seed,
        period = options.period,
        risk = request.inputs.risk_tolerance,
        "running simulation"
    );
    let report = simulate(&request.inputs, options.period, options.locale, &mut rng)?;

    Ok(SimulateResponse {
        seed,
        locale: options.locale,
        inputs: request.inputs.clone(),
        report,
    })
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn engine_error_response(err: &EngineError) -> Response {
    tracing::warn!(error = %err, "engine rejected request");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.age {
        cli.age = v;
    }
    if let Some(v) = payload.family_situation {
        cli.family_situation = v.into();
    }
    if let Some(v) = payload.initial_sum {
        cli.initial_sum = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.time_horizon {
        cli.time_horizon = v;
    }
    if let Some(v) = payload.risk_tolerance {
        cli.risk_tolerance = v;
    }
    if let Some(v) = payload.management_preference {
        cli.management_preference = v;
    }
    if let Some(v) = payload.sector_preference {
        cli.sector_preference = v.into();
    }
    if let Some(v) = payload.geography_preference {
        cli.geography_preference = v.into();
    }

    if let Some(v) = payload.period {
        cli.period = Some(v);
    }
    if let Some(v) = payload.seed {
        cli.seed = Some(v);
    }
    if let Some(v) = payload.locale {
        cli.locale = v.into();
    }

    build_request(cli)
}

// The flag defaults double as the API defaults.
fn default_cli_for_api() -> Cli {
    Cli::parse_from(["portfolio-estimator"])
}
