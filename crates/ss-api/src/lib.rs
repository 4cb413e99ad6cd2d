use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
    http::Method,
    http::Request,
    middleware,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use clap::Parser;
use dotenvy::dotenv;
use ss_common::features::{FeatureSchema, FEATURE_COUNT};
use ss_common::logging::{
    init_tracing_subscriber, install_tracing_panic_hook, service_span, LogSettings,
};
use ss_common::model::{ModelArtifact, ModelSource, ModelSpec, ModelStore};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn, Instrument};

pub mod error;
pub mod handlers;

use error::ApiError;
use handlers::{analyze, health, predict};

pub const MAX_BODY_BYTES: usize = 1024 * 1024;
const METRICS_PORT_ENV: &str = "SS_METRICS_PORT";
const DEFAULT_METRICS_PORT: u16 = 9101;

#[derive(Debug, Clone, Parser)]
#[command(name = "ss-api", about = "Worker suitability prediction API")]
pub struct Cli {
    /// Model artifact to load; takes precedence over --model-dir
    #[arg(long, env = "SS_MODEL_PATH")]
    model_path: Option<PathBuf>,

    /// Directory scanned for exactly one *.json artifact when no path is given
    #[arg(long, env = "SS_MODEL_DIR", default_value = ".")]
    model_dir: PathBuf,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Comma separated list of allowed CORS origins, or `*`
    #[arg(
        long,
        env = "SS_CORS_ORIGINS",
        default_value = "http://localhost:5173,http://localhost:3000"
    )]
    cors_origins: String,

    /// Start the Prometheus exporter on SS_METRICS_PORT
    #[arg(long, env = "SS_METRICS_ENABLED", default_value_t = false)]
    metrics_enabled: bool,

    /// Write daily-rotated logs here instead of stdout
    #[arg(long, env = "SS_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Also print the default panic report alongside the traced one
    #[arg(long, env = "SS_LOG_INCLUDE_BACKTRACE", default_value_t = false)]
    log_include_backtrace: bool,
}

impl Cli {
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            dir: self.log_dir.clone(),
            include_backtrace: self.log_include_backtrace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: CorsOrigins,
    pub metrics_enabled: bool,
    pub model_source: ModelSource,
    pub log: LogSettings,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        if origins.is_empty() {
            return Err(ApiError::Config(
                "SS_CORS_ORIGINS must list at least one origin".into(),
            ));
        }

        let cors_origins = if origins.iter().any(|origin| origin == "*") {
            CorsOrigins::Any
        } else {
            if let Some(bad) = origins
                .iter()
                .find(|origin| origin.parse::<HeaderValue>().is_err())
            {
                return Err(ApiError::Config(format!("invalid CORS origin: {bad}")));
            }
            CorsOrigins::List(origins)
        };

        Ok(Self {
            port: cli.port,
            cors_origins,
            metrics_enabled: cli.metrics_enabled,
            log: cli.log_settings(),
            model_source: ModelSource::resolve(cli.model_path, cli.model_dir),
        })
    }

    pub fn for_tests() -> Self {
        Self {
            port: 8000,
            cors_origins: CorsOrigins::List(vec!["http://localhost:5173".into()]),
            metrics_enabled: false,
            model_source: ModelSource::resolve(None, PathBuf::from(".")),
            log: LogSettings::default(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub model: Option<Arc<ModelStore>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn model(&self) -> Result<&ModelStore, ApiError> {
        self.model.as_deref().ok_or(ApiError::ModelUnavailable)
    }
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::from(Any),
        CorsOrigins::List(list) => AllowOrigin::list(
            list.iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    error::with_request_id(request_id, next.run(req)).await
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();
    let model_name = state
        .model
        .as_ref()
        .map(|model| model.info().name.clone())
        .unwrap_or_default();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
            model = %model_name,
        )
    });

    let api_routes = Router::new()
        .route("/predict/best-worker", post(predict::best_worker))
        .route("/predict/batch-suitability", post(predict::batch_suitability))
        .route("/predict/performance", post(predict::performance))
        .route("/analyze/skill-gap", post(analyze::skill_gap));

    Router::new()
        .route("/", get(health::info))
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

/// Linear model over the current schema: `score = performance_score / 100`.
pub fn test_model() -> ModelStore {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[0] = 0.01;
    let artifact = ModelArtifact {
        name: "test-linear".into(),
        version: Some("test".into()),
        schema: FeatureSchema::current(),
        model: ModelSpec::LinearRegressor {
            coefficients,
            intercept: 0.0,
        },
    };

    match ModelStore::from_artifact(artifact, "in-memory") {
        Ok(store) => store,
        Err(err) => panic!("test model must be valid: {err}"),
    }
}

pub fn test_state() -> SharedState {
    Arc::new(AppState {
        config: AppConfig::for_tests(),
        model: Some(Arc::new(test_model())),
    })
}

pub fn test_state_without_model() -> SharedState {
    Arc::new(AppState {
        config: AppConfig::for_tests(),
        model: None,
    })
}

pub async fn run() -> Result<(), ApiError> {
    const APP: &str = env!("CARGO_PKG_NAME");

    dotenv().ok();
    let cli = Cli::parse();
    let log_settings = cli.log_settings();
    let sink = init_tracing_subscriber(APP, &log_settings);
    install_tracing_panic_hook(APP, &log_settings);
    info!(sink = ?sink, "logging configured");

    let config = AppConfig::from_cli(cli)?;
    let model = config.model_source.load()?;
    let span = service_span(APP, model.info());

    if config.metrics_enabled
        && ss_metrics::init_metrics(METRICS_PORT_ENV, DEFAULT_METRICS_PORT).is_none()
    {
        warn!("metrics requested but exporter did not start");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        model: Some(Arc::new(model)),
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state);

    async move {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        info!(%addr, "listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;

        info!("stopped");
        Ok::<(), ApiError>(())
    }
    .instrument(span)
    .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["ss-api"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn cors_origins_split_on_commas() {
        let config =
            AppConfig::from_cli(cli(&["--cors-origins", " http://a.test , ,http://b.test"]))
                .unwrap();
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec!["http://a.test".into(), "http://b.test".into()])
        );
    }

    #[test]
    fn wildcard_origin_allows_any() {
        let config = AppConfig::from_cli(cli(&["--cors-origins", "http://a.test,*"])).unwrap();
        assert_eq!(config.cors_origins, CorsOrigins::Any);
    }

    #[test]
    fn empty_origin_list_is_rejected() {
        let err = AppConfig::from_cli(cli(&["--cors-origins", " , "])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn explicit_model_path_wins_over_directory() {
        let config = AppConfig::from_cli(cli(&[
            "--model-path",
            "models/suitability.json",
            "--model-dir",
            "elsewhere",
        ]))
        .unwrap();
        assert!(matches!(
            config.model_source,
            ModelSource::Path(ref path) if path == &PathBuf::from("models/suitability.json")
        ));
    }

    #[test]
    fn log_settings_follow_cli() {
        let config = AppConfig::from_cli(cli(&[
            "--log-dir",
            "/var/log/ss",
            "--log-include-backtrace",
        ]))
        .unwrap();
        assert_eq!(
            config.log,
            LogSettings {
                dir: Some(PathBuf::from("/var/log/ss")),
                include_backtrace: true,
            }
        );
    }

    #[tokio::test]
    async fn sets_request_id_when_missing() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn echoes_caller_request_id() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
