use std::any::Any;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::model::ModelInfo;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const DEFAULT_FILTER: &str = "info";

/// Logging options resolved from the service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Daily-rotated `<dir>/<app>.log` instead of stdout.
    pub dir: Option<PathBuf>,
    /// Also run the default panic hook, which prints a backtrace when
    /// `RUST_BACKTRACE` asks for one.
    pub include_backtrace: bool,
}

/// Where log lines end up after `init_tracing_subscriber`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stdout,
    File(PathBuf),
}

impl LogSink {
    /// A log directory that cannot be created degrades to stdout.
    pub fn resolve(app_name: &str, dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return LogSink::Stdout;
        };
        match std::fs::create_dir_all(dir) {
            Ok(()) => LogSink::File(dir.join(format!("{app_name}.log"))),
            Err(err) => {
                eprintln!(
                    "{app_name}: cannot create log dir {}: {err}; logging to stdout",
                    dir.display()
                );
                LogSink::Stdout
            }
        }
    }
}

fn file_writer(app_name: &str, dir: &Path) -> BoxMakeWriter {
    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    BoxMakeWriter::new(non_blocking)
}

/// Install the global subscriber. `RUST_LOG` filters, default `info`.
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_tracing_subscriber(app_name: &'static str, settings: &LogSettings) -> LogSink {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    let sink = LogSink::resolve(app_name, settings.dir.as_deref());
    match (&sink, settings.dir.as_deref()) {
        (LogSink::File(_), Some(dir)) => {
            let _ = builder
                .with_ansi(false)
                .with_writer(file_writer(app_name, dir))
                .try_init();
        }
        _ => {
            let _ = builder.try_init();
        }
    }

    tracing::debug!(application = app_name, sink = ?sink, "tracing initialized");
    sink
}

/// Span wrapping the server's lifetime so startup and shutdown lines carry
/// the model that is being served.
pub fn service_span(app_name: &'static str, model: &ModelInfo) -> Span {
    tracing::info_span!(
        "service",
        application = app_name,
        model = %model.name,
        model_version = model.version.as_deref().unwrap_or("unversioned"),
        model_kind = model.kind,
        schema_version = model.schema_version,
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".into())
}

/// Route panics through `tracing`. Only the first call installs the hook.
pub fn install_tracing_panic_hook(app_name: &'static str, settings: &LogSettings) {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    let include_backtrace = settings.include_backtrace;

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            let thread = std::thread::current();
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".into());

            tracing::error!(
                application = app_name,
                thread = thread.name().unwrap_or("unnamed"),
                %location,
                panic_message = %panic_message(info.payload()),
                "panic"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}
