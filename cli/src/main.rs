use clap::Parser;
mod commands;
use commands::{cli, task};
use taskrelay_core::api::{AppConfig, ChannelConfig, TaskAdaptor, TaskError};
use taskrelay_core::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, error::CliError> {
    let args = cli::Args::parse();
    let mut cfg = taskrelay_core::config::load_default()
        .map_err(|e| error::CliError::Config(e.to_string()))?;
    apply_flag_overrides(&mut cfg, &args);
    init_tracing(&cfg.logging).map_err(error::CliError::Logging)?;

    let executor = taskrelay_plugins::factory::build_executor(&cfg)?;
    let adaptor = taskrelay_plugins::factory::build_adaptor(&cfg, executor);
    let creds = taskrelay_plugins::factory::build_credentials(&cfg);
    tracing::debug!(
        target: "taskrelay.task",
        stage = "cli.start",
        channel = %adaptor.channel_name(),
        base_url = %creds.base()
    );

    dispatch(args, adaptor.as_ref(), &creds).await
}

fn apply_flag_overrides(cfg: &mut AppConfig, args: &cli::Args) {
    let ChannelConfig::DashScope(ds) = &mut cfg.channel;
    if let Some(url) = args.base_url.as_deref().filter(|s| !s.trim().is_empty()) {
        ds.base_url = url.trim().to_string();
    }
    if let Some(key) = args.api_key.as_deref().filter(|s| !s.trim().is_empty()) {
        ds.api_key = key.trim().to_string();
    }
}

fn exit_code_for_error(e: &error::CliError) -> i32 {
    // 0: success
    // 11: config or logging setup error
    // 20: transport / IO error
    // 30: vendor rejected the request
    // 40: invalid request
    // 50: internal/uncategorized
    match e {
        error::CliError::Config(_) => 11,
        error::CliError::Logging(_) => 11,
        error::CliError::Task(te) => match te {
            TaskError::InvalidRequest(_) => 40,
            TaskError::VendorError { .. } => 30,
            TaskError::TransportFailure(_) => 20,
            TaskError::MalformedResponse { .. } => 50,
            TaskError::InvalidResponse(_) => 50,
        },
        error::CliError::Io(_) => 20,
        error::CliError::Json(_) => 40,
        error::CliError::Anyhow(_) => 50,
    }
}

async fn dispatch(
    args: cli::Args,
    adaptor: &dyn TaskAdaptor,
    creds: &taskrelay_core::api::ChannelCredentials,
) -> Result<i32, error::CliError> {
    match args.command {
        cli::Commands::Submit(submit_args) => {
            task::submit_cmd(adaptor, creds, submit_args, args.pretty).await
        }
        cli::Commands::Poll(poll_args) => {
            task::poll_cmd(adaptor, creds, poll_args, args.pretty).await
        }
        cli::Commands::Models => task::models_cmd(adaptor),
    }
}

fn init_tracing(logging: &taskrelay_core::config::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|_| EnvFilter::from_default_env())
        .map_or_else(|| EnvFilter::try_new(&logging.level), Ok)
        .map_err(|e| format!("invalid log level {:?}: {e}", logging.level))?;

    let file_writer = if logging.file {
        Some(open_log_file(logging.directory.as_deref())?)
    } else {
        None
    };
    if !logging.console && file_writer.is_none() {
        return Err("neither console nor file output is enabled".to_string());
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(logging.console.then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(atty::is(atty::Stream::Stderr))
        }))
        .with(file_writer.map(|w| {
            tracing_subscriber::fmt::layer()
                .with_writer(w)
                .with_ansi(false)
                .with_target(true)
        }))
        .try_init()
        .map_err(|e| e.to_string())
}

/// One log file per process under `dir`, falling back to the temp dir.
fn open_log_file(
    dir: Option<&str>,
) -> Result<tracing_appender::non_blocking::NonBlocking, String> {
    let dir = dir
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("taskrelay"));
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("cannot create log dir {}: {e}", dir.display()))?;

    let appender =
        tracing_appender::rolling::never(&dir, format!("taskrelay.{}.log", std::process::id()));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(writer)
}
