//! inkpad server binary.
//!
//! `inkpad-server migrate [config]` applies pending database migrations and
//! exits. `inkpad-server [serve] [config]` starts the HTTP server with
//! structured logging and graceful shutdown on SIGTERM/SIGINT; it refuses to
//! start while migrations are pending.

use inkpad_server::{app, config, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{filter::Directive, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Serve,
    Migrate,
}

/// Splits `[command] [config-path]` into its parts. A first argument that is
/// not a known command is taken as the config path.
fn parse_args(mut args: impl Iterator<Item = String>) -> (Command, Option<String>) {
    let first = args.next().filter(|value| !value.trim().is_empty());
    let named = match first.as_deref() {
        Some("serve") => Some(Command::Serve),
        Some("migrate") => Some(Command::Migrate),
        _ => None,
    };
    let (command, path) = match named {
        Some(command) => (command, args.next()),
        None => (Command::Serve, first),
    };
    (command, path.filter(|value| !value.trim().is_empty()))
}

fn resolve_config_path(cli_path: Option<String>) -> (String, &'static str) {
    if let Some(path) = cli_path {
        return (path, "cli-arg");
    }

    if let Ok(path) = std::env::var("INKPAD_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (path, "env-var");
        }
    }

    ("config.toml".to_string(), "default")
}

fn init_tracing(config: &config::Config) {
    let mut filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.server.debug {
        for directive in ["inkpad_server=debug", "inkpad_models=debug", "tower_http=debug"] {
            if let Ok(directive) = directive.parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }
    }

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    let (command, cli_path) = parse_args(std::env::args().skip(1));
    let (config_path, config_source) = resolve_config_path(cli_path);

    let config = config::load_config(Some(config_path.as_str()))
        .expect("failed to load configuration");

    init_tracing(&config);

    tracing::info!(
        source = config_source,
        path = %config_path,
        ?command,
        "resolved startup configuration path"
    );

    let pool = inkpad_db::create_pool(&config.database.path, config.database.runtime_settings())
        .expect("failed to create database pool; check database.path in config");

    {
        let conn = pool
            .get()
            .expect("failed to get database connection for migrations");

        if command == Command::Migrate {
            let applied =
                inkpad_db::run_migrations(&conn).expect("failed to run database migrations");
            tracing::info!(count = applied, "applied database migrations");
            return;
        }

        let pending =
            inkpad_db::pending_migrations(&conn).expect("failed to inspect database schema");
        if pending > 0 {
            tracing::error!(
                pending,
                "database schema is out of date; run `inkpad-server migrate` first"
            );
            std::process::exit(1);
        }
    }

    let state = AppState::new(pool).expect("failed to load templates");
    let app = app(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, debug = config.server.debug, "starting inkpad server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("inkpad server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
