use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
};
use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::infra::{
    db::postgres::postgres_connection::PgPoolSquad,
    storages::local_fs::LocalFsStorage,
    telegram::client::{TelegramClient, TelegramConfig},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let storage = Arc::new(LocalFsStorage::new(config.storage.base_dir.as_str()));
    info!(base_dir = %storage.base_dir().display(), "Media storage is ready");

    let notifier = Arc::new(TelegramClient::new(TelegramConfig {
        token: config.telegram.token.clone(),
        api_base_url: config.telegram.api_base_url.clone(),
        timeout: Duration::from_secs(config.telegram.timeout_secs),
    })?);
    info!(enabled = notifier.is_enabled(), "Telegram notifier is ready");

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/users", routers::users::routes(Arc::clone(&db_pool)))
        .nest(
            "/api/questionnaires",
            routers::questionnaires::routes(
                Arc::clone(&db_pool),
                Arc::clone(&storage),
                Arc::clone(&notifier),
            ),
        )
        .nest(
            "/api/photos",
            routers::photos::routes(Arc::clone(&db_pool), Arc::clone(&storage)),
        )
        .nest(
            "/api/videos",
            routers::videos::routes(
                Arc::clone(&db_pool),
                Arc::clone(&storage),
                Arc::clone(&notifier),
            ),
        )
        .nest(
            "/api/promo-codes",
            routers::promo_codes::routes(Arc::clone(&db_pool)),
        )
        .nest("/api/reviews", routers::reviews::routes(Arc::clone(&db_pool)))
        .route("/api/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.backend_server.timeout),
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = ?err, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
