//! Pic4Pick server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use pic4pick_api::AppState;
use pic4pick_common::{Config, StorageConfig, build_storage};
use pic4pick_core::{
    AuthService, CategoryService, CommentService, LocationService, MediaService, PhotoService,
    PhotoStorage, SettingsService,
};
use pic4pick_db::SchemaCapabilities;
use pic4pick_db::repositories::{
    CategoryRepository, CommentRepository, PhotoRepository, SettingsRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pic4pick=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting pic4pick server...");

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Connect to database
    let db = Arc::new(
        pic4pick_db::init(&config)
            .await
            .context("Failed to connect to database")?,
    );
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    if config.database.auto_migrate {
        info!("Running database migrations...");
        pic4pick_db::migrate(&db).await.context("Migration failed")?;
        info!("Migrations completed");
    }

    let caps = SchemaCapabilities::inspect(&db)
        .await
        .context("Failed to inspect database schema")?;

    let storage = build_storage(&config.storage)
        .await
        .context("Failed to initialize object storage")?;
    let media = MediaService::new(config.media);

    // Repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let photo_repo = PhotoRepository::new(Arc::clone(&db), caps);
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db), caps);
    let settings_repo = SettingsRepository::new(Arc::clone(&db), caps);

    // Services
    let state = AppState {
        auth_service: AuthService::new(user_repo, &config.auth),
        photo_service: PhotoService::new(photo_repo.clone(), PhotoStorage::new(storage, media)),
        location_service: LocationService::new(photo_repo.clone()),
        category_service: CategoryService::new(category_repo),
        comment_service: CommentService::new(comment_repo, photo_repo),
        settings_service: SettingsService::new(settings_repo),
    };

    let max_body_bytes = config.server.max_upload_mb.saturating_mul(1024 * 1024);
    let mut app = pic4pick_api::app(state, max_body_bytes);

    // Local uploads are served by this process
    if let StorageConfig::Local {
        base_path,
        base_url,
    } = &config.storage
    {
        let mount = base_url.trim_end_matches('/');
        if mount.starts_with('/') && mount.len() > 1 {
            info!(path = %base_path.display(), url = %mount, "Serving local uploads");
            app = app.nest_service(mount, ServeDir::new(base_path));
        }
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
