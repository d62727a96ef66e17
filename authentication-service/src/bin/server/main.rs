use std::sync::Arc;

use auth::Clock;
use auth::KeyPair;
use auth::PasswordHasher;
use auth::SystemClock;
use auth::TokenIssuer;
use auth::TokenVerifier;
use authentication_service::config::Config;
use authentication_service::domain::discovery::service::DiscoveryService;
use authentication_service::domain::user::service::UserService;
use authentication_service::inbound::http::router::create_router;
use authentication_service::outbound::hashing::BlockingPasswordHasher;
use authentication_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "authentication_service=debug,auth=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "authentication-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        issuer = %config.issuer(),
        key_id = %config.keys.key_id,
        token_lifetime_seconds = config.token.lifetime_seconds,
        "Configuration loaded"
    );

    // No degraded mode: without valid signing keys the process does not start.
    let keys = KeyPair::load(
        &config.keys.private_key_path,
        &config.keys.public_key_path,
        config.keys.key_id.as_str(),
    )
    .inspect_err(|e| tracing::error!(error = %e, "Key material rejected"))?;
    tracing::info!(key_id = %keys.key_id(), "Signing key pair loaded");

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database_timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher = PasswordHasher::with_cost(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let hasher = Arc::new(BlockingPasswordHasher::new(
        password_hasher,
        config.password.max_concurrent_hashes,
    ));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let token_issuer = Arc::new(TokenIssuer::new(
        &keys,
        config.issuer(),
        config.token.lifetime_seconds,
        Arc::clone(&clock),
    ));
    let verifier = Arc::new(
        TokenVerifier::from_jwks(&keys.jwk_set(), token_issuer.issuer())?
            .with_clock(Arc::clone(&clock)),
    );
    let discovery = Arc::new(DiscoveryService::new(&keys, token_issuer.issuer()));

    let user_repository = Arc::new(PostgresUserRepository::new(
        pg_pool,
        config.database_timeout(),
    ));
    let user_service =
        Arc::new(UserService::new(user_repository, hasher, token_issuer).await?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        user_service,
        verifier,
        discovery,
        config.request_timeout(),
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
