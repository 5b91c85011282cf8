use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;

use eventsphere::adapters::http::{app_router, CheckoutAppState};
use eventsphere::adapters::{
    InMemoryPromoRepository, MockGatewayConfig, MockPaymentGateway, PostgresPromoRepository,
};
use eventsphere::config::{AppConfig, DatabaseConfig};
use eventsphere::domain::foundation::Timestamp;
use eventsphere::domain::promo::demo_promotions;
use eventsphere::observability::init_tracing;
use eventsphere::ports::PromoRepository;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

async fn promo_repository(
    database: Option<&DatabaseConfig>,
) -> Result<Arc<dyn PromoRepository>, BoxError> {
    let Some(db) = database else {
        tracing::info!("No database configured, using in-memory promo store with demo codes");
        return Ok(Arc::new(InMemoryPromoRepository::with_demo_codes()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(db.pool_size)
        .acquire_timeout(db.acquire_timeout())
        .connect(db.url.expose_secret())
        .await?;

    if db.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let repository = PostgresPromoRepository::new(pool);
    if db.seed_demo_promos {
        let inserted = repository.seed(&demo_promotions(&Timestamp::now())).await?;
        tracing::info!(inserted, "Seeded demo promo codes");
    }

    Ok(Arc::new(repository))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let promo_repository = promo_repository(config.database.as_ref()).await?;
    let payment_gateway = Arc::new(MockPaymentGateway::new(MockGatewayConfig::from(
        &config.payment,
    )));

    let state = CheckoutAppState::new(promo_repository, payment_gateway);
    let app = app_router(state, &config.server);

    let addr = config.server.listen;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "EventSphere checkout listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
