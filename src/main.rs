//! Game Shlf account service entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use game_shlf::adapters::auth::session_validator_from_config;
use game_shlf::adapters::http::{build_router, AppState};
use game_shlf::adapters::memory::InMemoryUserStore;
use game_shlf::adapters::postgres::PostgresUserStore;
use game_shlf::adapters::steam::SteamOpenIdVerifier;
use game_shlf::adapters::stripe::{StripeBillingAdapter, StripeConfig};
use game_shlf::application::SteamLinkSettings;
use game_shlf::config::{AppConfig, ServerConfig};
use game_shlf::domain::billing::{DonorPolicy, PortalFeatures, StripeWebhookVerifier};
use game_shlf::ports::UserStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        stripe_live_mode = config.payment.is_live_mode(),
        "Starting Game Shlf account service"
    );

    let http_client = config.http_client.build_client()?;
    let user_store = user_store(&config).await?;

    let state = AppState {
        session_validator: session_validator_from_config(&config.auth, http_client.clone()),
        user_store,
        billing_provider: Arc::new(StripeBillingAdapter::new(
            StripeConfig::from_payment_config(&config.payment),
            http_client.clone(),
        )),
        openid_verifier: Arc::new(SteamOpenIdVerifier::new(
            config.steam.openid_endpoint.clone(),
            http_client,
        )),
        webhook_verifier: Arc::new(
            StripeWebhookVerifier::new(config.payment.stripe_webhook_secret.clone())
                .with_tolerance_secs(config.payment.webhook_tolerance_secs),
        ),
        steam: SteamLinkSettings::from_config(&config.steam),
        donor_policy: DonorPolicy::new(
            config.payment.donation_period_days,
            config.payment.failed_payment_revoke_threshold,
        ),
        portal_return_url: config.portal_return_url(),
        portal_features: PortalFeatures::donor_defaults(),
    };

    let app = build_router(state, &config.server);
    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, compact logs elsewhere. `RUST_LOG` overrides
/// `server.log_level`.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

async fn user_store(config: &AppConfig) -> Result<Arc<dyn UserStore>, BoxError> {
    let Some(database) = &config.database else {
        tracing::warn!("No database configured; profiles are kept in memory");
        return Ok(Arc::new(InMemoryUserStore::new()));
    };

    let pool = database.pool_options().connect(&database.url).await?;
    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Arc::new(PostgresUserStore::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
