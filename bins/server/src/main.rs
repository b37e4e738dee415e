//! Kaizen API Server
//!
//! Main entry point for the Kaizen backend service.

mod scheduler;

use std::sync::Arc;

use anyhow::Context;
use kaizen_api::{AppState, create_router};
use kaizen_core::feed::{FeedRefresher, FeedStore, HttpPageFetcher, PageFetcher};
use kaizen_core::payment::{PaymentProcessor, StripeGateway};
use kaizen_core::storage::{BlobStore, OpenDalBlobStore, StorageConfig, UploadPolicy};
use kaizen_core::transaction::{TransactionService, TransactionStore};
use kaizen_db::migration::{Migrator, MigratorTrait};
use kaizen_db::{SeaOrmFeedStore, SeaOrmTransactionStore, connect_with_pool};
use kaizen_shared::{AppConfig, JwtConfig, JwtService};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kaizen=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");
    Migrator::up(&db, None).await?;

    let jwt_service = JwtService::new(JwtConfig::from(&config.auth));

    let transaction_store: Arc<dyn TransactionStore> =
        Arc::new(SeaOrmTransactionStore::new(db.clone()));
    let feed_store: Arc<dyn FeedStore> = Arc::new(SeaOrmFeedStore::new(db.clone()));

    let (storage, upload_policy, placeholder_image_url) = match &config.storage {
        Some(settings) => {
            let storage_config = StorageConfig::from_settings(settings);
            let store = OpenDalBlobStore::from_config(&storage_config)?;
            info!(provider = store.provider_name(), "Image storage configured");
            (
                Some(Arc::new(store) as Arc<dyn BlobStore>),
                storage_config.policy,
                settings.placeholder_image_url.clone(),
            )
        }
        None => {
            warn!("Image storage not configured; uploads are disabled");
            (None, UploadPolicy::default(), None)
        }
    };

    let payments = match &config.payment {
        Some(payment) => {
            let gateway = StripeGateway::new(payment)?;
            info!(currency = %payment.currency, "Payment gateway configured");
            Some(Arc::new(gateway) as Arc<dyn PaymentProcessor>)
        }
        None => {
            warn!("Payment gateway not configured; charges are disabled");
            None
        }
    };

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(&config.feeds)?);
    let refresher = FeedRefresher::new(fetcher, Arc::clone(&feed_store));
    scheduler::refresh_feeds(&refresher).await;
    let _scheduler = scheduler::start(&config.feeds.schedule, refresher).await?;

    let state = AppState {
        db: Arc::new(db),
        verifier: Arc::new(jwt_service),
        transactions: TransactionService::new(transaction_store),
        feeds: feed_store,
        storage,
        upload_policy,
        payments,
        art_validity_days: config.art.validity_days,
        placeholder_image_url,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
