use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classboard::api::router;
use classboard::auth::{FirebaseAuthClient, FirebaseConfig, IdentityProvider, StaticIdentity};
use classboard::config::{AppConfig, StoreBackend};
use classboard::db::SqliteDocumentStore;
use classboard::firestore::{FirestoreClient, FirestoreConfig};
use classboard::planner::Planner;
use classboard::remote::DocumentStore;
use classboard::services::RefreshScheduler;
use classboard::state::AppState;
use classboard::stores::AuthSession;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "classboard=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;
    let session = AuthSession::new();

    let (remote, identity): (Arc<dyn DocumentStore>, Arc<dyn IdentityProvider>) = match config.backend {
        StoreBackend::Sqlite => {
            let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?;
            let store = SqliteDocumentStore::new(pool);
            store.run_migrations().await?;
            info!("using local store at {}", config.database_url);

            let identity = StaticIdentity::new(config.local_user_id.clone(), config.local_password.clone());
            (Arc::new(store), Arc::new(identity))
        }
        StoreBackend::Firestore => {
            let firebase = FirebaseConfig::new_from_env()?;
            let identity: Arc<dyn IdentityProvider> = Arc::new(FirebaseAuthClient::new(firebase.clone())?);
            let store = FirestoreClient::new(
                FirestoreConfig::new_from_env(&firebase),
                session.clone(),
                identity.clone(),
            )?;
            info!("using Firestore project {}", firebase.project_id);

            (Arc::new(store), identity)
        }
    };

    let planner = Planner::new(remote, session);

    if config.reload_interval_secs > 0 {
        let scheduler = RefreshScheduler::new(
            planner.courses.clone(),
            Duration::from_secs(config.reload_interval_secs),
        );
        tokio::spawn(scheduler.start());
    }

    let state = AppState { planner, identity };
    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
