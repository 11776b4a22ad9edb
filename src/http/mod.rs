use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod auth;
pub mod error;
pub mod routes;

use crate::adapters::{local::LocalStorage, memory::InMemoryStore, snapshot::SnapshotFile};
use crate::config::{PolicyConfig, RegistrarConfig};
use crate::core::enrollment::EnrollmentManager;
use crate::utils::error::Result;
use routes::{
    create_enrollment_handler, get_enrollment_handler, health_handler, list_enrollments_handler,
    seats_handler, update_status_handler,
};

pub type Registrar = EnrollmentManager<InMemoryStore, InMemoryStore, PolicyConfig>;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<Registrar>,
}

/// A configured service: store, manager and optional snapshot file.
pub struct App {
    state: AppState,
    store: Arc<InMemoryStore>,
    snapshot: Option<SnapshotFile<LocalStorage>>,
    cors_max_age: Duration,
}

impl App {
    pub async fn from_config(config: &RegistrarConfig) -> Result<Self> {
        let snapshot = config.storage.as_ref().map(|storage| {
            SnapshotFile::new(
                LocalStorage::new(&storage.data_dir),
                storage.snapshot_file.clone(),
            )
        });

        let store = match &snapshot {
            Some(snapshot) => match snapshot.load().await? {
                Some(tables) => InMemoryStore::from_tables(tables),
                None => InMemoryStore::new(),
            },
            None => InMemoryStore::new(),
        };
        store.upsert_courses(config.catalog())?;
        info!(courses = config.courses.len(), "course catalog loaded");

        let store = Arc::new(store);
        let manager = EnrollmentManager::new(store.clone(), store.clone(), config.policy);
        info!(
            allow_reenroll_after_drop = config.policy.allow_reenroll_after_drop,
            authorization = ?config.policy.authorization,
            "enrollment policy"
        );

        Ok(Self {
            state: AppState {
                manager: Arc::new(manager),
            },
            store,
            snapshot,
            cors_max_age: Duration::from_secs(config.server.cors_max_age_seconds),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::PUT,
                Method::OPTIONS,
            ])
            .allow_headers([
                CONTENT_TYPE,
                HeaderName::from_static(auth::USER_ID_HEADER),
                HeaderName::from_static(auth::USER_ROLE_HEADER),
            ])
            .max_age(self.cors_max_age);

        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/enrollments",
                post(create_enrollment_handler).get(list_enrollments_handler),
            )
            .route(
                "/enrollments/{id}",
                get(get_enrollment_handler)
                    .patch(update_status_handler)
                    .put(update_status_handler),
            )
            .route("/courses/{id}/seats", get(seats_handler))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Serves until `shutdown` resolves, then writes a snapshot if storage is configured.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = listener.local_addr()?;
        info!("Server running on {address}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(snapshot) = &self.snapshot {
            snapshot.save(&self.store).await?;
        }
        info!("Server shut down");
        Ok(())
    }
}

pub async fn start_server(config: &RegistrarConfig) -> Result<()> {
    info!("Initializing state...");
    let app = App::from_config(config).await?;

    info!("Binding to {}", config.server.bind);
    let listener = TcpListener::bind(&config.server.bind).await?;

    app.serve(listener, shutdown_signal()).await
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install signal handler: {e}");
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
}
