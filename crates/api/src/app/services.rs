use std::sync::Arc;

use gamevault_infra::{CheckoutService, InMemoryStore, PostgresStore, Store};

/// Wired application services shared by all handlers.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn Store>,
    pub checkout: CheckoutService,
}

impl AppServices {
    fn new(store: Arc<dyn Store>) -> Self {
        let checkout = CheckoutService::new(store.clone());
        Self { store, checkout }
    }
}

pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        return build_persistent_services().await;
    }

    build_in_memory_services()
}

fn build_in_memory_services() -> AppServices {
    // In-memory wiring (dev/test).
    AppServices::new(Arc::new(InMemoryStore::new()))
}

async fn build_persistent_services() -> AppServices {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let store = PostgresStore::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    store.migrate().await.expect("failed to run migrations");

    AppServices::new(Arc::new(store))
}
