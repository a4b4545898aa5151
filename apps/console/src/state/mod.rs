//! # State Module
//!
//! Application-scoped state for the console.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         AppState                                │   │
//! │  │  config: ConsoleConfig                                          │   │
//! │  │  services: Arc<dyn RecordService<User | Product>>               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │ first users() / products() call         │
//! │          ┌───────────────────┴──────────────────┐                      │
//! │          ▼                                      ▼                       │
//! │  ┌──────────────────┐                  ┌──────────────────┐            │
//! │  │   UsersStore     │                  │  ProductsStore   │            │
//! │  │  created once,   │                  │  created once,   │            │
//! │  │  initial load    │                  │  initial load    │            │
//! │  │  spawned once    │                  │  spawned once    │            │
//! │  └──────────────────┘                  └──────────────────┘            │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Stores: Arc<Mutex<T>> inside, cheap to clone                        │
//! │  • ConsoleConfig: read-only after load                                 │
//! │  • OnceLock: concurrent first access still builds one store            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod products;
mod store;
mod users;

pub use config::{AppSettings, ConsoleConfig, LatencySettings, LoggingSettings, CONFIG_FILE_NAME};
pub use products::ProductsStore;
pub use store::{Breakdown, EntityStore, Outcome};
pub use users::UsersStore;

use std::sync::{Arc, OnceLock};

use backoffice_core::{Product, User};
use backoffice_data::{MockProductService, MockUserService, RecordService};

/// Owner of the application's stores.
///
/// Stores are built lazily: the first call to [`users`](Self::users) or
/// [`products`](Self::products) creates the store and spawns its initial
/// load on the current tokio runtime. Later calls return the same store.
pub struct AppState {
    config: ConsoleConfig,
    user_service: Arc<dyn RecordService<User>>,
    product_service: Arc<dyn RecordService<Product>>,
    users: OnceLock<UsersStore>,
    products: OnceLock<ProductsStore>,
}

impl AppState {
    /// Wires the mock services with the configured latency.
    pub fn new(config: ConsoleConfig) -> Self {
        let latency = config.latency.to_latency();
        Self::with_services(
            config,
            Arc::new(MockUserService::new(latency)),
            Arc::new(MockProductService::new(latency)),
        )
    }

    /// Uses the given services instead of the mocks.
    pub fn with_services(
        config: ConsoleConfig,
        user_service: Arc<dyn RecordService<User>>,
        product_service: Arc<dyn RecordService<Product>>,
    ) -> Self {
        AppState {
            config,
            user_service,
            product_service,
            users: OnceLock::new(),
            products: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// The users store, created and loaded on first access.
    pub fn users(&self) -> &UsersStore {
        self.users.get_or_init(|| {
            let store = UsersStore::new(Arc::clone(&self.user_service));
            store.spawn_initial_load();
            store
        })
    }

    /// The products store, created and loaded on first access.
    pub fn products(&self) -> &ProductsStore {
        self.products.get_or_init(|| {
            let store = ProductsStore::with_threshold(
                Arc::clone(&self.product_service),
                self.config.app.low_stock_threshold,
            );
            store.spawn_initial_load();
            store
        })
    }

    /// True once the users store exists.
    pub fn users_initialized(&self) -> bool {
        self.users.get().is_some()
    }

    pub fn products_initialized(&self) -> bool {
        self.products.get().is_some()
    }
}
