mod config;
mod repos;
mod services;
mod system;

use autogift_domain::ID;
pub use config::Config;
pub use repos::{
    IAutoGiftRuleRepo, IConnectionRepo, IGiftExecutionRepo, IOrderRepo, IUserRepo,
    IVerificationCodeRepo, Repos,
};
pub use services::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::warn;

#[derive(Clone)]
pub struct AutogiftContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub services: Services,
    /// Orders currently being resubmitted by an admin
    pub recovering_orders: Arc<Mutex<HashSet<ID>>>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl AutogiftContext {
    fn new(repos: Repos, config: Config) -> Self {
        let services = Services::create(&config);
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            services,
            recovering_orders: Default::default(),
        }
    }

    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        Self::new(repos, Config::new())
    }

    pub fn create_inmemory() -> Self {
        let config = Config::new();
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            services: Services::create_inmemory(),
            recovering_orders: Default::default(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> AutogiftContext {
    match get_psql_connection_string() {
        Some(postgres_connection_string) => {
            AutogiftContext::create(ContextParams {
                postgres_connection_string,
            })
            .await
        }
        None => {
            warn!("Did not find DATABASE_URL environment variable. Going to use in-memory repositories, nothing will be persisted.");
            let config = Config::new();
            AutogiftContext::new(Repos::create_inmemory(), config)
        }
    }
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .ok()
        .filter(|conn| !conn.is_empty())
}
