mod auto_gift_rule;
mod connection;
mod gift_execution;
mod order;
mod shared;
mod user;
mod verification_code;

pub use auto_gift_rule::IAutoGiftRuleRepo;
use auto_gift_rule::{InMemoryAutoGiftRuleRepo, PostgresAutoGiftRuleRepo};
pub use connection::IConnectionRepo;
use connection::{InMemoryConnectionRepo, PostgresConnectionRepo};
pub use gift_execution::IGiftExecutionRepo;
use gift_execution::{InMemoryGiftExecutionRepo, PostgresGiftExecutionRepo};
pub use order::IOrderRepo;
use order::{InMemoryOrderRepo, PostgresOrderRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};
pub use verification_code::IVerificationCodeRepo;
use verification_code::{InMemoryVerificationCodeRepo, PostgresVerificationCodeRepo};

#[derive(Clone)]
pub struct Repos {
    pub auto_gift_rules: Arc<dyn IAutoGiftRuleRepo>,
    pub gift_executions: Arc<dyn IGiftExecutionRepo>,
    pub orders: Arc<dyn IOrderRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub connections: Arc<dyn IConnectionRepo>,
    pub verification_codes: Arc<dyn IVerificationCodeRepo>,
}

impl Repos {
    pub async fn create_postgres(
        connection_string: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB EXECUTING MIGRATION ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB EXECUTING MIGRATION ... [done]");

        Ok(Self {
            auto_gift_rules: Arc::new(PostgresAutoGiftRuleRepo::new(pool.clone())),
            gift_executions: Arc::new(PostgresGiftExecutionRepo::new(pool.clone())),
            orders: Arc::new(PostgresOrderRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            connections: Arc::new(PostgresConnectionRepo::new(pool.clone())),
            verification_codes: Arc::new(PostgresVerificationCodeRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            auto_gift_rules: Arc::new(InMemoryAutoGiftRuleRepo::new()),
            gift_executions: Arc::new(InMemoryGiftExecutionRepo::new()),
            orders: Arc::new(InMemoryOrderRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            connections: Arc::new(InMemoryConnectionRepo::new()),
            verification_codes: Arc::new(InMemoryVerificationCodeRepo::new()),
        }
    }
}
