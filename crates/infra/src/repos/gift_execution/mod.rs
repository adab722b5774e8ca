mod inmemory;
mod postgres;

use autogift_domain::{AutomatedGiftExecution, ID};
pub use inmemory::InMemoryGiftExecutionRepo;
pub use postgres::PostgresGiftExecutionRepo;

#[async_trait::async_trait]
pub trait IGiftExecutionRepo: Send + Sync {
    async fn insert(&self, execution: &AutomatedGiftExecution) -> anyhow::Result<()>;
    async fn save(&self, execution: &AutomatedGiftExecution) -> anyhow::Result<()>;
    async fn find(&self, execution_id: &ID) -> anyhow::Result<Option<AutomatedGiftExecution>>;
    /// Sorted by `scheduled_date`, earliest first
    async fn find_by_rule(&self, rule_id: &ID) -> anyhow::Result<Vec<AutomatedGiftExecution>>;
    /// Moves the execution to cancelled only while it is still pending.
    /// Returns `None` when it had already left the pending status.
    async fn cancel_pending(
        &self,
        execution_id: &ID,
        now: i64,
    ) -> anyhow::Result<Option<AutomatedGiftExecution>>;
    /// Moves every pending execution of the rule to cancelled and
    /// returns the executions that were cancelled
    async fn cancel_pending_by_rule(
        &self,
        rule_id: &ID,
        now: i64,
    ) -> anyhow::Result<Vec<AutomatedGiftExecution>>;
}
