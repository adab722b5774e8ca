use autogift_domain::{AutomatedGiftExecution, ID};
use autogift_infra::IGiftExecutionRepo;

fn unreachable() -> anyhow::Error {
    anyhow::anyhow!("connection refused")
}

/// Fails every query the way a lost database connection does
pub struct UnreachableGiftExecutionRepo;

#[async_trait::async_trait]
impl IGiftExecutionRepo for UnreachableGiftExecutionRepo {
    async fn insert(&self, _execution: &AutomatedGiftExecution) -> anyhow::Result<()> {
        Err(unreachable())
    }

    async fn save(&self, _execution: &AutomatedGiftExecution) -> anyhow::Result<()> {
        Err(unreachable())
    }

    async fn find(&self, _execution_id: &ID) -> anyhow::Result<Option<AutomatedGiftExecution>> {
        Err(unreachable())
    }

    async fn find_by_rule(&self, _rule_id: &ID) -> anyhow::Result<Vec<AutomatedGiftExecution>> {
        Err(unreachable())
    }

    async fn cancel_pending(
        &self,
        _execution_id: &ID,
        _now: i64,
    ) -> anyhow::Result<Option<AutomatedGiftExecution>> {
        Err(unreachable())
    }

    async fn cancel_pending_by_rule(
        &self,
        _rule_id: &ID,
        _now: i64,
    ) -> anyhow::Result<Vec<AutomatedGiftExecution>> {
        Err(unreachable())
    }
}
