use super::IGiftExecutionRepo;
use crate::repos::shared::inmemory_repo::*;
use autogift_domain::{AutomatedGiftExecution, ExecutionStatus, ID};

pub struct InMemoryGiftExecutionRepo {
    executions: std::sync::Mutex<Vec<AutomatedGiftExecution>>,
}

impl InMemoryGiftExecutionRepo {
    pub fn new() -> Self {
        Self {
            executions: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IGiftExecutionRepo for InMemoryGiftExecutionRepo {
    async fn insert(&self, execution: &AutomatedGiftExecution) -> anyhow::Result<()> {
        insert(execution, &self.executions);
        Ok(())
    }

    async fn save(&self, execution: &AutomatedGiftExecution) -> anyhow::Result<()> {
        save(execution, &self.executions);
        Ok(())
    }

    async fn find(&self, execution_id: &ID) -> anyhow::Result<Option<AutomatedGiftExecution>> {
        Ok(find(execution_id, &self.executions))
    }

    async fn find_by_rule(&self, rule_id: &ID) -> anyhow::Result<Vec<AutomatedGiftExecution>> {
        let mut executions = find_by(&self.executions, |e| e.rule_id == *rule_id);
        executions.sort_by_key(|e| e.scheduled_date);
        Ok(executions)
    }

    async fn cancel_pending(
        &self,
        execution_id: &ID,
        now: i64,
    ) -> anyhow::Result<Option<AutomatedGiftExecution>> {
        let cancelled = update_many(
            &self.executions,
            |e| e.id == *execution_id && e.status == ExecutionStatus::Pending,
            |e| {
                e.status = ExecutionStatus::Cancelled;
                e.updated = now;
            },
        );
        Ok(cancelled.into_iter().next())
    }

    async fn cancel_pending_by_rule(
        &self,
        rule_id: &ID,
        now: i64,
    ) -> anyhow::Result<Vec<AutomatedGiftExecution>> {
        Ok(update_many(
            &self.executions,
            |e| e.rule_id == *rule_id && e.status == ExecutionStatus::Pending,
            |e| {
                e.status = ExecutionStatus::Cancelled;
                e.updated = now;
            },
        ))
    }
}
