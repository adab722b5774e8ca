use autogift_domain::{AutomatedGiftExecution, ExecutionStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GiftExecutionDTO {
    pub id: ID,
    pub rule_id: ID,
    pub user_id: ID,
    pub scheduled_date: i64,
    pub status: ExecutionStatus,
    pub order_id: Option<ID>,
    pub error_message: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl GiftExecutionDTO {
    pub fn new(execution: AutomatedGiftExecution) -> Self {
        Self {
            id: execution.id,
            rule_id: execution.rule_id,
            user_id: execution.user_id,
            scheduled_date: execution.scheduled_date,
            status: execution.status,
            order_id: execution.order_id,
            error_message: execution.error_message,
            created: execution.created,
            updated: execution.updated,
        }
    }
}
