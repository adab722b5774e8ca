use crate::base::{APIResponse, BaseClient};
use autogift_api_structs::*;
use autogift_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct GiftExecutionClient {
    base: Arc<BaseClient>,
}

impl GiftExecutionClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn cancel(
        &self,
        execution_id: ID,
    ) -> APIResponse<cancel_gift_execution::APIResponse> {
        self.base
            .post(
                (),
                format!("gift-executions/{}/cancel", execution_id),
                StatusCode::OK,
            )
            .await
    }
}
