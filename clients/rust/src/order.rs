use crate::base::{APIResponse, BaseClient};
use autogift_api_structs::*;
use autogift_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

/// Admin operations on orders. Requires the SDK to be created with an api key.
#[derive(Clone)]
pub struct OrderClient {
    base: Arc<BaseClient>,
}

impl OrderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn recovery(&self, order_id: ID) -> APIResponse<get_order_recovery::APIResponse> {
        self.base
            .get(
                format!("admin/orders/{}/recovery", order_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn retry(&self, order_id: ID) -> APIResponse<retry_order::APIResponse> {
        self.base
            .post(
                (),
                format!("admin/orders/{}/retry", order_id),
                StatusCode::OK,
            )
            .await
    }
}
