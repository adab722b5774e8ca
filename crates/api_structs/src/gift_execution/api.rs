use crate::dtos::GiftExecutionDTO;
use autogift_domain::{AutomatedGiftExecution, ID};
use serde::{Deserialize, Serialize};

pub mod cancel_gift_execution {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct PathParams {
        pub execution_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub execution: GiftExecutionDTO,
        /// Whether the linked order was cancelled, absent without a linked order
        pub order_cancelled: Option<bool>,
    }

    impl APIResponse {
        pub fn new(execution: AutomatedGiftExecution, order_cancelled: Option<bool>) -> Self {
            Self {
                execution: GiftExecutionDTO::new(execution),
                order_cancelled,
            }
        }
    }
}
