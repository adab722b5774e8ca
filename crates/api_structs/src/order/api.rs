use crate::dtos::{OrderDTO, OrderRecoveryDTO};
use autogift_domain::{Order, RecoveryDecision, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct OrderPathParams {
    pub order_id: ID,
}

pub mod get_order_recovery {
    use super::*;

    pub type PathParams = OrderPathParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub order: OrderDTO,
        pub recovery: OrderRecoveryDTO,
    }

    impl APIResponse {
        pub fn new(order: Order, decision: &RecoveryDecision) -> Self {
            Self {
                order: OrderDTO::new(order),
                recovery: OrderRecoveryDTO::new(decision),
            }
        }
    }
}

pub mod retry_order {
    use super::*;

    pub type PathParams = OrderPathParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub order: OrderDTO,
        pub recovery: OrderRecoveryDTO,
        /// True only when the order was handed to the order processor
        pub resubmitted: bool,
    }

    impl APIResponse {
        pub fn new(order: Order, decision: &RecoveryDecision, resubmitted: bool) -> Self {
            Self {
                order: OrderDTO::new(order),
                recovery: OrderRecoveryDTO::new(decision),
                resubmitted,
            }
        }
    }
}
