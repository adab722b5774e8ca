use autogift_domain::{NaiveDate, Order, OrderStatus, PaymentStatus, RecoveryDecision, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderDTO {
    pub id: ID,
    pub user_id: ID,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub zinc_order_id: Option<String>,
    pub scheduled_delivery_date: Option<NaiveDate>,
    pub total_amount: i64,
    pub created: i64,
    pub updated: i64,
}

impl OrderDTO {
    pub fn new(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            payment_status: order.payment_status,
            zinc_order_id: order.zinc_order_id,
            scheduled_delivery_date: order.scheduled_delivery_date,
            total_amount: order.total_amount,
            created: order.created,
            updated: order.updated,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    Retry,
    DeferredPayment,
    NotRecoverable,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecoveryDTO {
    pub action: RecoveryAction,
    pub guidance: String,
    pub capture_date: Option<NaiveDate>,
    pub submission_date: Option<NaiveDate>,
}

impl OrderRecoveryDTO {
    pub fn new(decision: &RecoveryDecision) -> Self {
        let guidance = decision.guidance();
        match decision {
            RecoveryDecision::Retry => Self {
                action: RecoveryAction::Retry,
                guidance,
                capture_date: None,
                submission_date: None,
            },
            RecoveryDecision::DeferredPayment {
                capture_date,
                submission_date,
            } => Self {
                action: RecoveryAction::DeferredPayment,
                guidance,
                capture_date: *capture_date,
                submission_date: *submission_date,
            },
            RecoveryDecision::NotRecoverable(_) => Self {
                action: RecoveryAction::NotRecoverable,
                guidance,
                capture_date: None,
                submission_date: None,
            },
        }
    }
}
