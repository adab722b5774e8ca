use crate::shared::entity::{Entity, ID};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Scheduled,
    Processing,
    Submitted,
    Shipped,
    Delivered,
    Failed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Processing => "processing",
            Self::Submitted => "submitted",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "scheduled" => Ok(Self::Scheduled),
            "processing" => Ok(Self::Processing),
            "submitted" => Ok(Self::Submitted),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment has not been captured yet. For scheduled gifts this is the
    /// deferred payment state until shortly before delivery.
    Pending,
    Succeeded,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(format!("Unknown payment status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: ID,
    pub user_id: ID,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Identifier at the fulfillment provider, set once the order was submitted
    pub zinc_order_id: Option<String>,
    pub scheduled_delivery_date: Option<NaiveDate>,
    /// Total in cents
    pub total_amount: i64,
    pub created: i64,
    pub updated: i64,
}

impl Order {
    pub fn new(user_id: ID, total_amount: i64, now: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            zinc_order_id: None,
            scheduled_delivery_date: None,
            total_amount,
            created: now,
            updated: now,
        }
    }

    /// Orders that have not been handed to the fulfillment provider yet
    pub fn is_cancellable(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Scheduled)
    }

    /// Returns false when the order had already progressed too far
    pub fn cancel(&mut self, now: i64) -> bool {
        if !self.is_cancellable() {
            return false;
        }
        self.status = OrderStatus::Cancelled;
        self.updated = now;
        true
    }
}

impl Entity for Order {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// When the external batch scheduler captures payment and submits
/// deferred-payment orders, relative to the scheduled arrival
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredPaymentSchedule {
    pub capture_lead_days: i64,
    pub submission_lead_days: i64,
}

impl DeferredPaymentSchedule {
    pub fn capture_date(&self, arrival: NaiveDate) -> NaiveDate {
        arrival - Duration::days(self.capture_lead_days)
    }

    pub fn submission_date(&self, arrival: NaiveDate) -> NaiveDate {
        arrival - Duration::days(self.submission_lead_days)
    }
}

impl Default for DeferredPaymentSchedule {
    fn default() -> Self {
        Self {
            capture_lead_days: 7,
            submission_lead_days: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryDecision {
    /// Safe to resubmit the order for processing
    Retry,
    /// Payment is intentionally deferred. Resubmitting now fails downstream,
    /// the batch scheduler will capture and submit on these dates.
    DeferredPayment {
        capture_date: Option<NaiveDate>,
        submission_date: Option<NaiveDate>,
    },
    NotRecoverable(String),
}

impl RecoveryDecision {
    pub fn allows_retry(&self) -> bool {
        matches!(self, Self::Retry)
    }

    pub fn guidance(&self) -> String {
        match self {
            Self::Retry => "Order can be resubmitted for processing".into(),
            Self::DeferredPayment {
                capture_date: Some(capture),
                submission_date: Some(submission),
            } => format!(
                "Payment for this order is deferred. It will be captured on {} and the order submitted on {}.",
                capture, submission
            ),
            Self::DeferredPayment { .. } => {
                "Payment for this order is deferred and will be captured by the scheduled batch job."
                    .into()
            }
            Self::NotRecoverable(reason) => reason.clone(),
        }
    }
}

/// Guard in front of resubmitting a stuck `Order`.
pub fn evaluate_order_recovery(order: &Order, schedule: &DeferredPaymentSchedule) -> RecoveryDecision {
    match order.status {
        OrderStatus::Shipped | OrderStatus::Delivered | OrderStatus::Cancelled => {
            return RecoveryDecision::NotRecoverable(format!(
                "Order is already {} and cannot be resubmitted",
                order.status
            ));
        }
        _ => (),
    }

    if order.payment_status == PaymentStatus::Pending {
        return RecoveryDecision::DeferredPayment {
            capture_date: order
                .scheduled_delivery_date
                .map(|arrival| schedule.capture_date(arrival)),
            submission_date: order
                .scheduled_delivery_date
                .map(|arrival| schedule.submission_date(arrival)),
        };
    }

    RecoveryDecision::Retry
}
