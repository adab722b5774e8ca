use crate::{
    auto_gift_rule::AutoGiftRule,
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// pending -> processing -> completed | failed, pending -> cancelled
    pub fn can_transition_to(&self, next: ExecutionStatus) -> bool {
        use ExecutionStatus::*;
        matches!(
            (*self, next),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Pending, Failed)
                | (Processing, Completed)
                | (Processing, Failed)
        )
    }
}

impl Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown execution status: {}", s)),
        }
    }
}

/// One concrete attempt to fulfill an `AutoGiftRule` on a specific date.
///
/// Executions are created by the batch scheduler that lives outside of this
/// server, this server only reads them and cancels them.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomatedGiftExecution {
    pub id: ID,
    pub rule_id: ID,
    pub user_id: ID,
    /// Timestamp in millis at which the execution fires
    pub scheduled_date: i64,
    pub status: ExecutionStatus,
    pub order_id: Option<ID>,
    pub error_message: Option<String>,
    pub created: i64,
    pub updated: i64,
}

#[derive(Error, Debug, PartialEq)]
pub enum ExecutionTransitionError {
    #[error("Execution cannot move from {from} to {to}")]
    Invalid {
        from: ExecutionStatus,
        to: ExecutionStatus,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum ExecutionCancellationError {
    #[error("The gift is already {0}. Cancel the associated order to stop it.")]
    OrderMustBeCancelledFirst(ExecutionStatus),
    #[error("The gift execution is already {0}")]
    AlreadyFinal(ExecutionStatus),
    #[error("Cannot cancel: the next gift is scheduled within {0} hours")]
    WithinProtectedWindow(i64),
}

impl AutomatedGiftExecution {
    pub fn new(rule: &AutoGiftRule, scheduled_date: i64, now: i64) -> Self {
        Self {
            id: Default::default(),
            rule_id: rule.id.clone(),
            user_id: rule.user_id.clone(),
            scheduled_date,
            status: ExecutionStatus::Pending,
            order_id: None,
            error_message: None,
            created: now,
            updated: now,
        }
    }

    pub fn transition(
        &mut self,
        next: ExecutionStatus,
        now: i64,
    ) -> Result<(), ExecutionTransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(ExecutionTransitionError::Invalid {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated = now;
        Ok(())
    }

    /// Only `Pending` executions can be cancelled directly. Anything that has
    /// started processing has an order in flight that must be cancelled first.
    pub fn ensure_cancellable(&self) -> Result<(), ExecutionCancellationError> {
        match self.status {
            ExecutionStatus::Pending => Ok(()),
            status @ (ExecutionStatus::Processing | ExecutionStatus::Completed) => {
                Err(ExecutionCancellationError::OrderMustBeCancelledFirst(status))
            }
            status => Err(ExecutionCancellationError::AlreadyFinal(status)),
        }
    }
}

impl Entity for AutomatedGiftExecution {
    fn id(&self) -> &ID {
        &self.id
    }
}
