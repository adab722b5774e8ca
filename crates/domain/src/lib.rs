mod auto_gift_rule;
mod cancellation;
mod connection;
mod gift_execution;
mod order;
mod shared;
mod user;
mod verification;

pub use auto_gift_rule::{
    AutoGiftRule, DateType, GiftRecipient, GiftSelectionCriteria, GiftSource,
    NotificationPreferences, RuleSource, RuleValidationError,
};
pub use cancellation::{
    check_execution_cancellation, check_rule_cancellation, CancellationEligibility,
    CancellationPolicy, DEFAULT_PROTECTED_WINDOW_MILLIS,
};
pub use connection::{Connection, ConnectionStatus};
pub use gift_execution::{
    AutomatedGiftExecution, ExecutionCancellationError, ExecutionStatus, ExecutionTransitionError,
};
pub use order::{
    evaluate_order_recovery, DeferredPaymentSchedule, Order, OrderStatus, PaymentStatus,
    RecoveryDecision,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use user::{is_valid_email, normalize_email, User};
pub use verification::{
    VerificationCode, VerificationCodeState, VerificationError, VerificationPolicy,
};

pub use chrono::NaiveDate;
