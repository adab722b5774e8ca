use crate::dtos::{AutoGiftRuleDTO, CancellationEligibilityDTO, GiftExecutionDTO};
use autogift_domain::{
    AutoGiftRule, AutomatedGiftExecution, DateType, GiftSelectionCriteria,
    NotificationPreferences, RuleSource, ID,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoGiftRuleResponse {
    pub rule: AutoGiftRuleDTO,
}

impl AutoGiftRuleResponse {
    pub fn new(rule: AutoGiftRule) -> Self {
        Self {
            rule: AutoGiftRuleDTO::new(rule),
        }
    }
}

#[derive(Deserialize, Serialize)]
pub struct RulePathParams {
    pub rule_id: ID,
}

pub mod create_auto_gift_rule {
    use super::*;

    /// Exactly one of `recipient_id` and `pending_recipient_email` must be set
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub recipient_id: Option<ID>,
        #[serde(default)]
        pub pending_recipient_email: Option<String>,
        pub date_type: DateType,
        #[serde(default)]
        pub event_id: Option<ID>,
        #[serde(default)]
        pub budget_limit: Option<i64>,
        #[serde(default)]
        pub gift_selection_criteria: Option<GiftSelectionCriteria>,
        #[serde(default)]
        pub notification_preferences: Option<NotificationPreferences>,
        #[serde(default)]
        pub payment_method_id: Option<String>,
        #[serde(default)]
        pub source: Option<RuleSource>,
    }

    pub type APIResponse = AutoGiftRuleResponse;
}

pub mod get_auto_gift_rule {
    use super::*;

    pub type PathParams = RulePathParams;

    pub type APIResponse = AutoGiftRuleResponse;
}

pub mod get_auto_gift_rules {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub rules: Vec<AutoGiftRuleDTO>,
    }

    impl APIResponse {
        pub fn new(rules: Vec<AutoGiftRule>) -> Self {
            Self {
                rules: rules.into_iter().map(AutoGiftRuleDTO::new).collect(),
            }
        }
    }
}

pub mod update_auto_gift_rule {
    use super::*;

    pub type PathParams = RulePathParams;

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub date_type: Option<DateType>,
        #[serde(default)]
        pub budget_limit: Option<i64>,
        #[serde(default)]
        pub gift_selection_criteria: Option<GiftSelectionCriteria>,
        #[serde(default)]
        pub notification_preferences: Option<NotificationPreferences>,
        #[serde(default)]
        pub payment_method_id: Option<String>,
    }

    pub type APIResponse = AutoGiftRuleResponse;
}

pub mod get_rule_cancellation_eligibility {
    use super::*;

    pub type PathParams = RulePathParams;

    pub type APIResponse = CancellationEligibilityDTO;
}

pub mod cancel_auto_gift_rule {
    use super::*;

    pub type PathParams = RulePathParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub rule: AutoGiftRuleDTO,
        pub cancelled_executions: Vec<GiftExecutionDTO>,
        pub cancelled_orders: Vec<ID>,
        /// Orders that could not be cancelled, the rule stays cancelled regardless
        pub failed_order_cancellations: Vec<ID>,
    }

    impl APIResponse {
        pub fn new(
            rule: AutoGiftRule,
            cancelled_executions: Vec<AutomatedGiftExecution>,
            cancelled_orders: Vec<ID>,
            failed_order_cancellations: Vec<ID>,
        ) -> Self {
            Self {
                rule: AutoGiftRuleDTO::new(rule),
                cancelled_executions: cancelled_executions
                    .into_iter()
                    .map(GiftExecutionDTO::new)
                    .collect(),
                cancelled_orders,
                failed_order_cancellations,
            }
        }
    }
}

pub mod get_rule_executions {
    use super::*;

    pub type PathParams = RulePathParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub executions: Vec<GiftExecutionDTO>,
    }

    impl APIResponse {
        pub fn new(executions: Vec<AutomatedGiftExecution>) -> Self {
            Self {
                executions: executions.into_iter().map(GiftExecutionDTO::new).collect(),
            }
        }
    }
}
