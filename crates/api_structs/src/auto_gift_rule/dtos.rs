use crate::dtos::GiftExecutionDTO;
use autogift_domain::{
    AutoGiftRule, CancellationEligibility, DateType, GiftSelectionCriteria,
    NotificationPreferences, RuleSource, ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AutoGiftRuleDTO {
    pub id: ID,
    pub user_id: ID,
    pub recipient_id: Option<ID>,
    pub pending_recipient_email: Option<String>,
    pub date_type: DateType,
    pub event_id: Option<ID>,
    pub budget_limit: Option<i64>,
    pub gift_selection_criteria: GiftSelectionCriteria,
    pub notification_preferences: NotificationPreferences,
    pub payment_method_id: Option<String>,
    pub is_active: bool,
    pub source: RuleSource,
    pub created: i64,
    pub updated: i64,
}

impl AutoGiftRuleDTO {
    pub fn new(rule: AutoGiftRule) -> Self {
        Self {
            recipient_id: rule.recipient.recipient_id().cloned(),
            pending_recipient_email: rule
                .recipient
                .pending_recipient_email()
                .map(|email| email.to_string()),
            id: rule.id,
            user_id: rule.user_id,
            date_type: rule.date_type,
            event_id: rule.event_id,
            budget_limit: rule.budget_limit,
            gift_selection_criteria: rule.gift_selection_criteria,
            notification_preferences: rule.notification_preferences,
            payment_method_id: rule.payment_method_id,
            is_active: rule.is_active,
            source: rule.source,
            created: rule.created,
            updated: rule.updated,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CancellationEligibilityDTO {
    pub can_cancel: bool,
    pub reason: Option<String>,
    pub executions: Vec<GiftExecutionDTO>,
    pub next_execution: Option<i64>,
}

impl CancellationEligibilityDTO {
    pub fn new(eligibility: CancellationEligibility) -> Self {
        Self {
            can_cancel: eligibility.can_cancel,
            reason: eligibility.reason,
            executions: eligibility
                .executions
                .into_iter()
                .map(GiftExecutionDTO::new)
                .collect(),
            next_execution: eligibility.next_execution,
        }
    }
}
