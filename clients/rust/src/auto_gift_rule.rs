use crate::base::{APIResponse, BaseClient};
use autogift_api_structs::*;
use autogift_domain::{
    DateType, GiftSelectionCriteria, NotificationPreferences, RuleSource, ID,
};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct AutoGiftRuleClient {
    base: Arc<BaseClient>,
}

pub struct CreateAutoGiftRuleInput {
    pub recipient_id: Option<ID>,
    pub pending_recipient_email: Option<String>,
    pub date_type: DateType,
    pub event_id: Option<ID>,
    pub budget_limit: Option<i64>,
    pub gift_selection_criteria: Option<GiftSelectionCriteria>,
    pub notification_preferences: Option<NotificationPreferences>,
    pub payment_method_id: Option<String>,
    pub source: Option<RuleSource>,
}

impl CreateAutoGiftRuleInput {
    /// Rule for a connected recipient with every optional setting left out
    pub fn for_connection(recipient_id: ID, date_type: DateType) -> Self {
        Self {
            recipient_id: Some(recipient_id),
            pending_recipient_email: None,
            date_type,
            event_id: None,
            budget_limit: None,
            gift_selection_criteria: None,
            notification_preferences: None,
            payment_method_id: None,
            source: None,
        }
    }
}

#[derive(Default)]
pub struct UpdateAutoGiftRuleInput {
    pub date_type: Option<DateType>,
    pub budget_limit: Option<i64>,
    pub gift_selection_criteria: Option<GiftSelectionCriteria>,
    pub notification_preferences: Option<NotificationPreferences>,
    pub payment_method_id: Option<String>,
}

impl AutoGiftRuleClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateAutoGiftRuleInput,
    ) -> APIResponse<create_auto_gift_rule::APIResponse> {
        let body = create_auto_gift_rule::RequestBody {
            recipient_id: input.recipient_id,
            pending_recipient_email: input.pending_recipient_email,
            date_type: input.date_type,
            event_id: input.event_id,
            budget_limit: input.budget_limit,
            gift_selection_criteria: input.gift_selection_criteria,
            notification_preferences: input.notification_preferences,
            payment_method_id: input.payment_method_id,
            source: input.source,
        };
        self.base
            .post(body, "auto-gift-rules".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, rule_id: ID) -> APIResponse<get_auto_gift_rule::APIResponse> {
        self.base
            .get(format!("auto-gift-rules/{}", rule_id), StatusCode::OK)
            .await
    }

    pub async fn list(&self) -> APIResponse<get_auto_gift_rules::APIResponse> {
        self.base
            .get("auto-gift-rules".into(), StatusCode::OK)
            .await
    }

    pub async fn update(
        &self,
        rule_id: ID,
        input: UpdateAutoGiftRuleInput,
    ) -> APIResponse<update_auto_gift_rule::APIResponse> {
        let body = update_auto_gift_rule::RequestBody {
            date_type: input.date_type,
            budget_limit: input.budget_limit,
            gift_selection_criteria: input.gift_selection_criteria,
            notification_preferences: input.notification_preferences,
            payment_method_id: input.payment_method_id,
        };
        self.base
            .put(body, format!("auto-gift-rules/{}", rule_id), StatusCode::OK)
            .await
    }

    pub async fn cancellation_eligibility(
        &self,
        rule_id: ID,
    ) -> APIResponse<get_rule_cancellation_eligibility::APIResponse> {
        self.base
            .get(
                format!("auto-gift-rules/{}/cancellation", rule_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn cancel(&self, rule_id: ID) -> APIResponse<cancel_auto_gift_rule::APIResponse> {
        self.base
            .post(
                (),
                format!("auto-gift-rules/{}/cancel", rule_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn executions(&self, rule_id: ID) -> APIResponse<get_rule_executions::APIResponse> {
        self.base
            .get(
                format!("auto-gift-rules/{}/executions", rule_id),
                StatusCode::OK,
            )
            .await
    }
}
