use super::find_user_rule;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase, UseCaseErrorContainer},
};
use crate::error::AutogiftError;
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::update_auto_gift_rule::{APIResponse, PathParams, RequestBody};
use autogift_domain::{
    AutoGiftRule, DateType, GiftSelectionCriteria, NotificationPreferences, RuleValidationError,
    ID,
};
use autogift_infra::AutogiftContext;

fn error_handler(e: UseCaseErrors) -> AutogiftError {
    match e {
        UseCaseErrors::NotFound(rule_id) => AutogiftError::NotFound(format!(
            "The auto-gift rule with id: {}, was not found.",
            rule_id
        )),
        UseCaseErrors::RuleCancelled => {
            AutogiftError::Conflict("A cancelled auto-gift rule cannot be updated".into())
        }
        UseCaseErrors::InvalidRule(e) => AutogiftError::BadClientData(e.to_string()),
        UseCaseErrors::StorageError => AutogiftError::InternalError,
    }
}

pub async fn update_auto_gift_rule_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let (user, policy) = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = UpdateAutoGiftRuleUseCase {
        user_id: user.id,
        rule_id: path_params.rule_id.clone(),
        date_type: body.date_type,
        budget_limit: body.budget_limit,
        gift_selection_criteria: body.gift_selection_criteria,
        notification_preferences: body.notification_preferences,
        payment_method_id: body.payment_method_id,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|rule| HttpResponse::Ok().json(APIResponse::new(rule)))
        .map_err(|e| match e {
            UseCaseErrorContainer::Unauthorized(e) => AutogiftError::Unauthorized(e),
            UseCaseErrorContainer::UseCase(e) => error_handler(e),
        })
}

/// Fields left as `None` are kept as they are
#[derive(Debug, Default)]
pub struct UpdateAutoGiftRuleUseCase {
    pub user_id: ID,
    pub rule_id: ID,
    pub date_type: Option<DateType>,
    pub budget_limit: Option<i64>,
    pub gift_selection_criteria: Option<GiftSelectionCriteria>,
    pub notification_preferences: Option<NotificationPreferences>,
    pub payment_method_id: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    RuleCancelled,
    InvalidRule(RuleValidationError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateAutoGiftRuleUseCase {
    type Response = AutoGiftRule;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "UpdateAutoGiftRule";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        let mut rule = match find_user_rule(&self.rule_id, &self.user_id, ctx).await {
            Ok(Some(rule)) => rule,
            Ok(None) => return Err(UseCaseErrors::NotFound(self.rule_id.clone())),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };
        if !rule.is_active {
            return Err(UseCaseErrors::RuleCancelled);
        }

        if let Some(date_type) = &self.date_type {
            rule.date_type = date_type.clone();
        }
        if self.budget_limit.is_some() {
            rule.set_budget_limit(self.budget_limit)
                .map_err(UseCaseErrors::InvalidRule)?;
        }
        if let Some(criteria) = &self.gift_selection_criteria {
            rule.gift_selection_criteria = criteria.clone();
        }
        if let Some(preferences) = &self.notification_preferences {
            rule.set_notification_preferences(preferences.clone())
                .map_err(UseCaseErrors::InvalidRule)?;
        }
        if let Some(payment_method_id) = &self.payment_method_id {
            rule.payment_method_id = Some(payment_method_id.clone());
        }
        rule.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .auto_gift_rules
            .save(&rule)
            .await
            .map(|_| rule)
            .map_err(|_| UseCaseErrors::StorageError)
    }
}

impl PermissionBoundary for UpdateAutoGiftRuleUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::UpdateAutoGiftRule]
    }
}
