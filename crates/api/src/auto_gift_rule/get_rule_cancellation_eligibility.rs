use super::find_user_rule;
use crate::{
    error::AutogiftError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::{
    dtos::CancellationEligibilityDTO, get_rule_cancellation_eligibility::PathParams,
};
use autogift_domain::{check_rule_cancellation, AutoGiftRule, CancellationEligibility, ID};
use autogift_infra::AutogiftContext;
use std::convert::Infallible;
use tracing::error;

pub async fn get_rule_cancellation_eligibility_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let (user, _policy) = protect_route(&http_req, &ctx).await?;

    let usecase = GetRuleCancellationEligibilityUseCase {
        user_id: user.id,
        rule_id: path_params.rule_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|eligibility| HttpResponse::Ok().json(CancellationEligibilityDTO::new(eligibility)))
        .map_err(|e| match e {})
}

/// Loads the rule owned by `user_id` together with its executions and
/// decides whether it may be cancelled right now
pub(crate) async fn load_cancellation_eligibility(
    rule_id: &ID,
    user_id: &ID,
    ctx: &AutogiftContext,
) -> anyhow::Result<(Option<AutoGiftRule>, CancellationEligibility)> {
    let rule = find_user_rule(rule_id, user_id, ctx).await?;
    let executions = match &rule {
        Some(rule) => ctx.repos.gift_executions.find_by_rule(&rule.id).await?,
        None => Vec::new(),
    };
    let eligibility = check_rule_cancellation(
        rule.as_ref(),
        &executions,
        ctx.sys.get_timestamp_millis(),
        &ctx.config.cancellation_policy,
    );
    Ok((rule, eligibility))
}

/// Answers whether a rule can be cancelled. Never fails, a rule that cannot
/// be loaded is reported as not cancellable.
#[derive(Debug)]
pub struct GetRuleCancellationEligibilityUseCase {
    pub user_id: ID,
    pub rule_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRuleCancellationEligibilityUseCase {
    type Response = CancellationEligibility;

    type Errors = Infallible;

    const NAME: &'static str = "GetRuleCancellationEligibility";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        match load_cancellation_eligibility(&self.rule_id, &self.user_id, ctx).await {
            Ok((_, eligibility)) => Ok(eligibility),
            Err(e) => {
                error!(
                    "Unable to verify cancellation eligibility of rule: {}. Error: {:?}",
                    self.rule_id, e
                );
                Ok(CancellationEligibility::unverifiable())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::unreachable_repos::UnreachableGiftExecutionRepo;
    use autogift_domain::{AutomatedGiftExecution, DateType, GiftRecipient};
    use autogift_infra::StaticTimeSys;
    use std::sync::Arc;

    const HOUR: i64 = 1000 * 60 * 60;
    const NOW: i64 = 1_700_000_000_000;

    async fn setup() -> (AutogiftContext, AutoGiftRule) {
        let mut ctx = AutogiftContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        let rule = AutoGiftRule::new(
            ID::default(),
            GiftRecipient::PendingInvitation("friend@example.com".into()),
            DateType::Birthday,
            0,
        );
        ctx.repos.auto_gift_rules.insert(&rule).await.unwrap();
        (ctx, rule)
    }

    #[actix_web::main]
    #[test]
    async fn next_execution_more_than_a_day_away_allows_cancellation() {
        let (ctx, rule) = setup().await;
        let execution = AutomatedGiftExecution::new(&rule, NOW + 48 * HOUR, 0);
        ctx.repos.gift_executions.insert(&execution).await.unwrap();

        let mut usecase = GetRuleCancellationEligibilityUseCase {
            user_id: rule.user_id.clone(),
            rule_id: rule.id.clone(),
        };
        let res = usecase.execute(&ctx).await.unwrap();
        assert!(res.can_cancel);
        assert_eq!(res.next_execution, Some(NOW + 48 * HOUR));
        assert_eq!(res.executions, vec![execution]);
    }

    #[actix_web::main]
    #[test]
    async fn next_execution_within_a_day_refuses_cancellation() {
        let (ctx, rule) = setup().await;
        let execution = AutomatedGiftExecution::new(&rule, NOW + 5 * HOUR, 0);
        ctx.repos.gift_executions.insert(&execution).await.unwrap();

        let mut usecase = GetRuleCancellationEligibilityUseCase {
            user_id: rule.user_id.clone(),
            rule_id: rule.id.clone(),
        };
        let res = usecase.execute(&ctx).await.unwrap();
        assert!(!res.can_cancel);
        assert!(res.reason.unwrap().contains("24 hours"));
    }

    #[actix_web::main]
    #[test]
    async fn missing_rule_is_reported_without_error() {
        let (ctx, rule) = setup().await;
        for (user_id, rule_id) in [
            (rule.user_id.clone(), ID::default()),
            (ID::default(), rule.id.clone()),
        ] {
            let mut usecase = GetRuleCancellationEligibilityUseCase { user_id, rule_id };
            let res = usecase.execute(&ctx).await.unwrap();
            assert!(!res.can_cancel);
            assert_eq!(res.reason.unwrap(), "Auto-gift rule not found");
        }
    }

    #[actix_web::main]
    #[test]
    async fn storage_failure_refuses_cancellation() {
        let (mut ctx, rule) = setup().await;
        ctx.repos.gift_executions = Arc::new(UnreachableGiftExecutionRepo);

        let usecase = GetRuleCancellationEligibilityUseCase {
            user_id: rule.user_id.clone(),
            rule_id: rule.id.clone(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert!(!res.can_cancel);
        assert_eq!(
            res.reason.as_deref(),
            Some("Unable to verify cancellation eligibility")
        );
        assert!(res.executions.is_empty());
        assert_eq!(res.next_execution, None);
    }
}
