use super::get_rule_cancellation_eligibility::load_cancellation_eligibility;
use crate::gift_execution::{cancel_linked_orders, OrderCancellations};
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase, UseCaseErrorContainer},
};
use crate::error::AutogiftError;
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::cancel_auto_gift_rule::{APIResponse, PathParams};
use autogift_domain::{AutoGiftRule, AutomatedGiftExecution, ID};
use autogift_infra::AutogiftContext;
use tracing::{error, info};

fn error_handler(e: UseCaseErrors) -> AutogiftError {
    match e {
        UseCaseErrors::NotFound(rule_id) => AutogiftError::NotFound(format!(
            "The auto-gift rule with id: {}, was not found.",
            rule_id
        )),
        UseCaseErrors::NotCancellable(reason) => AutogiftError::Conflict(reason),
        UseCaseErrors::StorageError => AutogiftError::InternalError,
    }
}

pub async fn cancel_auto_gift_rule_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let (user, policy) = protect_route(&http_req, &ctx).await?;

    let usecase = CancelAutoGiftRuleUseCase {
        user_id: user.id,
        rule_id: path_params.rule_id.clone(),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse::new(
                res.rule,
                res.cancelled_executions,
                res.orders.cancelled,
                res.orders.failed,
            ))
        })
        .map_err(|e| match e {
            UseCaseErrorContainer::Unauthorized(e) => AutogiftError::Unauthorized(e),
            UseCaseErrorContainer::UseCase(e) => error_handler(e),
        })
}

/// Deactivates a rule and cancels everything it has scheduled that has not
/// started yet. The rule is refused while a gift is processing or about to fire.
#[derive(Debug)]
pub struct CancelAutoGiftRuleUseCase {
    pub user_id: ID,
    pub rule_id: ID,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub rule: AutoGiftRule,
    pub cancelled_executions: Vec<AutomatedGiftExecution>,
    pub orders: OrderCancellations,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    NotCancellable(String),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelAutoGiftRuleUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CancelAutoGiftRule";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        let (rule, eligibility) =
            match load_cancellation_eligibility(&self.rule_id, &self.user_id, ctx).await {
                Ok(res) => res,
                Err(e) => {
                    error!(
                        "Unable to verify cancellation eligibility of rule: {}. Error: {:?}",
                        self.rule_id, e
                    );
                    return Err(UseCaseErrors::StorageError);
                }
            };
        let mut rule = match rule {
            Some(rule) => rule,
            None => return Err(UseCaseErrors::NotFound(self.rule_id.clone())),
        };
        if !eligibility.can_cancel {
            return Err(UseCaseErrors::NotCancellable(
                eligibility.reason.unwrap_or_default(),
            ));
        }

        let now = ctx.sys.get_timestamp_millis();
        rule.deactivate(now);
        ctx.repos
            .auto_gift_rules
            .save(&rule)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let cancelled_executions = ctx
            .repos
            .gift_executions
            .cancel_pending_by_rule(&rule.id, now)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        let orders = cancel_linked_orders(&cancelled_executions, ctx).await;

        info!(
            "Cancelled auto-gift rule: {} with {} executions and {} orders",
            rule.id,
            cancelled_executions.len(),
            orders.cancelled.len()
        );

        Ok(UseCaseResponse {
            rule,
            cancelled_executions,
            orders,
        })
    }
}

impl PermissionBoundary for CancelAutoGiftRuleUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::CancelAutoGiftRule]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use autogift_domain::{
        DateType, ExecutionStatus, GiftRecipient, Order, OrderStatus, PaymentStatus,
    };
    use crate::shared::unreachable_repos::UnreachableGiftExecutionRepo;
    use autogift_infra::StaticTimeSys;
    use std::sync::Arc;

    const HOUR: i64 = 1000 * 60 * 60;
    const NOW: i64 = 1_700_000_000_000;

    struct TestContext {
        ctx: AutogiftContext,
        rule: AutoGiftRule,
    }

    async fn setup() -> TestContext {
        let mut ctx = AutogiftContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        let rule = AutoGiftRule::new(
            ID::default(),
            GiftRecipient::Connection(ID::default()),
            DateType::Birthday,
            0,
        );
        ctx.repos.auto_gift_rules.insert(&rule).await.unwrap();
        TestContext { ctx, rule }
    }

    async fn insert_execution_with_order(
        ctx: &AutogiftContext,
        rule: &AutoGiftRule,
        hours_away: i64,
    ) -> (AutomatedGiftExecution, Order) {
        let mut order = Order::new(rule.user_id.clone(), 4000, 0);
        order.status = OrderStatus::Scheduled;
        ctx.repos.orders.insert(&order).await.unwrap();
        let mut execution = AutomatedGiftExecution::new(rule, NOW + hours_away * HOUR, 0);
        execution.order_id = Some(order.id.clone());
        ctx.repos.gift_executions.insert(&execution).await.unwrap();
        (execution, order)
    }

    fn usecase(rule: &AutoGiftRule) -> CancelAutoGiftRuleUseCase {
        CancelAutoGiftRuleUseCase {
            user_id: rule.user_id.clone(),
            rule_id: rule.id.clone(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn cancels_rule_executions_and_orders() {
        let TestContext { ctx, rule } = setup().await;
        let (execution, order) = insert_execution_with_order(&ctx, &rule, 72).await;
        let mut completed = AutomatedGiftExecution::new(&rule, NOW - 24 * 365 * HOUR, 0);
        completed.status = ExecutionStatus::Completed;
        ctx.repos.gift_executions.insert(&completed).await.unwrap();

        let res = usecase(&rule).execute(&ctx).await.unwrap();
        assert!(!res.rule.is_active);
        assert_eq!(res.rule.updated, NOW);
        assert_eq!(res.cancelled_executions.len(), 1);
        assert_eq!(res.cancelled_executions[0].id, execution.id);
        assert_eq!(res.orders.cancelled, vec![order.id.clone()]);
        assert!(res.orders.failed.is_empty());

        let stored_rule = ctx.repos.auto_gift_rules.find(&rule.id).await.unwrap().unwrap();
        assert!(!stored_rule.is_active);
        let stored_order = ctx.repos.orders.find(&order.id).await.unwrap().unwrap();
        assert_eq!(stored_order.status, OrderStatus::Cancelled);
        let stored_completed = ctx
            .repos
            .gift_executions
            .find(&completed.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored_completed.status, ExecutionStatus::Completed);
    }

    #[actix_web::main]
    #[test]
    async fn refuses_when_next_gift_is_within_a_day() {
        let TestContext { ctx, rule } = setup().await;
        let (execution, order) = insert_execution_with_order(&ctx, &rule, 23).await;

        match usecase(&rule).execute(&ctx).await {
            Err(UseCaseErrors::NotCancellable(reason)) => assert!(reason.contains("24 hours")),
            res => panic!("Unexpected result: {:?}", res),
        }

        let stored_rule = ctx.repos.auto_gift_rules.find(&rule.id).await.unwrap().unwrap();
        assert!(stored_rule.is_active);
        let stored_execution = ctx
            .repos
            .gift_executions
            .find(&execution.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored_execution.status, ExecutionStatus::Pending);
        let stored_order = ctx.repos.orders.find(&order.id).await.unwrap().unwrap();
        assert_eq!(stored_order.status, OrderStatus::Scheduled);
    }

    #[actix_web::main]
    #[test]
    async fn cancelling_twice_is_refused() {
        let TestContext { ctx, rule } = setup().await;
        assert!(usecase(&rule).execute(&ctx).await.is_ok());
        match usecase(&rule).execute(&ctx).await {
            Err(UseCaseErrors::NotCancellable(reason)) => {
                assert!(reason.contains("already cancelled"))
            }
            res => panic!("Unexpected result: {:?}", res),
        }
    }

    #[actix_web::main]
    #[test]
    async fn missing_rule_is_not_found() {
        let TestContext { ctx, rule } = setup().await;
        let mut usecase = CancelAutoGiftRuleUseCase {
            user_id: ID::default(),
            rule_id: rule.id.clone(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseErrors::NotFound(_))
        ));
    }

    #[actix_web::main]
    #[test]
    async fn order_already_submitted_does_not_undo_cancellation() {
        let TestContext { ctx, rule } = setup().await;
        let (_, order) = insert_execution_with_order(&ctx, &rule, 72).await;
        let mut submitted = order.clone();
        submitted.status = OrderStatus::Submitted;
        submitted.payment_status = PaymentStatus::Succeeded;
        ctx.repos.orders.save(&submitted).await.unwrap();

        let res = usecase(&rule).execute(&ctx).await.unwrap();
        assert!(!res.rule.is_active);
        assert!(res.orders.cancelled.is_empty());
        assert_eq!(res.orders.failed, vec![order.id]);
    }

    #[actix_web::main]
    #[test]
    async fn storage_failure_leaves_rule_active() {
        let TestContext { mut ctx, rule } = setup().await;
        let (_, order) = insert_execution_with_order(&ctx, &rule, 72).await;
        ctx.repos.gift_executions = Arc::new(UnreachableGiftExecutionRepo);

        let res = usecase(&rule).execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseErrors::StorageError)));
        assert!(matches!(
            error_handler(UseCaseErrors::StorageError),
            AutogiftError::InternalError
        ));

        let stored = ctx
            .repos
            .auto_gift_rules
            .find(&rule.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, rule);
        let order = ctx.repos.orders.find(&order.id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Scheduled);
    }
}
