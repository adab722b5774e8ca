use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase, UseCaseErrorContainer},
};
use crate::error::AutogiftError;
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::cancel_gift_execution::{APIResponse, PathParams};
use autogift_domain::{
    check_execution_cancellation, AutomatedGiftExecution, ExecutionCancellationError, ID,
};
use autogift_infra::AutogiftContext;
use tracing::{error, warn};

fn error_handler(e: UseCaseErrors) -> AutogiftError {
    match e {
        UseCaseErrors::NotFound(execution_id) => AutogiftError::NotFound(format!(
            "The gift execution with id: {}, was not found.",
            execution_id
        )),
        UseCaseErrors::NotCancellable(e) => AutogiftError::Conflict(e.to_string()),
        UseCaseErrors::StorageError => AutogiftError::InternalError,
    }
}

pub async fn cancel_gift_execution_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let (user, policy) = protect_route(&http_req, &ctx).await?;

    let usecase = CancelGiftExecutionUseCase {
        user_id: user.id,
        execution_id: path_params.execution_id.clone(),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.execution, res.order_cancelled)))
        .map_err(|e| match e {
            UseCaseErrorContainer::Unauthorized(e) => AutogiftError::Unauthorized(e),
            UseCaseErrorContainer::UseCase(e) => error_handler(e),
        })
}

/// Outcome of cancelling the orders linked to cancelled executions
#[derive(Debug, Default, PartialEq)]
pub struct OrderCancellations {
    pub cancelled: Vec<ID>,
    pub failed: Vec<ID>,
}

/// Cancels the orders of the given executions that are not yet submitted.
///
/// Failures are collected instead of returned. The executions are
/// already cancelled at this point and are never rolled back.
pub(crate) async fn cancel_linked_orders(
    executions: &[AutomatedGiftExecution],
    ctx: &AutogiftContext,
) -> OrderCancellations {
    let now = ctx.sys.get_timestamp_millis();
    let mut res = OrderCancellations::default();
    for execution in executions {
        let order_id = match &execution.order_id {
            Some(order_id) => order_id,
            None => continue,
        };
        match ctx.repos.orders.cancel_pending(order_id, now).await {
            Ok(true) => res.cancelled.push(order_id.clone()),
            Ok(false) => {
                warn!(
                    "Order: {} of cancelled execution: {} was already submitted or missing",
                    order_id, execution.id
                );
                res.failed.push(order_id.clone());
            }
            Err(e) => {
                error!(
                    "Unable to cancel order: {} of cancelled execution: {}. Error: {:?}",
                    order_id, execution.id, e
                );
                res.failed.push(order_id.clone());
            }
        }
    }
    res
}

#[derive(Debug)]
pub struct CancelGiftExecutionUseCase {
    pub user_id: ID,
    pub execution_id: ID,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub execution: AutomatedGiftExecution,
    /// `None` when the execution had no order
    pub order_cancelled: Option<bool>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    NotCancellable(ExecutionCancellationError),
    StorageError,
}

impl CancelGiftExecutionUseCase {
    async fn find_user_execution(
        &self,
        ctx: &AutogiftContext,
    ) -> Result<AutomatedGiftExecution, UseCaseErrors> {
        match ctx.repos.gift_executions.find(&self.execution_id).await {
            Ok(Some(execution)) if execution.user_id == self.user_id => Ok(execution),
            Ok(_) => Err(UseCaseErrors::NotFound(self.execution_id.clone())),
            Err(_) => Err(UseCaseErrors::StorageError),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelGiftExecutionUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CancelGiftExecution";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        let execution = self.find_user_execution(ctx).await?;

        let now = ctx.sys.get_timestamp_millis();
        check_execution_cancellation(&execution, now, &ctx.config.cancellation_policy)
            .map_err(UseCaseErrors::NotCancellable)?;

        // The batch scheduler may have picked the execution up since it was read
        let execution = match ctx
            .repos
            .gift_executions
            .cancel_pending(&execution.id, now)
            .await
        {
            Ok(Some(execution)) => execution,
            Ok(None) => {
                let current = self.find_user_execution(ctx).await?;
                return Err(match current.ensure_cancellable() {
                    Err(e) => UseCaseErrors::NotCancellable(e),
                    Ok(()) => UseCaseErrors::StorageError,
                });
            }
            Err(_) => return Err(UseCaseErrors::StorageError),
        };

        let order_cancelled = match execution.order_id {
            Some(_) => {
                let orders = cancel_linked_orders(std::slice::from_ref(&execution), ctx).await;
                Some(!orders.cancelled.is_empty())
            }
            None => None,
        };

        Ok(UseCaseResponse {
            execution,
            order_cancelled,
        })
    }
}

impl PermissionBoundary for CancelGiftExecutionUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::CancelGiftExecution]
    }
}
