use crate::{
    error::AutogiftError,
    shared::{
        auth::protect_admin_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::retry_order::{APIResponse, PathParams};
use autogift_domain::{evaluate_order_recovery, Order, RecoveryDecision, ID};
use autogift_infra::AutogiftContext;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

fn error_handler(e: UseCaseErrors) -> AutogiftError {
    match e {
        UseCaseErrors::NotFound(order_id) => AutogiftError::NotFound(format!(
            "The order with id: {}, was not found.",
            order_id
        )),
        UseCaseErrors::AlreadyRecovering(order_id) => AutogiftError::Conflict(format!(
            "The order with id: {} is already being resubmitted",
            order_id
        )),
        UseCaseErrors::NotRecoverable(reason) => AutogiftError::Conflict(reason),
        UseCaseErrors::ProcessingFailed | UseCaseErrors::StorageError => {
            AutogiftError::InternalError
        }
    }
}

pub async fn retry_order_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = RetryOrderUseCase {
        order_id: path_params.order_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse::new(res.order, &res.decision, res.resubmitted))
        })
        .map_err(error_handler)
}

/// Marks an order as being recovered for as long as it lives
struct RecoveryGuard {
    order_id: ID,
    recovering: Arc<Mutex<HashSet<ID>>>,
}

impl RecoveryGuard {
    fn acquire(order_id: &ID, recovering: &Arc<Mutex<HashSet<ID>>>) -> Option<Self> {
        let mut orders = recovering.lock().unwrap_or_else(|e| e.into_inner());
        if !orders.insert(order_id.clone()) {
            return None;
        }
        Some(Self {
            order_id: order_id.clone(),
            recovering: recovering.clone(),
        })
    }
}

impl Drop for RecoveryGuard {
    fn drop(&mut self) {
        let mut orders = self.recovering.lock().unwrap_or_else(|e| e.into_inner());
        orders.remove(&self.order_id);
    }
}

/// Resubmits a stuck order for processing. Orders waiting for their
/// deferred payment are never resubmitted, the batch scheduler owns them.
#[derive(Debug)]
pub struct RetryOrderUseCase {
    pub order_id: ID,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub order: Order,
    pub decision: RecoveryDecision,
    pub resubmitted: bool,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    AlreadyRecovering(ID),
    NotRecoverable(String),
    ProcessingFailed,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RetryOrderUseCase {
    type Response = UseCaseResponse;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "RetryOrder";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        let _guard = match RecoveryGuard::acquire(&self.order_id, &ctx.recovering_orders) {
            Some(guard) => guard,
            None => return Err(UseCaseErrors::AlreadyRecovering(self.order_id.clone())),
        };

        let order = match ctx.repos.orders.find(&self.order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => return Err(UseCaseErrors::NotFound(self.order_id.clone())),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };

        let decision = evaluate_order_recovery(&order, &ctx.config.deferred_payment_schedule);
        match &decision {
            RecoveryDecision::NotRecoverable(reason) => {
                return Err(UseCaseErrors::NotRecoverable(reason.clone()))
            }
            RecoveryDecision::DeferredPayment { .. } => {
                info!(
                    "Order: {} has deferred payment and is left to the batch scheduler",
                    order.id
                );
                return Ok(UseCaseResponse {
                    order,
                    decision,
                    resubmitted: false,
                });
            }
            RecoveryDecision::Retry => (),
        }

        if let Err(e) = ctx.services.order_processor.process_order(&order.id).await {
            error!("Unable to resubmit order: {}. Error: {:?}", order.id, e);
            return Err(UseCaseErrors::ProcessingFailed);
        }
        info!("Order: {} was resubmitted for processing", order.id);

        Ok(UseCaseResponse {
            order,
            decision,
            resubmitted: true,
        })
    }
}
