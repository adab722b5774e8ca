use crate::{
    error::AutogiftError,
    shared::{
        auth::protect_admin_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::get_order_recovery::{APIResponse, PathParams};
use autogift_domain::{evaluate_order_recovery, Order, RecoveryDecision, ID};
use autogift_infra::AutogiftContext;

fn error_handler(e: UseCaseErrors) -> AutogiftError {
    match e {
        UseCaseErrors::NotFound(order_id) => AutogiftError::NotFound(format!(
            "The order with id: {}, was not found.",
            order_id
        )),
        UseCaseErrors::StorageError => AutogiftError::InternalError,
    }
}

pub async fn get_order_recovery_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = GetOrderRecoveryUseCase {
        order_id: path_params.order_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|(order, decision)| HttpResponse::Ok().json(APIResponse::new(order, &decision)))
        .map_err(error_handler)
}

/// Tells admin tooling what recovering a stuck order would do, without doing it
#[derive(Debug)]
pub struct GetOrderRecoveryUseCase {
    pub order_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetOrderRecoveryUseCase {
    type Response = (Order, RecoveryDecision);

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetOrderRecovery";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        let order = match ctx.repos.orders.find(&self.order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => return Err(UseCaseErrors::NotFound(self.order_id.clone())),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };
        let decision = evaluate_order_recovery(&order, &ctx.config.deferred_payment_schedule);
        Ok((order, decision))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use autogift_domain::{NaiveDate, OrderStatus, PaymentStatus};

    #[actix_web::main]
    #[test]
    async fn evaluates_stored_order() {
        let ctx = AutogiftContext::create_inmemory();
        let mut order = Order::new(ID::default(), 2000, 0);
        order.status = OrderStatus::Failed;
        order.payment_status = PaymentStatus::Pending;
        order.scheduled_delivery_date = NaiveDate::from_ymd_opt(2025, 5, 11);
        ctx.repos.orders.insert(&order).await.unwrap();

        let mut usecase = GetOrderRecoveryUseCase {
            order_id: order.id.clone(),
        };
        let (_, decision) = usecase.execute(&ctx).await.unwrap();
        assert_eq!(
            decision,
            RecoveryDecision::DeferredPayment {
                capture_date: NaiveDate::from_ymd_opt(2025, 5, 4),
                submission_date: NaiveDate::from_ymd_opt(2025, 5, 8),
            }
        );

        let mut usecase = GetOrderRecoveryUseCase {
            order_id: ID::default(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseErrors::NotFound(_))
        ));
    }
}
