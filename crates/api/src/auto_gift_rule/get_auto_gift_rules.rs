use crate::{
    error::AutogiftError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::get_auto_gift_rules::APIResponse;
use autogift_domain::{AutoGiftRule, ID};
use autogift_infra::AutogiftContext;

pub async fn get_auto_gift_rules_controller(
    http_req: HttpRequest,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let (user, _policy) = protect_route(&http_req, &ctx).await?;

    let usecase = GetAutoGiftRulesUseCase { user_id: user.id };

    execute(usecase, &ctx)
        .await
        .map(|rules| HttpResponse::Ok().json(APIResponse::new(rules)))
        .map_err(|e| match e {
            UseCaseErrors::StorageError => AutogiftError::InternalError,
        })
}

#[derive(Debug)]
pub struct GetAutoGiftRulesUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAutoGiftRulesUseCase {
    /// Newest first, cancelled rules included
    type Response = Vec<AutoGiftRule>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetAutoGiftRules";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .auto_gift_rules
            .find_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
