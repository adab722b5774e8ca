use super::find_user_rule;
use crate::{
    error::AutogiftError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::get_rule_executions::{APIResponse, PathParams};
use autogift_domain::{AutomatedGiftExecution, ID};
use autogift_infra::AutogiftContext;

fn error_handler(e: UseCaseErrors) -> AutogiftError {
    match e {
        UseCaseErrors::NotFound(rule_id) => AutogiftError::NotFound(format!(
            "The auto-gift rule with id: {}, was not found.",
            rule_id
        )),
        UseCaseErrors::StorageError => AutogiftError::InternalError,
    }
}

pub async fn get_rule_executions_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let (user, _policy) = protect_route(&http_req, &ctx).await?;

    let usecase = GetRuleExecutionsUseCase {
        user_id: user.id,
        rule_id: path_params.rule_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|executions| HttpResponse::Ok().json(APIResponse::new(executions)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct GetRuleExecutionsUseCase {
    pub user_id: ID,
    pub rule_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRuleExecutionsUseCase {
    type Response = Vec<AutomatedGiftExecution>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetRuleExecutions";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        let rule = match find_user_rule(&self.rule_id, &self.user_id, ctx).await {
            Ok(Some(rule)) => rule,
            Ok(None) => return Err(UseCaseErrors::NotFound(self.rule_id.clone())),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };

        ctx.repos
            .gift_executions
            .find_by_rule(&rule.id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
