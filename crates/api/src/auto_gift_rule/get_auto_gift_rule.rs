use super::find_user_rule;
use crate::{
    error::AutogiftError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::get_auto_gift_rule::{APIResponse, PathParams};
use autogift_domain::{AutoGiftRule, ID};
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

pub async fn get_auto_gift_rule_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let (user, _policy) = protect_route(&http_req, &ctx).await?;

    let usecase = GetAutoGiftRuleUseCase {
        user_id: user.id,
        rule_id: path_params.rule_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Ok().json(APIResponse::new(rule)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct GetAutoGiftRuleUseCase {
    pub user_id: ID,
    pub rule_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAutoGiftRuleUseCase {
    type Response = AutoGiftRule;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetAutoGiftRule";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        match find_user_rule(&self.rule_id, &self.user_id, ctx).await {
            Ok(Some(rule)) => Ok(rule),
            Ok(None) => Err(UseCaseErrors::NotFound(self.rule_id.clone())),
            Err(_) => Err(UseCaseErrors::StorageError),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use autogift_domain::{DateType, GiftRecipient};

    #[actix_web::main]
    #[test]
    async fn rules_of_other_users_are_not_found() {
        let ctx = AutogiftContext::create_inmemory();
        let owner = ID::default();
        let rule = AutoGiftRule::new(
            owner.clone(),
            GiftRecipient::PendingInvitation("friend@example.com".into()),
            DateType::Anniversary,
            0,
        );
        ctx.repos.auto_gift_rules.insert(&rule).await.unwrap();

        let mut usecase = GetAutoGiftRuleUseCase {
            user_id: owner,
            rule_id: rule.id.clone(),
        };
        assert_eq!(usecase.execute(&ctx).await.unwrap(), rule);

        let mut usecase = GetAutoGiftRuleUseCase {
            user_id: ID::default(),
            rule_id: rule.id.clone(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseErrors::NotFound(_))
        ));
    }
}
