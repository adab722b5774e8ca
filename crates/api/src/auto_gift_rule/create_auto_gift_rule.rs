use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase, UseCaseErrorContainer},
};
use crate::error::AutogiftError;
use actix_web::{web, HttpRequest, HttpResponse};
use autogift_api_structs::create_auto_gift_rule::{APIResponse, RequestBody};
use autogift_domain::{
    AutoGiftRule, DateType, GiftRecipient, GiftSelectionCriteria, NotificationPreferences,
    RuleSource, RuleValidationError, User, ID,
};
use autogift_infra::AutogiftContext;

fn error_handler(e: UseCaseErrors) -> AutogiftError {
    match e {
        UseCaseErrors::InvalidRule(e) => AutogiftError::BadClientData(e.to_string()),
        UseCaseErrors::RecipientNotConnected(recipient_id) => AutogiftError::BadClientData(format!(
            "The recipient: {} is not one of your connections",
            recipient_id
        )),
        UseCaseErrors::StorageError => AutogiftError::InternalError,
    }
}

pub async fn create_auto_gift_rule_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let (user, policy) = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = CreateAutoGiftRuleUseCase {
        user,
        recipient_id: body.recipient_id,
        pending_recipient_email: body.pending_recipient_email,
        date_type: body.date_type,
        event_id: body.event_id,
        budget_limit: body.budget_limit,
        gift_selection_criteria: body.gift_selection_criteria.unwrap_or_default(),
        notification_preferences: body.notification_preferences.unwrap_or_default(),
        payment_method_id: body.payment_method_id,
        source: body.source.unwrap_or(RuleSource::Manual),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|rule| HttpResponse::Created().json(APIResponse::new(rule)))
        .map_err(|e| match e {
            UseCaseErrorContainer::Unauthorized(e) => AutogiftError::Unauthorized(e),
            UseCaseErrorContainer::UseCase(e) => error_handler(e),
        })
}

#[derive(Debug)]
pub struct CreateAutoGiftRuleUseCase {
    pub user: User,
    pub recipient_id: Option<ID>,
    pub pending_recipient_email: Option<String>,
    pub date_type: DateType,
    pub event_id: Option<ID>,
    pub budget_limit: Option<i64>,
    pub gift_selection_criteria: GiftSelectionCriteria,
    pub notification_preferences: NotificationPreferences,
    pub payment_method_id: Option<String>,
    pub source: RuleSource,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidRule(RuleValidationError),
    RecipientNotConnected(ID),
    StorageError,
}

impl From<RuleValidationError> for UseCaseErrors {
    fn from(e: RuleValidationError) -> Self {
        Self::InvalidRule(e)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateAutoGiftRuleUseCase {
    type Response = AutoGiftRule;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CreateAutoGiftRule";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        let recipient = GiftRecipient::from_parts(
            self.recipient_id.clone(),
            self.pending_recipient_email.clone(),
        )?;

        match &recipient {
            GiftRecipient::Connection(recipient_id) => {
                if *recipient_id == self.user.id {
                    return Err(RuleValidationError::SelfRecipient.into());
                }
                let connections = ctx
                    .repos
                    .connections
                    .find_between(&self.user.id, recipient_id)
                    .await
                    .map_err(|_| UseCaseErrors::StorageError)?;
                if !connections
                    .iter()
                    .any(|c| c.connects(&self.user.id, recipient_id))
                {
                    return Err(UseCaseErrors::RecipientNotConnected(recipient_id.clone()));
                }
            }
            GiftRecipient::PendingInvitation(email) => {
                if *email == self.user.email {
                    return Err(RuleValidationError::SelfRecipient.into());
                }
            }
        }

        let now = ctx.sys.get_timestamp_millis();
        let mut rule = AutoGiftRule::new(
            self.user.id.clone(),
            recipient,
            self.date_type.clone(),
            now,
        );
        rule.set_budget_limit(self.budget_limit)?;
        rule.set_notification_preferences(self.notification_preferences.clone())?;
        rule.event_id = self.event_id.clone();
        rule.gift_selection_criteria = self.gift_selection_criteria.clone();
        rule.payment_method_id = self.payment_method_id.clone();
        rule.source = self.source;

        ctx.repos
            .auto_gift_rules
            .insert(&rule)
            .await
            .map(|_| rule)
            .map_err(|_| UseCaseErrors::StorageError)
    }
}

impl PermissionBoundary for CreateAutoGiftRuleUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::CreateAutoGiftRule]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use autogift_domain::Connection;
    use autogift_infra::StaticTimeSys;
    use std::sync::Arc;

    struct TestContext {
        ctx: AutogiftContext,
        user: User,
        friend: User,
    }

    async fn setup() -> TestContext {
        let mut ctx = AutogiftContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(1000));
        let user = User::new(ID::default(), "owner@example.com".into());
        let friend = User::new(ID::default(), "friend@example.com".into());
        ctx.repos.users.insert(&user).await.unwrap();
        ctx.repos.users.insert(&friend).await.unwrap();
        let mut connection = Connection::new(user.id.clone(), friend.id.clone());
        connection.accept();
        ctx.repos.connections.insert(&connection).await.unwrap();

        TestContext { ctx, user, friend }
    }

    fn usecase(user: &User) -> CreateAutoGiftRuleUseCase {
        CreateAutoGiftRuleUseCase {
            user: user.clone(),
            recipient_id: None,
            pending_recipient_email: None,
            date_type: DateType::Birthday,
            event_id: None,
            budget_limit: Some(5000),
            gift_selection_criteria: Default::default(),
            notification_preferences: Default::default(),
            payment_method_id: None,
            source: RuleSource::Manual,
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_rule_for_connection() {
        let TestContext { ctx, user, friend } = setup().await;
        let mut usecase = usecase(&user);
        usecase.recipient_id = Some(friend.id.clone());

        let rule = execute(usecase, &ctx).await.unwrap();
        assert!(rule.is_active);
        assert_eq!(rule.created, 1000);
        assert_eq!(rule.recipient, GiftRecipient::Connection(friend.id));
        assert_eq!(
            ctx.repos.auto_gift_rules.find(&rule.id).await.unwrap(),
            Some(rule)
        );
    }

    #[actix_web::main]
    #[test]
    async fn creates_rule_for_pending_invitation() {
        let TestContext { ctx, user, .. } = setup().await;
        let mut usecase = usecase(&user);
        usecase.pending_recipient_email = Some("New.Friend@example.com".into());

        let rule = execute(usecase, &ctx).await.unwrap();
        assert_eq!(
            rule.recipient.pending_recipient_email(),
            Some("new.friend@example.com")
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_recipient_that_is_not_a_connection() {
        let TestContext { ctx, user, .. } = setup().await;
        let stranger = ID::default();
        let mut usecase = usecase(&user);
        usecase.recipient_id = Some(stranger.clone());

        match execute(usecase, &ctx).await {
            Err(UseCaseErrors::RecipientNotConnected(id)) => assert_eq!(id, stranger),
            res => panic!("Unexpected result: {:?}", res),
        }
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_rules() {
        let TestContext { ctx, user, friend } = setup().await;

        let usecase = self::usecase(&user);
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseErrors::InvalidRule(RuleValidationError::InvalidRecipient))
        ));

        let mut usecase = self::usecase(&user);
        usecase.recipient_id = Some(user.id.clone());
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseErrors::InvalidRule(RuleValidationError::SelfRecipient))
        ));

        let mut usecase = self::usecase(&user);
        usecase.recipient_id = Some(friend.id.clone());
        usecase.budget_limit = Some(-10);
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseErrors::InvalidRule(RuleValidationError::InvalidBudget(-10)))
        ));
    }

    #[test]
    fn requires_create_permission() {
        let user = User::new(ID::default(), "owner@example.com".into());
        assert_eq!(
            usecase(&user).permissions(),
            vec![Permission::CreateAutoGiftRule]
        );
    }
}
