use super::subscribers::SendWelcomeWishlistOnEmailVerified;
use crate::{
    error::AutogiftError,
    shared::usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpResponse};
use autogift_api_structs::verify_email_code::{APIResponse, RequestBody};
use autogift_domain::{normalize_email, User, VerificationError};
use autogift_infra::AutogiftContext;
use tracing::info;

pub async fn verify_email_code_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let body = body.0;
    let usecase = VerifyEmailCodeUseCase {
        email: body.email,
        code: body.code,
    };

    execute(usecase, &ctx)
        .await
        .map(|outcome| {
            let res = match outcome {
                VerificationOutcome::Verified { .. } => APIResponse::verified(),
                VerificationOutcome::Rejected(e) => APIResponse::rejected(e.reason()),
            };
            HttpResponse::Ok().json(res)
        })
        .map_err(|_| AutogiftError::InternalError)
}

#[derive(Debug)]
pub struct VerifyEmailCodeUseCase {
    pub email: String,
    pub code: String,
}

/// A rejected code is a normal outcome and not an error of the use case
#[derive(Debug, PartialEq)]
pub enum VerificationOutcome {
    Verified {
        user: User,
        /// False when the email had been confirmed before
        newly_confirmed: bool,
    },
    Rejected(VerificationError),
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

impl VerifyEmailCodeUseCase {
    async fn confirm_user(
        &self,
        mut user: User,
        ctx: &AutogiftContext,
    ) -> Result<VerificationOutcome, UseCaseErrors> {
        let newly_confirmed = !user.is_confirmed();
        if newly_confirmed {
            user.confirm_email(ctx.sys.get_timestamp_millis());
            ctx.repos
                .users
                .save(&user)
                .await
                .map_err(|_| UseCaseErrors::StorageError)?;
        }
        Ok(VerificationOutcome::Verified {
            user,
            newly_confirmed,
        })
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for VerifyEmailCodeUseCase {
    type Response = VerificationOutcome;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "VerifyEmailCode";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        let email = normalize_email(&self.email);
        let user = match ctx.repos.users.find_by_email(&email).await {
            Ok(Some(user)) => user,
            Ok(None) => return Ok(VerificationOutcome::Rejected(VerificationError::Invalid)),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };

        if ctx.config.verification_policy.is_bypass(&self.code) {
            info!("Email: {} was verified with the bypass code", email);
            return self.confirm_user(user, ctx).await;
        }

        let mut code = match ctx.repos.verification_codes.find_latest_by_email(&email).await {
            Ok(Some(code)) => code,
            Ok(None) => return Ok(VerificationOutcome::Rejected(VerificationError::Invalid)),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };

        let now = ctx.sys.get_timestamp_millis();
        let codes = &ctx.repos.verification_codes;
        match code.verify(&self.code, now) {
            Ok(()) => {
                let consumed = codes
                    .mark_used(&code.id, now)
                    .await
                    .map_err(|_| UseCaseErrors::StorageError)?;
                if !consumed {
                    return Ok(VerificationOutcome::Rejected(VerificationError::AlreadyUsed));
                }
                self.confirm_user(user, ctx).await
            }
            Err(e) => {
                codes
                    .record_failed_attempt(&code.id)
                    .await
                    .map_err(|_| UseCaseErrors::StorageError)?;
                Ok(VerificationOutcome::Rejected(e))
            }
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendWelcomeWishlistOnEmailVerified)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use autogift_domain::{VerificationCode, ID};
    use autogift_infra::{
        IVerificationCodeRepo, InMemoryEmailSender, SentEmail, StaticTimeSys,
    };
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000_000;
    const EMAIL: &str = "jane@example.com";

    struct TestContext {
        ctx: AutogiftContext,
        sender: Arc<InMemoryEmailSender>,
        user: User,
    }

    async fn setup() -> TestContext {
        let mut ctx = AutogiftContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        ctx.config.verification_policy.bypass_code = None;
        let sender = Arc::new(InMemoryEmailSender::new());
        ctx.services.email_sender = sender.clone();
        let user = User::new(ID::default(), EMAIL.into());
        ctx.repos.users.insert(&user).await.unwrap();
        TestContext { ctx, sender, user }
    }

    async fn send_code(ctx: &AutogiftContext, created: i64) -> VerificationCode {
        let code = VerificationCode::generate(EMAIL, created, &ctx.config.verification_policy);
        ctx.repos.verification_codes.insert(&code).await.unwrap();
        code
    }

    fn usecase(code: &str) -> VerifyEmailCodeUseCase {
        VerifyEmailCodeUseCase {
            email: EMAIL.to_uppercase(),
            code: code.into(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn code_is_accepted_once() {
        let TestContext { ctx, sender, user } = setup().await;
        let code = send_code(&ctx, NOW - 1000).await;

        let res = execute(usecase(&code.code), &ctx).await.unwrap();
        match res {
            VerificationOutcome::Verified {
                user: verified,
                newly_confirmed,
            } => {
                assert!(newly_confirmed);
                assert_eq!(verified.id, user.id);
                assert_eq!(verified.email_confirmed_at, Some(NOW));
            }
            res => panic!("Unexpected outcome: {:?}", res),
        }
        let stored = ctx.repos.users.find(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.email_confirmed_at, Some(NOW));
        assert_eq!(
            sender.sent(),
            vec![SentEmail::WelcomeWishlist {
                email: EMAIL.into()
            }]
        );

        let res = execute(usecase(&code.code), &ctx).await.unwrap();
        assert_eq!(
            res,
            VerificationOutcome::Rejected(VerificationError::AlreadyUsed)
        );
        let stored = ctx
            .repos
            .verification_codes
            .find_latest_by_email(EMAIL)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.used_at, Some(NOW));
        assert_eq!(stored.attempts, 1);
        assert_eq!(sender.sent().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn expired_code_is_rejected() {
        let TestContext { ctx, sender, user } = setup().await;
        let code = send_code(&ctx, NOW - 1000 * 60 * 16).await;

        let res = execute(usecase(&code.code), &ctx).await.unwrap();
        assert_eq!(res, VerificationOutcome::Rejected(VerificationError::Expired));
        let stored = ctx.repos.users.find(&user.id).await.unwrap().unwrap();
        assert!(!stored.is_confirmed());
        assert!(sender.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn unsent_and_wrong_codes_are_invalid() {
        let TestContext { ctx, .. } = setup().await;

        let res = execute(usecase("111111"), &ctx).await.unwrap();
        assert_eq!(res, VerificationOutcome::Rejected(VerificationError::Invalid));

        let mut code = VerificationCode::generate(EMAIL, NOW, &ctx.config.verification_policy);
        code.code = "222222".into();
        ctx.repos.verification_codes.insert(&code).await.unwrap();
        let res = execute(usecase("333333"), &ctx).await.unwrap();
        assert_eq!(res, VerificationOutcome::Rejected(VerificationError::Invalid));
        let stored = ctx
            .repos
            .verification_codes
            .find_latest_by_email(EMAIL)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.attempts, 1);
        assert_eq!(stored.used_at, None);
    }

    /// Serves the code as it was before any request consumed it
    struct StaleCodeRepo {
        inner: Arc<dyn IVerificationCodeRepo>,
        snapshot: VerificationCode,
    }

    #[async_trait::async_trait]
    impl IVerificationCodeRepo for StaleCodeRepo {
        async fn insert(&self, code: &VerificationCode) -> anyhow::Result<()> {
            self.inner.insert(code).await
        }

        async fn record_failed_attempt(&self, code_id: &ID) -> anyhow::Result<()> {
            self.inner.record_failed_attempt(code_id).await
        }

        async fn mark_used(&self, code_id: &ID, used_at: i64) -> anyhow::Result<bool> {
            self.inner.mark_used(code_id, used_at).await
        }

        async fn find_latest_by_email(
            &self,
            _email: &str,
        ) -> anyhow::Result<Option<VerificationCode>> {
            Ok(Some(self.snapshot.clone()))
        }
    }

    #[actix_web::main]
    #[test]
    async fn concurrent_requests_consume_code_once() {
        let TestContext {
            mut ctx, sender, ..
        } = setup().await;
        let code = send_code(&ctx, NOW - 1000).await;
        ctx.repos.verification_codes = Arc::new(StaleCodeRepo {
            inner: ctx.repos.verification_codes.clone(),
            snapshot: code.clone(),
        });

        let first = execute(usecase(&code.code), &ctx).await.unwrap();
        assert!(matches!(first, VerificationOutcome::Verified { .. }));
        let second = execute(usecase(&code.code), &ctx).await.unwrap();
        assert_eq!(
            second,
            VerificationOutcome::Rejected(VerificationError::AlreadyUsed)
        );
        assert_eq!(sender.sent().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn bypass_code_confirms_existing_users_only() {
        let TestContext {
            mut ctx, sender, ..
        } = setup().await;
        ctx.config.verification_policy.bypass_code = Some("123456".into());

        let res = execute(usecase("123456"), &ctx).await.unwrap();
        assert!(matches!(
            res,
            VerificationOutcome::Verified {
                newly_confirmed: true,
                ..
            }
        ));
        assert_eq!(sender.sent().len(), 1);

        let res = execute(usecase("123456"), &ctx).await.unwrap();
        assert!(matches!(
            res,
            VerificationOutcome::Verified {
                newly_confirmed: false,
                ..
            }
        ));
        assert_eq!(sender.sent().len(), 1);

        let mut unknown = usecase("123456");
        unknown.email = "nobody@example.com".into();
        let res = execute(unknown, &ctx).await.unwrap();
        assert_eq!(res, VerificationOutcome::Rejected(VerificationError::Invalid));
    }
}
