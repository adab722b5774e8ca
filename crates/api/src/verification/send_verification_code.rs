use crate::{
    error::AutogiftError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use autogift_api_structs::send_verification_code::{APIResponse, RequestBody};
use autogift_domain::{is_valid_email, normalize_email, VerificationCode};
use autogift_infra::AutogiftContext;
use tracing::error;

fn error_handler(e: UseCaseErrors) -> AutogiftError {
    match e {
        UseCaseErrors::InvalidEmail(email) => {
            AutogiftError::BadClientData(format!("Invalid email address: {}", email))
        }
        UseCaseErrors::UserNotFound(email) => AutogiftError::NotFound(format!(
            "A user with email: {}, was not found.",
            email
        )),
        UseCaseErrors::TooManyRequests(wait_millis) => AutogiftError::TooManyRequests(format!(
            "A verification code was just sent. Try again in {} seconds.",
            (wait_millis + 999) / 1000
        )),
        UseCaseErrors::DeliveryFailed | UseCaseErrors::StorageError => {
            AutogiftError::InternalError
        }
    }
}

pub async fn send_verification_code_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<AutogiftContext>,
) -> Result<HttpResponse, AutogiftError> {
    let usecase = SendVerificationCodeUseCase {
        email: body.0.email,
    };

    execute(usecase, &ctx)
        .await
        .map(|code| {
            HttpResponse::Ok().json(APIResponse {
                email: code.email,
                expires_at: code.expires_at,
            })
        })
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct SendVerificationCodeUseCase {
    pub email: String,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidEmail(String),
    UserNotFound(String),
    /// Millis left of the resend cooldown
    TooManyRequests(i64),
    DeliveryFailed,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendVerificationCodeUseCase {
    type Response = VerificationCode;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "SendVerificationCode";

    async fn execute(&mut self, ctx: &AutogiftContext) -> Result<Self::Response, Self::Errors> {
        if !is_valid_email(&self.email) {
            return Err(UseCaseErrors::InvalidEmail(self.email.clone()));
        }
        let email = normalize_email(&self.email);

        match ctx.repos.users.find_by_email(&email).await {
            Ok(Some(_)) => (),
            Ok(None) => return Err(UseCaseErrors::UserNotFound(email)),
            Err(_) => return Err(UseCaseErrors::StorageError),
        }

        let policy = &ctx.config.verification_policy;
        let now = ctx.sys.get_timestamp_millis();
        let latest = ctx
            .repos
            .verification_codes
            .find_latest_by_email(&email)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        if let Some(wait_millis) = policy.resend_wait_millis(latest.as_ref(), now) {
            return Err(UseCaseErrors::TooManyRequests(wait_millis));
        }

        // Stored after delivery so a failed send does not start the cooldown
        let code = VerificationCode::generate(&email, now, policy);
        if let Err(e) = ctx
            .services
            .email_sender
            .send_verification_code(&code.email, &code.code)
            .await
        {
            error!(
                "Unable to deliver verification code to: {}. Error: {:?}",
                code.email, e
            );
            return Err(UseCaseErrors::DeliveryFailed);
        }

        ctx.repos
            .verification_codes
            .insert(&code)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(code)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use autogift_domain::{User, ID};
    use autogift_infra::{IEmailSender, InMemoryEmailSender, SentEmail, StaticTimeSys};
    use std::sync::Arc;

    struct UnreachableEmailSender;

    #[async_trait::async_trait]
    impl IEmailSender for UnreachableEmailSender {
        async fn send_verification_code(&self, _email: &str, _code: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("connection refused"))
        }

        async fn send_welcome_wishlist(&self, _email: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    const NOW: i64 = 1_700_000_000_000;

    async fn setup() -> (AutogiftContext, Arc<InMemoryEmailSender>) {
        let mut ctx = AutogiftContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        let sender = Arc::new(InMemoryEmailSender::new());
        ctx.services.email_sender = sender.clone();
        let user = User::new(ID::default(), "jane@example.com".into());
        ctx.repos.users.insert(&user).await.unwrap();
        (ctx, sender)
    }

    #[actix_web::main]
    #[test]
    async fn sends_code_to_existing_user() {
        let (ctx, sender) = setup().await;

        let mut usecase = SendVerificationCodeUseCase {
            email: " Jane@Example.com".into(),
        };
        let code = usecase.execute(&ctx).await.unwrap();
        assert_eq!(code.email, "jane@example.com");
        assert_eq!(code.expires_at, NOW + 1000 * 60 * 15);
        assert_eq!(
            sender.sent(),
            vec![SentEmail::VerificationCode {
                email: "jane@example.com".into(),
                code: code.code.clone(),
            }]
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_and_invalid_emails() {
        let (ctx, sender) = setup().await;

        let mut usecase = SendVerificationCodeUseCase {
            email: "nobody@example.com".into(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseErrors::UserNotFound(_))
        ));

        let mut usecase = SendVerificationCodeUseCase {
            email: "not-an-email".into(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseErrors::InvalidEmail(_))
        ));
        assert!(sender.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn resend_is_refused_during_cooldown() {
        let (mut ctx, sender) = setup().await;

        let mut usecase = SendVerificationCodeUseCase {
            email: "jane@example.com".into(),
        };
        assert!(usecase.execute(&ctx).await.is_ok());
        match usecase.execute(&ctx).await {
            Err(UseCaseErrors::TooManyRequests(wait)) => assert_eq!(wait, 1000 * 60),
            res => panic!("Unexpected result: {:?}", res),
        }
        assert_eq!(sender.sent().len(), 1);

        ctx.sys = Arc::new(StaticTimeSys(NOW + 1000 * 60));
        assert!(usecase.execute(&ctx).await.is_ok());
        assert_eq!(sender.sent().len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn failed_delivery_does_not_start_cooldown() {
        let (mut ctx, sender) = setup().await;
        ctx.services.email_sender = Arc::new(UnreachableEmailSender);

        let mut usecase = SendVerificationCodeUseCase {
            email: "jane@example.com".into(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseErrors::DeliveryFailed)
        ));
        let stored = ctx
            .repos
            .verification_codes
            .find_latest_by_email("jane@example.com")
            .await
            .unwrap();
        assert_eq!(stored, None);

        ctx.services.email_sender = sender.clone();
        let code = usecase.execute(&ctx).await.unwrap();
        assert_eq!(sender.sent().len(), 1);
        let stored = ctx
            .repos
            .verification_codes
            .find_latest_by_email("jane@example.com")
            .await
            .unwrap();
        assert_eq!(stored, Some(code));
    }
}
