use autogift_api::Application;
use autogift_domain::{User, ID};
use autogift_infra::{
    setup_context, AutogiftContext, Config, InMemoryEmailSender, InMemoryOrderProcessor,
};
use autogift_sdk::AutogiftSDK;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;

pub struct TestApp {
    pub config: Config,
    pub address: String,
    /// Shares repositories with the running application
    pub ctx: AutogiftContext,
    pub order_processor: Arc<InMemoryOrderProcessor>,
    pub email_sender: Arc<InMemoryEmailSender>,
}

#[derive(Serialize)]
struct Claims {
    exp: usize,
    iat: usize,
    sub: String,
    email: String,
}

impl TestApp {
    /// SDK acting as a freshly signed up user
    pub async fn user_sdk(&self) -> (User, AutogiftSDK) {
        let user = User::new(ID::default(), format!("{}@example.com", ID::default()));
        self.ctx
            .repos
            .users
            .insert(&user)
            .await
            .expect("To insert user");
        let sdk = AutogiftSDK::with_user_token(self.address.clone(), self.token_for(&user));
        (user, sdk)
    }

    pub fn token_for(&self, user: &User) -> String {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            exp: now + 60 * 60,
            iat: now,
            sub: user.id.to_string(),
            email: user.email.clone(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .expect("To sign token")
    }

    pub fn admin_sdk(&self) -> AutogiftSDK {
        AutogiftSDK::new(self.address.clone(), self.config.admin_api_key.clone())
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, AutogiftSDK) {
    let mut ctx = setup_context().await;
    ctx.config.port = 0; // Random port
    let order_processor = Arc::new(InMemoryOrderProcessor::new());
    let email_sender = Arc::new(InMemoryEmailSender::new());
    ctx.services.order_processor = order_processor.clone();
    ctx.services.email_sender = email_sender.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        config,
        address: address.clone(),
        ctx,
        order_processor,
        email_sender,
    };
    let sdk = AutogiftSDK::new(address, "");
    (app, sdk)
}
