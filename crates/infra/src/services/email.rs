use super::functions::FunctionsClient;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Transactional emails sent to users
#[async_trait::async_trait]
pub trait IEmailSender: Send + Sync {
    async fn send_verification_code(&self, email: &str, code: &str) -> anyhow::Result<()>;
    async fn send_welcome_wishlist(&self, email: &str) -> anyhow::Result<()>;
}

#[derive(Serialize)]
struct VerificationEmailBody<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WelcomeWishlistBody<'a> {
    user_email: &'a str,
}

pub struct FunctionsEmailSender {
    functions: Arc<FunctionsClient>,
}

impl FunctionsEmailSender {
    pub fn new(functions: Arc<FunctionsClient>) -> Self {
        Self { functions }
    }
}

#[async_trait::async_trait]
impl IEmailSender for FunctionsEmailSender {
    async fn send_verification_code(&self, email: &str, code: &str) -> anyhow::Result<()> {
        self.functions
            .invoke("send-verification-email", &VerificationEmailBody { email, code })
            .await
    }

    async fn send_welcome_wishlist(&self, email: &str) -> anyhow::Result<()> {
        self.functions
            .invoke(
                "send-welcome-wishlist",
                &WelcomeWishlistBody { user_email: email },
            )
            .await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SentEmail {
    VerificationCode { email: String, code: String },
    WelcomeWishlist { email: String },
}

/// Keeps every email in memory instead of delivering it
pub struct InMemoryEmailSender {
    sent: Mutex<Vec<SentEmail>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEmailSender for InMemoryEmailSender {
    async fn send_verification_code(&self, email: &str, code: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentEmail::VerificationCode {
            email: email.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }

    async fn send_welcome_wishlist(&self, email: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentEmail::WelcomeWishlist {
            email: email.to_string(),
        });
        Ok(())
    }
}
