use crate::base::{APIResponse, BaseClient};
use autogift_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct VerificationClient {
    base: Arc<BaseClient>,
}

impl VerificationClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn send_code(&self, email: String) -> APIResponse<send_verification_code::APIResponse> {
        let body = send_verification_code::RequestBody { email };
        self.base
            .post(body, "verification/send".into(), StatusCode::OK)
            .await
    }

    pub async fn verify(
        &self,
        email: String,
        code: String,
    ) -> APIResponse<verify_email_code::APIResponse> {
        let body = verify_email_code::RequestBody { email, code };
        self.base
            .post(body, "verification/verify".into(), StatusCode::OK)
            .await
    }
}
