use super::verify_email_code::{VerificationOutcome, VerifyEmailCodeUseCase};
use crate::shared::usecase::Subscriber;
use autogift_infra::AutogiftContext;
use tracing::error;

pub struct SendWelcomeWishlistOnEmailVerified;

#[async_trait::async_trait(?Send)]
impl Subscriber<VerifyEmailCodeUseCase> for SendWelcomeWishlistOnEmailVerified {
    async fn notify(&self, outcome: &VerificationOutcome, ctx: &AutogiftContext) {
        let user = match outcome {
            VerificationOutcome::Verified {
                user,
                newly_confirmed: true,
            } => user,
            _ => return,
        };

        if let Err(e) = ctx.services.email_sender.send_welcome_wishlist(&user.email).await {
            error!(
                "Unable to send welcome wishlist email to: {}. Error: {:?}",
                user.email, e
            );
        }
    }
}
