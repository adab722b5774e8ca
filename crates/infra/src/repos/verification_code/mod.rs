mod inmemory;
mod postgres;

use autogift_domain::{VerificationCode, ID};
pub use inmemory::InMemoryVerificationCodeRepo;
pub use postgres::PostgresVerificationCodeRepo;

#[async_trait::async_trait]
pub trait IVerificationCodeRepo: Send + Sync {
    async fn insert(&self, code: &VerificationCode) -> anyhow::Result<()>;
    async fn record_failed_attempt(&self, code_id: &ID) -> anyhow::Result<()>;
    /// Consumes the code unless it has been used already. Returns `false`
    /// when another request consumed it first.
    async fn mark_used(&self, code_id: &ID, used_at: i64) -> anyhow::Result<bool>;
    /// The most recently created code sent to `email`
    async fn find_latest_by_email(&self, email: &str) -> anyhow::Result<Option<VerificationCode>>;
}

#[cfg(test)]
mod tests {
    use crate::setup_context;
    use autogift_domain::{VerificationCode, ID};

    #[tokio::test]
    async fn finds_latest_code_for_email() {
        let ctx = setup_context().await;
        let policy = Default::default();
        let email = format!("{}@example.com", ID::default());
        let first = VerificationCode::generate(&email, 1000, &policy);
        let latest = VerificationCode::generate(&email, 2000, &policy);
        let other = VerificationCode::generate("other@example.com", 3000, &policy);
        for code in [&latest, &first, &other] {
            ctx.repos.verification_codes.insert(code).await.unwrap();
        }

        let res = ctx
            .repos
            .verification_codes
            .find_latest_by_email(&email.to_uppercase())
            .await
            .unwrap();
        assert_eq!(res, Some(latest));
    }

    #[tokio::test]
    async fn records_attempts_and_use() {
        let ctx = setup_context().await;
        let email = format!("{}@example.com", ID::default());
        let code = VerificationCode::generate(&email, 1000, &Default::default());
        ctx.repos.verification_codes.insert(&code).await.unwrap();

        let repo = &ctx.repos.verification_codes;
        repo.record_failed_attempt(&code.id).await.unwrap();
        repo.record_failed_attempt(&code.id).await.unwrap();
        assert!(repo.mark_used(&code.id, 1002).await.unwrap());

        let res = repo.find_latest_by_email(&email).await.unwrap().unwrap();
        assert_eq!(res.attempts, 2);
        assert_eq!(res.used_at, Some(1002));
    }

    #[tokio::test]
    async fn code_can_only_be_marked_used_once() {
        let ctx = setup_context().await;
        let email = format!("{}@example.com", ID::default());
        let code = VerificationCode::generate(&email, 1000, &Default::default());
        ctx.repos.verification_codes.insert(&code).await.unwrap();

        let repo = &ctx.repos.verification_codes;
        assert!(repo.mark_used(&code.id, 1001).await.unwrap());
        assert!(!repo.mark_used(&code.id, 1002).await.unwrap());

        let res = repo.find_latest_by_email(&email).await.unwrap().unwrap();
        assert_eq!(res.used_at, Some(1001));
        assert!(!repo.mark_used(&ID::default(), 1003).await.unwrap());
    }
}
